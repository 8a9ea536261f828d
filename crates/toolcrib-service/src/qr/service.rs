//! QR label generation service.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use toolcrib_core::config::StorageConfig;
use toolcrib_core::error::AppError;
use toolcrib_core::result::AppResult;
use toolcrib_core::traits::{BlobStore, QrRenderer};
use toolcrib_core::types::ToolId;
use toolcrib_database::InventoryStore;
use toolcrib_entity::scan::QrPayload;
use toolcrib_entity::tool::Tool;

use crate::context::RequestContext;

/// Where labels are stored and how large they are rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrSettings {
    /// Blob-store directory holding label images.
    pub directory: String,
    /// Public URL prefix of the blob store.
    pub public_base_url: String,
    /// Rendered edge length in pixels.
    pub size: u32,
}

impl From<&StorageConfig> for QrSettings {
    fn from(config: &StorageConfig) -> Self {
        Self {
            directory: config.qr_directory.trim_matches('/').to_string(),
            public_base_url: config.public_base_url.clone(),
            size: config.qr_size,
        }
    }
}

/// A stored label image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrLabel {
    /// Tool the label belongs to.
    pub tool_id: ToolId,
    /// Image file name, as stored in `tools.qr_code`.
    pub file_name: String,
    /// Public URL of the image.
    pub url: String,
}

/// Renders, stores and removes tool QR labels.
#[derive(Debug, Clone)]
pub struct QrService {
    store: Arc<dyn InventoryStore>,
    blobs: Arc<dyn BlobStore>,
    renderer: Arc<dyn QrRenderer>,
    settings: QrSettings,
}

impl QrService {
    /// Creates a new QR service.
    pub fn new(
        store: Arc<dyn InventoryStore>,
        blobs: Arc<dyn BlobStore>,
        renderer: Arc<dyn QrRenderer>,
        settings: QrSettings,
    ) -> Self {
        Self {
            store,
            blobs,
            renderer,
            settings,
        }
    }

    /// Render a fresh label for a tool and record it on the tool.
    pub async fn generate_for_tool(&self, ctx: &RequestContext, id: ToolId) -> AppResult<QrLabel> {
        let tool = self.live_tool(id).await?;
        self.generate(ctx, &tool).await
    }

    /// Generate labels for several tools. Unknown or deleted ids are skipped.
    pub async fn generate_batch(&self, ctx: &RequestContext, ids: &[ToolId]) -> AppResult<Vec<QrLabel>> {
        let mut labels = Vec::with_capacity(ids.len());
        for id in ids {
            match self.store.find_tool(*id).await? {
                Some(tool) if !tool.is_deleted() => labels.push(self.generate(ctx, &tool).await?),
                _ => warn!(tool_id = %id, "Skipping QR generation for unknown tool"),
            }
        }
        info!(requested = ids.len(), generated = labels.len(), "QR batch generated");
        Ok(labels)
    }

    /// Generate a new label, then delete the one it replaces.
    ///
    /// The old file stays in place until the new one is stored and
    /// recorded, so a failed render leaves the tool with a working label.
    pub async fn regenerate_for_tool(&self, ctx: &RequestContext, id: ToolId) -> AppResult<QrLabel> {
        let tool = self.live_tool(id).await?;
        let label = self.generate(ctx, &tool).await?;

        if let Some(old) = tool.qr_code.as_ref().filter(|old| **old != label.file_name) {
            if let Err(e) = self.blobs.delete(&self.blob_path(old)).await {
                warn!(tool_id = %id, file = %old, error = %e, "Failed to delete replaced QR label");
            }
        }
        Ok(label)
    }

    /// Delete the label of a tool. Returns `false` when there was nothing to
    /// delete; the tool's `qr_code` is only cleared when a file was removed.
    pub async fn delete_for_tool(&self, ctx: &RequestContext, id: ToolId) -> AppResult<bool> {
        let tool = self.live_tool(id).await?;
        let Some(file_name) = &tool.qr_code else {
            return Ok(false);
        };

        let deleted = self.blobs.delete(&self.blob_path(file_name)).await?;
        if deleted {
            self.store.set_tool_qr_code(id, None, ctx.request_time).await?;
            info!(tool_id = %id, file = %file_name, "QR label deleted");
        }
        Ok(deleted)
    }

    /// Read the current label image of a tool with its content type.
    pub async fn read_label(&self, id: ToolId) -> AppResult<(String, Bytes)> {
        let tool = self.live_tool(id).await?;
        let file_name = tool
            .qr_code
            .as_ref()
            .ok_or_else(|| AppError::not_found(format!("Tool {id} has no QR code")))?;
        let data = self.blobs.get(&self.blob_path(file_name)).await?;
        Ok((self.renderer.content_type().to_string(), data))
    }

    async fn generate(&self, ctx: &RequestContext, tool: &Tool) -> AppResult<QrLabel> {
        let payload = QrPayload::for_tool(tool).to_json()?;
        let image = self.renderer.render(&payload, self.settings.size)?;

        let file_name = format!(
            "tool-{}-{}.{}",
            sanitize(&tool.code),
            ctx.request_time.timestamp(),
            self.renderer.extension()
        );
        self.blobs.put(&self.blob_path(&file_name), Bytes::from(image)).await?;
        self.store
            .set_tool_qr_code(tool.id, Some(&file_name), ctx.request_time)
            .await?;

        info!(tool_id = %tool.id, file = %file_name, "QR label generated");

        let mut labelled = tool.clone();
        labelled.qr_code = Some(file_name.clone());
        let url = labelled
            .qr_code_url(&self.settings.public_base_url, &self.settings.directory)
            .unwrap_or_default();
        Ok(QrLabel {
            tool_id: tool.id,
            file_name,
            url,
        })
    }

    async fn live_tool(&self, id: ToolId) -> AppResult<Tool> {
        self.store
            .find_tool(id)
            .await?
            .filter(|t| !t.is_deleted())
            .ok_or_else(|| AppError::not_found(format!("Tool {id} not found")))
    }

    fn blob_path(&self, file_name: &str) -> String {
        if self.settings.directory.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", self.settings.directory, file_name)
        }
    }
}

/// Keep tool codes safe for use in a file name.
fn sanitize(code: &str) -> String {
    code.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use toolcrib_core::ErrorKind;
    use toolcrib_core::traits::Clock;
    use toolcrib_storage::{LocalBlobStore, SvgQrRenderer};

    use crate::testing::Fixture;

    async fn service(fx: &Fixture, root: &std::path::Path) -> (QrService, Arc<LocalBlobStore>) {
        let blobs = Arc::new(LocalBlobStore::new(root).await.unwrap());
        let svc = QrService::new(
            fx.dyn_store(),
            blobs.clone(),
            Arc::new(SvgQrRenderer),
            QrSettings::from(&StorageConfig::default()),
        );
        (svc, blobs)
    }

    #[test]
    fn test_sanitize_code() {
        assert_eq!(sanitize("DRILL-001"), "DRILL-001");
        assert_eq!(sanitize("a/b c"), "a_b_c");
    }

    #[tokio::test]
    async fn test_generate_stores_file_and_records_name() {
        let dir = tempfile::tempdir().unwrap();
        let fx = Fixture::new();
        let (svc, blobs) = service(&fx, dir.path()).await;
        let tool = fx.tool("DRILL-001").await;

        let label = svc.generate_for_tool(&fx.ctx(), tool.id).await.unwrap();
        let expected = format!("tool-DRILL-001-{}.svg", fx.clock.now().timestamp());
        assert_eq!(label.file_name, expected);
        assert_eq!(label.url, format!("/storage/qrcodes/{expected}"));
        assert!(blobs.exists(&format!("qrcodes/{expected}")).await.unwrap());

        let stored = fx.store.find_tool(tool.id).await.unwrap().unwrap();
        assert_eq!(stored.qr_code.as_deref(), Some(expected.as_str()));

        let (content_type, data) = svc.read_label(tool.id).await.unwrap();
        assert_eq!(content_type, "image/svg+xml");
        assert!(!data.is_empty());
    }

    #[tokio::test]
    async fn test_regenerate_replaces_old_file() {
        let dir = tempfile::tempdir().unwrap();
        let fx = Fixture::new();
        let (svc, blobs) = service(&fx, dir.path()).await;
        let tool = fx.tool("DRILL-001").await;

        let first = svc.generate_for_tool(&fx.ctx(), tool.id).await.unwrap();
        fx.clock.advance(Duration::seconds(30));
        let second = svc.regenerate_for_tool(&fx.ctx(), tool.id).await.unwrap();

        assert_ne!(first.file_name, second.file_name);
        assert!(!blobs.exists(&format!("qrcodes/{}", first.file_name)).await.unwrap());
        assert!(blobs.exists(&format!("qrcodes/{}", second.file_name)).await.unwrap());
    }

    #[tokio::test]
    async fn test_batch_skips_unknown_and_delete_clears() {
        let dir = tempfile::tempdir().unwrap();
        let fx = Fixture::new();
        let (svc, _) = service(&fx, dir.path()).await;
        let a = fx.tool("A-1").await;
        let b = fx.tool("B-1").await;

        let labels = svc
            .generate_batch(&fx.ctx(), &[a.id, ToolId::new(404), b.id])
            .await
            .unwrap();
        assert_eq!(labels.iter().map(|l| l.tool_id).collect::<Vec<_>>(), vec![a.id, b.id]);

        assert!(svc.delete_for_tool(&fx.ctx(), a.id).await.unwrap());
        assert!(!svc.delete_for_tool(&fx.ctx(), a.id).await.unwrap());
        let stored = fx.store.find_tool(a.id).await.unwrap().unwrap();
        assert_eq!(stored.qr_code, None);

        let err = svc.read_label(a.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[derive(Debug)]
    struct BrokenRenderer;

    impl QrRenderer for BrokenRenderer {
        fn extension(&self) -> &str {
            "svg"
        }

        fn content_type(&self) -> &str {
            "image/svg+xml"
        }

        fn render(&self, _payload: &str, _size: u32) -> AppResult<Vec<u8>> {
            Err(AppError::internal("renderer unavailable"))
        }
    }

    #[tokio::test]
    async fn test_failed_regenerate_keeps_old_label() {
        let dir = tempfile::tempdir().unwrap();
        let fx = Fixture::new();
        let (svc, blobs) = service(&fx, dir.path()).await;
        let tool = fx.tool("DRILL-001").await;
        let first = svc.generate_for_tool(&fx.ctx(), tool.id).await.unwrap();

        fx.clock.advance(Duration::seconds(30));
        let broken = QrService::new(
            fx.dyn_store(),
            blobs.clone(),
            Arc::new(BrokenRenderer),
            QrSettings::from(&StorageConfig::default()),
        );
        let err = broken.regenerate_for_tool(&fx.ctx(), tool.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);

        assert!(blobs.exists(&format!("qrcodes/{}", first.file_name)).await.unwrap());
        let stored = fx.store.find_tool(tool.id).await.unwrap().unwrap();
        assert_eq!(stored.qr_code.as_deref(), Some(first.file_name.as_str()));
        assert!(svc.read_label(tool.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_regenerate_within_the_same_second_keeps_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let fx = Fixture::new();
        let (svc, blobs) = service(&fx, dir.path()).await;
        let tool = fx.tool("DRILL-001").await;

        let first = svc.generate_for_tool(&fx.ctx(), tool.id).await.unwrap();
        let second = svc.regenerate_for_tool(&fx.ctx(), tool.id).await.unwrap();

        assert_eq!(first.file_name, second.file_name);
        assert!(blobs.exists(&format!("qrcodes/{}", second.file_name)).await.unwrap());
    }
}
