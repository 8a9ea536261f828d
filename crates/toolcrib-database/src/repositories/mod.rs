//! PostgreSQL repositories for tools, workers and checkouts.
//!
//! Each repository owns a pool for stand-alone statements. Statements that
//! also run inside an inventory transaction are exposed as free functions
//! generic over the executor.

pub mod checkout;
pub mod tool;
pub mod worker;

pub use checkout::CheckoutRepository;
pub use tool::ToolRepository;
pub use worker::WorkerRepository;

use toolcrib_core::error::{AppError, ErrorKind};

/// Map a sqlx error into an [`AppError`], turning unique violations into
/// conflicts.
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| {
        if let Some(db) = err.as_database_error() {
            if db.is_unique_violation() {
                let detail = match db.constraint() {
                    Some("tools_code_key") => "tool code already exists",
                    Some("workers_badge_number_key") => "badge number already exists",
                    Some("workers_email_key") => "email already exists",
                    Some("uq_checkouts_open_tool") => "tool already has an open checkout",
                    _ => "duplicate value",
                };
                return AppError::with_source(ErrorKind::Conflict, detail, err);
            }
        }
        AppError::with_source(ErrorKind::Database, context, err)
    }
}

/// Build an `ILIKE` pattern matching `term` as a literal substring.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

/// Normalized search term, `None` when blank.
pub(crate) fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(like_pattern)
}
