//! # toolcrib-entity
//!
//! Domain entity models for ToolCrib. Every struct in this crate represents
//! a database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`; status domains are closed enums mapped to PostgreSQL
//! enum types so invalid states cannot be represented.

pub mod checkout;
pub mod scan;
pub mod tool;
pub mod worker;

pub use checkout::{Checkout, CheckoutDetails, CheckoutFilter, CheckoutState, Condition};
pub use scan::QrPayload;
pub use tool::{Tool, ToolFilter, ToolStatus};
pub use worker::{Worker, WorkerFilter, WorkerStatus, WorkerSummary};
