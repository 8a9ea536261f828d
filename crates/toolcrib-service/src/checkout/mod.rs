//! Checkout and return of tools.

pub mod data;
pub mod service;

pub use data::{CheckoutData, ReturnData};
pub use service::CheckoutService;
