//! Route handlers organized by domain.

pub mod checkout;
pub mod health;
pub mod qr;
pub mod scanner;
pub mod tool;
pub mod worker;
