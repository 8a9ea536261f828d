//! Checkout domain entities.

pub mod condition;
pub mod model;

pub use condition::Condition;
pub use model::{
    Checkout, CheckoutDetails, CheckoutFilter, CheckoutState, CloseCheckout, NewCheckout,
    UpdateCheckout,
};
