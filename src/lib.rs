//! Paychannel merchant payment gateway library
//!
//! Originates collection ("pay") and disbursement ("payout") orders against
//! several incompatible gateways and normalizes their answers into one
//! [`PaymentResponse`](gateways::PaymentResponse).

pub mod config;
pub mod core;
pub mod modules;

// Re-export commonly used types
pub use modules::gateways;
