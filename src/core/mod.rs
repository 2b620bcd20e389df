pub mod amount;
pub mod error;

pub use error::{AppError, Result};
