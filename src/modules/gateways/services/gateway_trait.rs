use crate::core::{AppError, Result};
use crate::gateways::{ChannelCode, PayRequest, PaymentResponse, PayoutRequest};
use async_trait::async_trait;
use std::collections::HashMap;

/// Contract every gateway adapter implements
///
/// Adapters hold only their credentials and endpoints, so one instance can
/// serve concurrent calls.
#[async_trait]
pub trait PaymentStrategy: Send + Sync {
    /// Start a collection order
    async fn pay(&self, request: &PayRequest) -> Result<PaymentResponse>;

    /// Start a disbursement
    async fn payout(&self, request: &PayoutRequest) -> Result<PaymentResponse>;

    /// Check the signature of an asynchronous gateway notification
    fn verify_callback(&self, params: &HashMap<String, String>) -> bool;

    /// Channel this adapter talks to
    fn channel(&self) -> ChannelCode;

    /// [`verify_callback`](Self::verify_callback) as a `Result`, for handlers that bail with `?`
    fn ensure_callback(&self, params: &HashMap<String, String>) -> Result<()> {
        if self.verify_callback(params) {
            Ok(())
        } else {
            Err(AppError::signature_mismatch(format!(
                "{} notification failed verification",
                self.channel()
            )))
        }
    }
}
