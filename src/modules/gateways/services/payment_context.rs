use super::gateway_trait::PaymentStrategy;
use crate::core::Result;
use crate::gateways::{ChannelCode, PayRequest, PaymentResponse, PayoutRequest};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// Narrow entry point that forwards to whichever adapter it wraps
#[derive(Clone)]
pub struct PaymentContext {
    strategy: Arc<dyn PaymentStrategy>,
}

impl PaymentContext {
    pub fn new(strategy: Arc<dyn PaymentStrategy>) -> Self {
        Self { strategy }
    }

    pub fn channel(&self) -> ChannelCode {
        self.strategy.channel()
    }

    pub async fn pay(&self, request: &PayRequest) -> Result<PaymentResponse> {
        info!(
            channel = %self.channel(),
            order_no = %request.order_no,
            amount = %request.amount,
            "Creating pay order"
        );

        let result = self.strategy.pay(request).await;
        self.log_outcome("pay", &request.order_no, &result);
        result
    }

    pub async fn payout(&self, request: &PayoutRequest) -> Result<PaymentResponse> {
        info!(
            channel = %self.channel(),
            order_no = %request.order_no,
            amount = %request.amount,
            "Creating payout order"
        );

        let result = self.strategy.payout(request).await;
        self.log_outcome("payout", &request.order_no, &result);
        result
    }

    pub fn verify_callback(&self, params: &HashMap<String, String>) -> bool {
        self.strategy.verify_callback(params)
    }

    fn log_outcome(&self, flow: &str, order_no: &str, result: &Result<PaymentResponse>) {
        match result {
            Ok(response) => info!(
                channel = %self.channel(),
                flow,
                order_no = %order_no,
                is_success = response.is_success,
                success_flag = %response.success_flag,
                plat_order_num = %response.plat_order_num,
                "Gateway call completed"
            ),
            Err(e) => error!(
                channel = %self.channel(),
                flow,
                order_no = %order_no,
                error = %e,
                "Gateway call failed"
            ),
        }
    }
}
