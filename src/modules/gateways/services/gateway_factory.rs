use super::cbpay::CbpayStrategy;
use super::gateway_trait::PaymentStrategy;
use super::toppay::ToppayStrategy;
use super::winpay::WinpayStrategy;
use crate::core::Result;
use crate::gateways::{ChannelCode, GatewayConfig};
use std::sync::Arc;
use tracing::info;

/// Maps a channel code to its adapter
pub struct GatewayFactory;

impl GatewayFactory {
    /// Build the adapter named by `config.channel_code`
    pub fn create(config: &GatewayConfig) -> Result<Arc<dyn PaymentStrategy>> {
        let channel = config.channel()?;
        info!(
            channel = %channel,
            merchant_code = %config.merchant_code,
            "Creating payment gateway"
        );

        let strategy: Arc<dyn PaymentStrategy> = match channel {
            ChannelCode::Cbpay => Arc::new(CbpayStrategy::new(config)?),
            ChannelCode::Toppay => Arc::new(ToppayStrategy::new(config)?),
            ChannelCode::Winpay => Arc::new(WinpayStrategy::new(config)?),
        };

        Ok(strategy)
    }
}
