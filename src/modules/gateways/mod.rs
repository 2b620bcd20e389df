pub mod models;
pub mod services;

pub use models::{
    ChannelCode, GatewayConfig, PayRequest, PayeeFallback, PaymentResponse, PayoutRequest,
};
pub use services::{
    CbpayStrategy, GatewayFactory, PaymentContext, PaymentStrategy, PixDestination,
    ProviderReply, QueryType, ToppayStrategy, WinpayStrategy,
};
