pub mod gateway_config;
pub mod pay_request;
pub mod payment_response;
pub mod payout_request;

pub use gateway_config::{ChannelCode, GatewayConfig, PayeeFallback};
pub use pay_request::{PayRequest, DEFAULT_PAY_DESCRIPTION};
pub use payment_response::{PaymentResponse, SUCCESS_FLAG};
pub use payout_request::PayoutRequest;
