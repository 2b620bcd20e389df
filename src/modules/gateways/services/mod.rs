pub mod cbpay;
pub mod gateway_factory;
pub mod gateway_trait;
pub mod payment_context;
pub mod rsa_cipher;
pub mod signing;
pub mod toppay;
pub mod transport;
pub mod winpay;

pub use cbpay::{CbpayStrategy, PixDestination};
pub use gateway_factory::GatewayFactory;
pub use gateway_trait::PaymentStrategy;
pub use payment_context::PaymentContext;
pub use toppay::{ProviderReply, QueryType, ToppayStrategy};
pub use transport::HttpTransport;
pub use winpay::WinpayStrategy;
