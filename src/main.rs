use anyhow::{bail, Context};
use paychannel::config::Config;
use paychannel::gateways::{
    ChannelCode, GatewayFactory, PayRequest, PaymentContext, PayoutRequest, ProviderReply,
    QueryType, ToppayStrategy,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage:
  paychannel <CHANNEL> pay <order_no> <amount> <username> [description]
  paychannel <CHANNEL> payout <order_no> <amount> <username> <pix_account> <cpf>
  paychannel TOPPAY balance [currency]
  paychannel TOPPAY query <order_no> <plat_order_no> [order|cash]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.app.log_directive().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate().context("Configuration validation failed")?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (channel_code, command) = match (args.first(), args.get(1)) {
        (Some(channel), Some(command)) => (channel.as_str(), command.as_str()),
        _ => bail!("{}", USAGE),
    };
    let rest = &args[2..];

    tracing::info!("Environment: {}", config.app.env);
    let gateway_config = config.gateway(channel_code)?;

    match command {
        "pay" => {
            let [order_no, amount, username, ..] = rest else {
                bail!("{}", USAGE);
            };
            let description = rest.get(3).cloned().unwrap_or_default();
            let context = PaymentContext::new(GatewayFactory::create(&gateway_config)?);
            let response = context
                .pay(&PayRequest::new(order_no, amount, username, description))
                .await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "payout" => {
            let [order_no, amount, username, pix_account, cpf, ..] = rest else {
                bail!("{}", USAGE);
            };
            let context = PaymentContext::new(GatewayFactory::create(&gateway_config)?);
            let request = PayoutRequest::new(order_no, amount, username, pix_account, cpf);
            let response = context.payout(&request).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        "balance" | "query" => {
            if gateway_config.channel()? != ChannelCode::Toppay {
                bail!("{} is only available for TOPPAY", command);
            }
            let toppay = ToppayStrategy::new(&gateway_config)?;
            let reply = if command == "balance" {
                toppay.balance_query(rest.first().map(String::as_str)).await?
            } else {
                let [order_no, plat_order_no, ..] = rest else {
                    bail!("{}", USAGE);
                };
                let query_type = match rest.get(2).map(String::as_str) {
                    Some("cash") => QueryType::Cash,
                    _ => QueryType::Order,
                };
                toppay.order_query(order_no, plat_order_no, query_type).await?
            };
            print_reply(&reply)?;
        }
        other => bail!("unknown command '{}'\n{}", other, USAGE),
    }

    Ok(())
}

fn print_reply(reply: &ProviderReply) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&reply.body)?);
    if let Some(ref decrypted) = reply.decrypted_sign {
        println!("platSign: {}", decrypted);
    }
    Ok(())
}
