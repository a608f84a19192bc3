use clap::Parser;
use patron::client::{
    channel::GrpcWaiter,
    config::{CliArgs, Order, PatronConfig},
    dispatcher::Dispatcher,
    sink::LogSink,
    telemetry::init_telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = PatronConfig::try_from(args)?;

    let providers = init_telemetry(config.log_format)?;
    log_startup_info(&config);

    let res = place_order(config).await;
    providers.shutdown();
    res
}

async fn place_order(config: PatronConfig) -> anyhow::Result<()> {
    let waiter = GrpcWaiter::connect_lazy(&config.server_addr)?.with_compression(config.compression);
    let mut dispatcher =
        Dispatcher::new(waiter).with_pacing(config.staged_pacing, config.interactive_pacing);
    let mut sink = LogSink;

    let kind = config.order.kind();
    tracing::info!("BEGINNING {kind} DEMO!");

    match config.order {
        Order::Staff(meal_id) => {
            dispatcher.submit_single_order(meal_id, &mut sink).await?;
        }
        Order::Eastern(meal_ids) => {
            tracing::info!("Ordering meals {meal_ids:?}");
            let served = dispatcher.submit_batch_request(meal_ids, &mut sink).await?;
            tracing::debug!(served, "eastern order served");
        }
        Order::Western(meal_ids) => {
            dispatcher.submit_staged_orders(meal_ids, &mut sink).await?;
        }
        Order::DimSum(batches) => {
            let carts = dispatcher
                .submit_interactive_orders(batches, &mut sink)
                .await?;
            tracing::debug!(carts, "dim sum carts served");
        }
    }

    Ok(())
}

fn log_startup_info(config: &PatronConfig) {
    if cfg!(debug_assertions) {
        tracing::debug!("Ordering from {} with full config: {:#?}", config.server_addr, config);
    } else {
        tracing::debug!("Ordering from {}", config.server_addr);
    }
}
