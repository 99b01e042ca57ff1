//! price-watch — follow the live price stream from a terminal.
//!
//! ```text
//! BEACON_TOKEN=... [BEACON_SKU=SKU-1] [BEACON_API_URL=...] price-watch
//! ```

use beacon_sdk::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    beacon_sdk::logging::init_tracing();

    let config = BeaconConfig::from_env()?;
    let token = std::env::var("BEACON_TOKEN")
        .map_err(|_| SdkError::Validation("BEACON_TOKEN is not set".into()))?;
    let sku = std::env::var("BEACON_SKU").ok().filter(|s| !s.is_empty());

    let client = BeaconClientBuilder::from_config(config).build()?;
    let prices = client.prices().synchronizer();
    let mut history = prices.subscribe();

    tracing::info!(api = client.http().base_url(), sku = ?sku, "Watching prices");
    prices
        .update(PriceStreamParams::new(true, Some(token), sku))
        .await;

    // The stream can end without a final flush; check on it between updates.
    let mut liveness = tokio::time::interval(std::time::Duration::from_millis(500));
    liveness.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            changed = history.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = history.borrow_and_update().clone();
                let mut keys: Vec<_> = state.keys().cloned().collect();
                keys.sort();
                for key in keys {
                    if let Some(point) = state.latest(&key) {
                        tracing::info!(
                            sku = %key,
                            price = point.price,
                            ts = point.timestamp,
                            points = state.get(&key).map_or(0, |p| p.len()),
                            "price"
                        );
                    }
                }
            }
            _ = liveness.tick() => {
                if !prices.is_active().await {
                    tracing::warn!("Price stream ended");
                    break;
                }
            }
            _ = &mut interrupted => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    prices.stop().await;
    Ok(())
}
