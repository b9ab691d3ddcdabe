//! End-to-end demonstration of the billing façade.
//!
//! Wires a router with per-product reactions to the in-memory billing
//! client and replays a typical session: connect, buy a coin pack, buy a
//! permanent upgrade, start and cancel a subscription, and provoke a
//! billing error to show how it is surfaced.

use anyhow::Result;

use billflow_client::{BillingClient, ClientConfig, InMemoryBillingClient};
use billflow_core::ProductId;
use billflow_router::{ProductNotice, PurchaseEventRouter};

fn build_router() -> PurchaseEventRouter {
    let mut router = PurchaseEventRouter::new();

    router.register("coins_100", |notice: ProductNotice<'_>| match notice {
        ProductNotice::Listed { info } => {
            tracing::info!(price = info.display_price(), "coin pack listed");
        }
        ProductNotice::Purchased { purchase } => {
            tracing::info!(token = %purchase.purchase_token(), "coin pack purchased");
        }
        ProductNotice::Consumed { .. } => {
            tracing::info!("coin pack spent; 100 coins granted");
        }
        _ => {}
    });

    router.register("premium_upgrade", |notice: ProductNotice<'_>| match notice {
        ProductNotice::Acknowledged { purchase } => {
            tracing::info!(order = ?purchase.order_id(), "premium unlocked");
        }
        ProductNotice::OwnedRestored { .. } => {
            tracing::info!("premium restored from a previous install");
        }
        _ => {}
    });

    router.register("monthly_pass", |notice: ProductNotice<'_>| {
        if let ProductNotice::Acknowledged { purchase } = notice {
            tracing::info!(since = %purchase.purchased_at(), "monthly pass active");
        }
    });

    router
}

fn main() -> Result<()> {
    billflow_observability::init();

    let config = ClientConfig::builder()
        .consumable_ids(["coins_100", "coins_500", "coins_1000"])
        .non_consumable_ids(["premium_upgrade", "remove_ads", "level_pack"])
        .subscription_ids(["monthly_pass", "yearly_pass", "vip_pass"])
        .auto_acknowledge()
        .auto_consume()
        .license_key("license_key")
        .build()?;

    let mut client = InMemoryBillingClient::new(config, build_router())
        .with_price("coins_100", "$0.99")
        .with_price("coins_500", "$3.99")
        .with_price("premium_upgrade", "$9.99")
        .with_price("monthly_pass", "$4.99/month");

    client.connect();

    client.purchase(&ProductId::new("coins_100"));
    client.purchase(&ProductId::new("premium_upgrade"));
    client.subscribe(&ProductId::new("monthly_pass"));
    client.unsubscribe(&ProductId::new("monthly_pass"));

    // Not configured anywhere: surfaced to the user, not raised.
    client.purchase(&ProductId::new("mystery_box"));

    let router = client.listener_mut();
    println!(
        "catalog: {}",
        serde_json::to_string_pretty(router.catalog())?
    );
    for message in router.drain_surfaced_messages() {
        println!("user message [{}]: {}", message.kind(), message.text());
    }

    Ok(())
}
