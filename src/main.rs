use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = money_buddy::Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    let environment = cfg.environment()?;
    let plaid_base_url = cfg.plaid_base_url()?;
    let store_kind = if cfg.store_url.starts_with("sqlite:") {
        cfg.store_url.as_str()
    } else {
        "rest"
    };
    info!(
        plaid_env = %environment,
        plaid_base_url = %plaid_base_url,
        store = %store_kind,
        proxy = %cfg.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        loglevel = %cfg.loglevel,
    );

    // Both remote clients are built once and shared by every request.
    let provider = Arc::new(money_buddy::PlaidClient::new(&cfg)?);
    let store = money_buddy::db::connect(&cfg).await?;

    let state = money_buddy::router::BuddyState::new(
        provider,
        store,
        cfg.plaid_client_name.clone(),
        environment,
    );
    let app = money_buddy::router::buddy_router(state);

    let addr = cfg.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    info!("Your app is listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
