mod error;
mod info;
mod router;
mod state;
mod webhook;

use std::sync::Arc;

use dotenvy::dotenv;
use mino_bot::{dependencies::BotDependencies, utils::retry_transient};
use mino_core::config::{BotConfig, SheetConfig};
use mino_core::helpers::bot_commands::Command;
use router::router;
use state::ServerState;
use teloxide::{prelude::*, requests::Request, utils::command::BotCommands};

#[tokio::main(flavor = "multi_thread", worker_threads = 4)]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = BotConfig::from_env()?;
    let sheet_config = SheetConfig::from_env()?;
    let listen_addr = config.listen_addr();
    let retry_delay = config.retry_delay;
    let endpoint = config.webhook_endpoint();

    let bot = Bot::new(&config.token);
    let bot_deps = BotDependencies::from_config(config, &sheet_config)?;

    let me = retry_transient("get_me", retry_delay, || bot.get_me().send()).await?;
    retry_transient("set_my_commands", retry_delay, || {
        bot.set_my_commands(Command::bot_commands()).send()
    })
    .await?;
    log::info!("Authorized as @{}", me.username());

    let state = Arc::new(ServerState::from((bot, bot_deps)).with_me(me));

    match endpoint {
        Some(endpoint) => {
            if let Err(e) = info::handler::register_webhook(&state, &endpoint).await {
                log::error!("Webhook registration at startup failed: {}", e);
            }
        }
        None => log::warn!("WEBHOOK_URL not set; call /set_webhook once it is configured"),
    }

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    log::info!("Listening on {}", listen_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
