use mino_bot::{
    bot::handler_tree::handler_tree,
    dependencies::BotDependencies,
    utils::retry_transient,
};
use mino_core::config::{BotConfig, SheetConfig};
use mino_core::helpers::bot_commands::Command;
use teloxide::{
    prelude::*, requests::Request, update_listeners::Polling, utils::command::BotCommands,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();
    log::info!("Starting mino_bot in polling mode...");

    let config = BotConfig::from_env()?;
    let sheet_config = SheetConfig::from_env()?;
    let retry_delay = config.retry_delay;

    let bot = Bot::new(&config.token);
    let bot_deps = BotDependencies::from_config(config, &sheet_config)?;

    retry_transient("delete_webhook", retry_delay, || bot.delete_webhook().send()).await?;
    let me = retry_transient("get_me", retry_delay, || bot.get_me().send()).await?;
    retry_transient("set_my_commands", retry_delay, || {
        bot.set_my_commands(Command::bot_commands()).send()
    })
    .await?;
    log::info!("Authorized as @{}", me.username());

    let listener = Polling::builder(bot.clone()).drop_pending_updates().build();

    Dispatcher::builder(bot, handler_tree())
        .dependencies(dptree::deps![bot_deps])
        .default_handler(|update| async move {
            log::debug!("Unhandled update: {:?}", update.kind);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    Ok(())
}
