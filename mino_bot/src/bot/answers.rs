use anyhow::Result;
use mino_core::helpers::bot_commands::Command;
use teloxide::{Bot, types::Message};

use super::handler::{
    handle_chart, handle_earnings, handle_help, handle_player, handle_players, handle_start,
};
use crate::dependencies::BotDependencies;
use crate::utils::report_failure;

pub async fn answers(
    bot: Bot,
    msg: Message,
    cmd: Command,
    bot_deps: BotDependencies,
) -> Result<()> {
    let chat_id = msg.chat.id;
    let context = format!("{:?}", cmd);

    let result = match cmd {
        Command::Start => handle_start(bot.clone(), msg, bot_deps).await,
        Command::Help => handle_help(bot.clone(), msg).await,
        Command::Players => handle_players(bot.clone(), msg, bot_deps).await,
        Command::Player(name) => handle_player(bot.clone(), msg, name, bot_deps).await,
        Command::Earnings => handle_earnings(bot.clone(), msg).await,
        Command::Chart(name) => handle_chart(bot.clone(), msg, name, bot_deps).await,
    };

    if let Err(e) = result {
        report_failure(&bot, chat_id, &context, e).await;
    }
    Ok(())
}
