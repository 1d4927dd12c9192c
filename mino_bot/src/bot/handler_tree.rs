use std::ops::ControlFlow;

use anyhow::Result;
use mino_core::helpers::bot_commands::Command;
use teloxide::{
    Bot,
    dispatching::{DpHandlerDescription, HandlerExt, UpdateFilterExt},
    dptree::{self, Handler},
    types::{Me, Message, Update},
};

use crate::{
    bot::{answers::answers, handler::handle_unknown},
    callbacks::handle_callback_query,
    dependencies::BotDependencies,
};

/// The update routing shared by polling and webhook delivery. Endpoints
/// expect `Bot`, `Me` and `BotDependencies` in the dependency map.
pub fn handler_tree() -> Handler<'static, Result<()>, DpHandlerDescription> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(dptree::entry().filter_command::<Command>().endpoint(answers))
                .branch(
                    dptree::filter(|msg: Message| msg.chat.is_private() && msg.text().is_some())
                        .endpoint(handle_unknown),
                ),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callback_query))
}

/// Runs a single update through [`handler_tree`]. Used when updates arrive
/// over the webhook instead of through the polling dispatcher.
pub async fn dispatch_update(
    handler: &Handler<'static, Result<()>, DpHandlerDescription>,
    bot: Bot,
    me: Me,
    update: Update,
    bot_deps: BotDependencies,
) {
    let update_id = update.id;
    match handler.dispatch(dptree::deps![bot, me, update, bot_deps]).await {
        ControlFlow::Break(Ok(())) => {}
        ControlFlow::Break(Err(e)) => log::error!("Update {} failed: {:#}", update_id.0, e),
        ControlFlow::Continue(_) => log::debug!("Update {} was not handled", update_id.0),
    }
}
