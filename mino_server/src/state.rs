use std::sync::Arc;

use anyhow::Result;
use mino_bot::{bot::handler_tree::handler_tree, dependencies::BotDependencies};
use mino_core::config::BotConfig;
use teloxide::{
    Bot,
    dispatching::DpHandlerDescription,
    dptree::Handler,
    prelude::Requester,
    types::Me,
};
use tokio::sync::OnceCell;

pub struct ServerState {
    bot: Bot,
    me: OnceCell<Me>,
    bot_deps: BotDependencies,
    handler: Handler<'static, Result<()>, DpHandlerDescription>,
}

impl From<(Bot, BotDependencies)> for ServerState {
    fn from(states: (Bot, BotDependencies)) -> Self {
        let (bot, bot_deps) = states;
        Self {
            bot,
            me: OnceCell::new(),
            bot_deps,
            handler: handler_tree(),
        }
    }
}

impl ServerState {
    pub fn with_me(self, me: Me) -> Self {
        Self {
            me: OnceCell::new_with(Some(me)),
            ..self
        }
    }

    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    pub fn bot_deps(&self) -> BotDependencies {
        self.bot_deps.clone()
    }

    pub fn config(&self) -> Arc<BotConfig> {
        self.bot_deps.config.clone()
    }

    pub fn handler(&self) -> &Handler<'static, Result<()>, DpHandlerDescription> {
        &self.handler
    }

    /// The bot's own account, fetched once on first use.
    pub async fn me(&self) -> Result<Me> {
        let me = self
            .me
            .get_or_try_init(|| async { self.bot.get_me().await })
            .await?;
        Ok(me.clone())
    }
}
