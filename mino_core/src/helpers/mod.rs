pub mod bot_commands;
pub mod callback_data;
pub mod format;
pub mod pagination;
pub mod utils;
