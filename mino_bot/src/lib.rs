pub mod bot;
pub mod callbacks;
pub mod dependencies;
pub mod menu;
pub mod session;
pub mod utils;
