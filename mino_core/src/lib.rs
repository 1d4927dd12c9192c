pub mod catalog;
pub mod config;
pub mod helpers;
pub mod sheets;
