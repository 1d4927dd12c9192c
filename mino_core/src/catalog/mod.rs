pub mod dto;
pub mod handler;
pub mod roster;

pub use handler::Catalog;
pub use roster::Roster;
