pub mod dto;
pub mod handler;

pub use handler::SessionStore;
