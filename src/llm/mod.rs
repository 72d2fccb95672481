pub mod client;
pub mod models;

pub use client::ChatClient;
pub use models::Message;
