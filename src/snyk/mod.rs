pub mod api;
pub mod client;

pub use api::SnykApi;
pub use client::SnykClient;
