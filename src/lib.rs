pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use api::create_router;
pub use services::TradeJournal;
