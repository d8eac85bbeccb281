pub mod dto;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod websocket;

pub use errors::ApiError;
pub use handlers::AppState;
pub use routes::create_router;
