pub mod auth;
pub mod error;
pub mod paintings;
pub mod password;
pub mod repository;
pub mod routes;
pub mod seed;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use routes::build_router;
