pub mod comment;
pub mod database;
pub mod export;
pub mod middleware;
pub mod post;
pub mod router;
pub mod state;
pub mod utils;

pub use state::AppServices;
