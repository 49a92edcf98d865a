pub mod clock;
pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;
pub mod views;

pub use routes::create_routes;
pub use state::AppState;
