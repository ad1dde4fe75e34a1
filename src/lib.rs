pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod metrics;
pub mod migrate;
pub mod models;
pub mod state;
pub mod storage;
pub mod trackers;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::DocumentStore;
