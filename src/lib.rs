pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod keys;
pub mod models;
pub mod phrases;
pub mod presenter;
pub mod press;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use session::Tasbih;
pub use state::AppState;
pub use storage::{JsonFileStore, LifetimeStore};
