pub mod config;
pub mod corpus;
pub mod error;
pub mod excerpt;
pub mod explain;
pub mod gemini;
pub mod models;
pub mod render;
pub mod server;

pub use config::AppConfig;
pub use server::{build_router, run_server};
