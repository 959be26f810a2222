//! bizmatch Server - HTTP API for catalog criteria matching
//!
//! The server loads the startup catalog once and answers every match
//! request by training a fresh tree ensemble on a shuffled snapshot of it.
//!
//! # Features
//!
//! - **Middleware**: CORS, request ID tracking, structured logging, body limit
//! - **Configuration**: `.env`, optional `server.*` file, `BIZMATCH__*` and `PORT`
//!   environment variables
//! - **Error Handling**: `{"error": {"code", "message"}}` payloads with
//!   distinct status codes per failure
//! - **Graceful Shutdown**: SIGTERM and Ctrl+C
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - Match against the default criteria
//!   (`CV` in `KALIMANTAN BARAT`)
//! - `POST /` - Match against `{"criteria": {...}}`
//!
//! Both respond with `{"criteria": {...}, "matching": [...]}`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
