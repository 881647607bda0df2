//! speek-server: audio posts, comments and likes over HTTP
//!
//! Request flow: HTTP handler → validation (models, extractors) →
//! [`FeedService`] → [`Repository`] → storage adapter.

pub mod db;
pub mod http;
pub mod models;
pub mod repo;
pub mod service;

pub use http::{build_router, run_server, ApiError, ServerConfig};
pub use repo::{MemoryRepository, PgRepository, RepoError, Repository};
pub use service::FeedService;
