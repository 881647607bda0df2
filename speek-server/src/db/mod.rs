//! Database layer - connection pool and schema
//!
//! # Design Principles
//!
//! - One pool per process, created at startup and injected into the repository
//! - Idempotent migrations, safe to run on every start
//! - No foreign keys from children to posts: orphans are tolerated on write

pub mod pool;
pub mod migrations;

pub use pool::{create_pool, create_pool_with_options, PoolOptions};
