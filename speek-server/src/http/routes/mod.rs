//! Route handlers organized by resource

pub mod health;
pub mod posts;
pub mod comments;
pub mod likes;

/// Prefix shared by every versioned endpoint
pub const API_PREFIX: &str = "/api/v1";
