//! Database module for the microblog server
//!
//! Row types and the data access layer over the shared SQLite pool.

pub mod models;
pub mod operations;

pub use models::{Comment, Post, User};
pub use operations::DbOperations;
