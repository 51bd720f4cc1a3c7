//! Posts and comments: CRUD with ownership stamping and existence checks.

pub mod handlers;
mod service;

pub use service::{PostService, PostWithComments};
