//! Authentication module for the microblog server
//!
//! Password hashing, bearer-token issuance/verification, the
//! authenticated-user request extractor and the user service.

pub mod credentials;
pub mod extractor;
pub mod handlers;
mod service;
mod token;

pub use extractor::AuthenticatedUser;
pub use service::AuthService;
pub use token::{Claims, TokenService};
