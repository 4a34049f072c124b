//! Auth domain - bearer token verification
//!
//! The matching core never reads ambient claims; resolvers resolve the
//! current user here and pass the id explicitly.

pub mod errors;
pub mod jwt;

pub use errors::AuthError;
pub use jwt::{Claims, JwtService};
