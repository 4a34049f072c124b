// Buddy Match - API Core
//
// Backend for pairing users who want to work out together: candidate
// discovery, the match request lifecycle, and the GraphQL surface over both.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
