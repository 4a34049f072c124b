// Business domains
pub mod auth;
pub mod conversations;
pub mod directory;
pub mod matching;
