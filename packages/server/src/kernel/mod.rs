// Kernel - dependency seams and their implementations

pub mod deps;
pub mod postgres;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use postgres::{PgConversationBridge, PgDirectory, PgMatchRepository};
pub use traits::*;
