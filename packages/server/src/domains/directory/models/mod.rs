pub mod location;
pub mod profile;
pub mod sport;
pub mod user;
pub mod user_sport;

pub use location::Location;
pub use profile::Profile;
pub use sport::Sport;
pub use user::User;
pub use user_sport::{CandidateRecord, SkillLevel, UserSport};
