//! Directory domain - users, declared sports, profiles, sports and locations
//!
//! Read side only. Administration of these tables happens outside this service.

pub mod data;
pub mod edges;
pub mod models;

pub use models::{CandidateRecord, Location, Profile, SkillLevel, Sport, User, UserSport};
