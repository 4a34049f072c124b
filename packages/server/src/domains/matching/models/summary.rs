use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{MatchId, SportId, UserId};
use crate::domains::directory::models::SkillLevel;

use super::{Match, MatchStatus};

/// A discovered workout partner, for one compatible sport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateSummary {
    pub candidate_user_id: UserId,
    pub display_name: String,
    pub sport_id: SportId,
    pub sport_name: String,
    pub skill_level: SkillLevel,
    pub verified: bool,
    /// `None` when either side has no preferred point
    pub distance_km: Option<f64>,
    pub preferred_days: Vec<String>,
    pub preferred_times: Vec<String>,
}

/// Match record with display names resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSummary {
    pub id: MatchId,
    pub requester_id: UserId,
    pub requester_name: String,
    pub recipient_id: UserId,
    pub recipient_name: String,
    pub sport_id: Option<SportId>,
    pub sport_name: Option<String>,
    pub status: MatchStatus,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl MatchSummary {
    pub fn new(
        record: Match,
        requester_name: String,
        recipient_name: String,
        sport_name: Option<String>,
    ) -> Self {
        Self {
            id: record.id,
            requester_id: record.requester_id,
            requester_name,
            recipient_id: record.recipient_id,
            recipient_name,
            sport_id: record.sport_id,
            sport_name,
            status: record.status,
            requested_at: record.requested_at,
            responded_at: record.responded_at,
        }
    }
}
