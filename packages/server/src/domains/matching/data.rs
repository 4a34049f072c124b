use chrono::{DateTime, Utc};
use juniper::{GraphQLInputObject, GraphQLObject};

use crate::common::Id;
use crate::domains::directory::models::SkillLevel;

use super::error::MatchingError;
use super::filter::CandidateFilter;
use super::models::{CandidateSummary, MatchStatus, MatchSummary};

/// Candidate GraphQL data type
#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A compatible workout partner for one shared sport")]
pub struct CandidateData {
    pub candidate_user_id: String,
    pub display_name: String,
    pub sport_id: String,
    pub sport_name: String,
    pub skill_level: SkillLevel,
    pub verified: bool,
    /// Null when either side has not set a preferred location
    pub distance_km: Option<f64>,
    pub preferred_days: Vec<String>,
    pub preferred_times: Vec<String>,
}

impl From<CandidateSummary> for CandidateData {
    fn from(c: CandidateSummary) -> Self {
        Self {
            candidate_user_id: c.candidate_user_id.to_string(),
            display_name: c.display_name,
            sport_id: c.sport_id.to_string(),
            sport_name: c.sport_name,
            skill_level: c.skill_level,
            verified: c.verified,
            distance_km: c.distance_km,
            preferred_days: c.preferred_days,
            preferred_times: c.preferred_times,
        }
    }
}

/// Match GraphQL data type
#[derive(Debug, Clone, GraphQLObject)]
#[graphql(description = "A match request between two users")]
pub struct MatchData {
    pub id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub recipient_id: String,
    pub recipient_name: String,
    pub sport_id: Option<String>,
    pub sport_name: Option<String>,
    pub status: MatchStatus,
    pub requested_at: DateTime<Utc>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl From<MatchSummary> for MatchData {
    fn from(m: MatchSummary) -> Self {
        Self {
            id: m.id.to_string(),
            requester_id: m.requester_id.to_string(),
            requester_name: m.requester_name,
            recipient_id: m.recipient_id.to_string(),
            recipient_name: m.recipient_name,
            sport_id: m.sport_id.map(|id| id.to_string()),
            sport_name: m.sport_name,
            status: m.status,
            requested_at: m.requested_at,
            responded_at: m.responded_at,
        }
    }
}

/// Candidate search input; every field is optional
#[derive(Debug, Clone, Default, GraphQLInputObject)]
pub struct CandidateFilterInput {
    pub sport_id: Option<String>,
    pub skill_level: Option<SkillLevel>,
    /// Defaults to the requester's travel radius, then the server's
    pub max_distance_km: Option<f64>,
    pub preferred_days: Option<Vec<String>>,
    pub preferred_times: Option<Vec<String>>,
}

impl CandidateFilterInput {
    pub fn into_filter(self, default_radius_km: f64) -> Result<CandidateFilter, MatchingError> {
        if let Some(km) = self.max_distance_km {
            if !km.is_finite() || km < 0.0 {
                return Err(MatchingError::InvalidRequest(format!(
                    "maxDistanceKm must be a non-negative number, got {}",
                    km
                )));
            }
        }

        let sport_id = self
            .sport_id
            .as_deref()
            .map(|raw| parse_id(raw, "sportId"))
            .transpose()?;

        let mut filter = CandidateFilter::builder()
            .sport_id(sport_id)
            .skill_level(self.skill_level)
            .fallback_distance_km(default_radius_km)
            .preferred_days(self.preferred_days.unwrap_or_default())
            .preferred_times(self.preferred_times.unwrap_or_default())
            .build();
        filter.max_distance_km = self.max_distance_km;
        Ok(filter)
    }
}

/// Parse a client supplied id argument
pub fn parse_id<T>(raw: &str, field: &str) -> Result<Id<T>, MatchingError> {
    Id::parse(raw).map_err(|_| MatchingError::InvalidRequest(format!("{} is not a valid id", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::SportId;

    #[test]
    fn test_missing_radius_uses_default() {
        let filter = CandidateFilterInput::default().into_filter(30.0).unwrap();
        assert_eq!(filter.max_distance_km, None);
        assert_eq!(filter.radius_km(None), 30.0);
        assert!(filter.sport_id.is_none());
    }

    #[test]
    fn test_rejects_negative_radius() {
        let input = CandidateFilterInput {
            max_distance_km: Some(-1.0),
            ..Default::default()
        };
        assert!(matches!(
            input.into_filter(30.0),
            Err(MatchingError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_sport_id() {
        let input = CandidateFilterInput {
            sport_id: Some("tennis".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            input.into_filter(30.0),
            Err(MatchingError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_parses_sport_id() {
        let sport_id = SportId::new();
        let input = CandidateFilterInput {
            sport_id: Some(sport_id.to_string()),
            preferred_days: Some(vec!["Sunday".to_string()]),
            ..Default::default()
        };
        let filter = input.into_filter(30.0).unwrap();
        assert_eq!(filter.sport_id, Some(sport_id));
        assert_eq!(filter.preferred_days, vec!["Sunday".to_string()]);
    }
}
