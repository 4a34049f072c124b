use typed_builder::TypedBuilder;

use crate::common::SportId;
use crate::domains::directory::models::SkillLevel;

/// Radius used when neither the caller nor the requester's profile sets one
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;

/// Criteria for candidate discovery
///
/// ```rust
/// use buddy_core::domains::matching::CandidateFilter;
///
/// let filter = CandidateFilter::builder()
///     .max_distance_km(25.0)
///     .preferred_days(vec!["Saturday".to_string()])
///     .build();
/// assert!(filter.sport_id.is_none());
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct CandidateFilter {
    /// Restrict to one sport; otherwise any sport the requester declared
    #[builder(default)]
    pub sport_id: Option<SportId>,

    /// Exact skill level match
    #[builder(default)]
    pub skill_level: Option<SkillLevel>,

    /// Explicit radius; overrides the requester's own travel radius
    #[builder(default, setter(strip_option))]
    pub max_distance_km: Option<f64>,

    /// Used when neither the filter nor the requester's profile has a radius
    #[builder(default = DEFAULT_MAX_DISTANCE_KM)]
    pub fallback_distance_km: f64,

    /// Empty means "don't filter on days"
    #[builder(default)]
    pub preferred_days: Vec<String>,

    /// Empty means "don't filter on times"
    #[builder(default)]
    pub preferred_times: Vec<String>,
}

impl CandidateFilter {
    /// No criteria beyond a radius
    pub fn within(max_distance_km: f64) -> Self {
        Self::builder().max_distance_km(max_distance_km).build()
    }

    /// Effective search radius: explicit, then the profile's, then the fallback
    pub fn radius_km(&self, profile_radius_km: Option<f64>) -> f64 {
        self.max_distance_km
            .or(profile_radius_km)
            .unwrap_or(self.fallback_distance_km)
    }
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Whether a candidate's preferences satisfy a day/time filter
///
/// An empty filter always passes. With a non-empty filter, at least one value
/// must appear on both sides (case-insensitive); a candidate without
/// preferences never passes.
pub fn overlaps(wanted: &[String], offered: Option<&[String]>) -> bool {
    if wanted.is_empty() {
        return true;
    }

    offered.map_or(false, |offered| {
        wanted
            .iter()
            .any(|w| offered.iter().any(|o| o.trim().eq_ignore_ascii_case(w.trim())))
    })
}
