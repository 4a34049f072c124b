//! Candidate discovery
//!
//! Narrows the population of other users down to compatible workout partners:
//! shared sport, optional skill level, within radius, overlapping schedule,
//! and no live match history with the requester.

use std::collections::HashSet;
use tracing::{debug, info, instrument};

use crate::common::{distance_between, GeoPoint, UserId};
use crate::domains::directory::models::CandidateRecord;
use crate::kernel::ServerDeps;

use super::error::MatchingError;
use super::filter::{overlaps, CandidateFilter};
use super::models::CandidateSummary;

/// Find candidates for `user_id`, closest first
///
/// Without an explicit radius the requester's own travel radius applies,
/// then the filter's fallback. Fails only when the requester (or their
/// profile) does not exist. Users
/// without declared sports, or searches that match nobody, return an empty
/// list.
#[instrument(skip(filter, deps), fields(user_id = %user_id))]
pub async fn find_candidates(
    user_id: UserId,
    filter: &CandidateFilter,
    deps: &ServerDeps,
) -> Result<Vec<CandidateSummary>, MatchingError> {
    deps.directory
        .find_user(user_id)
        .await?
        .ok_or(MatchingError::UserNotFound(user_id))?;
    let profile = deps
        .directory
        .find_profile(user_id)
        .await?
        .ok_or(MatchingError::ProfileNotFound(user_id))?;

    let own_sports = deps.directory.user_sports(user_id).await?;
    let sport_ids = match filter.sport_id {
        Some(sport_id) => vec![sport_id],
        None if own_sports.is_empty() => {
            debug!("Requester has no declared sports; nothing to match on");
            return Ok(Vec::new());
        }
        None => own_sports.iter().map(|us| us.sport_id).collect(),
    };

    let records = deps.directory.candidate_records(user_id, &sport_ids).await?;
    debug!(rows = records.len(), sports = sport_ids.len(), "Loaded candidate population");

    let excluded: HashSet<UserId> = deps
        .matches
        .live_counterparts(user_id)
        .await?
        .into_iter()
        .collect();

    let radius_km = filter.radius_km(profile.max_distance_km);
    let filter = CandidateFilter {
        max_distance_km: Some(radius_km),
        ..filter.clone()
    };
    let candidates = rank_candidates(profile.point(), records, &excluded, &filter);

    info!(
        candidates = candidates.len(),
        excluded = excluded.len(),
        max_distance_km = radius_km,
        "Candidate discovery complete"
    );

    Ok(candidates)
}

/// Pure filtering and ranking over an already loaded population
///
/// `records` must be in declaration order: only the first qualifying sport
/// per user is surfaced.
pub fn rank_candidates(
    origin: Option<GeoPoint>,
    records: Vec<CandidateRecord>,
    excluded: &HashSet<UserId>,
    filter: &CandidateFilter,
) -> Vec<CandidateSummary> {
    let radius_km = filter.radius_km(None);
    let mut seen = HashSet::new();

    let mut candidates: Vec<CandidateSummary> = records
        .into_iter()
        .filter(|r| filter.skill_level.map_or(true, |level| r.skill_level == level))
        .filter(|r| seen.insert(r.user_id))
        .filter(|r| !excluded.contains(&r.user_id))
        .filter_map(|r| {
            let distance_km = distance_between(origin, r.point());
            if matches!(distance_km, Some(d) if d > radius_km) {
                return None;
            }
            if !overlaps(&filter.preferred_days, r.preferred_days.as_deref())
                || !overlaps(&filter.preferred_times, r.preferred_times.as_deref())
            {
                return None;
            }

            Some(CandidateSummary {
                candidate_user_id: r.user_id,
                display_name: r.display_name,
                sport_id: r.sport_id,
                sport_name: r.sport_name,
                skill_level: r.skill_level,
                verified: r.verified,
                distance_km,
                preferred_days: r.preferred_days.unwrap_or_default(),
                preferred_times: r.preferred_times.unwrap_or_default(),
            })
        })
        .collect();

    // Stable: ties keep declaration order. Unknown distance sorts last.
    candidates.sort_by(|a, b| {
        let a = a.distance_km.unwrap_or(f64::INFINITY);
        let b = b.distance_km.unwrap_or(f64::INFINITY);
        a.total_cmp(&b)
    });

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::SportId;
    use crate::domains::directory::models::SkillLevel;

    fn record(user_id: UserId, sport_id: SportId, point: Option<GeoPoint>) -> CandidateRecord {
        CandidateRecord {
            user_id,
            display_name: "Candidate".to_string(),
            verified: false,
            sport_id,
            sport_name: "Tennis".to_string(),
            skill_level: SkillLevel::Intermediate,
            latitude: point.map(|p| p.latitude),
            longitude: point.map(|p| p.longitude),
            preferred_days: Some(vec!["Saturday".to_string()]),
            preferred_times: Some(vec!["Morning".to_string()]),
        }
    }

    fn origin() -> Option<GeoPoint> {
        Some(GeoPoint::new(0.0, 0.0))
    }

    #[test]
    fn test_sorted_by_distance_with_unknown_last() {
        let tennis = SportId::new();
        let far = UserId::new();
        let unknown = UserId::new();
        let near = UserId::new();
        let records = vec![
            record(unknown, tennis, None),
            record(far, tennis, Some(GeoPoint::new(0.0, 0.3))),
            record(near, tennis, Some(GeoPoint::new(0.0, 0.1))),
        ];

        let ranked = rank_candidates(origin(), records, &HashSet::new(), &CandidateFilter::within(50.0));

        let order: Vec<UserId> = ranked.iter().map(|c| c.candidate_user_id).collect();
        assert_eq!(order, vec![near, far, unknown]);
        assert!(ranked[2].distance_km.is_none());
    }

    #[test]
    fn test_unknown_requester_point_skips_radius() {
        let tennis = SportId::new();
        let records = vec![record(UserId::new(), tennis, Some(GeoPoint::new(90.0, 45.0)))];

        let ranked = rank_candidates(None, records, &HashSet::new(), &CandidateFilter::within(1.0));

        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].distance_km.is_none());
    }

    #[test]
    fn test_drops_candidates_beyond_radius() {
        let tennis = SportId::new();
        let records = vec![record(UserId::new(), tennis, Some(GeoPoint::new(0.0, 1.0)))];

        let ranked = rank_candidates(origin(), records, &HashSet::new(), &CandidateFilter::within(50.0));

        assert!(ranked.is_empty());
    }

    #[test]
    fn test_first_sport_per_user_wins() {
        let tennis = SportId::new();
        let squash = SportId::new();
        let user = UserId::new();
        let mut second = record(user, squash, origin());
        second.sport_name = "Squash".to_string();
        let records = vec![record(user, tennis, origin()), second];

        let ranked = rank_candidates(origin(), records, &HashSet::new(), &CandidateFilter::within(50.0));

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].sport_id, tennis);
    }

    #[test]
    fn test_skill_filter_applies_before_grouping() {
        let tennis = SportId::new();
        let squash = SportId::new();
        let user = UserId::new();
        let mut expert_squash = record(user, squash, origin());
        expert_squash.skill_level = SkillLevel::Expert;
        let records = vec![record(user, tennis, origin()), expert_squash];

        let filter = CandidateFilter::builder()
            .max_distance_km(50.0)
            .skill_level(Some(SkillLevel::Expert))
            .build();
        let ranked = rank_candidates(origin(), records, &HashSet::new(), &filter);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].sport_id, squash);
    }

    #[test]
    fn test_excluded_users_never_surface() {
        let tennis = SportId::new();
        let user = UserId::new();
        let excluded: HashSet<UserId> = [user].into_iter().collect();

        let ranked = rank_candidates(
            origin(),
            vec![record(user, tennis, origin())],
            &excluded,
            &CandidateFilter::within(50.0),
        );

        assert!(ranked.is_empty());
    }

    #[test]
    fn test_schedule_filters() {
        let tennis = SportId::new();
        let mut no_prefs = record(UserId::new(), tennis, origin());
        no_prefs.preferred_days = None;
        no_prefs.preferred_times = None;
        let weekend = record(UserId::new(), tennis, origin());
        let records = vec![no_prefs.clone(), weekend.clone()];

        let saturday = CandidateFilter::builder()
            .max_distance_km(50.0)
            .preferred_days(vec!["Saturday".to_string()])
            .build();
        let ranked = rank_candidates(origin(), records.clone(), &HashSet::new(), &saturday);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].candidate_user_id, weekend.user_id);

        let evening = CandidateFilter::builder()
            .max_distance_km(50.0)
            .preferred_times(vec!["Evening".to_string()])
            .build();
        assert!(rank_candidates(origin(), records.clone(), &HashSet::new(), &evening).is_empty());

        // No schedule filter: candidates without preferences are kept
        let any = CandidateFilter::within(50.0);
        assert_eq!(rank_candidates(origin(), records, &HashSet::new(), &any).len(), 2);
    }
}
