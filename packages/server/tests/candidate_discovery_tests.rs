//! Candidate discovery against in-memory dependencies.

mod common;

use buddy_core::common::{GeoPoint, SportId, UserId};
use buddy_core::domains::directory::models::SkillLevel;
use buddy_core::domains::matching::{
    find_candidates, respond, send_match_request, CandidateFilter, ErrorKind, MatchingError,
};
use buddy_core::kernel::test_dependencies::TestDependencies;

struct World {
    deps: TestDependencies,
    me: UserId,
    tennis: SportId,
}

/// A requester at (0, 0) who plays tennis
fn world() -> World {
    let deps = TestDependencies::new();
    let tennis = deps.directory.add_sport("Tennis");
    let me = deps.directory.add_user("Me");
    deps.directory.set_point(me, GeoPoint::new(0.0, 0.0));
    deps.directory.declare_sport(me, tennis, SkillLevel::Intermediate);
    World { deps, me, tennis }
}

impl World {
    fn player(&self, name: &str, point: Option<GeoPoint>, level: SkillLevel) -> UserId {
        let id = self.deps.directory.add_user(name);
        if let Some(point) = point {
            self.deps.directory.set_point(id, point);
        }
        self.deps.directory.declare_sport(id, self.tennis, level);
        id
    }
}

#[tokio::test]
async fn nearby_player_is_found_with_distance() {
    let w = world();
    let near = w.player(
        "Near",
        Some(GeoPoint::new(0.1, 0.0)),
        SkillLevel::Intermediate,
    );

    let found = find_candidates(w.me, &CandidateFilter::within(50.0), &w.deps.server_deps())
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].candidate_user_id, near);
    assert_eq!(found[0].sport_name, "Tennis");
    let km = found[0].distance_km.unwrap();
    assert!((km - 11.12).abs() < 0.05, "distance was {km}");
}

#[tokio::test]
async fn verification_badge_is_reported() {
    let w = world();
    let checked = w.player("Checked", Some(GeoPoint::new(0.1, 0.0)), SkillLevel::Beginner);
    w.player("Unchecked", Some(GeoPoint::new(0.2, 0.0)), SkillLevel::Beginner);
    w.deps.directory.set_verified(checked, true);

    let found = find_candidates(w.me, &CandidateFilter::within(50.0), &w.deps.server_deps())
        .await
        .unwrap();

    let badges: Vec<(&str, bool)> = found
        .iter()
        .map(|c| (c.display_name.as_str(), c.verified))
        .collect();
    assert_eq!(badges, vec![("Checked", true), ("Unchecked", false)]);
}

#[tokio::test]
async fn requester_travel_radius_applies_without_explicit_radius() {
    let w = world();
    w.deps.directory.set_travel_radius(w.me, 5.0);
    let near = w.player("Near", Some(GeoPoint::new(0.1, 0.0)), SkillLevel::Beginner);
    let deps = w.deps.server_deps();

    let found = find_candidates(w.me, &CandidateFilter::default(), &deps)
        .await
        .unwrap();
    assert!(found.is_empty(), "11km away is outside a 5km travel radius");

    let found = find_candidates(w.me, &CandidateFilter::within(50.0), &deps)
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].candidate_user_id, near);
}

#[tokio::test]
async fn fallback_radius_applies_without_profile_radius() {
    let w = world();
    w.player("Near", Some(GeoPoint::new(0.1, 0.0)), SkillLevel::Beginner);

    let tight = CandidateFilter::builder().fallback_distance_km(5.0).build();
    let found = find_candidates(w.me, &tight, &w.deps.server_deps())
        .await
        .unwrap();
    assert!(found.is_empty());
}

#[tokio::test]
async fn radius_cuts_off_far_players_but_keeps_unlocated_ones() {
    let w = world();
    w.player("Far", Some(GeoPoint::new(1.0, 0.0)), SkillLevel::Beginner);
    let unlocated = w.player("Nowhere", None, SkillLevel::Beginner);

    let found = find_candidates(w.me, &CandidateFilter::within(50.0), &w.deps.server_deps())
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].candidate_user_id, unlocated);
    assert!(found[0].distance_km.is_none());
}

#[tokio::test]
async fn results_are_sorted_nearest_first_with_unknown_last() {
    let w = world();
    let unknown = w.player("Unknown", None, SkillLevel::Beginner);
    let mid = w.player("Mid", Some(GeoPoint::new(0.2, 0.0)), SkillLevel::Beginner);
    let close = w.player("Close", Some(GeoPoint::new(0.05, 0.0)), SkillLevel::Beginner);

    let found = find_candidates(w.me, &CandidateFilter::within(50.0), &w.deps.server_deps())
        .await
        .unwrap();

    let order: Vec<UserId> = found.iter().map(|c| c.candidate_user_id).collect();
    assert_eq!(order, vec![close, mid, unknown]);
}

#[tokio::test]
async fn live_match_counterparts_are_excluded_until_rejected() {
    let w = world();
    let partner = w.player("Partner", Some(GeoPoint::new(0.1, 0.0)), SkillLevel::Advanced);
    let deps = w.deps.server_deps();
    let filter = CandidateFilter::within(50.0);

    let pending = send_match_request(w.me, partner, w.tennis, &deps)
        .await
        .unwrap();
    assert!(find_candidates(w.me, &filter, &deps).await.unwrap().is_empty());
    // The exclusion is symmetric
    assert!(find_candidates(partner, &filter, &deps)
        .await
        .unwrap()
        .is_empty());

    respond(partner, pending.id, false, &deps).await.unwrap();
    let found = find_candidates(w.me, &filter, &deps).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].candidate_user_id, partner);
}

#[tokio::test]
async fn skill_and_schedule_filters_apply() {
    let w = world();
    let point = Some(GeoPoint::new(0.01, 0.0));
    let weekend_pro = w.player("Weekend Pro", point, SkillLevel::Advanced);
    let weekday_pro = w.player("Weekday Pro", point, SkillLevel::Advanced);
    w.player("Weekend Newbie", point, SkillLevel::Beginner);
    w.deps.directory.set_preferences(weekend_pro, &["Saturday", "Sunday"], &["Morning"]);
    w.deps.directory.set_preferences(weekday_pro, &["Monday"], &["Morning"]);

    let filter = CandidateFilter::builder()
        .skill_level(Some(SkillLevel::Advanced))
        .max_distance_km(50.0)
        .preferred_days(vec!["saturday".to_string()])
        .build();

    let found = find_candidates(w.me, &filter, &w.deps.server_deps())
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].candidate_user_id, weekend_pro);
    assert_eq!(found[0].preferred_days, vec!["Saturday", "Sunday"]);
}

#[tokio::test]
async fn inactive_users_and_self_never_appear() {
    let w = world();
    let gone = w.player("Gone", Some(GeoPoint::new(0.01, 0.0)), SkillLevel::Beginner);
    w.deps.directory.set_active(gone, false);

    let found = find_candidates(w.me, &CandidateFilter::within(50.0), &w.deps.server_deps())
        .await
        .unwrap();

    assert!(found.is_empty());
}

#[tokio::test]
async fn one_entry_per_user_even_with_several_shared_sports() {
    let w = world();
    let running = w.deps.directory.add_sport("Running");
    w.deps.directory.declare_sport(w.me, running, SkillLevel::Beginner);
    let both = w.player("Both", Some(GeoPoint::new(0.01, 0.0)), SkillLevel::Beginner);
    w.deps.directory.declare_sport(both, running, SkillLevel::Beginner);

    let found = find_candidates(w.me, &CandidateFilter::within(50.0), &w.deps.server_deps())
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].sport_id, w.tennis);

    let only_running = CandidateFilter::builder()
        .sport_id(Some(running))
        .max_distance_km(50.0)
        .build();
    let found = find_candidates(w.me, &only_running, &w.deps.server_deps())
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].sport_id, running);
}

#[tokio::test]
async fn requester_without_sports_gets_nothing() {
    let deps = TestDependencies::new();
    let tennis = deps.directory.add_sport("Tennis");
    let me = deps.directory.add_user("Me");
    let other = deps.directory.add_user("Other");
    deps.directory.declare_sport(other, tennis, SkillLevel::Beginner);

    let found = find_candidates(me, &CandidateFilter::default(), &deps.server_deps())
        .await
        .unwrap();

    assert!(found.is_empty());
}

#[tokio::test]
async fn missing_user_or_profile_is_not_found() {
    let w = world();
    let deps = w.deps.server_deps();

    let err = find_candidates(UserId::new(), &CandidateFilter::default(), &deps)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    w.deps.directory.remove_profile(w.me);
    let err = find_candidates(w.me, &CandidateFilter::default(), &deps)
        .await
        .unwrap_err();
    assert!(matches!(err, MatchingError::ProfileNotFound(id) if id == w.me));
}
