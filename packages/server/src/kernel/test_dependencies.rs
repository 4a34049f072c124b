// TestDependencies - in-memory implementations for testing
//
// Provides fakes for every kernel trait so matching logic can be exercised
// without a database. The match repository guards check-then-insert and
// compare-and-set with one mutex, mirroring the unique index and conditional
// UPDATE used in Postgres.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{BaseConversationBridge, BaseDirectory, BaseMatchRepository, ServerDeps};
use crate::common::{ConversationId, GeoPoint, LocationId, MatchId, SportId, UserId};
use crate::domains::directory::models::{
    CandidateRecord, Location, Profile, SkillLevel, Sport, User, UserSport,
};
use crate::domains::matching::models::{Match, MatchListing, MatchStatus};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// In-memory Directory
// =============================================================================

#[derive(Default)]
struct DirectoryState {
    users: Vec<User>,
    profiles: HashMap<UserId, Profile>,
    user_sports: Vec<UserSport>,
    sports: Vec<Sport>,
    locations: Vec<Location>,
}

#[derive(Default)]
pub struct InMemoryDirectory {
    state: Mutex<DirectoryState>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sport(&self, name: &str) -> SportId {
        let sport = Sport {
            id: SportId::new(),
            name: name.to_string(),
        };
        let id = sport.id;
        lock(&self.state).sports.push(sport);
        id
    }

    pub fn add_location(&self, name: &str, longitude: f64, latitude: f64) -> LocationId {
        let location = Location {
            id: LocationId::new(),
            name: name.to_string(),
            latitude,
            longitude,
        };
        let id = location.id;
        lock(&self.state).locations.push(location);
        id
    }

    /// Active, unverified user with a blank profile
    pub fn add_user(&self, display_name: &str) -> UserId {
        let user = User {
            id: UserId::new(),
            display_name: display_name.to_string(),
            verified: false,
            active: true,
            created_at: Utc::now(),
        };
        let id = user.id;
        let mut state = lock(&self.state);
        state.users.push(user);
        state.profiles.insert(id, Profile::blank(id));
        id
    }

    pub fn set_verified(&self, user_id: UserId, verified: bool) {
        let mut state = lock(&self.state);
        if let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) {
            user.verified = verified;
        }
    }

    pub fn set_active(&self, user_id: UserId, active: bool) {
        let mut state = lock(&self.state);
        if let Some(user) = state.users.iter_mut().find(|u| u.id == user_id) {
            user.active = active;
        }
    }

    pub fn remove_profile(&self, user_id: UserId) {
        lock(&self.state).profiles.remove(&user_id);
    }

    pub fn set_point(&self, user_id: UserId, point: GeoPoint) {
        self.update_profile(user_id, |p| {
            p.longitude = Some(point.longitude);
            p.latitude = Some(point.latitude);
        });
    }

    pub fn set_travel_radius(&self, user_id: UserId, max_distance_km: f64) {
        self.update_profile(user_id, |p| p.max_distance_km = Some(max_distance_km));
    }

    pub fn set_preferences(&self, user_id: UserId, days: &[&str], times: &[&str]) {
        self.update_profile(user_id, |p| {
            p.preferred_days = days.iter().map(|d| d.to_string()).collect();
            p.preferred_times = times.iter().map(|t| t.to_string()).collect();
        });
    }

    fn update_profile(&self, user_id: UserId, f: impl FnOnce(&mut Profile)) {
        let mut state = lock(&self.state);
        let profile = state
            .profiles
            .entry(user_id)
            .or_insert_with(|| Profile::blank(user_id));
        f(profile);
        profile.updated_at = Utc::now();
    }

    /// Declare (or re-declare) a sport for a user; one row per (user, sport)
    pub fn declare_sport(&self, user_id: UserId, sport_id: SportId, skill_level: SkillLevel) {
        let mut state = lock(&self.state);
        let sport_name = state
            .sports
            .iter()
            .find(|s| s.id == sport_id)
            .map(|s| s.name.clone())
            .unwrap_or_default();

        if let Some(existing) = state
            .user_sports
            .iter_mut()
            .find(|us| us.user_id == user_id && us.sport_id == sport_id)
        {
            existing.skill_level = skill_level;
            return;
        }

        state.user_sports.push(UserSport {
            user_id,
            sport_id,
            sport_name,
            skill_level,
            years_experience: None,
            notes: None,
            is_public: true,
            created_at: Utc::now(),
        });
    }
}

#[async_trait]
impl BaseDirectory for InMemoryDirectory {
    async fn find_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(lock(&self.state).users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_users(&self, ids: &[UserId]) -> Result<Vec<User>> {
        Ok(lock(&self.state)
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn find_profile(&self, user_id: UserId) -> Result<Option<Profile>> {
        Ok(lock(&self.state).profiles.get(&user_id).cloned())
    }

    async fn user_sports(&self, user_id: UserId) -> Result<Vec<UserSport>> {
        Ok(lock(&self.state)
            .user_sports
            .iter()
            .filter(|us| us.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_sport(&self, id: SportId) -> Result<Option<Sport>> {
        Ok(lock(&self.state).sports.iter().find(|s| s.id == id).cloned())
    }

    async fn list_sports(&self) -> Result<Vec<Sport>> {
        let mut sports = lock(&self.state).sports.clone();
        sports.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sports)
    }

    async fn list_locations(&self) -> Result<Vec<Location>> {
        let mut locations = lock(&self.state).locations.clone();
        locations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(locations)
    }

    async fn candidate_records(
        &self,
        exclude_user: UserId,
        sport_ids: &[SportId],
    ) -> Result<Vec<CandidateRecord>> {
        let state = lock(&self.state);
        let records = state
            .user_sports
            .iter()
            .filter(|us| us.user_id != exclude_user && sport_ids.contains(&us.sport_id))
            .filter_map(|us| {
                let user = state.users.iter().find(|u| u.id == us.user_id && u.active)?;
                let profile = state.profiles.get(&us.user_id);
                Some(CandidateRecord {
                    user_id: user.id,
                    display_name: user.display_name.clone(),
                    verified: user.verified,
                    sport_id: us.sport_id,
                    sport_name: us.sport_name.clone(),
                    skill_level: us.skill_level,
                    latitude: profile.and_then(|p| p.latitude),
                    longitude: profile.and_then(|p| p.longitude),
                    preferred_days: profile.map(|p| p.preferred_days.clone()),
                    preferred_times: profile.map(|p| p.preferred_times.clone()),
                })
            })
            .collect();
        Ok(records)
    }
}

// =============================================================================
// In-memory Match Repository
// =============================================================================

#[derive(Default)]
pub struct InMemoryMatchRepository {
    matches: Mutex<Vec<Match>>,
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record as-is, bypassing the live-relationship check
    pub fn seed(&self, record: Match) {
        lock(&self.matches).push(record);
    }

    pub fn all(&self) -> Vec<Match> {
        lock(&self.matches).clone()
    }
}

#[async_trait]
impl BaseMatchRepository for InMemoryMatchRepository {
    async fn find_by_id(&self, id: MatchId) -> Result<Option<Match>> {
        Ok(lock(&self.matches).iter().find(|m| m.id == id).cloned())
    }

    async fn find_live_between(
        &self,
        a: UserId,
        b: UserId,
        sport_id: Option<SportId>,
    ) -> Result<Option<Match>> {
        Ok(lock(&self.matches)
            .iter()
            .rev()
            .find(|m| m.status.is_live() && m.same_relationship(a, b, sport_id))
            .cloned())
    }

    async fn insert_if_no_live(&self, record: &Match) -> Result<Option<Match>> {
        let mut matches = lock(&self.matches);
        let blocked = matches.iter().any(|m| {
            m.status.is_live()
                && m.same_relationship(record.requester_id, record.recipient_id, record.sport_id)
        });
        if blocked {
            return Ok(None);
        }
        matches.push(record.clone());
        Ok(Some(record.clone()))
    }

    async fn compare_and_set_status(
        &self,
        id: MatchId,
        expected: MatchStatus,
        next: MatchStatus,
        responded_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Match>> {
        let mut matches = lock(&self.matches);
        let Some(record) = matches.iter_mut().find(|m| m.id == id && m.status == expected) else {
            return Ok(None);
        };
        record.status = next;
        if responded_at.is_some() {
            record.responded_at = responded_at;
        }
        Ok(Some(record.clone()))
    }

    async fn reopen_pending(&self, id: MatchId) -> Result<Option<Match>> {
        let mut matches = lock(&self.matches);
        let Some(record) = matches
            .iter_mut()
            .find(|m| m.id == id && m.status == MatchStatus::Accepted)
        else {
            return Ok(None);
        };
        record.status = MatchStatus::Pending;
        record.responded_at = None;
        Ok(Some(record.clone()))
    }

    async fn live_counterparts(&self, user_id: UserId) -> Result<Vec<UserId>> {
        let mut counterparts: Vec<UserId> = lock(&self.matches)
            .iter()
            .filter(|m| m.status.is_live())
            .filter_map(|m| m.counterpart_of(user_id))
            .collect();
        counterparts.sort();
        counterparts.dedup();
        Ok(counterparts)
    }

    async fn list(&self, listing: MatchListing, user_id: UserId) -> Result<Vec<Match>> {
        let mut matches: Vec<Match> = lock(&self.matches)
            .iter()
            .filter(|m| m.belongs_to(listing, user_id))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
        Ok(matches)
    }
}

// =============================================================================
// Recording Conversation Bridge
// =============================================================================

/// Hands out one conversation id per match and records every call
#[derive(Default)]
pub struct RecordingConversationBridge {
    calls: Mutex<Vec<MatchId>>,
    conversations: Mutex<HashMap<MatchId, ConversationId>>,
    fail_next: AtomicBool,
}

impl RecordingConversationBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match ids passed to `ensure_conversation`, in call order
    pub fn calls(&self) -> Vec<MatchId> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn conversation_for(&self, match_id: MatchId) -> Option<ConversationId> {
        lock(&self.conversations).get(&match_id).copied()
    }

    /// Make the next `ensure_conversation` fail without creating anything
    pub fn fail_next_call(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl BaseConversationBridge for RecordingConversationBridge {
    async fn ensure_conversation(&self, accepted: &Match) -> Result<ConversationId> {
        lock(&self.calls).push(accepted.id);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            anyhow::bail!("conversation service unavailable");
        }
        let id = *lock(&self.conversations)
            .entry(accepted.id)
            .or_insert_with(ConversationId::new);
        Ok(id)
    }
}

// =============================================================================
// Wiring
// =============================================================================

/// ServerDeps backed entirely by in-memory fakes, with handles for seeding
/// and inspection.
#[derive(Clone)]
pub struct TestDependencies {
    pub directory: Arc<InMemoryDirectory>,
    pub matches: Arc<InMemoryMatchRepository>,
    pub conversations: Arc<RecordingConversationBridge>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            directory: Arc::new(InMemoryDirectory::new()),
            matches: Arc::new(InMemoryMatchRepository::new()),
            conversations: Arc::new(RecordingConversationBridge::new()),
        }
    }

    pub fn server_deps(&self) -> ServerDeps {
        ServerDeps::new(
            self.directory.clone(),
            self.matches.clone(),
            self.conversations.clone(),
        )
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
