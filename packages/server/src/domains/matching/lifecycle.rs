//! Match lifecycle: request, respond, cancel, and the read side
//!
//! Every transition is a compare-and-set against the status the decision was
//! made on, so a concurrent double-submit sees `InvalidState` instead of
//! applying twice.

use chrono::Utc;
use std::collections::HashMap;
use tracing::{error, info, instrument, warn};

use crate::common::{MatchId, SportId, UserId};
use crate::domains::directory::models::User;
use crate::kernel::ServerDeps;

use super::error::MatchingError;
use super::models::{Match, MatchListing, MatchStatus, MatchSummary};

// =============================================================================
// Transitions
// =============================================================================

/// Create a pending match request from `requester_id` to `recipient_id`
///
/// Both users must be active and must have declared `sport_id`. At most one
/// live (non-rejected) match may exist per unordered pair and sport; losing
/// that race to a concurrent request yields `Conflict`.
#[instrument(skip(deps))]
pub async fn send_match_request(
    requester_id: UserId,
    recipient_id: UserId,
    sport_id: SportId,
    deps: &ServerDeps,
) -> Result<MatchSummary, MatchingError> {
    if requester_id == recipient_id {
        return Err(MatchingError::InvalidRequest(
            "cannot send a match request to yourself".to_string(),
        ));
    }

    let requester = active_user(requester_id, deps).await?;
    let recipient = active_user(recipient_id, deps).await?;
    let sport = deps
        .directory
        .find_sport(sport_id)
        .await?
        .ok_or(MatchingError::SportNotFound(sport_id))?;

    ensure_declared(requester_id, sport_id, "you have", deps).await?;
    ensure_declared(recipient_id, sport_id, "the recipient has", deps).await?;

    if let Some(existing) = deps
        .matches
        .find_live_between(requester_id, recipient_id, Some(sport_id))
        .await?
    {
        warn!(existing_match_id = %existing.id, status = %existing.status, "Live match already exists");
        return Err(MatchingError::Conflict {
            existing: Some(existing.id),
        });
    }

    let record = Match::pending(requester_id, recipient_id, Some(sport_id));
    let created = deps
        .matches
        .insert_if_no_live(&record)
        .await?
        .ok_or_else(|| {
            warn!("Lost race to a concurrent match request");
            MatchingError::Conflict { existing: None }
        })?;

    info!(match_id = %created.id, sport = %sport.name, "Match request sent");

    Ok(MatchSummary::new(
        created,
        requester.display_name,
        recipient.display_name,
        Some(sport.name),
    ))
}

/// Accept or reject a pending request; only the recipient may respond
///
/// Acceptance opens a conversation through the conversation bridge.
/// Rejection frees the pair and sport for a future request. If the bridge
/// fails, the match goes back to `Pending` so the accept can be retried.
#[instrument(skip(deps))]
pub async fn respond(
    acting_user_id: UserId,
    match_id: MatchId,
    accept: bool,
    deps: &ServerDeps,
) -> Result<MatchSummary, MatchingError> {
    let current = load(match_id, deps).await?;

    if current.recipient_id != acting_user_id {
        warn!("Non-recipient attempted to respond to match");
        return Err(MatchingError::Forbidden(
            "only the recipient can respond to a match request".to_string(),
        ));
    }
    if current.status != MatchStatus::Pending {
        return Err(MatchingError::already_processed());
    }

    let next = if accept {
        MatchStatus::Accepted
    } else {
        MatchStatus::Rejected
    };
    let updated = deps
        .matches
        .compare_and_set_status(match_id, MatchStatus::Pending, next, Some(Utc::now()))
        .await?
        .ok_or_else(MatchingError::already_processed)?;

    if accept {
        let conversation_id = match deps.conversations.ensure_conversation(&updated).await {
            Ok(id) => id,
            Err(e) => {
                error!(error = %e, "Conversation bridge failed; returning match to pending");
                revert_accept(match_id, deps).await;
                return Err(e.into());
            }
        };
        info!(conversation_id = %conversation_id, "Match accepted");
    } else {
        info!("Match rejected");
    }

    summarize(updated, deps).await
}

/// Withdraw a pending request (requester) or end an accepted match (either side)
#[instrument(skip(deps))]
pub async fn cancel(
    acting_user_id: UserId,
    match_id: MatchId,
    deps: &ServerDeps,
) -> Result<(), MatchingError> {
    let current = load(match_id, deps).await?;
    let expected = cancellable_from(&current, acting_user_id).map_err(|e| {
        warn!(status = %current.status, error = %e, "Cancel refused");
        e
    })?;

    deps.matches
        .compare_and_set_status(match_id, expected, MatchStatus::Canceled, None)
        .await?
        .ok_or_else(|| {
            MatchingError::InvalidState("match changed while it was being canceled".to_string())
        })?;

    info!(previous = %expected, "Match canceled");
    Ok(())
}

/// Status a cancel by `actor` may transition from
///
/// A pending recipient must reject instead, so the audit trail tells a
/// withdrawn request apart from a declined one.
pub fn cancellable_from(record: &Match, actor: UserId) -> Result<MatchStatus, MatchingError> {
    if !record.involves(actor) {
        return Err(MatchingError::Forbidden(
            "only the requester or recipient can cancel a match".to_string(),
        ));
    }

    match record.status {
        MatchStatus::Pending if record.requester_id == actor => Ok(MatchStatus::Pending),
        MatchStatus::Accepted => Ok(MatchStatus::Accepted),
        MatchStatus::Pending => Err(MatchingError::InvalidState(
            "a pending request you received must be rejected, not canceled".to_string(),
        )),
        status => Err(MatchingError::InvalidState(format!(
            "cannot cancel a match that is {}",
            status
        ))),
    }
}

// =============================================================================
// Queries
// =============================================================================

pub async fn get_match_by_id(
    match_id: MatchId,
    deps: &ServerDeps,
) -> Result<MatchSummary, MatchingError> {
    let record = load(match_id, deps).await?;
    summarize(record, deps).await
}

/// Accepted matches where the user is either party
pub async fn get_current_matches(
    user_id: UserId,
    deps: &ServerDeps,
) -> Result<Vec<MatchSummary>, MatchingError> {
    list(MatchListing::Current, user_id, deps).await
}

/// Pending requests the user sent
pub async fn get_sent_requests(
    user_id: UserId,
    deps: &ServerDeps,
) -> Result<Vec<MatchSummary>, MatchingError> {
    list(MatchListing::Sent, user_id, deps).await
}

/// Pending requests awaiting the user's response
pub async fn get_received_requests(
    user_id: UserId,
    deps: &ServerDeps,
) -> Result<Vec<MatchSummary>, MatchingError> {
    list(MatchListing::Received, user_id, deps).await
}

async fn list(
    listing: MatchListing,
    user_id: UserId,
    deps: &ServerDeps,
) -> Result<Vec<MatchSummary>, MatchingError> {
    let records = deps.matches.list(listing, user_id).await?;
    summarize_all(records, deps).await
}

// =============================================================================
// Helpers
// =============================================================================

/// Undo an accept whose conversation could not be opened
///
/// Leaves the match alone if it moved on (e.g. was canceled) in the meantime.
async fn revert_accept(match_id: MatchId, deps: &ServerDeps) {
    match deps.matches.reopen_pending(match_id).await {
        Ok(Some(_)) => info!("Match returned to pending"),
        Ok(None) => warn!("Match changed before the accept could be reverted"),
        Err(e) => error!(error = %e, "Failed to revert accept"),
    }
}

async fn load(match_id: MatchId, deps: &ServerDeps) -> Result<Match, MatchingError> {
    deps.matches
        .find_by_id(match_id)
        .await?
        .ok_or(MatchingError::MatchNotFound(match_id))
}

/// Deactivated users are treated as missing
async fn active_user(user_id: UserId, deps: &ServerDeps) -> Result<User, MatchingError> {
    deps.directory
        .find_user(user_id)
        .await?
        .filter(|u| u.active)
        .ok_or(MatchingError::UserNotFound(user_id))
}

async fn ensure_declared(
    user_id: UserId,
    sport_id: SportId,
    who: &str,
    deps: &ServerDeps,
) -> Result<(), MatchingError> {
    let declared = deps
        .directory
        .user_sports(user_id)
        .await?
        .iter()
        .any(|us| us.sport_id == sport_id);

    if declared {
        Ok(())
    } else {
        Err(MatchingError::InvalidRequest(format!(
            "{} not added this sport",
            who
        )))
    }
}

async fn summarize(record: Match, deps: &ServerDeps) -> Result<MatchSummary, MatchingError> {
    let id = record.id;
    summarize_all(vec![record], deps)
        .await?
        .pop()
        .ok_or(MatchingError::MatchNotFound(id))
}

/// Resolve display and sport names with one user lookup and one sport
/// lookup per distinct sport
async fn summarize_all(
    records: Vec<Match>,
    deps: &ServerDeps,
) -> Result<Vec<MatchSummary>, MatchingError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let mut user_ids: Vec<UserId> = records
        .iter()
        .flat_map(|m| [m.requester_id, m.recipient_id])
        .collect();
    user_ids.sort();
    user_ids.dedup();

    let names: HashMap<UserId, String> = deps
        .directory
        .find_users(&user_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.display_name))
        .collect();

    let mut sport_names: HashMap<SportId, Option<String>> = HashMap::new();
    for sport_id in records.iter().filter_map(|m| m.sport_id) {
        if !sport_names.contains_key(&sport_id) {
            let name = deps.directory.find_sport(sport_id).await?.map(|s| s.name);
            sport_names.insert(sport_id, name);
        }
    }

    Ok(records
        .into_iter()
        .map(|m| {
            let requester_name = names.get(&m.requester_id).cloned().unwrap_or_default();
            let recipient_name = names.get(&m.recipient_id).cloned().unwrap_or_default();
            let sport_name = m.sport_id.and_then(|id| sport_names.get(&id).cloned().flatten());
            MatchSummary::new(m, requester_name, recipient_name, sport_name)
        })
        .collect())
}
