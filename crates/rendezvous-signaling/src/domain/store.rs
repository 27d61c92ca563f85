//! The signaling session store.
//!
//! Sessions live in a single map behind one mutex. Every public operation
//! takes the lock, sweeps expired sessions, then does its own work, so an
//! expired session is never observable even though no timer runs. A store
//! that receives no calls keeps its expired sessions in memory until the
//! next call arrives. Pruning is logged once the lock has been released.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rendezvous_core::error::CoordinationError;
use rendezvous_core::token::TokenGenerator;
use serde_json::Value;
use tracing::debug;

use super::config::SignalingConfig;
use super::session::{CreatedSession, SessionAnswer, SessionPayload, SignalingSession};

/// How many times session creation retries after drawing an id that is
/// already in use.
const MAX_ID_ATTEMPTS: usize = 8;

/// Creates, mutates and expires WebRTC negotiation sessions.
#[derive(Debug)]
pub struct SignalingSessionStore {
    config: SignalingConfig,
    sessions: Mutex<HashMap<String, SignalingSession>>,
}

/// Removes every session with `expires_at <= now`, returning how many went.
fn sweep(sessions: &mut HashMap<String, SignalingSession>, now: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, session| !session.is_expired(now));
    before - sessions.len()
}

fn log_pruned(removed: usize, live: usize) {
    if removed > 0 {
        debug!(removed, live, "pruned expired signaling sessions");
    }
}

/// Extracts the SDP string from an offer descriptor.
fn offer_sdp(offer: &Value) -> Result<&str, CoordinationError> {
    match offer.get("sdp") {
        Some(Value::String(sdp)) if !sdp.is_empty() => Ok(sdp),
        Some(Value::String(_)) => Err(CoordinationError::InvalidOffer(
            "offer `sdp` is empty".into(),
        )),
        Some(_) => Err(CoordinationError::InvalidOffer(
            "offer `sdp` must be a string".into(),
        )),
        None => Err(CoordinationError::InvalidOffer(
            "offer must contain an `sdp` field".into(),
        )),
    }
}

impl SignalingSessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new(config: SignalingConfig) -> Self {
        Self {
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The store's configuration.
    #[must_use]
    pub fn config(&self) -> &SignalingConfig {
        &self.config
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, SignalingSession>>, CoordinationError> {
        self.sessions
            .lock()
            .map_err(|e| CoordinationError::poisoned("signaling store", e))
    }

    /// Locks the map, sweeps it, runs `op` on the live sessions, then logs
    /// the sweep after the guard is gone.
    fn with_live_sessions<T>(
        &self,
        now: DateTime<Utc>,
        op: impl FnOnce(&mut HashMap<String, SignalingSession>) -> T,
    ) -> Result<T, CoordinationError> {
        let (removed, live, out) = {
            let mut sessions = self.lock()?;
            let removed = sweep(&mut sessions, now);
            let out = op(&mut sessions);
            (removed, sessions.len(), out)
        };
        log_pruned(removed, live);
        Ok(out)
    }

    /// Creates a session from `offer`, answering it immediately.
    ///
    /// # Errors
    ///
    /// Returns `CoordinationError::InvalidOffer` if the offer carries no non-empty SDP
    /// string; nothing is stored in that case.
    /// Returns `CoordinationError::Infrastructure` if no unused id could be
    /// drawn or the store mutex is poisoned.
    pub fn create_session(
        &self,
        offer: Value,
        token: Option<String>,
        now: DateTime<Utc>,
        tokens: &dyn TokenGenerator,
    ) -> Result<CreatedSession, CoordinationError> {
        let payload = self.with_live_sessions(now, |sessions| {
            let answer = SessionAnswer::echo(offer_sdp(&offer)?, self.config.ice_servers());

            let session_id = (0..MAX_ID_ATTEMPTS)
                .map(|_| tokens.generate())
                .find(|candidate| !sessions.contains_key(candidate))
                .ok_or_else(|| {
                    CoordinationError::Infrastructure(format!(
                        "no unused session id after {MAX_ID_ATTEMPTS} attempts"
                    ))
                })?;

            let session = SignalingSession {
                session_id: session_id.clone(),
                offer,
                answer,
                created_at: now,
                expires_at: now + self.config.ttl(),
                ice_candidates: Vec::new(),
                token,
            };
            let payload = session.to_payload();
            sessions.insert(session_id, session);
            Ok::<_, CoordinationError>(payload)
        })??;

        Ok(CreatedSession {
            session: payload,
            ice_servers: self.config.ice_servers().to_vec(),
        })
    }

    /// Appends `candidate` to a live session.
    ///
    /// # Errors
    ///
    /// Returns `CoordinationError::UnknownSession` if the session does not
    /// exist or has expired.
    /// Returns `CoordinationError::Infrastructure` if the store mutex is poisoned.
    pub fn add_ice_candidate(
        &self,
        session_id: &str,
        candidate: Value,
        now: DateTime<Utc>,
    ) -> Result<SessionPayload, CoordinationError> {
        self.with_live_sessions(now, |sessions| {
            let session = sessions
                .get_mut(session_id)
                .ok_or_else(|| CoordinationError::UnknownSession(session_id.to_owned()))?;
            session.ice_candidates.push(candidate);
            Ok(session.to_payload())
        })?
    }

    /// Looks up a live session. A missing or expired id yields `None`.
    ///
    /// # Errors
    ///
    /// Returns `CoordinationError::Infrastructure` if the store mutex is poisoned.
    pub fn get_session(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SessionPayload>, CoordinationError> {
        self.with_live_sessions(now, |sessions| {
            sessions.get(session_id).map(SignalingSession::to_payload)
        })
    }

    /// Returns every live session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `CoordinationError::Infrastructure` if the store mutex is poisoned.
    pub fn list_sessions(&self, now: DateTime<Utc>) -> Result<Vec<SessionPayload>, CoordinationError> {
        self.with_live_sessions(now, |sessions| {
            let mut live: Vec<&SignalingSession> = sessions.values().collect();
            live.sort_by(|a, b| {
                a.created_at
                    .cmp(&b.created_at)
                    .then_with(|| a.session_id.cmp(&b.session_id))
            });
            live.into_iter().map(SignalingSession::to_payload).collect()
        })
    }

    /// Runs the expiry sweep on its own, returning the number of sessions
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns `CoordinationError::Infrastructure` if the store mutex is poisoned.
    pub fn prune_expired(&self, now: DateTime<Utc>) -> Result<usize, CoordinationError> {
        let (removed, live) = {
            let mut sessions = self.lock()?;
            let removed = sweep(&mut sessions, now);
            (removed, sessions.len())
        };
        log_pruned(removed, live);
        Ok(removed)
    }

    /// Number of stored sessions, including expired ones not yet swept.
    ///
    /// # Errors
    ///
    /// Returns `CoordinationError::Infrastructure` if the store mutex is poisoned.
    pub fn session_count(&self) -> Result<usize, CoordinationError> {
        Ok(self.lock()?.len())
    }
}

impl Default for SignalingSessionStore {
    fn default() -> Self {
        Self::new(SignalingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use chrono::{Duration, TimeZone};
    use rendezvous_core::token::RandomTokenGenerator;
    use rendezvous_test_support::{EventRecorder, PanickingTokens, SequenceTokens};
    use serde_json::json;

    use super::*;
    use crate::domain::config::IceServer;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    fn store() -> SignalingSessionStore {
        SignalingSessionStore::new(SignalingConfig::new(
            60,
            vec![IceServer::from_url("stun:stun.example.org:3478")],
        ))
    }

    fn offer(sdp: &str) -> Value {
        json!({ "type": "offer", "sdp": sdp })
    }

    #[test]
    fn test_create_session_echoes_offer_sdp_as_answer() {
        let store = store();
        let tokens = SequenceTokens::new(["s-1"]);

        let created = store
            .create_session(offer("x"), None, fixed_now(), &tokens)
            .unwrap();

        assert_eq!(created.session.session_id, "s-1");
        assert_eq!(created.session.answer.kind, "answer");
        assert_eq!(created.session.answer.sdp, "x");
        assert!(created.session.ice_candidates.is_empty());
        assert_eq!(created.session.expires_at, fixed_now() + Duration::seconds(60));
        assert_eq!(created.ice_servers, store.config().ice_servers());
        assert_eq!(created.session.answer.ice_servers, store.config().ice_servers());
    }

    #[test]
    fn test_create_session_keeps_offer_and_token() {
        let store = store();
        let tokens = SequenceTokens::new(["s-1"]);
        let submitted = json!({ "type": "offer", "sdp": "v=0", "extra": [1, 2] });

        store
            .create_session(submitted.clone(), Some("opaque".into()), fixed_now(), &tokens)
            .unwrap();

        let sessions = store.sessions.lock().unwrap();
        let stored = &sessions["s-1"];
        assert_eq!(stored.offer, submitted);
        assert_eq!(stored.token.as_deref(), Some("opaque"));
        assert_eq!(stored.created_at, fixed_now());
    }

    #[test]
    fn test_create_session_without_sdp_is_rejected_and_not_stored() {
        let store = store();
        let tokens = SequenceTokens::default();
        store
            .create_session(offer("x"), None, fixed_now(), &tokens)
            .unwrap();

        for bad in [json!({}), json!({ "sdp": 42 }), json!({ "sdp": "" }), json!(null)] {
            let result = store.create_session(bad, None, fixed_now(), &tokens);
            match result {
                Err(CoordinationError::InvalidOffer(_)) => {}
                other => panic!("expected InvalidOffer, got {other:?}"),
            }
        }

        assert_eq!(store.list_sessions(fixed_now()).unwrap().len(), 1);
    }

    #[test]
    fn test_create_session_retries_on_id_collision() {
        let store = store();
        let tokens = SequenceTokens::new(["dup", "dup", "fresh"]);

        store
            .create_session(offer("a"), None, fixed_now(), &tokens)
            .unwrap();
        let second = store
            .create_session(offer("b"), None, fixed_now(), &tokens)
            .unwrap();

        assert_eq!(second.session.session_id, "fresh");
        assert_eq!(store.session_count().unwrap(), 2);
    }

    #[test]
    fn test_create_session_fails_when_every_id_collides() {
        let store = store();
        let tokens = SequenceTokens::new(vec!["same"; MAX_ID_ATTEMPTS + 1]);
        store
            .create_session(offer("a"), None, fixed_now(), &tokens)
            .unwrap();

        let result = store.create_session(offer("b"), None, fixed_now(), &tokens);

        assert!(matches!(result, Err(CoordinationError::Infrastructure(_))));
        assert_eq!(store.session_count().unwrap(), 1);
    }

    #[test]
    fn test_ice_candidates_accumulate_in_submission_order() {
        let store = store();
        let tokens = SequenceTokens::new(["s-1"]);
        store
            .create_session(offer("x"), None, fixed_now(), &tokens)
            .unwrap();
        let c1 = json!({ "candidate": "candidate:1 1 udp 2122260223 10.0.0.1 5000 typ host" });
        let c2 = json!({ "candidate": "candidate:2 1 udp 1686052607 203.0.113.7 5001 typ srflx" });

        store.add_ice_candidate("s-1", c1.clone(), fixed_now()).unwrap();
        let updated = store.add_ice_candidate("s-1", c2.clone(), fixed_now()).unwrap();

        assert_eq!(updated.ice_candidates, vec![c1, c2]);
        assert_eq!(updated.answer.sdp, "x");
    }

    #[test]
    fn test_add_ice_candidate_to_unknown_session_fails() {
        let store = store();

        let result = store.add_ice_candidate("missing", json!({}), fixed_now());

        match result {
            Err(CoordinationError::UnknownSession(id)) => assert_eq!(id, "missing"),
            other => panic!("expected UnknownSession, got {other:?}"),
        }
    }

    #[test]
    fn test_get_session_returns_none_for_unknown_id() {
        let store = store();

        assert_eq!(store.get_session("missing", fixed_now()).unwrap(), None);
    }

    #[test]
    fn test_expired_session_is_invisible_without_explicit_sweep() {
        let store = store();
        let tokens = SequenceTokens::new(["s-1"]);
        store
            .create_session(offer("x"), None, fixed_now(), &tokens)
            .unwrap();
        let expiry = fixed_now() + Duration::seconds(60);

        assert!(store.get_session("s-1", expiry - Duration::seconds(1)).unwrap().is_some());
        assert_eq!(store.get_session("s-1", expiry).unwrap(), None);
        assert!(matches!(
            store.add_ice_candidate("s-1", json!({ "candidate": "late" }), expiry),
            Err(CoordinationError::UnknownSession(_))
        ));
        assert!(store.list_sessions(expiry).unwrap().is_empty());
        assert_eq!(store.session_count().unwrap(), 0);
    }

    #[test]
    fn test_expired_session_stays_in_memory_until_next_operation() {
        let store = store();
        let tokens = SequenceTokens::new(["s-1", "s-2"]);
        store
            .create_session(offer("x"), None, fixed_now(), &tokens)
            .unwrap();
        let later = fixed_now() + Duration::minutes(5);

        assert_eq!(store.session_count().unwrap(), 1);

        store.create_session(offer("y"), None, later, &tokens).unwrap();

        let live = store.list_sessions(later).unwrap();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].session_id, "s-2");
    }

    #[test]
    fn test_prune_expired_reports_removed_sessions() {
        let store = store();
        let tokens = SequenceTokens::new(["s-1", "s-2", "s-3"]);
        store.create_session(offer("a"), None, fixed_now(), &tokens).unwrap();
        store.create_session(offer("b"), None, fixed_now(), &tokens).unwrap();
        store
            .create_session(offer("c"), None, fixed_now() + Duration::seconds(30), &tokens)
            .unwrap();

        let removed = store.prune_expired(fixed_now() + Duration::seconds(60)).unwrap();

        assert_eq!(removed, 2);
        assert_eq!(store.session_count().unwrap(), 1);
        assert_eq!(store.prune_expired(fixed_now() + Duration::seconds(60)).unwrap(), 0);
    }

    #[test]
    fn test_list_sessions_is_ordered_by_creation_time() {
        let store = store();
        let tokens = SequenceTokens::new(["b", "a", "c"]);
        store.create_session(offer("1"), None, fixed_now(), &tokens).unwrap();
        store.create_session(offer("2"), None, fixed_now(), &tokens).unwrap();
        store
            .create_session(offer("3"), None, fixed_now() + Duration::seconds(1), &tokens)
            .unwrap();

        let ids: Vec<String> = store
            .list_sessions(fixed_now() + Duration::seconds(2))
            .unwrap()
            .into_iter()
            .map(|s| s.session_id)
            .collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_concurrent_creation_yields_distinct_sessions() {
        let store = Arc::new(store());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..25)
                        .map(|i| {
                            store
                                .create_session(
                                    offer(&format!("sdp-{i}")),
                                    None,
                                    fixed_now(),
                                    &RandomTokenGenerator,
                                )
                                .unwrap()
                                .session
                                .session_id
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let ids: HashSet<String> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(ids.len(), 200);
        assert_eq!(store.list_sessions(fixed_now()).unwrap().len(), 200);
    }

    #[test]
    fn test_offer_with_empty_sdp_is_rejected_as_empty() {
        let store = store();

        let result = store.create_session(offer(""), None, fixed_now(), &SequenceTokens::default());

        match result {
            Err(CoordinationError::InvalidOffer(reason)) => assert!(reason.contains("empty")),
            other => panic!("expected InvalidOffer, got {other:?}"),
        }
        assert_eq!(store.session_count().unwrap(), 0);
    }

    #[test]
    fn test_store_poisoned_by_panicking_id_source_reports_infrastructure_error() {
        // Arrange
        let store = Arc::new(store());
        store
            .create_session(offer("a"), None, fixed_now(), &SequenceTokens::new(["s-1"]))
            .unwrap();
        let poisoner = Arc::clone(&store);
        let result = thread::spawn(move || {
            poisoner.create_session(offer("b"), None, fixed_now(), &PanickingTokens)
        })
        .join();
        assert!(result.is_err());

        // Act / Assert
        let tokens = SequenceTokens::new(["s-2"]);
        assert!(matches!(
            store.create_session(offer("c"), None, fixed_now(), &tokens),
            Err(CoordinationError::Infrastructure(_))
        ));
        assert!(matches!(
            store.add_ice_candidate("s-1", json!("c1"), fixed_now()),
            Err(CoordinationError::Infrastructure(_))
        ));
        assert!(matches!(
            store.get_session("s-1", fixed_now()),
            Err(CoordinationError::Infrastructure(_))
        ));
        assert!(matches!(
            store.list_sessions(fixed_now()),
            Err(CoordinationError::Infrastructure(_))
        ));
        assert!(matches!(
            store.prune_expired(fixed_now()),
            Err(CoordinationError::Infrastructure(_))
        ));
        assert!(matches!(
            store.session_count(),
            Err(CoordinationError::Infrastructure(_))
        ));
    }

    #[test]
    fn test_pruning_is_logged_after_the_lock_is_released() {
        // Arrange
        let store = Arc::new(store());
        let tokens = SequenceTokens::new(["s-1", "s-2", "s-3"]);
        store.create_session(offer("a"), None, fixed_now(), &tokens).unwrap();
        store.create_session(offer("b"), None, fixed_now(), &tokens).unwrap();
        let later = fixed_now() + Duration::minutes(5);
        let watched = Arc::clone(&store);
        let (recorder, events) =
            EventRecorder::with_lock_check(move || watched.sessions.try_lock().is_err());

        // Act
        tracing::subscriber::with_default(recorder, || {
            store.create_session(offer("c"), None, later, &tokens).unwrap();
            store.create_session(offer("d"), None, later + Duration::minutes(5), &tokens).unwrap();
        });

        // Assert
        let pruned = events.with_message("pruned expired signaling sessions");
        assert_eq!(pruned.len(), 2);
        assert_eq!(pruned[0].fields["removed"], "2");
        assert_eq!(events.emitted_while_locked(), 0);
    }
}
