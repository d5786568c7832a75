use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, mpsc};

use anyhow::{Context, Result};

use super::*;
use crate::error::ApiError;
use crate::store::SessionStore;

/// Owns the session record and coalesces token refreshes: at most one
/// exchange is in flight at a time, every request that hits a 401 while it
/// runs waits for that exchange's outcome, and waiters are released in
/// arrival order.
pub(super) struct SessionGate {
    store: SessionStore,
    state: Mutex<GateState>,
}

struct GateState {
    session: Option<Session>,

    /// Bumped on every session change. Requests snapshot it alongside the
    /// access token; a stale snapshot after a 401 means another caller
    /// already refreshed and the request can replay without an exchange.
    generation: u64,

    refreshing: bool,
    waiters: VecDeque<mpsc::Sender<Result<String, ApiError>>>,
}

impl SessionGate {
    pub(super) fn load(store: SessionStore) -> Result<Self> {
        let session = store.load_session().context("load session")?;
        Ok(Self {
            store,
            state: Mutex::new(GateState {
                session,
                generation: 0,
                refreshing: false,
                waiters: VecDeque::new(),
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(super) fn current(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    /// Replaces the session (login/register). Persists before the new
    /// state becomes visible; a persist failure leaves the old session in
    /// place.
    pub(super) fn install(&self, session: Session) -> Result<(), ApiError> {
        let mut st = self.lock();
        self.store.save_session(&session).map_err(ApiError::store)?;
        st.session = Some(session);
        st.generation += 1;
        Ok(())
    }

    /// Signs out locally. The in-memory session always ends up cleared;
    /// removing the on-disk record is best-effort.
    pub(super) fn clear(&self) {
        let mut st = self.lock();
        st.session = None;
        st.generation += 1;
        self.store.clear_session().ok();
    }

    fn bearer_snapshot(&self) -> Result<(String, u64), ApiError> {
        let st = self.lock();
        match &st.session {
            Some(s) => Ok((s.access_token.clone(), st.generation)),
            None => Err(ApiError::Unauthenticated),
        }
    }
}

enum RecoveryRole {
    Leader { refresh_token: String, generation: u64 },
    Waiter(mpsc::Receiver<Result<String, ApiError>>),
    Current(String),
}

enum RefreshFailure {
    /// The backend explicitly refused the refresh credential.
    Rejected,
    Other(ApiError),
}

impl ApiClient {
    /// Sends a request with the current access token attached, refreshing
    /// the token on expiry.
    ///
    /// The request goes out at most twice: once with the snapshotted token
    /// and once after recovery. A replay that is refused again is terminal;
    /// the session is demonstrably unusable and the caller gets
    /// `Unauthenticated` rather than a second recovery round.
    pub fn authorized(&self, spec: RequestSpec) -> Result<reqwest::blocking::Response, ApiError> {
        let (token, generation) = self.gate.bearer_snapshot()?;
        match self.send_authorized_once(&spec, &token) {
            Err(ApiError::AuthorizationExpired) => {
                let fresh = self.recover_access(generation)?;
                match self.send_authorized_once(&spec, &fresh) {
                    Err(ApiError::AuthorizationExpired) => Err(ApiError::Unauthenticated),
                    other => other,
                }
            }
            other => other,
        }
    }

    fn send_authorized_once(
        &self,
        spec: &RequestSpec,
        access_token: &str,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        let resp = self.execute(spec, Some(access_token))?;
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::AuthorizationExpired);
        }
        self.success(resp)
    }

    /// Joins or starts the coalesced refresh for the expiry window the
    /// caller observed, and returns the access token to replay with.
    fn recover_access(&self, seen_generation: u64) -> Result<String, ApiError> {
        let role = {
            let mut st = self.gate.lock();
            let Some(session) = st.session.as_ref() else {
                return Err(ApiError::Unauthenticated);
            };
            if st.generation != seen_generation {
                RecoveryRole::Current(session.access_token.clone())
            } else if st.refreshing {
                let (tx, rx) = mpsc::channel();
                st.waiters.push_back(tx);
                RecoveryRole::Waiter(rx)
            } else {
                let refresh_token = session.refresh_token.clone();
                st.refreshing = true;
                RecoveryRole::Leader {
                    refresh_token,
                    generation: st.generation,
                }
            }
        };

        match role {
            RecoveryRole::Current(token) => Ok(token),
            RecoveryRole::Waiter(rx) => match rx.recv() {
                Ok(outcome) => outcome,
                Err(_) => Err(ApiError::Network("refresh abandoned".to_string())),
            },
            RecoveryRole::Leader {
                refresh_token,
                generation,
            } => self.lead_refresh(&refresh_token, generation),
        }
    }

    /// Performs the single exchange and publishes its outcome to every
    /// queued waiter, front of the queue first.
    fn lead_refresh(&self, refresh_token: &str, generation: u64) -> Result<String, ApiError> {
        let exchange = self.refresh_exchange(refresh_token);

        let mut st = self.gate.lock();
        let outcome: Result<String, ApiError> = if st.generation != generation {
            // Re-login or logout happened mid-exchange; that result no
            // longer applies to anything.
            match st.session.as_ref() {
                Some(s) => Ok(s.access_token.clone()),
                None => Err(ApiError::Unauthenticated),
            }
        } else {
            match exchange {
                Ok(refreshed) => match st.session.as_mut() {
                    Some(session) => {
                        session.access_token = refreshed.access_token.clone();
                        session.token_type = refreshed.token_type;
                        let persisted = self.gate.store.save_session(session);
                        st.generation += 1;
                        match persisted {
                            Ok(()) => Ok(refreshed.access_token),
                            Err(err) => Err(ApiError::store(err)),
                        }
                    }
                    None => Err(ApiError::Unauthenticated),
                },
                Err(RefreshFailure::Rejected) => {
                    st.session = None;
                    st.generation += 1;
                    self.gate.store.clear_session().ok();
                    Err(ApiError::AuthorizationRejected)
                }
                Err(RefreshFailure::Other(err)) => Err(err),
            }
        };

        st.refreshing = false;
        while let Some(tx) = st.waiters.pop_front() {
            tx.send(outcome.clone()).ok();
        }
        drop(st);

        outcome
    }

    fn refresh_exchange(&self, refresh_token: &str) -> Result<TokenRefresh, RefreshFailure> {
        let spec = RequestSpec::post("/auth/refresh").json(serde_json::json!({
            "refresh_token": refresh_token,
        }));
        let resp = self.execute(&spec, None).map_err(RefreshFailure::Other)?;
        if resp.status().is_client_error() {
            return Err(RefreshFailure::Rejected);
        }
        let resp = self.success(resp).map_err(RefreshFailure::Other)?;
        self.read_json(resp).map_err(RefreshFailure::Other)
    }
}
