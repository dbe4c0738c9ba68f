//! Session store: accumulates plan requests and finalizes them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crawlrate_core::{Constraint, CrawlPlan, FillStrategy, Pulse, Timing};
use crawlrate_placement::{compute_pulse, generate_with};

use crate::error::{SessionError, SessionResult};
use crate::merge::MergePolicy;

static SESSION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Opaque session identifier, rendered as `xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Derive a fresh identifier from a process-wide counter, the clock,
    /// and the process id.
    pub fn generate() -> Self {
        let count = SESSION_COUNTER.fetch_add(1, Ordering::Relaxed);
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();

        let mut hasher = Sha256::new();
        hasher.update(count.to_le_bytes());
        hasher.update(nanos.to_le_bytes());
        hasher.update(std::process::id().to_le_bytes());
        let digest = hex::encode(&hasher.finalize()[..16]);

        Self(format!(
            "{}-{}-{}-{}-{}",
            &digest[0..8],
            &digest[8..12],
            &digest[12..16],
            &digest[16..20],
            &digest[20..32]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One pending request: concrete lists plus the constraint to plan under.
///
/// The keyword and proxy counts the calculators need are the list lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub keywords: Vec<String>,
    pub proxies: Vec<String>,
    #[serde(flatten)]
    pub timing: Timing,
    #[serde(flatten)]
    pub constraint: Constraint,
}

impl PlanRequest {
    pub fn pulse(&self) -> SessionResult<Pulse> {
        Ok(compute_pulse(
            self.keywords.len(),
            self.proxies.len(),
            &self.timing,
            &self.constraint,
        )?)
    }
}

/// Lifecycle of a session.
enum Session {
    Open { requests: Vec<(PlanRequest, Pulse)> },
    Finalized { plan: CrawlPlan, requests: usize },
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub requests: usize,
    pub finalized: bool,
}

/// Owns every session. Cheap to clone; clones share the same table.
///
/// The table lock is held only to look a session up or to insert and
/// remove one. Each session has its own lock, so requests against
/// different sessions never wait on each other.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>>,
    policy: MergePolicy,
    strategy: FillStrategy,
}

impl SessionStore {
    pub fn new(policy: MergePolicy, strategy: FillStrategy) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            policy,
            strategy,
        }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Open a new, empty session.
    pub async fn create_session(&self) -> SessionId {
        let id = SessionId::generate();
        let session = Arc::new(Mutex::new(Session::Open {
            requests: Vec::new(),
        }));
        self.sessions.write().await.insert(id.clone(), session);
        info!(session = %id, "session created");
        id
    }

    /// Queue a fixed-duration request.
    pub async fn add_duration_request(
        &self,
        id: &SessionId,
        keywords: Vec<String>,
        proxies: Vec<String>,
        timing: Timing,
        time_period: Duration,
    ) -> SessionResult<Pulse> {
        let request = PlanRequest {
            keywords,
            proxies,
            timing,
            constraint: Constraint::FixedDuration { time_period },
        };
        self.add_request(id, request).await
    }

    /// Queue a fixed-connections request.
    pub async fn add_connections_request(
        &self,
        id: &SessionId,
        keywords: Vec<String>,
        proxies: Vec<String>,
        timing: Timing,
        max_connections: u32,
    ) -> SessionResult<Pulse> {
        let request = PlanRequest {
            keywords,
            proxies,
            timing,
            constraint: Constraint::FixedConnections { max_connections },
        };
        self.add_request(id, request).await
    }

    /// Validate a request by computing its pulse, then queue it.
    ///
    /// Rejected requests leave the session unchanged.
    pub async fn add_request(&self, id: &SessionId, request: PlanRequest) -> SessionResult<Pulse> {
        let session = self.session(id).await?;
        let pulse = request.pulse()?;

        let mut guard = session.lock().await;
        match &mut *guard {
            Session::Open { requests } => {
                requests.push((request, pulse));
                debug!(session = %id, pending = requests.len(), %pulse, "request added");
                Ok(pulse)
            }
            Session::Finalized { .. } => Err(SessionError::SessionClosed(id.to_string())),
        }
    }

    /// Plan every queued request and merge the results.
    ///
    /// The session is closed for writes afterwards; finalizing again
    /// returns the same plan.
    pub async fn finalize_plan(&self, id: &SessionId) -> SessionResult<CrawlPlan> {
        let session = self.session(id).await?;
        let mut guard = session.lock().await;

        let requests = match &*guard {
            Session::Finalized { plan, .. } => return Ok(plan.clone()),
            Session::Open { requests } if requests.is_empty() => {
                return Err(SessionError::EmptySession(id.to_string()));
            }
            Session::Open { requests } => requests,
        };

        let mut parts = Vec::with_capacity(requests.len());
        for (request, pulse) in requests {
            let plan = generate_with(&request.keywords, &request.proxies, pulse, self.strategy)?;
            parts.push((*pulse, plan));
        }
        let count = parts.len();
        let plan = self.policy.merge(parts)?;

        info!(
            session = %id,
            requests = count,
            assignments = plan.len(),
            policy = %self.policy,
            "session finalized"
        );
        *guard = Session::Finalized {
            plan: plan.clone(),
            requests: count,
        };
        Ok(plan)
    }

    /// Drop a session, finalized or not.
    pub async fn close_session(&self, id: &SessionId) -> SessionResult<()> {
        match self.sessions.write().await.remove(id) {
            Some(_) => {
                info!(session = %id, "session closed");
                Ok(())
            }
            None => Err(SessionError::SessionNotFound(id.to_string())),
        }
    }

    pub async fn summary(&self, id: &SessionId) -> SessionResult<SessionSummary> {
        let session = self.session(id).await?;
        let guard = session.lock().await;
        Ok(summarize(id, &guard))
    }

    pub async fn list_sessions(&self) -> Vec<SessionSummary> {
        let sessions: Vec<(SessionId, Arc<Mutex<Session>>)> = self
            .sessions
            .read()
            .await
            .iter()
            .map(|(id, s)| (id.clone(), s.clone()))
            .collect();

        let mut summaries = Vec::with_capacity(sessions.len());
        for (id, session) in sessions {
            let guard = session.lock().await;
            summaries.push(summarize(&id, &guard));
        }
        summaries.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        summaries
    }

    async fn session(&self, id: &SessionId) -> SessionResult<Arc<Mutex<Session>>> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::SessionNotFound(id.to_string()))
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(MergePolicy::default(), FillStrategy::default())
    }
}

fn summarize(id: &SessionId, session: &Session) -> SessionSummary {
    let (requests, finalized) = match session {
        Session::Open { requests } => (requests.len(), false),
        Session::Finalized { requests, .. } => (*requests, true),
    };
    SessionSummary {
        id: id.clone(),
        requests,
        finalized,
    }
}
