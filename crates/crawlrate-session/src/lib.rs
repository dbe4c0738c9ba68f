//! crawlrate-session: merging several plan requests into one plan.
//!
//! Callers open a session, add any number of duration or connection
//! requests to it, then finalize it into a single `CrawlPlan`. Each
//! request is planned independently by `crawlrate-placement`; the
//! per-request plans are then combined by a `MergePolicy`.
//!
//! # Architecture
//!
//! ```text
//! SessionStore
//!   └── RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>
//!         ├── Open { requests }     (one writer at a time)
//!         └── Finalized { plan }    (read-only, cloned out)
//! ```

pub mod error;
pub mod merge;
pub mod session;

pub use error::{SessionError, SessionResult};
pub use merge::MergePolicy;
pub use session::{PlanRequest, SessionId, SessionStore, SessionSummary};
