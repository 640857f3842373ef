//! Leadboard: mirrors a NocoDB leads table and computes SDR outreach analytics.
//!
//! Flow per cycle: `nocodb::pager` pulls every raw row, `normalize` maps rows
//! onto [`types::Lead`], `metrics` derives the dashboard views, and
//! `snapshot` bundles the result. `state` + `nocodb::poller` keep the last
//! good snapshot fresh.

pub mod error;
pub mod metrics;
pub mod nocodb;
pub mod normalize;
pub mod snapshot;
pub mod state;
pub mod types;

pub use error::{ConfigError, SyncError, SyncErrorPayload, UpstreamError};
pub use snapshot::{build_snapshot, get_leads_snapshot, LeadsSnapshot};
pub use types::{Lead, LeadStatus, RawRecord, ReplyType};
