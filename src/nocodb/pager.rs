//! Offset/limit pagination over a [`RecordSource`].
//!
//! Pages are requested strictly in order, one at a time. Stop conditions, in
//! priority order:
//! 1. empty page
//! 2. `pageInfo.isLastPage == true`
//! 3. short page (fewer rows than requested)
//! 4. safety ceiling on accumulated rows (logged as a warning, not an error)

use crate::error::{ConfigError, SyncError};
use crate::nocodb::client::{PageRequest, RecordSource};
use crate::types::RawRecord;

/// Hard ceiling on accumulated rows for a single fetch.
pub const SAFETY_ROW_LIMIT: usize = 10_000;

/// Why pagination ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EmptyPage,
    LastPageFlag,
    ShortPage,
    SafetyLimit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    pub records: Vec<RawRecord>,
    pub pages_requested: usize,
    pub stop_reason: StopReason,
}

impl FetchOutcome {
    /// The upstream never signalled completion; the dataset may be truncated.
    pub fn hit_safety_limit(&self) -> bool {
        self.stop_reason == StopReason::SafetyLimit
    }
}

/// Fetch every row from `source` using the default safety ceiling.
pub async fn fetch_all(
    source: &dyn RecordSource,
    page_size: usize,
) -> Result<FetchOutcome, SyncError> {
    fetch_all_with_limit(source, page_size, SAFETY_ROW_LIMIT).await
}

/// Fetch every row from `source`, stopping once `max_rows` have accumulated.
///
/// Any failed page aborts the fetch; rows from earlier pages are discarded.
pub async fn fetch_all_with_limit(
    source: &dyn RecordSource,
    page_size: usize,
    max_rows: usize,
) -> Result<FetchOutcome, SyncError> {
    if page_size == 0 {
        return Err(ConfigError::ZeroPageSize.into());
    }

    let mut records: Vec<RawRecord> = Vec::new();
    let mut offset = 0usize;
    let mut page = 1usize;

    log::info!(
        "Lead fetch: starting ({}, page size {})",
        source.describe(),
        page_size
    );

    let stop_reason = loop {
        let result = source
            .fetch_page(PageRequest {
                offset,
                limit: page_size,
            })
            .await?;

        let rows = result.list.len();
        let is_last_page = result.is_last_page();
        log::debug!(
            "Lead fetch: page {} (offset {}): {} rows",
            page,
            offset,
            rows
        );
        if let Some(info) = &result.page_info {
            if let Some(total) = info.total_rows {
                log::debug!(
                    "Lead fetch: meta totalRows={}, isLastPage={:?}",
                    total,
                    info.is_last_page
                );
            }
        }

        records.extend(result.list);

        if rows == 0 {
            break StopReason::EmptyPage;
        }
        if is_last_page {
            break StopReason::LastPageFlag;
        }
        if rows < page_size {
            break StopReason::ShortPage;
        }
        if records.len() >= max_rows {
            log::warn!(
                "Lead fetch: safety limit of {} rows reached after {} pages; upstream never signalled the last page",
                max_rows,
                page
            );
            break StopReason::SafetyLimit;
        }

        offset += page_size;
        page += 1;
    };

    log::info!(
        "Lead fetch: done, {} rows in {} pages ({:?})",
        records.len(),
        page,
        stop_reason
    );

    Ok(FetchOutcome {
        records,
        pages_requested: page,
        stop_reason,
    })
}
