//! Per-posting dependent fetches for dashboards.
//!
//! Items are fetched one after another. A failed fetch records `0` for that
//! posting and moves on; the collector itself cannot fail. Parallelizing
//! this loop requires gathering `(id, outcome)` pairs first and folding them
//! in order, so the default-to-zero rule still applies per key.

use std::collections::BTreeMap;
use std::future::Future;

use crate::error::ApiError;
use crate::types::PostingId;

/// Fetch a count per posting id, sequentially, defaulting failures to zero.
///
/// The result holds one entry per distinct id in `ids`.
pub async fn collect_counts<I, F, Fut>(ids: I, mut fetch: F) -> BTreeMap<PostingId, u64>
where
    I: IntoIterator<Item = PostingId>,
    F: FnMut(PostingId) -> Fut,
    Fut: Future<Output = Result<u64, ApiError>>,
{
    let mut counts = BTreeMap::new();
    for id in ids {
        let count = match fetch(id).await {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!(posting_id = id, error = %err, "count unavailable, defaulting to 0");
                0
            }
        };
        counts.insert(id, count);
    }
    counts
}
