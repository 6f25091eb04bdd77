//! Chunked concurrent execution for rate-limited remote services.
//!
//! Each chunk's futures run concurrently and are joined before the
//! next chunk starts, with an optional pause in between. Outputs come
//! back in input order, so batching only changes the latency and load
//! profile of a pipeline run, never its result.

use futures_util::future::join_all;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Applies `f` to every item, at most `batch_size` concurrently.
/// `batch_size == 0` fires everything at once.
pub async fn run_batched<'a, T, R, Fut, F>(
    items: &'a [T],
    batch_size: usize,
    batch_delay: Duration,
    f: F,
) -> Vec<R>
where
    F: Fn(&'a T) -> Fut,
    Fut: Future<Output = R>,
{
    let chunk_size = if batch_size == 0 {
        items.len().max(1)
    } else {
        batch_size
    };

    let mut outputs = Vec::with_capacity(items.len());
    let mut chunks = items.chunks(chunk_size).peekable();
    while let Some(chunk) = chunks.next() {
        outputs.extend(join_all(chunk.iter().map(&f)).await);
        if chunks.peek().is_some() && !batch_delay.is_zero() {
            sleep(batch_delay).await;
        }
    }
    outputs
}
