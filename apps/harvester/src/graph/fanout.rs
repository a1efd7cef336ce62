//! Concurrent per-record enrichment with order-preserving reassembly.

use std::future::Future;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::error;

/// Runs `task` over every input concurrently on the Tokio runtime and returns
/// the outputs in input order, whatever order the tasks finish in.
///
/// A task that panics leaves `None` in its slot; its siblings are unaffected.
pub async fn fan_out<I, O, F, Fut>(inputs: Vec<I>, task: F) -> Vec<Option<O>>
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = O> + Send + 'static,
{
    let task = Arc::new(task);
    let mut slots: Vec<Option<O>> = (0..inputs.len()).map(|_| None).collect();
    let mut join_set = JoinSet::new();

    for (idx, input) in inputs.into_iter().enumerate() {
        let task = Arc::clone(&task);
        join_set.spawn(async move { (idx, task(input).await) });
    }

    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((idx, output)) => slots[idx] = Some(output),
            Err(e) => error!("Enrichment task failed: {e}"),
        }
    }

    slots
}
