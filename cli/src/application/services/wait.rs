//! Poll a resource until it reaches a lifecycle state.
//!
//! Resource-agnostic: callers pass a closure that fetches the current
//! record. Imports only from `crate::domain`.

use std::future::Future;

use anyhow::Result;
use tokio::time::Instant;

use crate::domain::{CloudError, Lifecycle, LifecycleState, WaitPolicy, is_gone};

/// How a wait ended successfully.
#[derive(Debug)]
pub enum WaitOutcome<T> {
    /// The resource reported the target state.
    Reached(T),
    /// The provider no longer knows the resource. Only produced when the
    /// target state is terminal.
    Gone,
}

/// Polls `fetch` until the resource is in `target`.
///
/// A `404` counts as success when `target` is terminal. While waiting for a
/// non-terminal state, a resource that lands in `FAILED` or a terminal state
/// ends the wait with an error instead of burning the rest of the timeout.
///
/// # Errors
///
/// Returns [`CloudError::Timeout`] when `policy.timeout` elapses, or the
/// first error from `fetch` that is not an acceptable `404`.
pub async fn await_state<T, F, Fut>(
    resource: &str,
    target: &LifecycleState,
    policy: WaitPolicy,
    mut fetch: F,
) -> Result<WaitOutcome<T>>
where
    T: Lifecycle,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let started = Instant::now();
    loop {
        match fetch().await {
            Ok(current) if current.lifecycle_state() == target => {
                tracing::debug!(resource, state = %target, "target state reached");
                return Ok(WaitOutcome::Reached(current));
            }
            Ok(current) => {
                let state = current.lifecycle_state();
                if !target.is_terminal()
                    && (state.is_terminal() || *state == LifecycleState::Failed)
                {
                    anyhow::bail!("{resource} entered {state} while waiting for {target}");
                }
                tracing::debug!(resource, %state, target = %target, "still waiting");
            }
            Err(e) if target.is_terminal() && is_gone(&e) => {
                tracing::debug!(resource, "resource no longer exists");
                return Ok(WaitOutcome::Gone);
            }
            Err(e) => return Err(e.context(format!("polling {resource}"))),
        }

        let waited = started.elapsed();
        if waited >= policy.timeout {
            return Err(CloudError::Timeout {
                resource: resource.to_string(),
                target: target.clone(),
                waited,
            }
            .into());
        }
        tokio::time::sleep(policy.interval.min(policy.timeout - waited)).await;
    }
}

/// Issues a delete and waits for the resource to reach `TERMINATED`.
///
/// A `404` from either the delete call or the poll means the resource is
/// already gone, which is success.
///
/// # Errors
///
/// Propagates any other delete or poll error, or a timeout.
pub async fn delete_and_wait<T, D, DFut, F, FFut>(
    resource: &str,
    policy: WaitPolicy,
    delete: D,
    fetch: F,
) -> Result<()>
where
    T: Lifecycle,
    D: FnOnce() -> DFut,
    DFut: Future<Output = Result<()>>,
    F: FnMut() -> FFut,
    FFut: Future<Output = Result<T>>,
{
    match delete().await {
        Ok(()) => {}
        Err(e) if is_gone(&e) => {
            tracing::debug!(resource, "already deleted");
            return Ok(());
        }
        Err(e) => return Err(e.context(format!("deleting {resource}"))),
    }
    await_state(resource, &LifecycleState::Terminated, policy, fetch).await?;
    Ok(())
}
