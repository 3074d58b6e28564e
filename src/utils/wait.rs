use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use tokio::time::{sleep_until, timeout_at, Instant};

/// Poll `probe` until it yields `Some`, or the timeout passes
///
/// A probe still in flight at the deadline is abandoned. `Ok(None)` means
/// timed out; probe errors are returned as is.
pub async fn poll_until<T, F, Fut>(timeout: Duration, interval: Duration, mut probe: F) -> Result<Option<T>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        match timeout_at(deadline, probe()).await {
            Ok(Ok(Some(value))) => return Ok(Some(value)),
            Ok(Ok(None)) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Ok(None),
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }
        // the probe after the last sleep runs right at the deadline
        sleep_until((now + interval).min(deadline)).await;
    }
}
