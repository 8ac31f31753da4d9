//! Runtime-agnostic async helpers.
//!
//! Platform setup needs a timeout around the session calls, lights hand the
//! host boxed futures, and hosts need somewhere to run scheduled refreshes.
//! One backend is compiled in, picked by feature flag:
//!
//! - `runtime-tokio` (default)
//! - `runtime-async-std`
//! - `runtime-smol`
//!
//! ```toml
//! [dependencies]
//! casambi-lights-rs = { version = "0.1", default-features = false, features = ["runtime-smol"] }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

#[cfg(feature = "runtime-tokio")]
mod tokio_impl;
#[cfg(feature = "runtime-tokio")]
use tokio_impl as backend;

#[cfg(feature = "runtime-async-std")]
mod async_std_impl;
#[cfg(feature = "runtime-async-std")]
use async_std_impl as backend;

#[cfg(feature = "runtime-smol")]
mod smol_impl;
#[cfg(feature = "runtime-smol")]
use smol_impl as backend;

pub use backend::{JoinHandle, spawn};

/// Future returned by [`crate::LightEntity`] methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub async fn sleep(duration: Duration) {
    backend::sleep_impl(duration).await
}

/// Run `future`, giving up after `duration`.
pub async fn timeout<F, T>(duration: Duration, future: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    backend::timeout_impl(duration, future).await
}

/// Error returned when a timeout expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation timed out")]
pub struct TimedOut;

/// Monotonic clock of the active runtime; follows tokio's paused clock in tests.
#[derive(Debug, Clone, Copy)]
pub struct Instant(backend::InstantInner);

impl Instant {
    pub fn now() -> Self {
        Instant(backend::InstantInner::now())
    }

    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

#[cfg(not(any(
    feature = "runtime-tokio",
    feature = "runtime-async-std",
    feature = "runtime-smol"
)))]
compile_error!(
    "One of \"runtime-tokio\", \"runtime-async-std\", or \"runtime-smol\" features must be enabled"
);

#[cfg(all(feature = "runtime-tokio", feature = "runtime-async-std"))]
compile_error!("Features \"runtime-tokio\" and \"runtime-async-std\" are mutually exclusive");

#[cfg(all(feature = "runtime-tokio", feature = "runtime-smol"))]
compile_error!("Features \"runtime-tokio\" and \"runtime-smol\" are mutually exclusive");

#[cfg(all(feature = "runtime-async-std", feature = "runtime-smol"))]
compile_error!("Features \"runtime-async-std\" and \"runtime-smol\" are mutually exclusive");

#[cfg(all(test, feature = "runtime-tokio"))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_expires() {
        let result = timeout(Duration::from_millis(10), sleep(Duration::from_secs(5))).await;
        assert_eq!(result, Err(TimedOut));
    }

    #[tokio::test]
    async fn test_timeout_completes() {
        let result = timeout(Duration::from_secs(5), async { 7 }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn test_spawn_returns_value() {
        let handle = spawn(async { "refreshed" });
        assert_eq!(handle.await, Some("refreshed"));
    }

    #[tokio::test]
    async fn test_spawn_panic_resolves_to_none() {
        let handle = spawn(async { panic!("refresh failed") });
        assert_eq!(handle.await, None::<()>);
    }

    #[tokio::test(start_paused = true)]
    async fn test_instant_follows_runtime_clock() {
        let start = Instant::now();
        sleep(Duration::from_secs(30)).await;
        assert!(start.elapsed() >= Duration::from_secs(30));
    }
}
