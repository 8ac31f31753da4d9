//! smol backend.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::{self, Either};

use super::TimedOut;

/// Handle to a task running on smol. Always resolves to `Some`.
///
/// Dropping the handle cancels the task.
pub struct JoinHandle<T>(smol::Task<T>);

impl<T> Future for JoinHandle<T> {
    type Output = Option<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.0).poll(cx).map(Some)
    }
}

pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    JoinHandle(smol::spawn(future))
}

pub(super) type InstantInner = std::time::Instant;

pub(super) async fn sleep_impl(duration: Duration) {
    smol::Timer::after(duration).await;
}

pub(super) async fn timeout_impl<F, T>(duration: Duration, future: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    let timer = smol::Timer::after(duration);
    futures::pin_mut!(future);

    match future::select(future, timer).await {
        Either::Left((result, _)) => Ok(result),
        Either::Right(_) => Err(TimedOut),
    }
}
