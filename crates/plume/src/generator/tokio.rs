use core::{future::Future, time::Duration};
use std::time::Instant;

use crate::{Error, Id, IdGenStatus, Kind, RawSnowflake, Result, SnowflakeGenerator, TimeSource};

/// How an async generation call sleeps while the generator is pending.
pub trait SleepProvider {
    /// `Send` so the generating future can move between runtime threads.
    type Sleep: Future<Output = ()> + Send;

    fn sleep_for(dur: Duration) -> Self::Sleep;
}

/// An implementation of [`SleepProvider`] using Tokio's timer.
pub struct TokioSleep;

impl SleepProvider for TokioSleep {
    type Sleep = tokio::time::Sleep;

    fn sleep_for(dur: Duration) -> Self::Sleep {
        tokio::time::sleep(dur)
    }
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Generates the next ID without blocking the runtime thread.
    ///
    /// While the generator is pending, the task sleeps with `S` until the
    /// clock should have reached `yield_until`.
    ///
    /// # Errors
    /// Same as [`SnowflakeGenerator::generate`].
    ///
    /// # Example
    /// ```
    /// use plume::{GeneratorConfig, SnowflakeGenerator, SystemClock, TokioSleep};
    ///
    /// #[tokio::main(flavor = "current_thread")]
    /// async fn main() {
    ///     let config = GeneratorConfig::default();
    ///     let generator = SnowflakeGenerator::new(&config, SystemClock::default());
    ///     let id = generator.generate_async::<TokioSleep>().await.unwrap();
    ///     assert_eq!(id.worker_id().get(), 0);
    /// }
    /// ```
    pub async fn generate_async<S>(&self) -> Result<RawSnowflake>
    where
        S: SleepProvider,
    {
        let started = Instant::now();
        loop {
            let yield_until = match self.try_poll()? {
                IdGenStatus::Ready { id } => return Ok(id),
                IdGenStatus::Pending { yield_until } => yield_until,
            };
            if started.elapsed() >= self.wait_timeout() {
                return Err(Error::WaitTimeout { yield_until });
            }
            let behind = yield_until.saturating_sub(self.time().current_millis());
            S::sleep_for(Duration::from_millis(behind.max(1))).await;
        }
    }

    /// Async counterpart of [`SnowflakeGenerator::mint`].
    ///
    /// # Errors
    /// Same as [`SnowflakeGenerator::generate`].
    pub async fn mint_async<K, S>(&self) -> Result<Id<K>>
    where
        K: Kind,
        S: SleepProvider,
    {
        self.generate_async::<S>().await.map(Id::from_raw)
    }
}
