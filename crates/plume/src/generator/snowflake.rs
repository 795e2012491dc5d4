use core::time::Duration;
use parking_lot::Mutex;
use std::time::Instant;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::config::clamp_wait_timeout;
use crate::{
    Error, GeneratorConfig, Id, IdGenStatus, Kind, ProcessId, RawSnowflake, Result,
    SequenceCounter, SequenceError, SystemClock, TimeSource, WorkerId,
};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The sequence state lives behind a [`parking_lot::Mutex`] whose critical
/// section covers the clock read, the sequence step and the encode. Waiting
/// for the clock always happens after the guard is released, so a stalled
/// caller never blocks the others.
///
/// Share one generator across threads by wrapping it in an `Arc`. Several
/// generators with distinct `(worker_id, process_id)` pairs may share one
/// clock.
///
/// ```
/// use plume::{GeneratorConfig, SnowflakeGenerator, SystemClock, WorkerId};
///
/// let config = GeneratorConfig::default().with_worker_id(WorkerId::new(1).unwrap());
/// let generator = SnowflakeGenerator::new(&config, SystemClock::default());
///
/// let a = generator.generate().unwrap();
/// let b = generator.generate().unwrap();
/// assert!(a < b);
/// assert_eq!(a.worker_id().get(), 1);
/// ```
pub struct SnowflakeGenerator<T = SystemClock>
where
    T: TimeSource,
{
    worker_id: WorkerId,
    process_id: ProcessId,
    max_clock_skew: u64,
    wait_timeout: Duration,
    state: Mutex<SequenceCounter>,
    time: T,
}

impl<T> SnowflakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator from `config` that reads time from `time`.
    pub fn new(config: &GeneratorConfig, time: T) -> Self {
        Self::resume(config, SequenceCounter::new(), time)
    }

    /// Creates a generator for the given slot with default tolerances.
    pub fn from_components(worker_id: WorkerId, process_id: ProcessId, time: T) -> Self {
        Self::new(&GeneratorConfig::new(worker_id, process_id), time)
    }

    /// Creates a generator that continues from previously persisted sequence
    /// state, so that IDs minted after a restart sort after the old ones.
    pub fn resume(config: &GeneratorConfig, counter: SequenceCounter, time: T) -> Self {
        Self {
            worker_id: config.worker_id,
            process_id: config.process_id,
            max_clock_skew: u64::try_from(config.max_clock_skew.as_millis()).unwrap_or(u64::MAX),
            wait_timeout: clamp_wait_timeout(config.wait_timeout),
            state: Mutex::new(counter),
            time,
        }
    }

    pub const fn worker_id(&self) -> WorkerId {
        self.worker_id
    }

    pub const fn process_id(&self) -> ProcessId {
        self.process_id
    }

    /// A snapshot of the sequence state, suitable for [`Self::resume`].
    pub fn snapshot(&self) -> SequenceCounter {
        *self.state.lock()
    }

    /// Makes exactly one attempt at generating an ID.
    ///
    /// # Returns
    /// - `Ok(IdGenStatus::Ready { id })`: a new ID
    /// - `Ok(IdGenStatus::Pending { yield_until })`: the sequence for the
    ///   current millisecond is exhausted, or the clock stepped back within
    ///   the tolerated skew. Retry once the clock reads `yield_until`.
    ///
    /// # Errors
    /// - [`Error::ClockRegression`] if the clock stepped back further than
    ///   the tolerated skew.
    /// - [`Error::TimestampOverflow`] if the clock is past the 42-bit range.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll(&self) -> Result<IdGenStatus> {
        let mut counter = self.state.lock();
        let now = self.time.current_millis();
        if now > RawSnowflake::MAX_TIMESTAMP {
            return Err(Error::TimestampOverflow { millis: now });
        }

        match counter.next(now) {
            Ok(sequence) => Ok(IdGenStatus::Ready {
                id: RawSnowflake::from_parts(now, self.worker_id, self.process_id, sequence),
            }),
            Err(SequenceError::Exhausted { timestamp }) => Ok(IdGenStatus::Pending {
                yield_until: timestamp + 1,
            }),
            Err(SequenceError::ClockRegression { last, now }) => {
                self.cold_clock_behind(last, now)
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(&self, last: u64, now: u64) -> Result<IdGenStatus> {
        let behind = last - now;
        if behind > self.max_clock_skew {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                last_millis = last,
                now_millis = now,
                behind,
                "clock regression exceeds tolerated skew"
            );
            return Err(Error::ClockRegression {
                last_millis: last,
                now_millis: now,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(behind, "clock behind last timestamp, waiting");
        Ok(IdGenStatus::Pending { yield_until: last })
    }

    /// Generates the next ID, yielding the thread while the generator is
    /// pending.
    ///
    /// # Errors
    /// - Any error from [`Self::try_poll`].
    /// - [`Error::WaitTimeout`] if no ID became available within the
    ///   configured wait timeout.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<RawSnowflake> {
        let started = Instant::now();
        loop {
            match self.try_poll()? {
                IdGenStatus::Ready { id } => return Ok(id),
                IdGenStatus::Pending { yield_until } => {
                    if started.elapsed() >= self.wait_timeout {
                        return Err(Error::WaitTimeout { yield_until });
                    }
                    std::thread::yield_now();
                }
            }
        }
    }

    /// Generates the next ID and wraps it as an [`Id<K>`].
    ///
    /// # Errors
    /// See [`Self::generate`].
    pub fn mint<K: Kind>(&self) -> Result<Id<K>> {
        self.generate().map(Id::from_raw)
    }

    #[cfg(feature = "async-tokio")]
    pub(crate) fn time(&self) -> &T {
        &self.time
    }

    #[cfg(feature = "async-tokio")]
    pub(crate) const fn wait_timeout(&self) -> Duration {
        self.wait_timeout
    }
}

impl<T> core::fmt::Debug for SnowflakeGenerator<T>
where
    T: TimeSource,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SnowflakeGenerator")
            .field("worker_id", &self.worker_id)
            .field("process_id", &self.process_id)
            .field("max_clock_skew", &self.max_clock_skew)
            .field("wait_timeout", &self.wait_timeout)
            .finish_non_exhaustive()
    }
}
