//! Adapters around external time-ordered 64-bit ID generators.
//!
//! Both generators encode a millisecond-ish timestamp, a node identifier and
//! a per-tick sequence; their bit layouts belong to the upstream crates.
//! The adapters only add construction-time validation and turn every
//! failure into an [`IdError`].

use std::sync::{Mutex, PoisonError};

use snowflake::SnowflakeIdGenerator;
use sonyflake::Sonyflake;
use tracing::{debug, warn};

use crate::IdError;

/// Largest worker id accepted by [`SnowflakeSource`] (10 bits).
pub const MAX_WORKER_ID: i64 = 1023;

const NODE_BITS: i64 = 5;
const NODE_MASK: i64 = (1 << NODE_BITS) - 1;

/// A source of unique, time-ordered 64-bit IDs.
pub trait ExternalGenerator: Send + Sync {
    /// Short name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Returns the next ID.
    fn next_id(&self) -> Result<u64, IdError>;
}

/// Sonyflake: 39 bits of 10ms ticks, 8 bits of sequence, 16 bits of
/// machine id.
///
/// At most 256 IDs are issued per 10ms tick; callers beyond that rate wait
/// for the next tick inside [`next_id`](ExternalGenerator::next_id).
///
/// `Sonyflake` synchronizes internally; the source holds no lock of its own.
pub struct SonyflakeSource {
    inner: Sonyflake,
    machine_id: Option<u16>,
}

impl SonyflakeSource {
    const NAME: &'static str = "sonyflake";

    /// Builds a generator whose machine id is the lower 16 bits of the
    /// host's private IPv4 address.
    ///
    /// Fails on hosts without a private IPv4 address.
    pub fn new() -> Result<Self, IdError> {
        let inner = Sonyflake::new().map_err(|e| Self::init_error(&e))?;
        debug!(generator = Self::NAME, "Generator initialized from host address");
        Ok(Self {
            inner,
            machine_id: None,
        })
    }

    /// Builds a generator with an explicit machine id.
    pub fn with_machine_id(machine_id: u16) -> Result<Self, IdError> {
        let machine_id_fn = move || -> Result<u16, Box<dyn std::error::Error + Send + Sync>> {
            Ok(machine_id)
        };
        let inner = Sonyflake::builder()
            .machine_id(&machine_id_fn)
            .finalize()
            .map_err(|e| Self::init_error(&e))?;
        debug!(generator = Self::NAME, machine_id, "Generator initialized");
        Ok(Self {
            inner,
            machine_id: Some(machine_id),
        })
    }

    /// The explicit machine id, if one was given.
    #[must_use]
    pub const fn machine_id(&self) -> Option<u16> {
        self.machine_id
    }

    fn init_error(err: &sonyflake::Error) -> IdError {
        warn!(generator = Self::NAME, error = %err, "Generator construction failed");
        IdError::GeneratorInit {
            generator: Self::NAME,
            message: err.to_string(),
        }
    }
}

impl ExternalGenerator for SonyflakeSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn next_id(&self) -> Result<u64, IdError> {
        self.inner.next_id().map_err(|e| {
            warn!(generator = Self::NAME, error = %e, "Generator failed");
            IdError::GeneratorFailed {
                generator: Self::NAME,
                message: e.to_string(),
            }
        })
    }
}

/// Snowflake: millisecond timestamp, 10 bits of worker id and 12 bits of
/// sequence.
///
/// The worker id is split into the generator's 5-bit machine and node
/// fields (`worker >> 5`, `worker & 31`).
pub struct SnowflakeSource {
    inner: Mutex<SnowflakeIdGenerator>,
    worker_id: i64,
}

impl SnowflakeSource {
    const NAME: &'static str = "snowflake";

    /// Builds a generator for `worker_id`, which must be in `0..=1023`.
    pub fn new(worker_id: i64) -> Result<Self, IdError> {
        if !(0..=MAX_WORKER_ID).contains(&worker_id) {
            warn!(generator = Self::NAME, worker_id, "Worker id out of range");
            return Err(IdError::NodeIdOutOfRange {
                worker_id,
                max: MAX_WORKER_ID,
            });
        }

        // Both halves fit in 5 bits after the range check.
        let machine_id = (worker_id >> NODE_BITS) as i32;
        let node_id = (worker_id & NODE_MASK) as i32;
        let inner = SnowflakeIdGenerator::new(machine_id, node_id);
        debug!(generator = Self::NAME, worker_id, "Generator initialized");

        Ok(Self {
            inner: Mutex::new(inner),
            worker_id,
        })
    }

    #[must_use]
    pub const fn worker_id(&self) -> i64 {
        self.worker_id
    }
}

impl ExternalGenerator for SnowflakeSource {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn next_id(&self) -> Result<u64, IdError> {
        let raw = {
            let mut generator = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
            generator.generate()
        };
        u64::try_from(raw).map_err(|_| IdError::GeneratorFailed {
            generator: Self::NAME,
            message: format!("negative id {raw}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_snowflake_rejects_out_of_range_worker() {
        for worker_id in [-1, MAX_WORKER_ID + 1, i64::MAX] {
            let err = SnowflakeSource::new(worker_id).err().unwrap();
            assert_eq!(
                err,
                IdError::NodeIdOutOfRange {
                    worker_id,
                    max: MAX_WORKER_ID
                }
            );
        }
    }

    #[test]
    fn test_snowflake_accepts_range_bounds() {
        assert_eq!(SnowflakeSource::new(0).unwrap().worker_id(), 0);
        assert_eq!(
            SnowflakeSource::new(MAX_WORKER_ID).unwrap().worker_id(),
            MAX_WORKER_ID
        );
    }

    #[test]
    fn test_snowflake_ids_increase() {
        let source = SnowflakeSource::new(1).unwrap();
        let mut prev = source.next_id().unwrap();
        for _ in 0..10_000 {
            let next = source.next_id().unwrap();
            assert!(next > prev);
            prev = next;
        }
    }

    #[test]
    fn test_distinct_workers_distinct_ids() {
        let a = SnowflakeSource::new(1).unwrap();
        let b = SnowflakeSource::new(2).unwrap();
        let mut seen = HashSet::new();
        for _ in 0..1000 {
            assert!(seen.insert(a.next_id().unwrap()));
            assert!(seen.insert(b.next_id().unwrap()));
        }
    }

    #[test]
    fn test_sonyflake_with_machine_id() {
        let source = SonyflakeSource::with_machine_id(7).unwrap();
        assert_eq!(source.machine_id(), Some(7));
        assert_eq!(source.name(), "sonyflake");
        let first = source.next_id().unwrap();
        let second = source.next_id().unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_sonyflake_shared_across_threads() {
        let source = Arc::new(SonyflakeSource::with_machine_id(3).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let source = Arc::clone(&source);
                thread::spawn(move || {
                    (0..200)
                        .map(|_| source.next_id().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 800);
    }
}
