//! # ordo-id
//!
//! Collision-resistant, sortable identifiers for orders and resources,
//! generated in-process without coordinating with any external service.
//!
//! ## Strategies
//!
//! | Strategy    | Example                        |
//! |-------------|--------------------------------|
//! | `random`    | `PT202506041234560427`         |
//! | `counter`   | `PT2025060412345617`           |
//! | `tenant`    | `20250604123456M000045671234`  |
//! | `sonyflake` | `ORD587891094460957697`        |
//! | `snowflake` | `ORD7339221469346279424`       |
//!
//! Only the generator-backed strategies can fail; see [`Strategy`] for the
//! collision behaviour of each.
//!
//! ## Resource IDs
//!
//! `{kind}-{code}` identifiers derived from row counters, e.g. `user-k3x9qa`.
//! Typed kinds are declared with [`define_resource_id!`].
//!
//! ```
//! use ordo_id::{GenerateContext, IdConfig, IdService, Strategy};
//!
//! let service = IdService::from_config(&IdConfig::default()).unwrap();
//! let id = service
//!     .generate(Strategy::Counter, &GenerateContext::with_prefix("PT"))
//!     .unwrap();
//! assert!(id.starts_with("PT"));
//! ```

mod clock;
mod code;
mod config;
mod counter;
mod error;
mod external;
mod macros;
mod random;
mod resource;
mod service;
mod strategy;
mod tenant;
mod timestamp;

pub use clock::{Clock, FixedClock, SystemClock};
pub use code::{CodeEncoder, DEFAULT_CHARSET, DEFAULT_CODE_LENGTH};
pub use config::{IdConfig, SnowflakeConfig, SonyflakeConfig};
pub use counter::{MonotonicCounter, DEFAULT_WRAP_LIMIT};
pub use error::IdError;
pub use external::{ExternalGenerator, SnowflakeSource, SonyflakeSource, MAX_WORKER_ID};
pub use random::{RandomSource, RandomSuffix, SeededRandom, ThreadRandom, MAX_RANDOM_WIDTH};
pub use resource::{split_resource_id, OrderId, ResourceKind, UserId};
pub use service::{IdService, IdServiceBuilder};
pub use strategy::{GenerateContext, Strategy};
pub use tenant::{TenantEncoder, DEFAULT_TENANT_WIDTH, MAX_TENANT_WIDTH};
pub use timestamp::{TimeFormatter, TIMESTAMP_WIDTH};
