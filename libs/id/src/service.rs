//! The ID generation service.
//!
//! An [`IdService`] owns everything a strategy touches: the wraparound
//! counter, the clock, the random source, and the long-lived external
//! generators. Build one per process (or per test) and share it behind an
//! `Arc`; every method takes `&self`.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::code::{CodeEncoder, DEFAULT_CHARSET};
use crate::config::IdConfig;
use crate::counter::MonotonicCounter;
use crate::external::{ExternalGenerator, SnowflakeSource, SonyflakeSource};
use crate::random::{RandomSource, RandomSuffix, ThreadRandom};
use crate::resource::ResourceKind;
use crate::strategy::{GenerateContext, Strategy};
use crate::tenant::TenantEncoder;
use crate::timestamp::TimeFormatter;
use crate::IdError;

/// Digits of the nanosecond fragment in tenant IDs.
const NANO_FRAGMENT_WIDTH: usize = 4;

/// Digits of the random part in tenant IDs.
const TENANT_RANDOM_WIDTH: u32 = 4;

/// Generates IDs with any [`Strategy`].
pub struct IdService {
    counter: MonotonicCounter,
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
    formatter: TimeFormatter,
    random_suffix: RandomSuffix,
    tenant_suffix: RandomSuffix,
    tenant: TenantEncoder,
    sonyflake: Option<Arc<dyn ExternalGenerator>>,
    snowflake: Option<Arc<dyn ExternalGenerator>>,
    code_encoder: CodeEncoder,
}

impl IdService {
    /// Starts building a service from the default configuration.
    #[must_use]
    pub fn builder() -> IdServiceBuilder {
        IdServiceBuilder::default()
    }

    /// Builds a service from `config` with the system clock and thread RNG.
    pub fn from_config(config: &IdConfig) -> Result<Self, IdError> {
        Self::builder().config(config.clone()).build()
    }

    /// Generates an ID with `strategy`.
    ///
    /// Only [`Strategy::Sonyflake`] and [`Strategy::Snowflake`] can fail.
    pub fn generate(&self, strategy: Strategy, ctx: &GenerateContext<'_>) -> Result<String, IdError> {
        match strategy {
            Strategy::Random => Ok(self.random_id(ctx.prefix, ctx.at)),
            Strategy::Counter => Ok(self.counter_id(ctx.prefix, ctx.at)),
            Strategy::Tenant => Ok(self.compose_tenant(
                ctx.prefix,
                ctx.tenant_id.unwrap_or_default(),
                ctx.at,
            )),
            Strategy::Sonyflake => self.sonyflake_id(ctx.prefix),
            Strategy::Snowflake => self.snowflake_id(ctx.prefix),
        }
    }

    /// `prefix + timestamp(14) + random digits` (4 by default).
    #[must_use]
    pub fn random_id(&self, prefix: &str, at: Option<DateTime<Utc>>) -> String {
        let timestamp = self.formatter.format(&self.instant(at));
        let suffix = self.random_suffix.generate(self.random.as_ref());
        format!("{prefix}{timestamp}{suffix}")
    }

    /// `prefix + timestamp(14) + counter`, the counter unpadded.
    #[must_use]
    pub fn counter_id(&self, prefix: &str, at: Option<DateTime<Utc>>) -> String {
        let timestamp = self.formatter.format(&self.instant(at));
        let index = self.counter.increase();
        format!("{prefix}{timestamp}{index}")
    }

    /// `timestamp(14) + tenant(5) + nanos(4) + random(4)`, stamped now.
    #[must_use]
    pub fn tenant_id(&self, tenant_id: &str) -> String {
        self.compose_tenant("", tenant_id, None)
    }

    /// `prefix + sonyflake id`.
    pub fn sonyflake_id(&self, prefix: &str) -> Result<String, IdError> {
        Self::external_id(self.sonyflake.as_deref(), Strategy::Sonyflake, prefix)
    }

    /// `prefix + snowflake id` from the configured worker.
    pub fn snowflake_id(&self, prefix: &str) -> Result<String, IdError> {
        Self::external_id(self.snowflake.as_deref(), Strategy::Snowflake, prefix)
    }

    /// `{kind}-{code}` for a row counter, using the configured salt.
    #[must_use]
    pub fn resource_id(&self, kind: &ResourceKind, counter: u64) -> String {
        kind.new_id(counter, &self.code_encoder)
    }

    /// The encoder behind [`resource_id`](Self::resource_id).
    #[must_use]
    pub fn code_encoder(&self) -> &CodeEncoder {
        &self.code_encoder
    }

    /// The counter behind the counter strategy.
    #[must_use]
    pub fn counter(&self) -> &MonotonicCounter {
        &self.counter
    }

    /// Returns true if `strategy` can be used with this service.
    #[must_use]
    pub fn supports(&self, strategy: Strategy) -> bool {
        match strategy {
            Strategy::Sonyflake => self.sonyflake.is_some(),
            Strategy::Snowflake => self.snowflake.is_some(),
            _ => true,
        }
    }

    fn instant(&self, at: Option<DateTime<Utc>>) -> DateTime<Utc> {
        at.unwrap_or_else(|| self.clock.now())
    }

    fn compose_tenant(&self, prefix: &str, tenant_id: &str, at: Option<DateTime<Utc>>) -> String {
        let at = self.instant(at);
        let timestamp = self.formatter.format(&at);
        let tenant = self.tenant.encode(tenant_id);
        let nanos = format!("{:06}", at.timestamp_subsec_nanos() % 1_000_000);
        let random = self.tenant_suffix.generate(self.random.as_ref());
        format!(
            "{prefix}{timestamp}{tenant}{}{random}",
            &nanos[..NANO_FRAGMENT_WIDTH]
        )
    }

    fn external_id(
        generator: Option<&dyn ExternalGenerator>,
        strategy: Strategy,
        prefix: &str,
    ) -> Result<String, IdError> {
        let generator = generator.ok_or(IdError::GeneratorNotConfigured(strategy))?;
        let id = generator.next_id()?;
        Ok(format!("{prefix}{id}"))
    }
}

impl fmt::Debug for IdService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdService")
            .field("counter", &self.counter)
            .field("formatter", &self.formatter)
            .field("random_suffix", &self.random_suffix)
            .field("tenant", &self.tenant)
            .field("sonyflake", &self.sonyflake.as_ref().map(|g| g.name()))
            .field("snowflake", &self.snowflake.as_ref().map(|g| g.name()))
            .field("code_encoder", &self.code_encoder)
            .finish_non_exhaustive()
    }
}

/// Builder for [`IdService`].
///
/// Injected clocks, random sources and generators take precedence over
/// the configuration.
#[derive(Default)]
pub struct IdServiceBuilder {
    config: IdConfig,
    clock: Option<Arc<dyn Clock>>,
    random: Option<Arc<dyn RandomSource>>,
    sonyflake: Option<Arc<dyn ExternalGenerator>>,
    snowflake: Option<Arc<dyn ExternalGenerator>>,
}

impl IdServiceBuilder {
    /// Uses `config` instead of [`IdConfig::default`].
    #[must_use]
    pub fn config(mut self, config: IdConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses `clock` instead of the system clock.
    #[must_use]
    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Uses `random` instead of the thread RNG.
    #[must_use]
    pub fn random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Some(Arc::new(random));
        self
    }

    /// Uses `generator` for the sonyflake strategy, ignoring
    /// [`IdConfig::sonyflake`].
    #[must_use]
    pub fn sonyflake(mut self, generator: impl ExternalGenerator + 'static) -> Self {
        self.sonyflake = Some(Arc::new(generator));
        self
    }

    /// Uses `generator` for the snowflake strategy, ignoring
    /// [`IdConfig::snowflake`].
    #[must_use]
    pub fn snowflake(mut self, generator: impl ExternalGenerator + 'static) -> Self {
        self.snowflake = Some(Arc::new(generator));
        self
    }

    /// Validates the configuration and constructs the external generators.
    pub fn build(self) -> Result<IdService, IdError> {
        let config = self.config;
        config.validate()?;

        let sonyflake = match (self.sonyflake, config.sonyflake) {
            (Some(injected), _) => Some(injected),
            (None, Some(sf)) => {
                let source = match sf.machine_id {
                    Some(machine_id) => SonyflakeSource::with_machine_id(machine_id)?,
                    None => SonyflakeSource::new()?,
                };
                Some(Arc::new(source) as Arc<dyn ExternalGenerator>)
            }
            (None, None) => None,
        };

        let snowflake = match (self.snowflake, config.snowflake) {
            (Some(injected), _) => Some(injected),
            (None, Some(sf)) => {
                Some(Arc::new(SnowflakeSource::new(sf.worker_id)?) as Arc<dyn ExternalGenerator>)
            }
            (None, None) => None,
        };

        let code_encoder = CodeEncoder::new(
            DEFAULT_CHARSET,
            config.resource_code_length,
            config.resource_salt,
        )?;

        debug!(
            counter_wrap = config.counter_wrap,
            random_width = config.random_width,
            tenant_width = config.tenant_width,
            sonyflake = sonyflake.is_some(),
            snowflake = snowflake.is_some(),
            "ID service built"
        );

        Ok(IdService {
            counter: MonotonicCounter::with_limit(config.counter_wrap),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            random: self.random.unwrap_or_else(|| Arc::new(ThreadRandom)),
            formatter: config.time_formatter()?,
            random_suffix: RandomSuffix::new(config.random_width),
            tenant_suffix: RandomSuffix::new(TENANT_RANDOM_WIDTH),
            tenant: TenantEncoder::new(config.tenant_width),
            sonyflake,
            snowflake,
            code_encoder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::{SnowflakeConfig, SonyflakeConfig};
    use crate::random::SeededRandom;
    use chrono::TimeZone;
    use std::collections::HashSet;

    fn fixed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 4, 12, 34, 56).unwrap()
            + chrono::Duration::nanoseconds(123_456_789)
    }

    fn utc_service() -> IdService {
        IdService::builder()
            .config(IdConfig {
                utc_offset_secs: Some(0),
                ..IdConfig::default()
            })
            .clock(FixedClock::new(fixed_instant()))
            .random(SeededRandom::new(1))
            .build()
            .unwrap()
    }

    fn is_digits(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }

    struct FailingGenerator;

    impl ExternalGenerator for FailingGenerator {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn next_id(&self) -> Result<u64, IdError> {
            Err(IdError::GeneratorFailed {
                generator: "failing",
                message: "over time limit".to_string(),
            })
        }
    }

    #[test]
    fn test_service_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<IdService>();
    }

    #[test]
    fn test_debug_names_generators() {
        let service = IdService::builder()
            .snowflake(FailingGenerator)
            .build()
            .unwrap();
        let debug = format!("{service:?}");
        assert!(debug.starts_with("IdService"));
        assert!(debug.contains("snowflake: Some(\"failing\")"));
        assert!(debug.contains("sonyflake: None"));
    }

    #[test]
    fn test_random_id_layout() {
        let service = utc_service();
        let id = service.random_id("PT", None);
        assert_eq!(id.len(), "PT".len() + 14 + 4);
        assert!(id.starts_with("PT20250604123456"));
        assert!(is_digits(&id[2..]));
    }

    #[test]
    fn test_random_id_explicit_instant() {
        let service = utc_service();
        let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let id = service.random_id("", Some(at));
        assert!(id.starts_with("20240102030405"));
    }

    #[test]
    fn test_counter_id_layout() {
        let service = utc_service();
        assert_eq!(service.counter_id("PT", None), "PT202506041234560");
        assert_eq!(service.counter_id("PT", None), "PT202506041234561");
    }

    #[test]
    fn test_counter_ids_distinct_within_window() {
        let service = utc_service();
        let ids: HashSet<String> = (0..1000).map(|_| service.counter_id("PT", None)).collect();
        assert_eq!(ids.len(), 1000);
        // The window is exhausted; the next ID repeats the first.
        assert!(ids.contains(&service.counter_id("PT", None)));
    }

    #[test]
    fn test_tenant_id_layout() {
        let service = utc_service();
        let id = service.tenant_id("M");
        assert_eq!(id.len(), 14 + 5 + 8);
        assert!(id.starts_with("20250604123456M0000"));
        // 123_456_789 % 1_000_000 = 456789, first four digits
        assert_eq!(&id[19..23], "4567");
        assert!(is_digits(&id[id.len() - 6..]));
    }

    #[test]
    fn test_tenant_strategy_with_prefix() {
        let service = utc_service();
        let ctx = GenerateContext::with_prefix("T").tenant("ACMECORP");
        let id = service.generate(Strategy::Tenant, &ctx).unwrap();
        assert_eq!(id.len(), 1 + 27);
        assert!(id.starts_with("T20250604123456ACMEC4567"));
    }

    #[test]
    fn test_tenant_strategy_without_tenant() {
        let service = utc_service();
        let id = service
            .generate(Strategy::Tenant, &GenerateContext::default())
            .unwrap();
        assert_eq!(&id[14..19], "00000");
    }

    #[test]
    fn test_generate_dispatches() {
        let service = utc_service();
        let ctx = GenerateContext::with_prefix("PT");
        assert_eq!(
            service.generate(Strategy::Counter, &ctx).unwrap(),
            "PT202506041234560"
        );
        assert_eq!(service.generate(Strategy::Random, &ctx).unwrap().len(), 20);
    }

    #[test]
    fn test_unconfigured_generators_fail() {
        let service = utc_service();
        let ctx = GenerateContext::with_prefix("ORD");
        for strategy in [Strategy::Sonyflake, Strategy::Snowflake] {
            assert!(!service.supports(strategy));
            assert_eq!(
                service.generate(strategy, &ctx).unwrap_err(),
                IdError::GeneratorNotConfigured(strategy)
            );
        }
    }

    #[test]
    fn test_generator_failure_is_not_zero_id() {
        let service = IdService::builder()
            .snowflake(FailingGenerator)
            .build()
            .unwrap();
        let err = service.snowflake_id("ORD").unwrap_err();
        assert!(err.is_generator_error());
        assert!(matches!(err, IdError::GeneratorFailed { .. }));
    }

    #[test]
    fn test_invalid_worker_fails_build() {
        let result = IdService::from_config(&IdConfig {
            snowflake: Some(SnowflakeConfig { worker_id: -3 }),
            ..IdConfig::default()
        });
        assert!(matches!(result, Err(IdError::NodeIdOutOfRange { .. })));
    }

    #[test]
    fn test_oversized_tenant_width_fails_build() {
        let result = IdService::from_config(&IdConfig {
            tenant_width: usize::MAX,
            ..IdConfig::default()
        });
        assert!(matches!(result, Err(IdError::InvalidConfig { .. })));
    }

    #[test]
    fn test_widest_tenant_field() {
        let service = IdService::builder()
            .config(IdConfig {
                tenant_width: crate::tenant::MAX_TENANT_WIDTH,
                utc_offset_secs: Some(0),
                ..IdConfig::default()
            })
            .clock(FixedClock::new(fixed_instant()))
            .build()
            .unwrap();
        let id = service.tenant_id("M");
        assert_eq!(id.len(), 14 + crate::tenant::MAX_TENANT_WIDTH + 8);
    }

    #[test]
    fn test_configured_generators() {
        let service = IdService::from_config(&IdConfig {
            sonyflake: Some(SonyflakeConfig {
                machine_id: Some(9),
            }),
            snowflake: Some(SnowflakeConfig { worker_id: 1 }),
            ..IdConfig::default()
        })
        .unwrap();

        let sony = service.sonyflake_id("ORD").unwrap();
        let snow = service.snowflake_id("ORD").unwrap();
        for id in [&sony, &snow] {
            assert!(id.starts_with("ORD"));
            assert!(is_digits(&id[3..]));
        }
    }

    #[test]
    fn test_counter_wrap_from_config() {
        let service = IdService::builder()
            .config(IdConfig {
                counter_wrap: 10,
                utc_offset_secs: Some(0),
                ..IdConfig::default()
            })
            .clock(FixedClock::new(fixed_instant()))
            .build()
            .unwrap();
        let ids: Vec<String> = (0..11).map(|_| service.counter_id("", None)).collect();
        assert_eq!(ids[0], ids[10]);
        assert_eq!(service.counter().limit(), 10);
    }

    #[test]
    fn test_resource_id_uses_salt() {
        let salted = IdService::from_config(&IdConfig {
            resource_salt: 1234,
            ..IdConfig::default()
        })
        .unwrap();
        let kind = ResourceKind::new("user");
        let id = salted.resource_id(&kind, 42);
        assert!(id.starts_with("user-"));
        assert_eq!(kind.decode(&id, salted.code_encoder()).unwrap(), 42);
        assert_eq!(id, kind.new_id(42, &CodeEncoder::with_salt(1234)));
    }
}
