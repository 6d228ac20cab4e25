//! Mint command.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use ordo_id::{GenerateContext, IdConfig, IdService, SnowflakeConfig, SonyflakeConfig, Strategy};
use serde::Serialize;
use tracing::info;

use crate::output::print_lines;

use super::CommandContext;

/// Mint identifiers with a strategy.
#[derive(Debug, Args)]
pub struct MintCommand {
    /// Strategy: random, counter, tenant, sonyflake or snowflake.
    strategy: Strategy,

    /// Prefix prepended to every ID.
    #[arg(long, short, default_value = "")]
    prefix: String,

    /// Tenant identifier (tenant strategy).
    #[arg(long)]
    tenant: Option<String>,

    /// Instant to stamp into time-based IDs (RFC 3339). Defaults to now.
    #[arg(long)]
    at: Option<DateTime<Utc>>,

    /// Number of IDs to mint.
    #[arg(long, short = 'n', default_value_t = 1)]
    count: usize,

    /// Snowflake worker id (overrides ORDO_SNOWFLAKE_WORKER_ID).
    #[arg(long)]
    worker: Option<i64>,

    /// Sonyflake machine id (overrides ORDO_SONYFLAKE_MACHINE_ID).
    #[arg(long)]
    machine_id: Option<u16>,
}

#[derive(Debug, Serialize)]
struct MintView<'a> {
    strategy: Strategy,
    prefix: &'a str,
    ids: &'a [String],
}

impl MintCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let config = self.effective_config(ctx.config.id);
        let service = IdService::from_config(&config).context("Failed to build ID service")?;

        let gen_ctx = GenerateContext {
            prefix: &self.prefix,
            tenant_id: self.tenant.as_deref(),
            at: self.at,
        };

        let ids = (0..self.count)
            .map(|_| service.generate(self.strategy, &gen_ctx))
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to mint {} ID", self.strategy))?;

        info!(strategy = %self.strategy, count = ids.len(), "Minted IDs");

        let view = MintView {
            strategy: self.strategy,
            prefix: &self.prefix,
            ids: &ids,
        };
        print_lines(&ids, &view, ctx.format);
        Ok(())
    }

    /// Applies flag overrides; asking for sonyflake enables it with the
    /// host-derived machine id when nothing else is configured.
    fn effective_config(&self, mut config: IdConfig) -> IdConfig {
        if let Some(worker_id) = self.worker {
            config.snowflake = Some(SnowflakeConfig { worker_id });
        }
        if let Some(machine_id) = self.machine_id {
            config.sonyflake = Some(SonyflakeConfig {
                machine_id: Some(machine_id),
            });
        }
        if self.strategy == Strategy::Sonyflake && config.sonyflake.is_none() {
            config.sonyflake = Some(SonyflakeConfig::default());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(strategy: Strategy) -> MintCommand {
        MintCommand {
            strategy,
            prefix: String::new(),
            tenant: None,
            at: None,
            count: 1,
            worker: None,
            machine_id: None,
        }
    }

    #[test]
    fn test_worker_flag_overrides_config() {
        let mut cmd = command(Strategy::Snowflake);
        cmd.worker = Some(3);
        let config = cmd.effective_config(IdConfig {
            snowflake: Some(SnowflakeConfig { worker_id: 1 }),
            ..IdConfig::default()
        });
        assert_eq!(config.snowflake, Some(SnowflakeConfig { worker_id: 3 }));
    }

    #[test]
    fn test_sonyflake_enabled_on_demand() {
        let config = command(Strategy::Sonyflake).effective_config(IdConfig::default());
        assert_eq!(config.sonyflake, Some(SonyflakeConfig::default()));

        let config = command(Strategy::Random).effective_config(IdConfig::default());
        assert!(config.sonyflake.is_none());
    }

    #[test]
    fn test_machine_id_flag() {
        let mut cmd = command(Strategy::Sonyflake);
        cmd.machine_id = Some(4);
        let config = cmd.effective_config(IdConfig::default());
        assert_eq!(
            config.sonyflake,
            Some(SonyflakeConfig {
                machine_id: Some(4)
            })
        );
    }
}
