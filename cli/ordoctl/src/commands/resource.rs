//! Resource ID command.

use anyhow::{Context, Result};
use clap::Args;
use ordo_id::{IdService, ResourceKind};
use serde_json::json;

use crate::output::print_lines;

use super::CommandContext;

/// Derive a `{kind}-{code}` resource ID from a row counter, or decode one.
#[derive(Debug, Args)]
pub struct ResourceCommand {
    /// Resource kind, e.g. `user`.
    kind: String,

    /// Row counter to encode.
    #[arg(required_unless_present = "decode")]
    counter: Option<u64>,

    /// Decode this ID back to its counter instead.
    #[arg(long, conflicts_with = "counter")]
    decode: Option<String>,
}

impl ResourceCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let service = IdService::from_config(&ctx.config.id).context("Failed to build ID service")?;
        let kind = ResourceKind::new(self.kind);

        if let Some(id) = self.decode {
            let counter = kind
                .decode(&id, service.code_encoder())
                .with_context(|| format!("Failed to decode '{id}'"))?;
            print_lines(
                &[counter.to_string()],
                &json!({ "kind": kind, "id": id, "counter": counter }),
                ctx.format,
            );
            return Ok(());
        }

        // clap guarantees one of counter/decode.
        let counter = self.counter.context("Missing counter")?;
        let id = service.resource_id(&kind, counter);
        print_lines(
            &[id.clone()],
            &json!({ "kind": kind, "id": id, "counter": counter }),
            ctx.format,
        );
        Ok(())
    }
}
