//! Config command.

use anyhow::Result;
use serde_json::json;

use crate::output::{format_json, OutputFormat};

use super::CommandContext;

pub fn show(ctx: CommandContext) -> Result<()> {
    let id = &ctx.config.id;

    match ctx.format {
        OutputFormat::Json => {
            let view = json!({
                "id": id,
                "log_level": ctx.config.log_level,
                "log_json": ctx.config.log_json,
            });
            println!("{}", format_json(&view));
        }
        OutputFormat::Text => {
            let zone = id
                .utc_offset_secs
                .map_or_else(|| "local".to_string(), |secs| format!("UTC{secs:+}s"));
            let sonyflake = match id.sonyflake {
                Some(sf) => sf
                    .machine_id
                    .map_or_else(|| "host address".to_string(), |m| format!("machine {m}")),
                None => "-".to_string(),
            };
            let snowflake = id
                .snowflake
                .map_or_else(|| "-".to_string(), |sf| format!("worker {}", sf.worker_id));

            println!("counter_wrap: {}", id.counter_wrap);
            println!("random_width: {}", id.random_width);
            println!("tenant_width: {}", id.tenant_width);
            println!("time_zone: {zone}");
            println!("sonyflake: {sonyflake}");
            println!("snowflake: {snowflake}");
            println!("resource_code_length: {}", id.resource_code_length);
            println!("log_level: {}", ctx.config.log_level);
        }
    }

    Ok(())
}
