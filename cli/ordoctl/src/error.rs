//! Error display for the CLI.

use colored::Colorize;
use ordo_id::{IdError, Strategy};

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "caused by:".dimmed(), cause);
    }

    if let Some(hint) = err.chain().find_map(|e| e.downcast_ref::<IdError>()).and_then(hint) {
        eprintln!("\n{}", format!("Hint: {hint}").yellow());
    }
}

fn hint(err: &IdError) -> Option<&'static str> {
    match err {
        IdError::GeneratorNotConfigured(Strategy::Snowflake) => {
            Some("Set ORDO_SNOWFLAKE_WORKER_ID or pass --worker <0-1023>.")
        }
        IdError::GeneratorNotConfigured(_) => {
            Some("Set ORDO_SONYFLAKE=1 or pass --machine-id <n>.")
        }
        IdError::GeneratorInit {
            generator: "sonyflake",
            ..
        } => Some("No private IPv4 address found; pass --machine-id <n> instead."),
        IdError::NodeIdOutOfRange { .. } => Some("Worker ids must be between 0 and 1023."),
        IdError::InvalidPrefix { .. } | IdError::MissingSeparator => {
            Some("Resource IDs look like `{kind}-{code}`, e.g. `user-k3x9qa`.")
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints() {
        assert!(hint(&IdError::GeneratorNotConfigured(Strategy::Snowflake))
            .unwrap()
            .contains("--worker"));
        assert!(hint(&IdError::GeneratorNotConfigured(Strategy::Sonyflake))
            .unwrap()
            .contains("--machine-id"));
        assert!(hint(&IdError::Empty).is_none());
    }
}
