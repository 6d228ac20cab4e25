//! Output formatting for CLI commands.

use serde::Serialize;

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One value per line.
    #[default]
    Text,
    /// JSON format.
    Json,
}

impl OutputFormat {
    /// Parses the `--format` flag; anything but `json` is text.
    pub fn from_flag(flag: &str) -> Self {
        match flag {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Print one value per line, or the JSON document in JSON mode.
pub fn print_lines<T: Serialize>(lines: &[String], json: &T, format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for line in lines {
                println!("{line}");
            }
        }
        OutputFormat::Json => println!("{}", format_json(json)),
    }
}

/// Pretty-prints `data` as JSON.
pub fn format_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_flag() {
        assert_eq!(OutputFormat::from_flag("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flag("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::from_flag("table"), OutputFormat::Text);
    }

    #[test]
    fn test_format_json() {
        let json = format_json(&serde_json::json!({ "ids": ["a"] }));
        assert!(json.contains("\"ids\""));
    }
}
