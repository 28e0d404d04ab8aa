use serde_json::{Value, json};

use crate::dispatch::{Outcome, ScaleChange};
use crate::error::{Result, WorkloadError};

pub use crate::types::OutputFormat;

pub const LIST_HEADER: &str =
    "No workload action specified. Listing current state";

/// Output formatting interface
pub trait Formatter {
    fn format(&self, outcome: &Outcome) -> Result<String>;
}

pub struct TextFormatter;
pub struct JsonFormatter;
pub struct YamlFormatter;

fn change_line(c: &ScaleChange) -> String {
    match c.from {
        Some(from) => {
            format!("{}/{} scaled from {} to {}", c.kind, c.name, from, c.to)
        }
        None => format!("{}/{} scaled to {}", c.kind, c.name, c.to),
    }
}

impl Formatter for TextFormatter {
    fn format(&self, outcome: &Outcome) -> Result<String> {
        let lines: Vec<String> = match outcome {
            Outcome::Listed(items) => std::iter::once(LIST_HEADER.to_string())
                .chain(items.iter().map(|d| {
                    format!(
                        "Name: {} Scale: {} Kind: {}",
                        d.name, d.scale, d.kind
                    )
                }))
                .collect(),
            Outcome::Stopped(changes) | Outcome::Started(changes) => {
                if changes.is_empty() {
                    vec!["No workloads found. Nothing to do".to_string()]
                } else {
                    changes.iter().map(change_line).collect()
                }
            }
        };
        Ok(lines.join("\n"))
    }
}

fn to_value(outcome: &Outcome) -> Result<Value> {
    let encode = |r: serde_json::Result<Value>| {
        r.map_err(|e| WorkloadError::Output(e.to_string()))
    };
    Ok(match outcome {
        Outcome::Listed(items) => json!({
            "action": "list",
            "workloads": encode(serde_json::to_value(items))?,
        }),
        Outcome::Stopped(changes) => json!({
            "action": "stop",
            "workloads": encode(serde_json::to_value(changes))?,
        }),
        Outcome::Started(changes) => json!({
            "action": "start",
            "workloads": encode(serde_json::to_value(changes))?,
        }),
    })
}

impl Formatter for JsonFormatter {
    fn format(&self, outcome: &Outcome) -> Result<String> {
        serde_json::to_string_pretty(&to_value(outcome)?)
            .map_err(|e| WorkloadError::Output(e.to_string()))
    }
}

impl Formatter for YamlFormatter {
    fn format(&self, outcome: &Outcome) -> Result<String> {
        serde_yaml::to_string(&to_value(outcome)?)
            .map_err(|e| WorkloadError::Output(e.to_string()))
    }
}

/// Get formatter for the specified output format
pub fn get_formatter(format: &OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Yaml => Box::new(YamlFormatter),
    }
}

/// Format and print an outcome in the specified format
pub fn print_outcome(outcome: &Outcome, format: &OutputFormat) -> Result<()> {
    let output = get_formatter(format).format(outcome)?;
    println!("{}", output);
    Ok(())
}
