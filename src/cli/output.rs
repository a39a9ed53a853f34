//! Result rendering for the CLI

use anyhow::Result;
use serde::Serialize;
use std::str::FromStr;

use super::scan::FileReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Minimal,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "minimal" => Ok(Self::Minimal),
            other => anyhow::bail!("Unknown output format: {}", other),
        }
    }
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    path: String,
    encoding: Option<&'a str>,
    confidence: f32,
    language: Option<&'a str>,
}

/// Render successful reports; unreadable files are reported on stderr
pub fn render(reports: &[FileReport], format: OutputFormat) -> Result<String> {
    let ok = reports
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok().map(|result| (r, result)));

    match format {
        OutputFormat::Text => Ok(ok
            .map(|(r, result)| format!("{}: {}", r.path.display(), result))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Minimal => Ok(ok
            .map(|(_, result)| result.encoding.clone().unwrap_or_else(|| "None".to_string()))
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => {
            let entries: Vec<JsonEntry> = ok
                .map(|(r, result)| JsonEntry {
                    path: r.path.display().to_string(),
                    encoding: result.encoding.as_deref(),
                    confidence: result.confidence,
                    language: result.language.as_deref(),
                })
                .collect();
            Ok(serde_json::to_string_pretty(&entries)?)
        }
    }
}
