//! Output formatting shared by the extraction commands.

use cardex_core::PipelineResult;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for batch outputs.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_result(result: &PipelineResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&result.output)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_csv(result: &PipelineResult) -> anyhow::Result<String> {
    let entries = result.output.entries();
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(entries.iter().map(|(key, _)| key.as_str()))?;
    wtr.write_record(entries.iter().map(|(_, value)| value.as_str()))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &PipelineResult) -> String {
    let entries = result.output.entries();
    let width = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);

    let mut output = String::new();
    for (key, value) in &entries {
        output.push_str(&format!("{:width$}  {}\n", key, value, width = width));
    }
    output.push_str(&format!("\nSource: {:?}, {} lines\n", result.source, result.lines.len()));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardex_core::{ExtractionMode, Pipeline, StaticLines};

    fn sample() -> PipelineResult {
        let lines = ["Jane Doe", "jane@acme.com"];
        Pipeline::new(Box::new(StaticLines::new(lines))).process_lines(
            &lines,
            ExtractionMode::Card,
            Some("email"),
        )
    }

    #[test]
    fn test_csv_output() {
        let csv = format_result(&sample(), OutputFormat::Csv).unwrap();
        assert_eq!(csv, "email\njane@acme.com\n");
    }

    #[test]
    fn test_text_output() {
        let text = format_result(&sample(), OutputFormat::Text).unwrap();
        assert!(text.starts_with("email  jane@acme.com\n"));
        assert!(text.contains("Source: Heuristic, 2 lines"));
    }
}
