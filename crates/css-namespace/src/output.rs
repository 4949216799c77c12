//! Output formatting.

use crate::cli::OutputFormat;
use camino::Utf8Path;
use css_parser::{LineCol, LineIndex, ParseError};
use serde::Serialize;

/// A formatted diagnostic for output.
#[derive(Debug, Serialize)]
pub struct FormattedDiagnostic {
    /// The diagnostic type.
    #[serde(rename = "type")]
    pub diagnostic_type: String,
    /// The file path.
    pub filename: String,
    /// The start position, absent for whole-file failures.
    pub start: Option<Position>,
    /// The end position, absent for whole-file failures.
    pub end: Option<Position>,
    /// The message.
    pub message: String,
    /// The diagnostic code.
    pub code: String,
}

/// A position in the source.
#[derive(Debug, Serialize)]
pub struct Position {
    /// 1-indexed line number.
    pub line: u32,
    /// 1-indexed column number.
    pub column: u32,
    /// Byte offset.
    pub offset: u32,
}

/// Code used for namespace failures, which have no position.
pub const NAMESPACE_FAILED: &str = "namespace-failed";

/// Code used when a file cannot be read or its result cannot be written.
pub const IO_FAILED: &str = "io-failed";

/// Formats diagnostics for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the parse errors of one file.
    ///
    /// JSON is not produced here; collect [`Formatter::json_diagnostics`]
    /// for the whole run instead.
    pub fn format(&self, errors: &[ParseError], file_path: &Utf8Path, source: &str) -> String {
        match self.format {
            OutputFormat::Human => self.format_human(errors, file_path, source, false),
            OutputFormat::HumanVerbose => self.format_human(errors, file_path, source, true),
            OutputFormat::Json => String::new(),
            OutputFormat::Machine => self.format_machine(errors, file_path, source),
        }
    }

    /// Formats a failure that has no position in the file.
    pub fn format_failure(&self, message: &str, code: &str, file_path: &Utf8Path) -> String {
        match self.format {
            OutputFormat::Human | OutputFormat::HumanVerbose => {
                format!("{file_path}\nError: {message} ({code})\n\n")
            }
            OutputFormat::Json => String::new(),
            OutputFormat::Machine => format!("ERROR {file_path} {message} ({code})\n"),
        }
    }

    fn format_human(
        &self,
        errors: &[ParseError],
        file_path: &Utf8Path,
        source: &str,
        verbose: bool,
    ) -> String {
        let line_index = LineIndex::new(source);
        let lines: Vec<&str> = source.lines().collect();
        let mut output = String::new();

        for error in errors {
            let start = line_index
                .line_col(error.span.start)
                .unwrap_or(LineCol::new(0, 0));

            output.push_str(&format!(
                "{}:{}:{}\nError: {} ({})\n",
                file_path,
                start.line + 1,
                start.col + 1,
                error,
                error.kind.code()
            ));

            let line_num = start.line as usize;
            if verbose && line_num < lines.len() {
                let gutter = (line_num + 1).to_string();
                output.push_str(&format!("  {} | {}\n", gutter, lines[line_num]));
                output.push_str(&format!(
                    "  {} | {}^\n",
                    " ".repeat(gutter.len()),
                    " ".repeat(start.col as usize)
                ));
            }

            output.push('\n');
        }

        output
    }

    /// Formats parse errors into JSON-ready structs.
    pub fn json_diagnostics(
        errors: &[ParseError],
        file_path: &Utf8Path,
        source: &str,
    ) -> Vec<FormattedDiagnostic> {
        let line_index = LineIndex::new(source);
        let position = |offset| {
            let at = line_index.line_col(offset).unwrap_or(LineCol::new(0, 0));
            Position {
                line: at.line + 1,
                column: at.col + 1,
                offset: u32::from(offset),
            }
        };

        errors
            .iter()
            .map(|error| FormattedDiagnostic {
                diagnostic_type: "Error".to_string(),
                filename: file_path.to_string(),
                start: Some(position(error.span.start)),
                end: Some(position(error.span.end)),
                message: error.to_string(),
                code: error.kind.code().to_string(),
            })
            .collect()
    }

    /// A JSON-ready failure without position.
    pub fn json_failure(message: &str, code: &str, file_path: &Utf8Path) -> FormattedDiagnostic {
        FormattedDiagnostic {
            diagnostic_type: "Error".to_string(),
            filename: file_path.to_string(),
            start: None,
            end: None,
            message: message.to_string(),
            code: code.to_string(),
        }
    }

    /// Serializes collected diagnostics.
    pub fn format_json(diagnostics: &[FormattedDiagnostic]) -> String {
        serde_json::to_string_pretty(diagnostics).unwrap_or_default()
    }

    fn format_machine(&self, errors: &[ParseError], file_path: &Utf8Path, source: &str) -> String {
        let line_index = LineIndex::new(source);
        let mut output = String::new();

        for error in errors {
            let start = line_index
                .line_col(error.span.start)
                .unwrap_or(LineCol::new(0, 0));
            let end = line_index
                .line_col(error.span.end)
                .unwrap_or(LineCol::new(0, 0));

            output.push_str(&format!(
                "ERROR {}:{}:{}:{}:{} {} ({})\n",
                file_path,
                start.line + 1,
                start.col + 1,
                end.line + 1,
                end.col + 1,
                error,
                error.kind.code()
            ));
        }

        output
    }
}

/// Summary of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of files processed.
    pub file_count: usize,
    /// Number of files whose output differs from the input.
    pub changed_count: usize,
    /// Number of parse errors.
    pub error_count: usize,
    /// Number of files that produced no output.
    pub failed_count: usize,
}

impl RunSummary {
    /// Whether the run should exit non-zero.
    pub fn failed(&self) -> bool {
        self.failed_count > 0
    }

    /// Formats the summary line.
    pub fn format(&self) -> String {
        let plural = |n: usize, word: &str| {
            if n == 1 {
                format!("{n} {word}")
            } else {
                format!("{n} {word}s")
            }
        };

        format!(
            "====================================\ncss-namespace processed {}: {} changed, {}, {} failed",
            plural(self.file_count, "file"),
            self.changed_count,
            plural(self.error_count, "error"),
            self.failed_count
        )
    }
}
