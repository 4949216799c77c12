//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Scope every rule of your stylesheets under a namespace selector.
#[derive(Debug, Parser)]
#[command(name = "css-namespace")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files to process; the workspace is scanned when none are given
    #[arg(value_name = "FILE")]
    pub files: Vec<Utf8PathBuf>,

    /// Working directory to scan
    #[arg(long, default_value = ".")]
    pub workspace: Utf8PathBuf,

    /// Path to a selector-namespace.json config file
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Namespace selector, e.g. `.my-component`
    #[arg(long, conflicts_with = "namespace_template")]
    pub namespace: Option<String>,

    /// Per-file namespace; `{name}` is the file stem, `{dir}` its directory name
    #[arg(long = "namespace-template")]
    pub namespace_template: Option<String>,

    /// Regex replaced by the namespace (default `:--namespace`)
    #[arg(long = "self-selector")]
    pub self_selector: Option<String>,

    /// Regex recognised as the document root (default `:root`)
    #[arg(long = "root-selector")]
    pub root_selector: Option<String>,

    /// Prefix root selectors like any other selector
    #[arg(long = "keep-root-prefix", overrides_with = "no_keep_root_prefix")]
    pub keep_root_prefix: bool,

    /// Handle root selectors specially even if the config says otherwise
    #[arg(long = "no-keep-root-prefix", overrides_with = "keep_root_prefix")]
    pub no_keep_root_prefix: bool,

    /// Keep the root token in root selectors
    #[arg(long = "keep-root", overrides_with = "no_keep_root")]
    pub keep_root: bool,

    /// Drop the root token even if the config keeps it
    #[arg(long = "no-keep-root", overrides_with = "keep_root")]
    pub no_keep_root: bool,

    /// Append the namespace to a bare `html` selector instead of prefixing
    #[arg(long = "html-tag", overrides_with = "no_html_tag")]
    pub html_tag: bool,

    /// Prefix a bare `html` selector even if the config enables `--html-tag`
    #[arg(long = "no-html-tag", overrides_with = "html_tag")]
    pub no_html_tag: bool,

    /// Directory to write results to, mirroring the workspace layout
    #[arg(long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// File extensions to process (default: .css)
    #[arg(long = "ext")]
    pub extensions: Vec<String>,

    /// Glob patterns to ignore
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Read one stylesheet from stdin and write the result to stdout
    #[arg(long, conflicts_with_all = ["files", "watch"])]
    pub stdin: bool,

    /// File name used for the stdin stylesheet
    #[arg(long = "stdin-filename", requires = "stdin")]
    pub stdin_filename: Option<Utf8PathBuf>,

    /// Diagnostic output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Watch mode
    #[arg(long)]
    pub watch: bool,

    /// Preserve watch output (don't clear screen)
    #[arg(long = "preserveWatchOutput")]
    pub preserve_watch_output: bool,

    /// Log what is being rewritten
    #[arg(long, short)]
    pub verbose: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// Human-readable with code snippets
    HumanVerbose,
    /// JSON output
    Json,
    /// Machine-readable (one line per diagnostic)
    Machine,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["css-namespace"]);
        assert_eq!(args.workspace.as_str(), ".");
        assert_eq!(args.output, OutputFormat::Human);
        assert!(args.files.is_empty());
        assert!(!args.watch);
        assert!(!args.keep_root);
    }

    #[test]
    fn test_namespace_options() {
        let args = Args::parse_from([
            "css-namespace",
            "--namespace",
            ".card",
            "--self-selector",
            "&|:--component",
            "--keep-root",
            "--html-tag",
            "a.css",
        ]);
        assert_eq!(args.namespace.as_deref(), Some(".card"));
        assert_eq!(args.self_selector.as_deref(), Some("&|:--component"));
        assert!(args.keep_root);
        assert!(args.html_tag);
        assert_eq!(args.files, vec![Utf8PathBuf::from("a.css")]);
    }

    #[test]
    fn test_namespace_and_template_conflict() {
        let result = Args::try_parse_from([
            "css-namespace",
            "--namespace",
            ".a",
            "--namespace-template",
            ".{name}",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_stdin_filename_requires_stdin() {
        assert!(Args::try_parse_from(["css-namespace", "--stdin-filename", "a.css"]).is_err());
        let args = Args::parse_from(["css-namespace", "--stdin", "--stdin-filename", "a.css"]);
        assert!(args.stdin);
    }

    #[test]
    fn test_last_toggle_wins() {
        let args = Args::parse_from(["css-namespace", "--keep-root", "--no-keep-root"]);
        assert!(!args.keep_root);
        assert!(args.no_keep_root);

        let args = Args::parse_from(["css-namespace", "--no-html-tag", "--html-tag"]);
        assert!(args.html_tag);
        assert!(!args.no_html_tag);
    }

    #[test]
    fn test_output_formats() {
        let args = Args::parse_from(["css-namespace", "--output", "json"]);
        assert_eq!(args.output, OutputFormat::Json);

        let args = Args::parse_from(["css-namespace", "--output", "human-verbose"]);
        assert_eq!(args.output, OutputFormat::HumanVerbose);
    }
}
