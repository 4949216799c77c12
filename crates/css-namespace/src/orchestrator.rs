//! Main orchestration logic.

use crate::cli::{Args, OutputFormat};
use crate::config::{ConfigError, ProjectConfig, Settings};
use crate::output::{FormattedDiagnostic, Formatter, RunSummary, IO_FAILED, NAMESPACE_FAILED};
use camino::{Utf8Path, Utf8PathBuf};
use css_parser::{ParseError, ProcessError, ProcessOptions, Processor};
use globset::{Glob, GlobSet, GlobSetBuilder};
use miette::Diagnostic;
use rayon::prelude::*;
use selector_namespace::{selector_namespace, OptionsError};
use std::fs;
use std::io::{self, Read, Write};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Orchestration errors.
#[derive(Debug, Error, Diagnostic)]
pub enum OrchestratorError {
    /// Failed to load the config file.
    #[error(transparent)]
    #[diagnostic(code(css_namespace::config))]
    Config(#[from] ConfigError),

    /// The plugin options are invalid.
    #[error(transparent)]
    #[diagnostic(
        code(css_namespace::options),
        help("--self-selector and --root-selector take regular expressions")
    )]
    Options(#[from] OptionsError),

    /// Invalid glob pattern.
    #[error("invalid glob pattern: {0}")]
    #[diagnostic(code(css_namespace::glob))]
    InvalidGlob(String),

    /// Failed to read stdin.
    #[error("failed to read stdin: {0}")]
    #[diagnostic(code(css_namespace::io))]
    Stdin(#[source] io::Error),

    /// Watch error.
    #[error("watch error: {0}")]
    #[diagnostic(code(css_namespace::watch))]
    WatchFailed(String),
}

/// Everything needed to process files, built once per invocation.
struct Context {
    workspace: Utf8PathBuf,
    settings: Settings,
    processor: Processor,
    ignore_set: GlobSet,
    formatter: Formatter,
    format: OutputFormat,
}

/// The result of processing one file.
struct FileOutcome {
    path: Utf8PathBuf,
    display_path: Utf8PathBuf,
    /// Where the result goes under `--out-dir`; always relative.
    output_path: Utf8PathBuf,
    source: String,
    result: Result<Processed, Failure>,
}

struct Processed {
    css: String,
    errors: Vec<ParseError>,
}

/// A file-level failure with no position in the source.
#[derive(Debug)]
struct Failure {
    code: &'static str,
    message: String,
}

impl Failure {
    fn namespace(message: impl Into<String>) -> Self {
        Self {
            code: NAMESPACE_FAILED,
            message: message.into(),
        }
    }

    fn io(message: impl Into<String>) -> Self {
        Self {
            code: IO_FAILED,
            message: message.into(),
        }
    }
}

/// Resolves `path` against the current directory.
fn absolute(path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .ok()
        .and_then(|p| Utf8PathBuf::try_from(p).ok())
        .unwrap_or_default()
        .join(path)
}

/// Runs the tool according to `args`.
pub async fn run(args: Args) -> Result<RunSummary, OrchestratorError> {
    let workspace = absolute(&args.workspace);

    let (config_dir, config) = match &args.config {
        Some(path) => {
            let dir = path.parent().map(Utf8Path::to_path_buf).unwrap_or_default();
            (dir, ProjectConfig::load(path)?)
        }
        None => match ProjectConfig::find(&workspace)? {
            Some((path, config)) => {
                debug!(%path, "loaded config");
                (workspace.clone(), config)
            }
            None => (workspace.clone(), ProjectConfig::default()),
        },
    };
    let mut settings = Settings::resolve(&args, config, &config_dir);
    settings.out_dir = settings.out_dir.as_deref().map(absolute);

    let plugin = selector_namespace(settings.options.clone())?;
    let processor = Processor::new().with(plugin);
    let ignore_set = build_ignore_set(&settings, &workspace)?;

    let context = Context {
        workspace,
        settings,
        processor,
        ignore_set,
        formatter: Formatter::new(args.output),
        format: args.output,
    };

    if args.stdin {
        return run_stdin(&context, args.stdin_filename.as_deref());
    }

    if args.watch {
        run_watch_mode(&args, &context).await
    } else {
        Ok(run_once(&args, &context))
    }
}

fn build_ignore_set(settings: &Settings, workspace: &Utf8Path) -> Result<GlobSet, OrchestratorError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in &settings.ignore {
        let glob = Glob::new(pattern).map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))?;
        builder.add(glob);
    }

    for pattern in ["**/node_modules/**", "**/dist/**"] {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }

    // Never read our own output back in.
    if let Some(out_dir) = &settings.out_dir {
        let relative = out_dir.strip_prefix(workspace).ok().filter(|r| !r.as_str().is_empty());
        if let Some(relative) = relative {
            if let Ok(glob) = Glob::new(&format!("{relative}/**")) {
                builder.add(glob);
            }
        }
    }

    builder
        .build()
        .map_err(|e| OrchestratorError::InvalidGlob(e.to_string()))
}

/// Lists the files to process: the explicit ones, or a workspace scan.
fn collect_files(args: &Args, context: &Context) -> Vec<Utf8PathBuf> {
    if !args.files.is_empty() {
        return args.files.iter().map(|file| absolute(file)).collect();
    }

    let workspace = &context.workspace;
    let extensions = &context.settings.extensions;
    let mut files: Vec<Utf8PathBuf> = WalkDir::new(workspace)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| Utf8PathBuf::try_from(e.into_path()).ok())
        .filter(|p| {
            let file_name = p.file_name().unwrap_or("");
            extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
        })
        .filter(|p| {
            let relative = p.strip_prefix(workspace).unwrap_or(p);
            !context.ignore_set.is_match(relative.as_str())
        })
        .collect();
    files.sort();
    files
}

fn process_file(context: &Context, path: &Utf8Path) -> FileOutcome {
    let relative = path.strip_prefix(&context.workspace).ok();
    let display_path = relative.unwrap_or(path).to_path_buf();
    // Files outside the workspace land at the top of the out dir.
    let output_path = relative
        .or_else(|| path.file_name().map(Utf8Path::new))
        .unwrap_or(path)
        .to_path_buf();

    let (source, result) = match fs::read_to_string(path) {
        Ok(source) => {
            let result = process_source(context, &source, Some(path.to_path_buf()));
            (source, result)
        }
        Err(e) => (String::new(), Err(Failure::io(format!("failed to read file: {e}")))),
    };

    FileOutcome {
        path: path.to_path_buf(),
        display_path,
        output_path,
        source,
        result,
    }
}

fn process_source(
    context: &Context,
    source: &str,
    from: Option<Utf8PathBuf>,
) -> Result<Processed, Failure> {
    match context.processor.process(source, ProcessOptions { from }) {
        Ok(result) => Ok(Processed {
            css: result.css,
            errors: result.errors,
        }),
        Err(ProcessError::Plugin { source, .. }) => Err(Failure::namespace(source.to_string())),
    }
}

/// Processes every file once and writes the results.
fn run_once(args: &Args, context: &Context) -> RunSummary {
    let files = collect_files(args, context);
    debug!(count = files.len(), "processing files");

    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|path| process_file(context, path))
        .collect();

    let mut summary = RunSummary {
        file_count: outcomes.len(),
        ..RunSummary::default()
    };
    let mut json: Vec<FormattedDiagnostic> = Vec::new();
    let stderr = io::stderr();
    let stdout = io::stdout();

    for outcome in &outcomes {
        let processed = match &outcome.result {
            Ok(processed) => processed,
            Err(failure) => {
                summary.failed_count += 1;
                report_failure(context, &mut json, failure, &outcome.display_path);
                continue;
            }
        };

        if !processed.errors.is_empty() {
            summary.error_count += processed.errors.len();
            summary.failed_count += 1;
            report_errors(context, &mut json, processed, outcome);
            continue;
        }

        if processed.css != outcome.source {
            summary.changed_count += 1;
        }

        if let Err(failure) = emit(context, &mut stdout.lock(), outcome, &processed.css) {
            warn!(path = %outcome.display_path, error = %failure.message, "failed to write output");
            summary.failed_count += 1;
            report_failure(context, &mut json, &failure, &outcome.display_path);
        }
    }

    if context.format == OutputFormat::Json {
        let mut err = stderr.lock();
        let _ = writeln!(err, "{}", Formatter::format_json(&json));
    } else {
        let mut err = stderr.lock();
        let _ = writeln!(err, "{}", summary.format());
    }

    info!(
        files = summary.file_count,
        changed = summary.changed_count,
        failed = summary.failed_count,
        "run complete"
    );
    summary
}

fn report_errors(
    context: &Context,
    json: &mut Vec<FormattedDiagnostic>,
    processed: &Processed,
    outcome: &FileOutcome,
) {
    if context.format == OutputFormat::Json {
        json.extend(Formatter::json_diagnostics(
            &processed.errors,
            &outcome.display_path,
            &outcome.source,
        ));
    } else {
        eprint!(
            "{}",
            context
                .formatter
                .format(&processed.errors, &outcome.display_path, &outcome.source)
        );
    }
}

fn report_failure(
    context: &Context,
    json: &mut Vec<FormattedDiagnostic>,
    failure: &Failure,
    path: &Utf8Path,
) {
    if context.format == OutputFormat::Json {
        json.push(Formatter::json_failure(&failure.message, failure.code, path));
    } else {
        eprint!(
            "{}",
            context
                .formatter
                .format_failure(&failure.message, failure.code, path)
        );
    }
}

/// Writes one result under the out dir, or to `out` with a header.
fn emit(
    context: &Context,
    out: &mut impl Write,
    outcome: &FileOutcome,
    css: &str,
) -> Result<(), Failure> {
    let Some(out_dir) = &context.settings.out_dir else {
        return writeln!(out, "/* {} */\n{}", outcome.display_path, css)
            .map_err(|e| Failure::io(format!("failed to write to stdout: {e}")));
    };

    let target = out_dir.join(&outcome.output_path);
    if target == outcome.path {
        return Err(Failure::io(format!(
            "refusing to overwrite input file {target}; choose an --out-dir outside the sources"
        )));
    }
    write_output(&target, css).map_err(|e| Failure::io(format!("failed to write {target}: {e}")))?;
    debug!(from = %outcome.path, to = %target, "wrote");
    Ok(())
}

fn write_output(target: &Utf8Path, css: &str) -> io::Result<()> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(target, css)
}

/// Reads one stylesheet from stdin and writes the result to stdout.
fn run_stdin(context: &Context, filename: Option<&Utf8Path>) -> Result<RunSummary, OrchestratorError> {
    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .map_err(OrchestratorError::Stdin)?;

    let display_path = filename.unwrap_or(Utf8Path::new("<stdin>"));
    let mut summary = RunSummary {
        file_count: 1,
        ..RunSummary::default()
    };
    let mut json = Vec::new();

    match process_source(context, &source, filename.map(Utf8Path::to_path_buf)) {
        Ok(processed) if processed.errors.is_empty() => {
            if processed.css != source {
                summary.changed_count = 1;
            }
            let written = io::stdout()
                .lock()
                .write_all(processed.css.as_bytes())
                .map_err(|e| Failure::io(format!("failed to write to stdout: {e}")));
            if let Err(failure) = written {
                summary.failed_count = 1;
                report_failure(context, &mut json, &failure, display_path);
            }
        }
        Ok(processed) => {
            summary.error_count = processed.errors.len();
            summary.failed_count = 1;
            if context.format == OutputFormat::Json {
                json = Formatter::json_diagnostics(&processed.errors, display_path, &source);
            } else {
                eprint!(
                    "{}",
                    context.formatter.format(&processed.errors, display_path, &source)
                );
            }
        }
        Err(failure) => {
            summary.failed_count = 1;
            report_failure(context, &mut json, &failure, display_path);
        }
    }

    if context.format == OutputFormat::Json && !json.is_empty() {
        eprintln!("{}", Formatter::format_json(&json));
    }
    Ok(summary)
}

/// Runs in watch mode.
async fn run_watch_mode(args: &Args, context: &Context) -> Result<RunSummary, OrchestratorError> {
    use notify::{Config, RecommendedWatcher, RecursiveMode, Watcher};
    use std::time::Duration;

    eprintln!("Starting watch mode...\n");

    run_once(args, context);

    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.blocking_send(event);
            }
        },
        Config::default().with_poll_interval(Duration::from_secs(1)),
    )
    .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    watcher
        .watch(context.workspace.as_std_path(), RecursiveMode::Recursive)
        .map_err(|e| OrchestratorError::WatchFailed(e.to_string()))?;

    eprintln!("Watching for changes... (Ctrl+C to stop)\n");

    while let Some(event) = rx.recv().await {
        let relevant = event.paths.iter().any(|p| {
            let Ok(path) = Utf8PathBuf::try_from(p.clone()) else {
                return false;
            };
            is_watched(context, &path)
        });

        if relevant {
            if !args.preserve_watch_output {
                // Clear screen
                eprint!("\x1B[2J\x1B[1;1H");
            }

            eprintln!("File changed, re-processing...\n");
            run_once(args, context);
        }
    }

    Err(OrchestratorError::WatchFailed(
        "watch channel closed unexpectedly".to_string(),
    ))
}

/// Whether a change to `path` should trigger a re-run.
fn is_watched(context: &Context, path: &Utf8Path) -> bool {
    let file_name = path.file_name().unwrap_or("");
    if !context
        .settings
        .extensions
        .iter()
        .any(|ext| file_name.ends_with(ext.as_str()))
    {
        return false;
    }
    if let Some(out_dir) = &context.settings.out_dir {
        if path.starts_with(out_dir) {
            return false;
        }
    }
    let relative = path.strip_prefix(&context.workspace).unwrap_or(path);
    !context.ignore_set.is_match(relative.as_str())
}
