//! Configuration loading and merging.

use crate::cli::Args;
use camino::{Utf8Path, Utf8PathBuf};
use selector_namespace::{Namespace, NamespaceOptions, SelectorPattern};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for this schema.
    #[error("invalid config {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Project configuration from `selector-namespace.json`.
///
/// Option names follow the plugin's camelCase names. Comments are allowed.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProjectConfig {
    /// Static namespace.
    pub namespace: Option<String>,
    /// Per-file namespace template.
    pub namespace_template: Option<String>,
    /// Self selector regex.
    pub self_selector: Option<String>,
    /// Root selector regex.
    pub root_selector: Option<String>,
    pub ignore_root: Option<bool>,
    pub drop_root: Option<bool>,
    pub process_html_tag_specifically: Option<bool>,

    /// File extensions to process.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Glob patterns to ignore.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Output directory, relative to the config file.
    pub out_dir: Option<Utf8PathBuf>,
}

impl ProjectConfig {
    /// Default config file name.
    pub const FILE_NAME: &'static str = "selector-namespace.json";

    /// Loads a config file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let content = remove_json_comments(&content);

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Finds and loads `selector-namespace.json` from a project root.
    pub fn find(project_root: &Utf8Path) -> Result<Option<(Utf8PathBuf, Self)>, ConfigError> {
        let path = project_root.join(Self::FILE_NAME);
        if !path.exists() {
            return Ok(None);
        }
        let config = Self::load(&path)?;
        Ok(Some((path, config)))
    }
}

/// Effective settings: defaults, then the config file, then CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Plugin options.
    pub options: NamespaceOptions,
    /// File extensions to process.
    pub extensions: Vec<String>,
    /// Glob patterns to ignore, on top of the defaults.
    pub ignore: Vec<String>,
    /// Output directory.
    pub out_dir: Option<Utf8PathBuf>,
}

impl Settings {
    /// Merges CLI flags over a project config. `config_dir` anchors relative
    /// paths from the config file.
    pub fn resolve(args: &Args, config: ProjectConfig, config_dir: &Utf8Path) -> Self {
        let mut options = NamespaceOptions::default();

        let namespace = match (&args.namespace, &args.namespace_template) {
            (Some(namespace), _) => Some(Namespace::from(namespace.as_str())),
            (None, Some(template)) => Some(namespace_template(template)),
            (None, None) => match (config.namespace, config.namespace_template) {
                (Some(namespace), _) => Some(Namespace::from(namespace)),
                (None, Some(template)) => Some(namespace_template(&template)),
                (None, None) => None,
            },
        };
        if let Some(namespace) = namespace {
            options.namespace = namespace;
        }

        if let Some(pattern) = args.self_selector.clone().or(config.self_selector) {
            options.self_selector = SelectorPattern::regex(pattern);
        }
        if let Some(pattern) = args.root_selector.clone().or(config.root_selector) {
            options.root_selector = SelectorPattern::regex(pattern);
        }

        options.ignore_root = toggle(args.no_keep_root_prefix, args.keep_root_prefix)
            .or(config.ignore_root)
            .unwrap_or(true);
        options.drop_root = toggle(args.no_keep_root, args.keep_root)
            .or(config.drop_root)
            .unwrap_or(true);
        options.process_html_tag_specifically = toggle(args.html_tag, args.no_html_tag)
            .or(config.process_html_tag_specifically)
            .unwrap_or(false);

        let extensions = if !args.extensions.is_empty() {
            args.extensions.clone()
        } else if !config.extensions.is_empty() {
            config.extensions
        } else {
            vec![".css".to_string()]
        };
        let extensions = extensions
            .into_iter()
            .map(|ext| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect();

        let mut ignore = config.ignore;
        ignore.extend(args.ignore.iter().cloned());

        let out_dir = args
            .out_dir
            .clone()
            .or_else(|| config.out_dir.map(|dir| config_dir.join(dir)));

        Self {
            options,
            extensions,
            ignore,
            out_dir,
        }
    }
}

/// The value set by a pair of opposing flags, if either was given.
fn toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

/// A per-file namespace from a template.
///
/// `{name}` expands to the file stem and `{dir}` to the name of the
/// containing directory.
pub fn namespace_template(template: &str) -> Namespace {
    let template = template.to_string();
    Namespace::per_file(move |file| {
        let Some(file) = file else {
            return Err(format!(
                "namespace template `{template}` needs a file name (use --stdin-filename)"
            )
            .into());
        };
        let name = file.file_stem().unwrap_or_default();
        let dir = file
            .parent()
            .and_then(Utf8Path::file_name)
            .unwrap_or_default();
        Ok(Some(template.replace("{name}", name).replace("{dir}", dir)))
    })
}

/// Removes `//` and `/* */` comments outside of strings.
fn remove_json_comments(json: &str) -> String {
    let mut result = String::with_capacity(json.len());
    let mut chars = json.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            result.push(c);
            if c == '"' {
                in_string = false;
            } else if c == '\\' {
                if let Some(next) = chars.next() {
                    result.push(next);
                }
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                result.push(c);
                in_string = true;
            }
            ('/', Some('/')) => {
                while chars.peek().is_some_and(|&next| next != '\n') {
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                while let Some(next) = chars.next() {
                    if next == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => result.push(c),
        }
    }

    result
}
