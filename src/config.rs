use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::host::{FileKind, SessionOptions};
use crate::core::markup::{DirectiveExtractor, Extractor, IdConventionExtractor, MarkupExtractor};
use crate::core::script::{
    DEFAULT_REGISTRATION_NAMESPACE, DEFAULT_SERVICE_IDENTIFIER, ScriptOptions,
};

pub const CONFIG_FILE_NAME: &str = ".gleanrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub ignores: Vec<String>,
    #[serde(default = "default_source_root")]
    pub source_root: String,
    #[serde(default = "default_markup_extensions")]
    pub markup_extensions: Vec<String>,
    #[serde(default = "default_script_extensions")]
    pub script_extensions: Vec<String>,
    #[serde(default = "default_service_identifier")]
    pub service_identifier: String,
    #[serde(default = "default_registration_namespace")]
    pub registration_namespace: String,
    #[serde(default = "default_extractors")]
    pub extractors: Vec<String>,
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_id_delimiter")]
    pub id_delimiter: String,
    #[serde(default = "default_output")]
    pub output: String,
}

fn default_includes() -> Vec<String> {
    vec!["src".to_string()]
}

fn default_source_root() -> String {
    "./".to_string()
}

fn default_markup_extensions() -> Vec<String> {
    ["html", "htm"].map(String::from).to_vec()
}

fn default_script_extensions() -> Vec<String> {
    ["js", "jsx", "mjs", "cjs", "ts", "tsx"]
        .map(String::from)
        .to_vec()
}

fn default_service_identifier() -> String {
    DEFAULT_SERVICE_IDENTIFIER.to_string()
}

fn default_registration_namespace() -> String {
    DEFAULT_REGISTRATION_NAMESPACE.to_string()
}

fn default_extractors() -> Vec<String> {
    [
        DirectiveExtractor.name(),
        IdConventionExtractor::default().name(),
    ]
    .map(String::from)
    .to_vec()
}

fn default_marker() -> String {
    "i18n".to_string()
}

fn default_id_delimiter() -> String {
    "@@".to_string()
}

fn default_output() -> String {
    "translations.json".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            ignores: Vec::new(),
            source_root: default_source_root(),
            markup_extensions: default_markup_extensions(),
            script_extensions: default_script_extensions(),
            service_identifier: default_service_identifier(),
            registration_namespace: default_registration_namespace(),
            extractors: default_extractors(),
            marker: default_marker(),
            id_delimiter: default_id_delimiter(),
            output: default_output(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error for invalid glob patterns, unknown extractors and empty names.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        // Patterns without wildcards are literal directory paths.
        for pattern in &self.includes {
            if pattern.contains('*') || pattern.contains('?') {
                Pattern::new(pattern).with_context(|| {
                    format!("Invalid glob pattern in 'includes': \"{}\"", pattern)
                })?;
            }
        }

        for (field, value) in [
            ("serviceIdentifier", &self.service_identifier),
            ("registrationNamespace", &self.registration_namespace),
            ("marker", &self.marker),
            ("idDelimiter", &self.id_delimiter),
            ("output", &self.output),
        ] {
            if value.trim().is_empty() {
                bail!("'{}' must not be empty", field);
            }
        }

        self.markup_extractors()?;
        Ok(())
    }

    /// The extractors named in `extractors`, in order.
    pub fn markup_extractors(&self) -> Result<Vec<Extractor>> {
        self.extractors
            .iter()
            .map(|name| {
                Extractor::from_name(name, &self.marker, &self.id_delimiter).with_context(|| {
                    format!(
                        "Unknown extractor in 'extractors': \"{}\" (expected \"directive\" or \"idConvention\")",
                        name
                    )
                })
            })
            .collect()
    }

    pub fn session_options(&self) -> Result<SessionOptions> {
        Ok(SessionOptions {
            extractors: self.markup_extractors()?,
            script: ScriptOptions {
                service_identifier: self.service_identifier.clone(),
                registration_namespace: self.registration_namespace.clone(),
            },
        })
    }

    /// How a file is extracted, by extension. `None` for files that are not scanned.
    pub fn file_kind(&self, path: &Path) -> Option<FileKind> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        if self.markup_extensions.iter().any(|e| *e == extension) {
            Some(FileKind::Markup)
        } else if self.script_extensions.iter().any(|e| *e == extension) {
            Some(FileKind::Script)
        } else {
            None
        }
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Path of the loaded file, `None` when using defaults.
    pub path: Option<PathBuf>,
}

impl ConfigLoadResult {
    pub fn from_file(&self) -> bool {
        self.path.is_some()
    }
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                path: Some(path),
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            path: None,
        }),
    }
}
