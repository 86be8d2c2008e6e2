use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CallflowError, Result};

/// Which analyzer backs the call graph builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Pattern matching over masked source text
    Heuristic,
    /// Tree-sitter syntax tree walking
    Structural,
}

/// Rendering format for analysis results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Tree,
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tree => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project layout
    pub project: ProjectConfig,

    /// Analysis heuristics
    pub analysis: AnalysisConfig,

    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Source roots holding package directories
    pub source_roots: Vec<PathBuf>,

    /// Package prefixes tried when a convention-derived package has no file
    pub module_prefixes: Vec<String>,

    /// Walk the source roots for `<Simple>.java` as a last resort
    pub search_fallback: bool,

    /// Patterns skipped by the fallback walk
    pub ignore_patterns: Vec<String>,

    /// Maximum file size to read (in bytes)
    pub max_file_size: usize,
}

/// Maps a type-name marker to the subpackage that conventionally holds it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConventionRule {
    pub marker: String,
    pub package: String,
}

impl ConventionRule {
    pub fn new(marker: &str, package: &str) -> Self {
        Self {
            marker: marker.to_string(),
            package: package.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Analyzer strategy
    pub strategy: Strategy,

    /// Annotations marking dependency-injected fields
    pub injection_annotations: Vec<String>,

    /// Ordered naming conventions used for type resolution
    pub conventions: Vec<ConventionRule>,

    /// Method names ignored in addition to the built-in list
    #[serde(default)]
    pub extra_ignored_methods: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    pub format: OutputFormat,

    /// Include method snippets in Markdown bundles
    pub include_snippets: bool,

    /// Directory for batch output
    pub output_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Structural,
            injection_annotations: vec![
                "Autowired".to_string(),
                "Inject".to_string(),
                "Resource".to_string(),
            ],
            conventions: vec![
                ConventionRule::new("Service", "service"),
                ConventionRule::new("Repository", "dao"),
                ConventionRule::new("Controller", "rest"),
                ConventionRule::new("Entity", "entities"),
            ],
            extra_ignored_methods: vec![],
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                name: "Unnamed Project".to_string(),
                source_roots: vec![
                    PathBuf::from("src/main/java"),
                    PathBuf::from("mod1/src/main/java"),
                ],
                module_prefixes: vec![],
                search_fallback: true,
                ignore_patterns: vec![
                    "target/".to_string(),
                    "build/".to_string(),
                    ".git/".to_string(),
                    ".gradle/".to_string(),
                ],
                max_file_size: 1024 * 1024, // 1MB
            },
            analysis: AnalysisConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Tree,
                include_snippets: true,
                output_dir: PathBuf::from("callflow-reports"),
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| CallflowError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CallflowError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default.
    ///
    /// Without an explicit path the common file names are probed in `project_root`.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>, project_root: &Path) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                // Try common config file locations
                let candidates = ["callflow.toml", "Callflow.toml", ".callflow.toml"];

                for candidate in &candidates {
                    let path = project_root.join(candidate);
                    if path.exists() {
                        return Self::load(path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.project.source_roots.is_empty() {
            return Err(CallflowError::Config(
                "project.source_roots must name at least one directory".to_string(),
            ));
        }
        if let Some(rule) = self
            .analysis
            .conventions
            .iter()
            .find(|rule| rule.marker.is_empty() || rule.package.is_empty())
        {
            return Err(CallflowError::Config(format!(
                "convention rule {:?} needs both a marker and a package",
                rule
            )));
        }
        Ok(())
    }
}
