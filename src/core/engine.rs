// src/core/engine.rs
use std::path::{Path, PathBuf};
use std::sync::Arc;
use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::{Config, OutputFormat, Strategy};
use super::{create_analyzer, CallGraph, CallGraphBuilder, FsSourceLocator, ReportRenderer};

/// One `Type#method` entry of a batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub type_name: String,
    pub method: String,
}

impl BatchEntry {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.split_once('#') {
            Some((type_name, method)) if !type_name.is_empty() && !method.is_empty() => Ok(Self {
                type_name: type_name.trim().to_string(),
                method: method.trim().to_string(),
            }),
            _ => bail!("Invalid batch entry '{}', expected <Type>#<method>", raw),
        }
    }

    /// Report file stem; qualified so same-named types in other packages do not collide
    fn file_stem(&self) -> String {
        format!("{}_{}", self.type_name, self.method)
    }
}

/// Main orchestration engine: configuration, source lookup and rendering around `analyze()`
pub struct Engine {
    config: Config,
    project_root: PathBuf,
    renderer: ReportRenderer,
}

impl Engine {
    pub fn new(config_path: Option<&Path>, project_root: Option<PathBuf>) -> Result<Self> {
        let project_root = match project_root {
            Some(root) => root,
            None => std::env::current_dir().context("Failed to determine the current directory")?,
        };

        let config = Config::load_or_default(config_path, &project_root)?;
        debug!("Loaded configuration: {:?}", config);

        Ok(Self::with_config(config, project_root))
    }

    pub fn with_config(config: Config, project_root: PathBuf) -> Self {
        let markers = config
            .analysis
            .conventions
            .iter()
            .map(|rule| rule.marker.clone())
            .collect();
        let renderer = ReportRenderer::new(config.output.include_snippets, markers);

        Self {
            config,
            project_root,
            renderer,
        }
    }

    fn builder(&self, strategy: Option<Strategy>) -> Result<CallGraphBuilder> {
        let strategy = strategy.unwrap_or(self.config.analysis.strategy);
        let analyzer = create_analyzer(strategy)?;
        let sources = Arc::new(FsSourceLocator::new(&self.project_root, &self.config));
        debug!("Using {:?} analyzer under {}", analyzer.strategy(), self.project_root.display());
        Ok(CallGraphBuilder::new(analyzer, sources, &self.config.analysis))
    }

    /// Build the call graph for one starting method
    pub fn graph(&self, type_name: &str, method: &str, strategy: Option<Strategy>) -> Result<CallGraph> {
        let graph = self.builder(strategy)?.analyze(type_name, method);
        if graph.is_empty() {
            warn!("⚠️ No call graph for {}.{}", type_name, method);
        }
        for branch in graph.skipped() {
            warn!("Skipped {}: {}", branch.key, branch.reason);
        }
        Ok(graph)
    }

    pub fn init(&self, path: Option<PathBuf>, force: bool) -> Result<()> {
        let target_dir = match path {
            Some(dir) => dir,
            None => self.project_root.clone(),
        };
        let config_path = target_dir.join("callflow.toml");
        info!("Initializing callflow in: {}", target_dir.display());

        if config_path.exists() && !force {
            bail!("{} already exists (use --force to overwrite)", config_path.display());
        }

        let mut config = Config::default();
        if let Some(name) = target_dir.file_name().and_then(|n| n.to_str()) {
            config.project.name = name.to_string();
        }
        std::fs::create_dir_all(&target_dir)
            .with_context(|| format!("Failed to create {}", target_dir.display()))?;
        config.save(&config_path)?;

        info!("✅ Wrote {}", config_path.display());
        Ok(())
    }

    pub fn analyze(
        &self,
        type_name: &str,
        method: &str,
        format: Option<OutputFormat>,
        output: Option<PathBuf>,
        strategy: Option<Strategy>,
    ) -> Result<()> {
        info!("🔍 Analyzing {}.{}", type_name, method);
        let graph = self.graph(type_name, method, strategy)?;
        let format = format.unwrap_or(self.config.output.format);
        let rendered = self.renderer.render(&graph, format)?;

        info!(
            "🔗 Found {} methods across {} types",
            graph.len(),
            graph.types().len()
        );
        self.emit(&rendered, output.as_deref())
    }

    /// Analyze several entry points concurrently; each gets its own traversal
    pub async fn batch(
        &self,
        entries: Vec<String>,
        format: Option<OutputFormat>,
        output_dir: Option<PathBuf>,
        strategy: Option<Strategy>,
    ) -> Result<Vec<PathBuf>> {
        let entries = entries
            .iter()
            .map(|raw| BatchEntry::parse(raw))
            .collect::<Result<Vec<_>>>()?;
        let format = format.unwrap_or(self.config.output.format);
        let output_dir = output_dir.unwrap_or_else(|| self.project_root.join(&self.config.output.output_dir));
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        info!("📦 Batch analysis of {} entry points", entries.len());
        let builder = Arc::new(self.builder(strategy)?);

        let mut tasks = Vec::new();
        for entry in entries {
            let builder = Arc::clone(&builder);
            tasks.push(tokio::task::spawn_blocking(move || {
                let graph = builder.analyze(&entry.type_name, &entry.method);
                (entry, graph)
            }));
        }

        let mut written = Vec::new();
        for task in tasks {
            let (entry, graph) = task.await.context("Batch analysis task failed")?;
            if graph.is_empty() {
                warn!("⚠️ No call graph for {}.{}", entry.type_name, entry.method);
            }

            let rendered = self.renderer.render(&graph, format)?;
            let path = output_dir.join(format!("{}.{}", entry.file_stem(), format.extension()));
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        info!("✅ Wrote {} reports to {}", written.len(), output_dir.display());
        Ok(written)
    }

    /// Find the controller declaring `method` and analyze from there
    pub fn endpoint(
        &self,
        method: &str,
        controller: Option<&str>,
        format: Option<OutputFormat>,
        output: Option<PathBuf>,
        strategy: Option<Strategy>,
    ) -> Result<()> {
        let type_name = self.find_controller(method, controller, strategy)?;
        info!("🌐 Endpoint {} is handled by {}", method, type_name);
        self.analyze(&type_name, method, format, output, strategy)
    }

    fn find_controller(&self, method: &str, controller: Option<&str>, strategy: Option<Strategy>) -> Result<String> {
        let analyzer = create_analyzer(strategy.unwrap_or(self.config.analysis.strategy))?;
        let mut candidates = Vec::new();

        for root in &self.config.project.source_roots {
            let root = self.project_root.join(root);
            if !root.is_dir() {
                continue;
            }
            for entry in WalkDir::new(&root).into_iter().filter_map(|e| e.ok()) {
                let Some(file_name) = entry.file_name().to_str() else {
                    continue;
                };
                let wanted = match controller {
                    Some(name) => file_name == format!("{}.java", name),
                    None => file_name.ends_with("Controller.java"),
                };
                if wanted && entry.file_type().is_file() {
                    candidates.push(entry.into_path());
                }
            }
        }
        candidates.sort();

        for path in candidates {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let unit = match analyzer.parse(&content, &path) {
                Ok(unit) => unit,
                Err(e) => {
                    warn!("Skipping {}: {}", path.display(), e);
                    continue;
                }
            };
            if let Some(ty) = unit.types.iter().find(|t| t.find_method(method).is_some()) {
                return Ok(unit.qualify(&ty.name));
            }
        }

        bail!("No controller declares a method named '{}'", method)
    }

    fn emit(&self, rendered: &str, output: Option<&Path>) -> Result<()> {
        match output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, rendered)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("✅ Report written to {}", path.display());
            }
            None => println!("{}", rendered),
        }
        Ok(())
    }
}
