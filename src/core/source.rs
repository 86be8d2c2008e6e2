// src/core/source.rs - Locating Java source text for a qualified type name
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{CallflowError, Result};

/// Source text of the file declaring a type
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Qualified name the file was looked up for
    pub type_name: String,
    pub path: PathBuf,
    pub content: String,
}

/// Capability the call graph builder consumes to read sources.
///
/// `Ok(None)` means the type has no source in this project; an error means a
/// file was found but could not be read.
pub trait SourceLocator: Send + Sync {
    fn source_for(&self, type_name: &str) -> Result<Option<SourceFile>>;
}

/// Looks types up under the configured source roots of a project
pub struct FsSourceLocator {
    project_root: PathBuf,
    source_roots: Vec<PathBuf>,
    module_prefixes: Vec<String>,
    convention_packages: Vec<String>,
    search_fallback: bool,
    ignore_patterns: Vec<String>,
    max_file_size: usize,
}

impl FsSourceLocator {
    pub fn new<P: AsRef<Path>>(project_root: P, config: &Config) -> Self {
        let project_root = project_root.as_ref().to_path_buf();
        let source_roots = config
            .project
            .source_roots
            .iter()
            .map(|root| {
                if root.is_absolute() {
                    root.clone()
                } else {
                    project_root.join(root)
                }
            })
            .collect();

        Self {
            project_root,
            source_roots,
            module_prefixes: config.project.module_prefixes.clone(),
            convention_packages: config
                .analysis
                .conventions
                .iter()
                .map(|rule| rule.package.clone())
                .collect(),
            search_fallback: config.project.search_fallback,
            ignore_patterns: config.project.ignore_patterns.clone(),
            max_file_size: config.project.max_file_size,
        }
    }

    /// Candidate paths in lookup order, before any fallback walk
    fn candidates(&self, type_name: &str) -> Vec<PathBuf> {
        let (package, simple) = match type_name.rsplit_once('.') {
            Some((package, simple)) => (package, simple),
            None => ("", type_name),
        };
        let file_name = format!("{}.java", simple);
        let package_path: PathBuf = package.split('.').filter(|s| !s.is_empty()).collect();

        let mut candidates: Vec<PathBuf> = self
            .source_roots
            .iter()
            .map(|root| root.join(&package_path).join(&file_name))
            .collect();

        let segment = package.rsplit('.').next().unwrap_or(package);
        if self.convention_packages.iter().any(|p| p == segment) {
            for prefix in &self.module_prefixes {
                let prefix_path: PathBuf = prefix.split('.').filter(|s| !s.is_empty()).collect();
                for root in &self.source_roots {
                    let candidate = root.join(&prefix_path).join(segment).join(&file_name);
                    if !candidates.contains(&candidate) {
                        candidates.push(candidate);
                    }
                }
            }
        }

        candidates
    }

    /// Gitignore-aware walk of the roots for `<Simple>.java`; first hit in path order wins
    fn search(&self, simple: &str) -> Result<Option<PathBuf>> {
        let file_name = format!("{}.java", simple);
        let mut hits = Vec::new();

        for root in self.source_roots.iter().filter(|r| r.is_dir()) {
            let mut overrides = OverrideBuilder::new(root);
            for pattern in &self.ignore_patterns {
                overrides
                    .add(&format!("!{}", pattern))
                    .map_err(|e| CallflowError::Config(format!("Invalid ignore pattern {}: {}", pattern, e)))?;
            }
            let overrides = overrides
                .build()
                .map_err(|e| CallflowError::Config(e.to_string()))?;

            let walker = WalkBuilder::new(root)
                .hidden(false)
                .git_ignore(true)
                .overrides(overrides)
                .build();

            for entry in walker {
                let entry = entry.map_err(|e| CallflowError::FileSystem(e.to_string()))?;
                let path = entry.path();
                if path.is_file() && path.file_name().and_then(|n| n.to_str()) == Some(file_name.as_str()) {
                    hits.push(path.to_path_buf());
                }
            }
        }

        hits.sort();
        Ok(hits.into_iter().next())
    }

    fn read(&self, type_name: &str, path: &Path) -> Result<Option<SourceFile>> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Ok(None);
        }
        if metadata.len() as usize > self.max_file_size {
            warn!(
                "Skipping {} ({} bytes exceeds the {} byte limit)",
                path.display(),
                metadata.len(),
                self.max_file_size
            );
            return Ok(None);
        }

        let bytes = std::fs::read(path).map_err(|e| CallflowError::SourceLookup {
            type_name: type_name.to_string(),
            reason: format!("{}: {}", path.display(), e),
        })?;
        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                debug!("{} is not valid UTF-8, decoding lossily", path.display());
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };

        Ok(Some(SourceFile {
            type_name: type_name.to_string(),
            path: path.to_path_buf(),
            content,
        }))
    }
}

impl SourceLocator for FsSourceLocator {
    fn source_for(&self, type_name: &str) -> Result<Option<SourceFile>> {
        for candidate in self.candidates(type_name) {
            if let Some(file) = self.read(type_name, &candidate)? {
                debug!("Located {} at {}", type_name, candidate.display());
                return Ok(Some(file));
            }
        }

        if self.search_fallback {
            let simple = type_name.rsplit('.').next().unwrap_or(type_name);
            if let Some(path) = self.search(simple)? {
                debug!("Located {} by search at {}", type_name, path.display());
                return self.read(type_name, &path);
            }
        }

        debug!(
            "No source for {} under {}",
            type_name,
            self.project_root.display()
        );
        Ok(None)
    }
}
