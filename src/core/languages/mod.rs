//! Java analyzers behind a single capability
//!
//! Both strategies summarize a compilation unit into the same [`ParsedUnit`]
//! so the call graph builder never needs to know which one is in use.

mod java;
mod java_text;

pub use java::StructuralAnalyzer;
pub use java_text::HeuristicAnalyzer;

use std::path::Path;
use std::sync::Arc;

use crate::config::Strategy;
use crate::error::Result;
use super::ParsedUnit;

/// Trait that all Java analyzers must implement
pub trait Analyzer: Send + Sync {
    /// Summarize a compilation unit, or fail with a parser error if it is malformed
    fn parse(&self, content: &str, file_path: &Path) -> Result<ParsedUnit>;

    /// Which strategy this analyzer implements
    fn strategy(&self) -> Strategy;
}

/// Build the analyzer selected by configuration
pub fn create_analyzer(strategy: Strategy) -> Result<Arc<dyn Analyzer>> {
    match strategy {
        Strategy::Heuristic => Ok(Arc::new(HeuristicAnalyzer::new()?)),
        Strategy::Structural => Ok(Arc::new(StructuralAnalyzer::new()?)),
    }
}
