//! Tracking of the files currently being expanded

use crate::error::TemplateError;

/// Ordered set of file names on the current expansion path (for cycle detection)
#[derive(Debug, Clone, Default)]
pub struct ExpansionChain {
    resolving: Vec<String>,
}

impl ExpansionChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files on the path
    pub fn depth(&self) -> usize {
        self.resolving.len()
    }

    /// Check if a file is currently being resolved
    pub fn is_resolving(&self, name: &str) -> bool {
        self.resolving.iter().any(|n| n == name)
    }

    /// Mark a file as being resolved, failing if it already is
    pub fn start_resolving(&mut self, name: &str) -> Result<(), TemplateError> {
        if self.is_resolving(name) {
            return Err(TemplateError::CircularReference {
                chain: format!("{} -> {}", self.resolving.join(" -> "), name),
            });
        }
        self.resolving.push(name.to_string());
        Ok(())
    }

    /// Mark the most recent file as done resolving
    pub fn done_resolving(&mut self) {
        self.resolving.pop();
    }
}
