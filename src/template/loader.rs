//! File loading for template fragments and embeds

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::TemplateError;

/// Source of template and embed file content
pub trait FileLoader {
    /// Load the content of the named file
    fn load(&self, name: &str) -> Result<String, TemplateError>;
}

/// Loads files relative to a base directory
#[derive(Debug, Clone, Default)]
pub struct DirectoryLoader {
    /// Base path for resolving relative file names
    base_path: Option<PathBuf>,
}

impl DirectoryLoader {
    /// Create a loader resolving names against the working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with a base path for file resolution
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: Some(base_path.into()),
        }
    }

    /// Resolve a relative name to a path
    pub fn resolve_path(&self, relative: &str) -> PathBuf {
        if let Some(base) = &self.base_path {
            base.join(relative)
        } else {
            PathBuf::from(relative)
        }
    }
}

impl FileLoader for DirectoryLoader {
    fn load(&self, name: &str) -> Result<String, TemplateError> {
        let full_path = self.resolve_path(name);

        std::fs::read_to_string(&full_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => TemplateError::NotFound {
                name: name.to_string(),
            },
            _ => TemplateError::FileReadError {
                path: full_path.clone(),
                message: e.to_string(),
            },
        })
    }
}

/// In-memory file set
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, replacing any previous content under that name
    pub fn with_file(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<String>) {
        self.files.insert(name.into(), content.into());
    }
}

impl FileLoader for MemoryLoader {
    fn load(&self, name: &str) -> Result<String, TemplateError> {
        self.files
            .get(name)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_loader_get() {
        let loader = MemoryLoader::new().with_file("title.md", "# <% content %>");
        assert_eq!(loader.load("title.md").expect("loads"), "# <% content %>");
    }

    #[test]
    fn test_memory_loader_not_found() {
        let result = MemoryLoader::new().load("nope.md");
        assert!(matches!(result, Err(TemplateError::NotFound { name }) if name == "nope.md"));
    }

    #[test]
    fn test_directory_loader_resolves_against_base() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("tpl")).expect("mkdir");
        std::fs::write(dir.path().join("tpl/base.md"), "<% content %>!").expect("write");

        let loader = DirectoryLoader::with_base_path(dir.path());
        assert_eq!(loader.resolve_path("tpl/base.md"), dir.path().join("tpl/base.md"));
        assert_eq!(loader.load("tpl/base.md").expect("loads"), "<% content %>!");
    }

    #[test]
    fn test_directory_loader_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loader = DirectoryLoader::with_base_path(dir.path());
        let result = loader.load("missing.md");
        assert!(matches!(result, Err(TemplateError::NotFound { .. })));
    }

    #[test]
    fn test_resolve_path_without_base() {
        let loader = DirectoryLoader::new();
        assert_eq!(loader.resolve_path("a/b.md"), PathBuf::from("a/b.md"));
    }
}
