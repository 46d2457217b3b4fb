use std::path::{Path, PathBuf};

use tracing::debug;

use crate::relight::common::error::{RelightError, Result};

/// Navigation order of scenes, one name per line of a text file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneList {
    names: Vec<String>,
}

impl SceneList {
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RelightError::SceneList {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let list = Self::parse(&text).map_err(|_| RelightError::SceneList {
            path: path.to_path_buf(),
            reason: "no scene names".to_string(),
        })?;
        debug!(path = %path.display(), scenes = list.len(), "Read scene list");
        Ok(list)
    }

    /// Blank lines and surrounding whitespace are ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let names = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect();
        Self::from_names(names)
    }

    pub fn from_names(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(RelightError::SceneList {
                path: PathBuf::new(),
                reason: "no scene names".to_string(),
            });
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Map any index, negative or past the end, onto the list.
    pub fn wrap(&self, index: i64) -> usize {
        index.rem_euclid(self.names.len() as i64) as usize
    }
}
