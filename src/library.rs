//! Sound library on disk: `<base>/<category>/*.<ext>`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::category::Category;
use crate::error::SoundError;

#[derive(Debug, Clone)]
pub struct SoundLibrary {
    base_dir: PathBuf,
    extensions: Vec<String>,
}

impl SoundLibrary {
    pub fn new(base_dir: impl Into<PathBuf>, extensions: &[String]) -> Self {
        SoundLibrary {
            base_dir: base_dir.into(),
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn category_dir(&self, category: Category) -> PathBuf {
        self.base_dir.join(category.dir_name())
    }

    /// Validate `name` and list its candidates. Unknown names never touch the filesystem.
    pub fn list_candidates(&self, name: &str) -> Result<Vec<PathBuf>, SoundError> {
        let category = Category::parse(name)?;
        Ok(self.candidates(category))
    }

    /// Audio files for a category, in directory order. A missing directory is empty.
    pub fn candidates(&self, category: Category) -> Vec<PathBuf> {
        let dir = self.category_dir(category);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No sound directory at {}", dir.display());
                return Vec::new();
            }
            Err(e) => {
                warn!("Cannot read {}: {e}", dir.display());
                return Vec::new();
            }
        };

        let files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().map(|t| !t.is_dir()).unwrap_or(false))
            .map(|entry| entry.path())
            .filter(|path| self.is_audio(path))
            .collect();

        debug!("{} candidate(s) in {}", files.len(), dir.display());
        files
    }

    fn is_audio(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|known| known.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }
}
