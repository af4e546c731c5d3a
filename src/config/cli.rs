use crate::core::Storage;
use crate::utils::error::{Result, StadiumError};
use std::fs;
use std::path::Path;

/// Filesystem storage rooted at `base_path`. Absolute paths bypass the root.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(".".to_string())
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    /// Writes through a `.part` sibling and renames it into place, so an
    /// interrupted run never leaves a truncated report behind.
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if full_path.is_dir() {
            return Err(StadiumError::ValidationError {
                message: format!("output path {} is a directory", full_path.display()),
            });
        }

        if let Some(parent) = full_path.parent() {
            if parent.is_file() {
                return Err(StadiumError::ValidationError {
                    message: format!("output directory {} is a file", parent.display()),
                });
            }
            fs::create_dir_all(parent)?;
        }

        let mut part_name = full_path.clone().into_os_string();
        part_name.push(".part");
        let part_path = std::path::PathBuf::from(part_name);

        fs::write(&part_path, data)?;
        fs::rename(&part_path, &full_path)?;
        tracing::debug!("Wrote {} bytes to {}", data.len(), full_path.display());
        Ok(())
    }
}
