//! Input manager for loading uploaded documents

use crate::error::{Result, ResumeScorerError};
use crate::input::file_detector::DocumentFormat;
use log::info;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

/// Loads document bytes from disk and detects the declared format.
///
/// The parser strategies operate on raw bytes, so the manager never
/// interprets file contents; it only routes by extension and caches reads
/// for repeated scoring of the same file.
pub struct InputManager {
    cache: HashMap<String, Vec<u8>>,
    enable_cache: bool,
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    /// Read document bytes and return them with the detected format.
    pub async fn load(&mut self, path: &Path) -> Result<(Vec<u8>, DocumentFormat)> {
        let path_str = path.to_string_lossy().to_string();

        if !path.exists() {
            return Err(ResumeScorerError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let format = self.detect_format(path)?;
        if format == DocumentFormat::Unknown {
            return Err(ResumeScorerError::UnsupportedFormat(format!(
                "Unsupported file type for: {}",
                path.display()
            )));
        }

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached bytes for: {}", path.display());
                return Ok((cached.clone(), format));
            }
        }

        info!("Reading {} document: {}", format, path.display());
        let bytes = fs::read(path).await?;

        if self.enable_cache {
            self.cache.insert(path_str, bytes.clone());
        }

        Ok((bytes, format))
    }

    fn detect_format(&self, path: &Path) -> Result<DocumentFormat> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .ok_or_else(|| {
                ResumeScorerError::InvalidInput(format!("File has no extension: {}", path.display()))
            })?;

        Ok(DocumentFormat::from_extension(extension))
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}
