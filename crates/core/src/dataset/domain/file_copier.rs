use std::path::Path;

/// Copies a single file, keeping whatever metadata the implementation supports.
pub trait FileCopier: Send {
    fn copy(&self, from: &Path, to: &Path) -> Result<(), Box<dyn std::error::Error>>;
}
