use std::fs::{self, File, FileTimes};
use std::io;
use std::path::Path;

use crate::dataset::domain::file_copier::FileCopier;

/// Copies files byte-for-byte, then restores the source's permissions and
/// access/modification times on the copy.
pub struct FsFileCopier;

impl FsFileCopier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FsFileCopier {
    fn default() -> Self {
        Self::new()
    }
}

impl FileCopier for FsFileCopier {
    fn copy(&self, from: &Path, to: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let mut source = File::open(from)?;
        let metadata = source.metadata()?;
        let mut dest = File::create(to)?;
        io::copy(&mut source, &mut dest)?;

        let mut times = FileTimes::new().set_modified(metadata.modified()?);
        if let Ok(accessed) = metadata.accessed() {
            times = times.set_accessed(accessed);
        }
        // Times go through the write handle; permissions last, since they may
        // drop write access.
        dest.set_times(times)?;
        drop(dest);
        fs::set_permissions(to, metadata.permissions())?;
        Ok(())
    }
}
