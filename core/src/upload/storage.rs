use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

use crate::errors::ToolkitError;
use crate::random::random_string;

/// Length of the random stem used when renaming uploads.
pub const RENAMED_STEM_LEN: usize = 25;

/// Chooses the stored file name for an upload.
///
/// Renamed files get a fresh random stem and keep the original extension;
/// otherwise the original name is used as is.
pub fn assign_name(original: &str, rename: bool) -> String {
    if rename {
        format!("{}{}", random_string(RENAMED_STEM_LEN), extension(original))
    } else {
        original.to_string()
    }
}

/// Extension including its leading dot, or `""`.
pub fn extension(name: &str) -> &str {
    name.rfind('.').map_or("", |i| &name[i..])
}

/// Copies `reader` into `<dir>/<name>`, syncs it, and returns the bytes written.
///
/// A file that could not be written completely is removed again.
pub fn persist<R: Read>(reader: &mut R, dir: &Path, name: &str) -> Result<u64, ToolkitError> {
    let path = dir.join(name);
    let mut file = File::create(&path).map_err(|source| ToolkitError::PersistenceFailed {
        path: path.clone(),
        source,
    })?;

    let copied = io::copy(reader, &mut file).and_then(|n| file.sync_all().map(|_| n));
    match copied {
        Ok(n) => Ok(n),
        Err(source) => {
            drop(file);
            if let Err(e) = fs::remove_file(&path) {
                log::warn!("could not remove partial upload {}: {}", path.display(), e);
            }
            Err(ToolkitError::PersistenceFailed { path, source })
        }
    }
}
