// orderly-core/src/infrastructure/fs.rs

use crate::infrastructure::error::InfrastructureError;
use std::fs;
use std::io::Write;
use std::path::{Component, Path};

/// Replaces `path` with `content` through a temporary sibling file, so
/// readers see either the previous artifact or the complete new one.
///
/// Missing parent directories are created.
pub fn atomic_write<P: AsRef<Path>, C: AsRef<[u8]>>(
    path: P,
    content: C,
) -> Result<(), InfrastructureError> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    // Same directory as the target so the rename never crosses filesystems
    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_ref())?;
    temp_file
        .persist(path)
        .map_err(|e| InfrastructureError::Io(e.error))?;

    Ok(())
}

/// True when `relative` names something strictly inside the directory it is
/// joined to: no root, prefix or `..` component, and not the directory itself.
pub fn is_contained(relative: &Path) -> bool {
    let mut named = false;
    for component in relative.components() {
        match component {
            Component::Normal(_) => named = true,
            Component::CurDir => {}
            _ => return false,
        }
    }
    named
}
