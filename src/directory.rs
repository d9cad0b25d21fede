//! Recursive enumeration of the payload tree.

use std::fs;
use std::path::{Path, MAIN_SEPARATOR};
use std::time::UNIX_EPOCH;

use crate::error::{PackError, Result};

/// List every regular file under `root`, as `(mtime, relative path)`
/// pairs sorted by modification time. Ties sort path-lexicographically.
///
/// Packages built from freshly generated trees come out in roughly
/// creation order this way, which keeps the layout friendly to readers
/// that consume entries sequentially. Relative paths keep the host
/// separator; OPC normalization happens at write time.
pub fn list_files(root: &Path) -> Result<Vec<(u64, String)>> {
    let mut files = Vec::new();
    visit(root, "", &mut files)?;
    files.sort();
    Ok(files)
}

fn visit(directory: &Path, relative: &str, files: &mut Vec<(u64, String)>) -> Result<()> {
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        let name = entry.file_name().into_string().map_err(|name| {
            PackError::Invariant(format!("file name {:?} is not valid unicode", name))
        })?;
        let relative_name = if relative.is_empty() {
            name
        } else {
            format!("{}{}{}", relative, MAIN_SEPARATOR, name)
        };
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            visit(&entry.path(), &relative_name, files)?;
        } else if file_type.is_file() {
            let modified = entry.metadata()?.modified()?;
            let mtime = modified
                .duration_since(UNIX_EPOCH)
                .map(|age| age.as_secs())
                .unwrap_or(0);
            files.push((mtime, relative_name));
        }
        // anything else (sockets, device nodes) is not packageable
    }
    Ok(())
}
