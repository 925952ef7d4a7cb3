use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::acquisition::AcquisitionPeriod;
use crate::error::{ModisError, ModisResult};

/// Which directory entries a step processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Every regular file.
    AnyFile,
    /// Regular files whose extension matches exactly (case-sensitive).
    Extension(&'static str),
}

impl Selection {
    pub fn matches(&self, path: &Path) -> bool {
        match self {
            Selection::AnyFile => true,
            Selection::Extension(wanted) => {
                path.extension().and_then(|ext| ext.to_str()) == Some(*wanted)
            }
        }
    }
}

/// Lists the direct children of `dir` that match `selection` and fall in
/// `period`, sorted by file name.
pub fn list_inputs(
    dir: &Path,
    selection: Selection,
    period: &AcquisitionPeriod,
) -> ModisResult<Vec<PathBuf>> {
    let mut inputs = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| ModisError::Listing {
            dir: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if !entry.file_type().is_file() || !selection.matches(path) {
            continue;
        }
        if !period.includes(path) {
            debug!("Skipping {}: outside acquisition period", path.display());
            continue;
        }

        inputs.push(path.to_path_buf());
    }

    Ok(inputs)
}

/// `<dir>/<input stem><suffix>.tif`
pub fn output_path(dir: &Path, input: &Path, suffix: &str) -> ModisResult<PathBuf> {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| ModisError::InvalidPath(input.to_path_buf()))?;

    Ok(dir.join(format!("{}{}.tif", stem, suffix)))
}

/// Creates `dir` (and parents) before a step writes into it.
pub fn ensure_output_dir(dir: &Path) -> ModisResult<()> {
    std::fs::create_dir_all(dir).map_err(|e| ModisError::write(dir, e))
}
