use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::{
    config::DatasetLayout,
    error::{ReelError, ReelResult},
};

/// Resolved paths of one base frame and its overlay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FramePair {
    pub sequence: String,
    pub base: PathBuf,
    pub overlay: PathBuf,
}

/// Lists sequences and frames of a dataset laid out per [`DatasetLayout`].
#[derive(Clone, Debug)]
pub struct DatasetAccessor {
    base_root: PathBuf,
    overlay_root: PathBuf,
    overlay_extension: String,
    sort_frames: bool,
}

impl DatasetAccessor {
    pub fn new(layout: &DatasetLayout, sort_frames: bool) -> Self {
        Self {
            base_root: layout.base_root(),
            overlay_root: layout.overlay_root(),
            overlay_extension: layout.overlay_extension.trim_start_matches('.').to_owned(),
            sort_frames,
        }
    }

    /// Names of all non-hidden sequences (subdirectories of the base root), sorted.
    ///
    /// Fails with [`ReelError::DatasetMissing`] when the base root does not exist.
    pub fn sequence_names(&self) -> ReelResult<Vec<String>> {
        if !self.base_root.is_dir() {
            return Err(ReelError::DatasetMissing {
                path: self.base_root.clone(),
            });
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.base_root)
            .with_context(|| format!("list sequences in '{}'", self.base_root.display()))?
        {
            let entry = entry.with_context(|| format!("read '{}'", self.base_root.display()))?;
            if is_hidden(&entry) {
                continue;
            }
            let path = entry.path();
            // Follows symlinks; a dangling link is an integrity error, not an absent sequence.
            let meta = fs::metadata(&path)
                .with_context(|| format!("inspect sequence '{}'", path.display()))?;
            if !meta.is_dir() {
                continue;
            }
            let name = entry.file_name().into_string().map_err(|_| {
                anyhow::anyhow!("sequence name '{}' is not valid UTF-8", path.display())
            })?;
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    /// Base-frame filenames of one sequence.
    ///
    /// Only non-hidden regular files (or symlinks to them) are listed. Order is lexical when
    /// sorting is enabled, otherwise whatever the filesystem returns.
    pub fn frame_names(&self, sequence: &str) -> ReelResult<Vec<String>> {
        let dir = self.base_root.join(sequence);
        let mut names = Vec::new();
        for entry in
            fs::read_dir(&dir).with_context(|| format!("list frames in '{}'", dir.display()))?
        {
            let entry = entry.with_context(|| format!("read '{}'", dir.display()))?;
            if is_hidden(&entry) {
                continue;
            }
            let path = entry.path();
            let meta = fs::metadata(&path).map_err(|e| ReelError::frame_load(&path, e))?;
            if !meta.is_file() {
                continue;
            }
            let name = entry
                .file_name()
                .into_string()
                .map_err(|_| ReelError::frame_load(&path, "file name is not valid UTF-8"))?;
            names.push(name);
        }
        if self.sort_frames {
            names.sort();
        }
        Ok(names)
    }

    /// Overlay filename for a base filename: same stem, overlay extension.
    pub fn overlay_name(&self, base_frame: &str) -> String {
        let stem = Path::new(base_frame)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(base_frame);
        format!("{stem}.{}", self.overlay_extension)
    }

    pub fn resolve(&self, sequence: &str, base_frame: &str) -> FramePair {
        FramePair {
            sequence: sequence.to_owned(),
            base: self.base_root.join(sequence).join(base_frame),
            overlay: self
                .overlay_root
                .join(sequence)
                .join(self.overlay_name(base_frame)),
        }
    }

    /// All frame pairs of one sequence in listing order.
    pub fn frame_pairs(&self, sequence: &str) -> ReelResult<Vec<FramePair>> {
        Ok(self
            .frame_names(sequence)?
            .iter()
            .map(|name| self.resolve(sequence, name))
            .collect())
    }
}

fn is_hidden(entry: &fs::DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().starts_with(b".")
}

#[cfg(test)]
#[path = "../../tests/unit/dataset/accessor.rs"]
mod tests;
