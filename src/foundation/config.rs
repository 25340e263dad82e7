use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::foundation::{
    core::Fps,
    error::{ReelError, ReelResult},
};

/// Where sequences live inside a dataset root.
///
/// Both subdirectories hold one directory per sequence; overlay files mirror base files by stem.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DatasetLayout {
    /// Dataset root directory.
    pub root: PathBuf,
    /// Base-image root relative to `root`.
    pub base_subdir: PathBuf,
    /// Overlay (annotation) root relative to `root`.
    pub overlay_subdir: PathBuf,
    /// Extension given to overlay filenames, without the dot.
    pub overlay_extension: String,
}

impl DatasetLayout {
    /// Layout rooted at `root` with the default DAVIS 480p subdirectories.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn base_root(&self) -> PathBuf {
        self.root.join(&self.base_subdir)
    }

    pub fn overlay_root(&self) -> PathBuf {
        self.root.join(&self.overlay_subdir)
    }
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("DAVIS"),
            base_subdir: PathBuf::from("JPEGImages/480p"),
            overlay_subdir: PathBuf::from("Annotations/480p"),
            overlay_extension: "png".to_owned(),
        }
    }
}

/// Immutable parameters of one assembly run.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AssemblyConfig {
    pub dataset: DatasetLayout,
    /// Overlay weight `α` in `base * (1 - α) + overlay * α`.
    pub opacity: f32,
    pub fps: Fps,
    /// Sort per-sequence frame listings lexically instead of using directory order.
    pub sort_frames: bool,
    /// Seed for sequence sampling. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Remove the partially written output when a run fails after encoding started.
    pub cleanup_partial_output: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetLayout::default(),
            opacity: 0.5,
            fps: Fps::default(),
            sort_frames: true,
            seed: None,
            cleanup_partial_output: true,
        }
    }
}

impl AssemblyConfig {
    /// Load a JSON config file. Missing fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .map_err(|e| ReelError::config(format!("parse '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ReelResult<()> {
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(ReelError::config(format!(
                "opacity must be within [0, 1], got {}",
                self.opacity
            )));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        let ext = self.dataset.overlay_extension.trim_start_matches('.');
        if ext.is_empty() {
            return Err(ReelError::config("overlay extension must not be empty"));
        }
        Ok(())
    }
}
