use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::OutputDirError;

/// Name of the default clip directory created next to the executable.
pub const DEFAULT_CLIP_DIR: &str = "clips";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub output_dir: PathBuf,
}

impl AppConfig {
    /// Resolve the output directory from the `-d` override or the default
    /// `clips` directory beside the running binary. Nothing is created yet.
    pub fn from_override(path: Option<PathBuf>) -> Result<Self, OutputDirError> {
        let output_dir = match path {
            Some(custom) => custom,
            None => default_output_dir()?,
        };
        Ok(Self { output_dir })
    }

    /// Create the output directory if needed; fail if the path is taken by a
    /// non-directory.
    pub fn prepare_output_dir(&self) -> Result<&Path, OutputDirError> {
        ensure_dir(&self.output_dir)?;
        Ok(&self.output_dir)
    }
}

fn ensure_dir(path: &Path) -> Result<(), OutputDirError> {
    if path.exists() {
        return if path.is_dir() {
            Ok(())
        } else {
            Err(OutputDirError::NotADirectory(path.to_path_buf()))
        };
    }
    fs::create_dir_all(path).map_err(|source| OutputDirError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "created output directory");
    Ok(())
}

fn default_output_dir() -> Result<PathBuf, OutputDirError> {
    let exe = std::env::current_exe().map_err(OutputDirError::ExecutableLocation)?;
    let dir = exe.parent().ok_or_else(|| {
        OutputDirError::ExecutableLocation(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("executable path {:?} has no parent directory", exe),
        ))
    })?;
    Ok(dir.join(DEFAULT_CLIP_DIR))
}
