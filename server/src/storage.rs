use anyhow::{anyhow, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Directory that uploaded artifacts are written into before extraction.
#[derive(Debug, Clone)]
pub struct UploadDir {
    root: PathBuf,
}

impl UploadDir {
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self> {
        fs::create_dir_all(root.as_ref())?;
        Ok(Self { root: root.as_ref().to_path_buf() })
    }

    /// Persist `bytes` under the base name of `file_name`; directory components are discarded.
    pub fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf> {
        let base = Path::new(file_name)
            .file_name()
            .ok_or_else(|| anyhow!("invalid file name: {file_name:?}"))?;
        let path = self.root.join(base);
        let mut f = File::create(&path)?;
        f.write_all(bytes)?;
        Ok(path)
    }
}
