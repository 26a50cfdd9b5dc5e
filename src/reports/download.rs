//! Hand generated reports to the host for saving

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8;";

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid file name: {0:?}")]
    InvalidFileName(String),
}

/// Host capability that offers a file to the user
pub trait FileSaver {
    fn save(&self, content: &[u8], mime_type: &str, filename: &str) -> Result<(), DownloadError>;
}

/// Saves downloads into a fixed directory
pub struct DirectoryFileSaver {
    output_dir: PathBuf,
}

impl DirectoryFileSaver {
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Self {
        DirectoryFileSaver {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    /// Where `filename` ends up once saved
    pub fn target_path(&self, filename: &str) -> Result<PathBuf, DownloadError> {
        if filename.is_empty()
            || filename == "."
            || filename == ".."
            || filename.contains('/')
            || filename.contains('\\')
        {
            return Err(DownloadError::InvalidFileName(filename.to_string()));
        }
        Ok(self.output_dir.join(filename))
    }
}

impl FileSaver for DirectoryFileSaver {
    fn save(&self, content: &[u8], mime_type: &str, filename: &str) -> Result<(), DownloadError> {
        let target = self.target_path(filename)?;
        fs::create_dir_all(&self.output_dir)?;

        // Write beside the target and rename so readers never see a partial file
        let tmp = self.output_dir.join(format!(".{}.part", filename));
        if let Err(e) = fs::write(&tmp, content).and_then(|()| fs::rename(&tmp, &target)) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }

        log::info!(
            "Saved {} ({}, {} bytes) to {:?}",
            filename,
            mime_type,
            content.len(),
            target
        );
        Ok(())
    }
}

/// Offer `content` to the user as a UTF-8 CSV file named `filename`
pub fn download_csv(saver: &dyn FileSaver, content: &str, filename: &str) -> Result<(), DownloadError> {
    saver.save(content.as_bytes(), CSV_MIME_TYPE, filename)
}
