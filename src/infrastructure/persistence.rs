use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Destination for downloaded documents.
pub trait DocumentSink {
    /// Stores `bytes` under `file_name`, returning where they ended up.
    fn save(&self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// Writes downloads into one directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DownloadDirectory {
    root: PathBuf,
}

impl DownloadDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DocumentSink for DownloadDirectory {
    fn save(&self, file_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let name = Path::new(file_name)
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty file name"))?;
        fs::create_dir_all(&self.root)?;
        let path = self.root.join(name);
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_writes_bytes() {
        let dir = TempDir::new().unwrap();
        let sink = DownloadDirectory::new(dir.path());
        let path = sink.save("W7_Ana_Gomez.pdf", b"%PDF-1.7").unwrap();
        assert_eq!(path, dir.path().join("W7_Ana_Gomez.pdf"));
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.7");
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("forms").join("2026");
        let sink = DownloadDirectory::new(&nested);
        let path = sink.save("form_w7_filled.pdf", b"%PDF").unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let sink = DownloadDirectory::new(dir.path());
        sink.save("form.pdf", b"old").unwrap();
        let path = sink.save("form.pdf", b"new").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"new");
    }

    #[test]
    fn test_save_rejects_empty_name() {
        let dir = TempDir::new().unwrap();
        let sink = DownloadDirectory::new(dir.path());
        assert!(sink.save("", b"%PDF").is_err());
    }
}
