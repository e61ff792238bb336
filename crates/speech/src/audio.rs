//! RAII guard for synthesized audio files.

use std::path::{Path, PathBuf};

/// A temporary audio file that removes itself when dropped.
///
/// The guard is the only owner of the file: whichever way the pipeline
/// exits (upload succeeded, upload failed, panic unwound), the file is
/// gone once the guard goes out of scope.
#[derive(Debug)]
pub struct AudioFile {
    path: Option<PathBuf>,
}

impl AudioFile {
    /// Take ownership of an audio file on disk. The file is deleted
    /// when the guard drops.
    pub fn new(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Location of the audio file on disk.
    pub fn path(&self) -> &Path {
        self.path
            .as_deref()
            .expect("path is only taken by keep() or Drop")
    }

    /// Read the full audio contents.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(self.path()).await
    }

    /// Disarm the guard and return the path; the file is no longer
    /// deleted automatically.
    pub fn keep(mut self) -> PathBuf {
        self.path.take().expect("keep() called once")
    }
}

impl Drop for AudioFile {
    fn drop(&mut self) {
        if let Some(path) = self.path.take() {
            if let Err(e) = std::fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove audio file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp3");
        std::fs::write(&path, b"audio").unwrap();

        {
            let _audio = AudioFile::new(path.clone());
        }
        assert!(!path.exists());
    }

    #[test]
    fn keep_disarms_the_guard() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp3");
        std::fs::write(&path, b"audio").unwrap();

        let kept = AudioFile::new(path.clone()).keep();
        assert_eq!(kept, path);
        assert!(path.exists());
    }

    #[tokio::test]
    async fn read_returns_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp3");
        std::fs::write(&path, b"audio-bytes").unwrap();

        let audio = AudioFile::new(path);
        assert_eq!(audio.read().await.unwrap(), b"audio-bytes");
    }
}
