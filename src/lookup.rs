//! Where served files come from.

use std::collections::HashMap;
use std::io::{self, Cursor};
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs::{self, File};

use crate::{KnownSize, RangeBody, RangedStream};

/// A named, seekable collection of files.
///
/// Implementations do the blocking part of a request: sizing a file and
/// reading a window of it.
#[async_trait]
pub trait FileLookup: Send + Sync + 'static {
    type Body: RangeBody + Send + 'static;

    /// Whether `name` refers to a servable file.
    async fn exists(&self, name: &str) -> bool;

    /// Total size of `name` in bytes.
    async fn length(&self, name: &str) -> io::Result<u64>;

    /// Bytes `start..=end` of `name`.
    async fn read_range(
        &self,
        name: &str,
        start: u64,
        end: u64,
    ) -> io::Result<RangedStream<Self::Body>>;
}

/// Files in a single directory on disk. Subdirectories are not reachable.
#[derive(Debug, Clone)]
pub struct DiskLookup {
    root: PathBuf,
}

impl DiskLookup {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DiskLookup { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Joins `name` onto the root if it is a single plain file name.
    fn path(&self, name: &str) -> Option<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(file)), None) if file == name => Some(self.root.join(file)),
            _ => None,
        }
    }

    fn not_found(name: &str) -> io::Error {
        io::Error::new(io::ErrorKind::NotFound, format!("no such file: {name:?}"))
    }
}

#[async_trait]
impl FileLookup for DiskLookup {
    type Body = KnownSize<File>;

    async fn exists(&self, name: &str) -> bool {
        let Some(path) = self.path(name) else {
            return false;
        };
        fs::metadata(path).await.map(|meta| meta.is_file()).unwrap_or(false)
    }

    async fn length(&self, name: &str) -> io::Result<u64> {
        let path = self.path(name).ok_or_else(|| Self::not_found(name))?;
        Ok(fs::metadata(path).await?.len())
    }

    async fn read_range(
        &self,
        name: &str,
        start: u64,
        end: u64,
    ) -> io::Result<RangedStream<Self::Body>> {
        let path = self.path(name).ok_or_else(|| Self::not_found(name))?;
        let body = KnownSize::file(File::open(path).await?).await?;
        RangedStream::window(body, start, end)
    }
}

/// Files held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct MemoryLookup {
    files: HashMap<String, Bytes>,
}

impl MemoryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, contents: impl Into<Bytes>) -> &mut Self {
        self.files.insert(name.into(), contents.into());
        self
    }

    fn get(&self, name: &str) -> io::Result<&Bytes> {
        self.files.get(name).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no such file: {name:?}"))
        })
    }
}

#[async_trait]
impl FileLookup for MemoryLookup {
    type Body = KnownSize<Cursor<Bytes>>;

    async fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    async fn length(&self, name: &str) -> io::Result<u64> {
        Ok(self.get(name)?.len() as u64)
    }

    async fn read_range(
        &self,
        name: &str,
        start: u64,
        end: u64,
    ) -> io::Result<RangedStream<Self::Body>> {
        let contents = self.get(name)?.clone();
        let body = KnownSize::seek(Cursor::new(contents)).await?;
        RangedStream::window(body, start, end)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use futures::TryStreamExt;

    use super::*;

    async fn read_to_vec<L: FileLookup>(
        lookup: &L,
        name: &str,
        start: u64,
        end: u64,
    ) -> io::Result<Vec<u8>> {
        let stream = lookup.read_range(name, start, end).await?;
        let chunks: Vec<Bytes> = stream.try_collect().await?;
        Ok(chunks.concat())
    }

    #[tokio::test]
    async fn test_disk_lookup() {
        let lookup = DiskLookup::new("test");

        assert!(lookup.exists("fixture.txt").await);
        assert_eq!(54, lookup.length("fixture.txt").await.unwrap());
        assert_eq!(b"Hello".to_vec(), read_to_vec(&lookup, "fixture.txt", 0, 4).await.unwrap());
        assert_eq!(b"on!\n".to_vec(), read_to_vec(&lookup, "fixture.txt", 50, 53).await.unwrap());
    }

    #[tokio::test]
    async fn test_disk_lookup_missing_file() {
        let lookup = DiskLookup::new("test");

        assert!(!lookup.exists("missing.mp4").await);
        let err = lookup.length("missing.mp4").await.unwrap_err();
        assert_eq!(io::ErrorKind::NotFound, err.kind());
        let err = lookup.read_range("missing.mp4", 0, 0).await.unwrap_err();
        assert_eq!(io::ErrorKind::NotFound, err.kind());
    }

    #[tokio::test]
    async fn test_disk_lookup_rejects_paths() {
        // `src` holds lib.rs, none of these may reach it
        let lookup = DiskLookup::new("test");
        let names = [
            "",
            ".",
            "..",
            "../src/lib.rs",
            "/etc/passwd",
            "sub/fixture.txt",
            "./fixture.txt",
        ];

        for name in names {
            assert!(!lookup.exists(name).await, "{name:?}");
            let err = lookup.length(name).await.unwrap_err();
            assert_eq!(io::ErrorKind::NotFound, err.kind(), "{name:?}");
        }
    }

    #[tokio::test]
    async fn test_disk_lookup_directory_is_not_a_file() {
        let lookup = DiskLookup::new(".");
        assert!(!lookup.exists("test").await);
    }

    #[tokio::test]
    async fn test_disk_lookup_window_past_eof() {
        let lookup = DiskLookup::new("test");
        let err = lookup.read_range("fixture.txt", 10, 54).await.unwrap_err();
        assert_eq!(io::ErrorKind::UnexpectedEof, err.kind());
    }

    #[tokio::test]
    async fn test_memory_lookup() {
        let mut lookup = MemoryLookup::new();
        lookup.insert("clip.webm", &b"0123456789"[..]);

        assert!(lookup.exists("clip.webm").await);
        assert!(!lookup.exists("other.webm").await);
        assert_eq!(10, lookup.length("clip.webm").await.unwrap());
        assert_eq!(b"3456".to_vec(), read_to_vec(&lookup, "clip.webm", 3, 6).await.unwrap());
        let err = lookup.length("other.webm").await.unwrap_err();
        assert_eq!(io::ErrorKind::NotFound, err.kind());
    }

    #[tokio::test]
    async fn test_memory_lookup_sizes_by_seeking() {
        let mut lookup = MemoryLookup::new();
        lookup.insert("clip.webm", &b"0123456789"[..]);

        let stream = lookup.read_range("clip.webm", 0, 9).await.unwrap();
        assert_eq!(10, stream.len());
        assert_eq!(b"0123456789".to_vec(), read_to_vec(&lookup, "clip.webm", 0, 9).await.unwrap());

        // the window is checked against the size found by seeking to the end
        let err = lookup.read_range("clip.webm", 5, 10).await.unwrap_err();
        assert_eq!(io::ErrorKind::UnexpectedEof, err.kind());
    }
}
