// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Paperdock

//! Persisting uploaded files under collision-free names.
//!
//! The upload endpoint hands this store a byte stream plus the client's
//! original filename; the store keeps only the extension of that name and
//! replaces the rest with a UUID, so hostile filenames never influence where
//! a file lands. The caller gets the final path back and owns any further
//! bookkeeping (e.g. the database record pointing at it).

use std::fs;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncRead, AsyncWriteExt};
use tracing::warn;
use uuid::Uuid;

use crate::error::StoreResult;

use super::paths::{StorePaths, StoreRoot};

/// Generate a unique on-disk name for an uploaded file.
///
/// The name is a UUIDv4 plus the original extension taken verbatim
/// (including the leading dot; empty if the original has none). UUIDv4
/// carries 122 bits of randomness, so collisions do not occur in practice
/// and no existence check is made before writing.
pub fn unique_name(original_name: &str) -> String {
    let id = Uuid::new_v4();
    match Path::new(original_name).extension() {
        Some(ext) => format!("{id}.{}", ext.to_string_lossy()),
        None => id.to_string(),
    }
}

/// File store over the two watched directories.
///
/// Writes fail loud (errors propagate to the caller); deletes fail quiet
/// (logged and skipped). Cheap to clone per request.
#[derive(Debug, Clone)]
pub struct UploadStore {
    paths: StorePaths,
}

impl UploadStore {
    /// Create a new store over the given paths.
    pub fn new(paths: StorePaths) -> Self {
        Self { paths }
    }

    /// The watched directory layout this store writes into.
    pub fn paths(&self) -> &StorePaths {
        &self.paths
    }

    /// Save an uploaded byte stream into the uploads root.
    ///
    /// Convenience for [`save_file_in`](Self::save_file_in) with
    /// [`StoreRoot::Uploads`], the destination for finished uploads.
    pub async fn save_file<R>(&self, reader: &mut R, original_name: &str) -> StoreResult<PathBuf>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        self.save_file_in(StoreRoot::Uploads, reader, original_name)
            .await
    }

    /// Save an uploaded byte stream into the chosen watched root.
    ///
    /// Ensures both watched directories exist (idempotent), streams the full
    /// contents to `<root>/<unique name>`, and returns the path. No size
    /// limit is enforced at this layer; that is the web layer's concern.
    pub async fn save_file_in<R>(
        &self,
        root: StoreRoot,
        reader: &mut R,
        original_name: &str,
    ) -> StoreResult<PathBuf>
    where
        R: AsyncRead + Unpin + ?Sized,
    {
        self.paths.ensure_all()?;

        let path = self.paths.dir(root).join(unique_name(original_name));

        let mut file = tokio::fs::File::create(&path).await?;
        tokio::io::copy(reader, &mut file).await?;
        file.flush().await?;

        Ok(path)
    }

    /// Save multiple uploads into the uploads root, in order.
    ///
    /// The returned paths match the input order. A failure part-way through
    /// is returned to the caller without rolling back: files saved before
    /// the failure stay on disk, where the retention sweep eventually
    /// collects them if the caller never records them.
    pub async fn save_files<R>(
        &self,
        files: impl IntoIterator<Item = (String, R)>,
    ) -> StoreResult<Vec<PathBuf>>
    where
        R: AsyncRead + Unpin,
    {
        let mut saved = Vec::new();
        for (original_name, mut reader) in files {
            let path = self.save_file(&mut reader, &original_name).await?;
            saved.push(path);
        }
        Ok(saved)
    }

    /// Best-effort deletion of a batch of paths.
    ///
    /// Regular files are unlinked, directories are removed recursively, and
    /// paths that no longer exist are skipped. Individual failures are
    /// logged and do not stop the rest of the batch; nothing is reported
    /// back to the caller.
    pub fn cleanup_files<I, P>(&self, paths: I)
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = path.as_ref();

            let result = if path.is_file() {
                fs::remove_file(path)
            } else if path.is_dir() {
                fs::remove_dir_all(path)
            } else {
                // Already gone (possibly swept in the meantime).
                continue;
            };

            if let Err(e) = result {
                warn!(path = %path.display(), error = %e, "failed to delete path");
            }
        }
    }

    /// Current size of a stored file, in bytes.
    ///
    /// Returns [`StoreError::NotFound`](crate::error::StoreError::NotFound)
    /// if the path does not exist at call time — which can race with the
    /// sweeper deleting it.
    pub fn file_size(&self, path: impl AsRef<Path>) -> StoreResult<u64> {
        let meta = fs::metadata(path.as_ref())?;
        Ok(meta.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use std::collections::HashSet;

    fn test_store() -> (tempfile::TempDir, UploadStore) {
        let tmp = tempfile::tempdir().unwrap();
        let store = UploadStore::new(StorePaths::new(tmp.path()));
        (tmp, store)
    }

    /// Reader whose stream fails immediately, like a client that vanished
    /// mid-upload.
    struct BrokenReader;

    impl AsyncRead for BrokenReader {
        fn poll_read(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
            _buf: &mut tokio::io::ReadBuf<'_>,
        ) -> std::task::Poll<std::io::Result<()>> {
            std::task::Poll::Ready(Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "connection reset mid-stream",
            )))
        }
    }

    #[test]
    fn unique_name_preserves_extension() {
        assert!(unique_name("report.pdf").ends_with(".pdf"));
        assert!(unique_name("archive.tar.gz").ends_with(".gz"));
        assert!(unique_name("trailing.").ends_with('.'));
    }

    #[test]
    fn unique_name_without_extension_is_bare_uuid() {
        // Dotfiles and extensionless names carry no extension over.
        for original in ["README", ".bashrc"] {
            let name = unique_name(original);
            assert!(!name.contains('.'), "unexpected extension in {name}");
            assert!(Uuid::parse_str(&name).is_ok());
        }
    }

    #[test]
    fn unique_name_stem_is_a_uuid() {
        let name = unique_name("scan.jpeg");
        let stem = name.strip_suffix(".jpeg").unwrap();
        assert!(Uuid::parse_str(stem).is_ok());
    }

    #[test]
    fn unique_name_never_repeats() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(unique_name("doc.pdf")));
        }
    }

    #[tokio::test]
    async fn save_file_writes_exact_bytes_under_uploads_root() {
        let (_tmp, store) = test_store();
        let data = b"%PDF-1.7 fake pdf bytes \x00\x01\x02";

        let path = store.save_file(&mut &data[..], "invoice.pdf").await.unwrap();

        assert!(path.starts_with(store.paths().uploads_dir()));
        assert!(path.extension().is_some_and(|e| e == "pdf"));
        assert_eq!(fs::read(&path).unwrap(), data);
    }

    #[tokio::test]
    async fn save_file_in_temp_root() {
        let (_tmp, store) = test_store();

        let path = store
            .save_file_in(StoreRoot::Temp, &mut &b"scratch"[..], "page.png")
            .await
            .unwrap();

        assert!(path.starts_with(store.paths().temp_dir()));
        assert_eq!(fs::read(&path).unwrap(), b"scratch");
    }

    #[tokio::test]
    async fn save_creates_watched_directories_on_demand() {
        let (_tmp, store) = test_store();
        assert!(!store.paths().uploads_dir().exists());

        store.save_file(&mut &b"x"[..], "a.txt").await.unwrap();

        assert!(store.paths().uploads_dir().is_dir());
        assert!(store.paths().temp_dir().is_dir());
    }

    #[tokio::test]
    async fn hostile_original_name_cannot_escape_the_root() {
        let (_tmp, store) = test_store();

        let path = store
            .save_file(&mut &b"payload"[..], "../../../etc/evil.sh")
            .await
            .unwrap();

        assert_eq!(path.parent().unwrap(), store.paths().uploads_dir());
        assert!(path.extension().is_some_and(|e| e == "sh"));
    }

    #[tokio::test]
    async fn save_files_keeps_input_order() {
        let (_tmp, store) = test_store();
        let files = vec![
            ("one.txt".to_string(), &b"first"[..]),
            ("two.txt".to_string(), &b"second"[..]),
            ("three.md".to_string(), &b"third"[..]),
        ];

        let paths = store.save_files(files).await.unwrap();

        assert_eq!(paths.len(), 3);
        assert_eq!(fs::read(&paths[0]).unwrap(), b"first");
        assert_eq!(fs::read(&paths[1]).unwrap(), b"second");
        assert_eq!(fs::read(&paths[2]).unwrap(), b"third");
        assert!(paths[2].extension().is_some_and(|e| e == "md"));
    }

    #[tokio::test]
    async fn save_files_failure_keeps_earlier_saves_on_disk() {
        let (_tmp, store) = test_store();
        let files: Vec<(String, Box<dyn AsyncRead + Unpin>)> = vec![
            ("one.txt".to_string(), Box::new(&b"first"[..])),
            ("two.txt".to_string(), Box::new(BrokenReader)),
            ("three.txt".to_string(), Box::new(&b"third"[..])),
        ];

        let err = store.save_files(files).await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));

        // No rollback: the save before the failure keeps its exact bytes,
        // the failed stream leaves only its empty partial, and the save
        // after it never happened.
        let mut contents: Vec<Vec<u8>> = fs::read_dir(store.paths().uploads_dir())
            .unwrap()
            .map(|entry| fs::read(entry.unwrap().path()).unwrap())
            .collect();
        contents.sort();
        assert_eq!(contents, vec![b"".to_vec(), b"first".to_vec()]);
    }

    #[tokio::test]
    async fn cleanup_files_skips_missing_and_removes_the_rest() {
        let (_tmp, store) = test_store();
        let kept_a = store.save_file(&mut &b"a"[..], "a.txt").await.unwrap();
        let kept_b = store.save_file(&mut &b"b"[..], "b.txt").await.unwrap();
        let missing = store.paths().uploads_dir().join("never-existed.txt");

        store.cleanup_files([&kept_a, &missing, &kept_b]);

        assert!(!kept_a.exists());
        assert!(!kept_b.exists());
    }

    #[tokio::test]
    async fn cleanup_files_removes_directories_recursively() {
        let (_tmp, store) = test_store();
        store.paths().ensure_all().unwrap();

        let dir = store.paths().temp_dir().join("job-123");
        fs::create_dir_all(dir.join("pages")).unwrap();
        fs::write(dir.join("pages").join("p1.png"), b"img").unwrap();

        store.cleanup_files([&dir]);

        assert!(!dir.exists());
    }

    #[tokio::test]
    async fn file_size_reports_bytes_and_not_found() {
        let (_tmp, store) = test_store();
        let path = store.save_file(&mut &b"12345"[..], "n.bin").await.unwrap();

        assert_eq!(store.file_size(&path).unwrap(), 5);

        store.cleanup_files([&path]);
        let err = store.file_size(&path).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
