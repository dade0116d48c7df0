// # Hosts File Store
//
// File-backed implementation of RecordStore, bound to the real hosts
// file (normally `/etc/hosts`).
//
// ## Writes
//
// - Atomic (default): the configured path is resolved through any
//   symlinks first. The new document is written to a uniquely named temp
//   file next to the resolved target, synced, given the target's mode and
//   owner, then renamed over it. A crash mid-write leaves either the old
//   or the new file, never a truncated one, and a symlinked hosts file
//   stays a symlink.
// - In place: the file is truncated and rewritten. Required when the
//   hosts file is a bind mount, since a rename cannot replace a mount
//   point.
//
// ## Reads
//
// Every `load` reads the file again; nothing is cached. A missing or
// unreadable file is an error, not an empty document. The content is
// handled as bytes, so a file that is not valid UTF-8 still loads.

use async_trait::async_trait;
use std::fs::{File, Metadata};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::fs;

use crate::Error;
use crate::config::WriteMode;
use crate::hosts::HostsFile;
use crate::traits::record_store::RecordStore;

/// Record store backed by a hosts file on disk
///
/// # Example
///
/// ```rust,no_run
/// use hostsdns_core::config::WriteMode;
/// use hostsdns_core::store::HostsFileStore;
/// use hostsdns_core::traits::RecordStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = HostsFileStore::new("/etc/hosts", WriteMode::Atomic);
///
///     let file = store.load().await?;
///     println!("{} endpoint(s)", file.endpoints().len());
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HostsFileStore {
    path: PathBuf,
    write_mode: WriteMode,
}

impl HostsFileStore {
    /// Bind a store to `path`. No I/O happens until the first load/save.
    pub fn new<P: AsRef<Path>>(path: P, write_mode: WriteMode) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_mode,
        }
    }

    /// File the atomic write replaces: the configured path with symlinks
    /// resolved, or the path itself when nothing exists there yet
    async fn resolve_target(&self) -> Result<PathBuf, Error> {
        match fs::canonicalize(&self.path).await {
            Ok(target) => Ok(target),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(self.path.clone()),
            Err(e) => Err(Error::store(format!(
                "resolve {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn write_in_place(&self, content: &[u8]) -> Result<(), Error> {
        fs::write(&self.path, content).await.map_err(|e| {
            Error::store(format!("write {}: {}", self.path.display(), e))
        })
    }

    async fn write_atomic(&self, content: Vec<u8>) -> Result<(), Error> {
        let target = self.resolve_target().await?;
        if target != self.path {
            tracing::trace!("{} resolves to {}", self.path.display(), target.display());
        }

        tokio::task::spawn_blocking(move || replace_file(&target, &content))
            .await
            .map_err(|e| Error::store(format!("write task failed: {}", e)))?
    }
}

/// Write `content` to a fresh temp file beside `target` and rename it over
/// `target`. The temp file is removed on every error path.
fn replace_file(target: &Path, content: &[u8]) -> Result<(), Error> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| {
        Error::store(format!("create temp file in {}: {}", dir.display(), e))
    })?;

    temp.write_all(content).map_err(|e| {
        Error::store(format!("write {}: {}", temp.path().display(), e))
    })?;

    temp.as_file().sync_all().map_err(|e| {
        Error::store(format!("sync {}: {}", temp.path().display(), e))
    })?;

    match std::fs::metadata(target) {
        Ok(metadata) => copy_attributes(temp.as_file(), &metadata).map_err(|e| {
            Error::store(format!("chmod {}: {}", temp.path().display(), e))
        })?,
        Err(e) => {
            tracing::debug!(
                "No existing {} to copy permissions from: {}",
                target.display(),
                e
            );
        }
    }

    temp.persist(target).map_err(|e| {
        Error::store(format!(
            "rename {} to {}: {}",
            e.file.path().display(),
            target.display(),
            e.error
        ))
    })?;

    Ok(())
}

/// Give `file` the mode bits and, where permitted, the owner of `source`
fn copy_attributes(file: &File, source: &Metadata) -> io::Result<()> {
    file.set_permissions(source.permissions())?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::{MetadataExt, fchown};

        let current = file.metadata()?;
        if current.uid() != source.uid() || current.gid() != source.gid() {
            if let Err(e) = fchown(file, Some(source.uid()), Some(source.gid())) {
                tracing::warn!(
                    "Could not copy owner {}:{} to rewritten hosts file: {}",
                    source.uid(),
                    source.gid(),
                    e
                );
            }
        }
    }

    Ok(())
}

#[async_trait]
impl RecordStore for HostsFileStore {
    async fn load(&self) -> Result<HostsFile, Error> {
        let content = fs::read(&self.path)
            .await
            .map_err(|e| Error::store(format!("open {}: {}", self.path.display(), e)))?;

        let file = HostsFile::from_bytes(&content);
        tracing::trace!("Loaded {} line(s) from {}", file.len(), self.path.display());
        Ok(file)
    }

    async fn save(&self, file: &HostsFile) -> Result<(), Error> {
        let content = file.to_bytes();

        match self.write_mode {
            WriteMode::Atomic => self.write_atomic(content).await?,
            WriteMode::InPlace => self.write_in_place(&content).await?,
        }

        tracing::trace!(
            "Wrote {} line(s) to {} ({:?})",
            file.len(),
            self.path.display(),
            self.write_mode
        );
        Ok(())
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::{Changes, Endpoint};
    use tempfile::tempdir;

    const SAMPLE: &str = "127.0.0.1\tlocalhost\n# managed below\n10.0.0.1 a.lan b.lan\n";

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_load_parses_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, SAMPLE).await.unwrap();

        let store = HostsFileStore::new(&path, WriteMode::Atomic);
        let file = store.load().await.unwrap();

        let names: Vec<_> = file.endpoints().into_iter().map(|e| e.dns_name).collect();
        assert_eq!(names, vec!["localhost", "a.lan", "b.lan"]);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_error() {
        let dir = tempdir().unwrap();
        let store = HostsFileStore::new(dir.path().join("absent"), WriteMode::Atomic);

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));
        assert!(err.to_string().contains("absent"));
    }

    #[tokio::test]
    async fn test_atomic_save_replaces_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, SAMPLE).await.unwrap();

        let store = HostsFileStore::new(&path, WriteMode::Atomic);
        let mut file = store.load().await.unwrap();
        file.apply(&Changes {
            create: vec![Endpoint::a_record("new.lan", "10.0.0.5")],
            delete: vec![Endpoint::a_record("b.lan", "10.0.0.1")],
            ..Changes::default()
        });
        store.save(&file).await.unwrap();

        let written = fs::read_to_string(&path).await.unwrap();
        assert_eq!(
            written,
            "127.0.0.1\tlocalhost\n# managed below\n10.0.0.5\tnew.lan\n"
        );
        assert_eq!(dir_entries(dir.path()), vec!["hosts"], "temp file should be renamed away");
    }

    #[tokio::test]
    async fn test_atomic_save_leaves_sibling_tmp_file_alone() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        let sibling = dir.path().join("hosts.tmp");
        fs::write(&path, SAMPLE).await.unwrap();
        fs::write(&sibling, "unrelated\n").await.unwrap();

        let store = HostsFileStore::new(&path, WriteMode::Atomic);
        let file = store.load().await.unwrap();
        store.save(&file).await.unwrap();

        assert_eq!(fs::read_to_string(&sibling).await.unwrap(), "unrelated\n");
        assert_eq!(dir_entries(dir.path()), vec!["hosts", "hosts.tmp"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_atomic_save_through_symlink_updates_target() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real_hosts");
        let link = dir.path().join("hosts");
        fs::write(&real, "10.0.0.1 a.lan\n").await.unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let store = HostsFileStore::new(&link, WriteMode::Atomic);
        let mut file = store.load().await.unwrap();
        file.apply(&Changes {
            create: vec![Endpoint::a_record("b.lan", "10.0.0.2")],
            ..Changes::default()
        });
        store.save(&file).await.unwrap();

        let link_meta = fs::symlink_metadata(&link).await.unwrap();
        assert!(link_meta.file_type().is_symlink(), "hosts must stay a symlink");
        assert_eq!(
            fs::read_to_string(&real).await.unwrap(),
            "10.0.0.1 a.lan\n10.0.0.2\tb.lan\n"
        );
        assert_eq!(dir_entries(dir.path()), vec!["hosts", "real_hosts"]);
    }

    #[tokio::test]
    async fn test_non_utf8_file_loads_and_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, b"# caf\xe9 latin-1 comment\n10.0.0.1 a.lan\n")
            .await
            .unwrap();

        for mode in [WriteMode::Atomic, WriteMode::InPlace] {
            let store = HostsFileStore::new(&path, mode);
            let mut file = store.load().await.unwrap();
            assert_eq!(file.endpoints(), vec![Endpoint::a_record("a.lan", "10.0.0.1")]);

            file.apply(&Changes::default());
            store.save(&file).await.unwrap();

            assert_eq!(
                fs::read(&path).await.unwrap(),
                b"# caf\xe9 latin-1 comment\n10.0.0.1 a.lan\n".to_vec(),
                "{:?}",
                mode
            );
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_atomic_save_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, SAMPLE).await.unwrap();
        fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640))
            .await
            .unwrap();

        let store = HostsFileStore::new(&path, WriteMode::Atomic);
        let file = store.load().await.unwrap();
        store.save(&file).await.unwrap();

        let mode = fs::metadata(&path).await.unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }

    #[tokio::test]
    async fn test_in_place_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, SAMPLE).await.unwrap();

        let store = HostsFileStore::new(&path, WriteMode::InPlace);
        let file = HostsFile::parse("10.9.9.9 only.lan\n");
        store.save(&file).await.unwrap();

        assert_eq!(fs::read_to_string(&path).await.unwrap(), "10.9.9.9 only.lan\n");
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("hosts");

        for mode in [WriteMode::Atomic, WriteMode::InPlace] {
            let store = HostsFileStore::new(&path, mode);
            let err = store.save(&HostsFile::default()).await.unwrap_err();
            assert!(matches!(err, Error::Store(_)), "{:?}: {}", mode, err);
        }
    }

    #[test]
    fn test_describe() {
        let store = HostsFileStore::new("/etc/hosts", WriteMode::Atomic);
        assert_eq!(store.describe(), "file:/etc/hosts");
    }
}
