//! Upload handling - saves submitted images under the storage root
//!
//! Stored paths are `<public_path>/<file name>` with forward slashes, which is
//! also the URL the storage root is served under. File names are sanitized and
//! never overwrite an existing upload.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use axum::body::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::StorageConfig;

/// Name used when nothing usable survives sanitization
const FALLBACK_NAME: &str = "upload";

/// How many uniquified names to try before giving up
const MAX_NAME_ATTEMPTS: usize = 8;

/// Anything outside this set is dropped from client file names
static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("invalid filename regex"));

const WINDOWS_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM0", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7",
    "COM8", "COM9", "LPT0", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8",
    "LPT9",
];

/// Upload errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to create upload directory {path:?}: {source}")]
    CreateRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write upload {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no free file name for upload '{name}'")]
    NameExhausted { name: String },
}

/// File part received with a form submission
#[derive(Debug, Clone)]
pub struct IncomingFile {
    /// File name as sent by the client (unsanitized)
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Outcome of a best-effort image removal.
///
/// Never turned into an error; callers log it and carry on.
#[derive(Debug)]
#[must_use]
pub enum Cleanup {
    /// File existed and was deleted
    Removed(PathBuf),
    /// Nothing on disk at the resolved path
    Missing(PathBuf),
    /// Deletion failed and the failure was swallowed
    Suppressed { path: PathBuf, error: io::Error },
    /// Stored value doesn't point into the storage root, left alone
    Foreign(String),
}

impl Cleanup {
    /// Emit the outcome at a level matching its severity.
    pub fn log(&self) {
        match self {
            Self::Removed(path) => tracing::debug!(path = %path.display(), "removed image"),
            Self::Missing(path) => {
                tracing::debug!(path = %path.display(), "image already gone")
            }
            Self::Suppressed { path, error } => tracing::warn!(
                path = %path.display(),
                error = %error,
                "failed to remove image, continuing"
            ),
            Self::Foreign(image) => {
                tracing::warn!(image = %image, "image path outside upload directory, skipped")
            }
        }
    }
}

/// Best-effort removal of a stored image, used while deleting records.
#[async_trait]
pub trait ImageCleanup: Send + Sync {
    async fn discard(&self, image: &str) -> Cleanup;
}

/// Writes uploads into the storage root.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
    public_path: String,
}

impl UploadStore {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.upload_dir.clone(),
            public_path: config.public_path(),
        }
    }

    /// Directory uploads are written to
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL segment the root is served under (no slashes)
    pub fn public_path(&self) -> &str {
        &self.public_path
    }

    /// Create the storage root if it doesn't exist yet. Called once at startup.
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::CreateRoot {
                path: self.root.clone(),
                source,
            })
    }

    /// Save an optional upload and return its stored path.
    ///
    /// Returns an empty string when no file (or a file without a name) was sent.
    pub async fn store(&self, file: Option<IncomingFile>) -> Result<String, StorageError> {
        let Some(file) = file.filter(|f| !f.file_name.is_empty()) else {
            return Ok(String::new());
        };

        let base = sanitize_filename(&file.file_name);
        let mut name = base.clone();

        for _ in 0..MAX_NAME_ATTEMPTS {
            let path = self.root.join(&name);
            match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(handle) => {
                    write_contents(handle, &path, &file.bytes).await?;
                    tracing::info!(
                        file = %name,
                        bytes = file.bytes.len(),
                        content_type = file.content_type.as_deref().unwrap_or("unknown"),
                        "stored upload"
                    );
                    return Ok(format!("{}/{}", self.public_path, name));
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!(file = %name, "upload name taken, uniquifying");
                    name = uniquified(&base);
                }
                Err(source) => return Err(StorageError::Write { path, source }),
            }
        }

        Err(StorageError::NameExhausted { name: base })
    }

    /// Map a stored image path back to the file on disk.
    ///
    /// Only single sanitized names directly under the public path resolve.
    pub fn resolve(&self, image: &str) -> Option<PathBuf> {
        let name = image
            .strip_prefix(self.public_path.as_str())?
            .strip_prefix('/')?;

        if name.is_empty() || sanitize_filename(name) != name {
            return None;
        }

        Some(self.root.join(name))
    }
}

#[async_trait]
impl ImageCleanup for UploadStore {
    async fn discard(&self, image: &str) -> Cleanup {
        let Some(path) = self.resolve(image) else {
            return Cleanup::Foreign(image.to_owned());
        };

        match fs::remove_file(&path).await {
            Ok(()) => Cleanup::Removed(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Cleanup::Missing(path),
            Err(error) => Cleanup::Suppressed { path, error },
        }
    }
}

async fn write_contents(mut handle: fs::File, path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let written: io::Result<()> = async {
        handle.write_all(bytes).await?;
        handle.flush().await
    }
    .await;

    if let Err(source) = written {
        drop(handle);
        // Don't leave a truncated file behind
        let _ = fs::remove_file(path).await;
        return Err(StorageError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    Ok(())
}

/// Reduce a client-supplied file name to a safe single path component.
///
/// The name is NFKD-normalized and reduced to ASCII first, so accented
/// letters keep their base letter. Path separators become word breaks,
/// whitespace runs become `_`, characters outside `[A-Za-z0-9_.-]` are dropped
/// and leading/trailing `.`/`_` trimmed.
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name.nfkd().filter(char::is_ascii).collect();
    let spaced = ascii.replace(['/', '\\'], " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = UNSAFE_CHARS.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');

    if trimmed.is_empty() {
        return FALLBACK_NAME.to_owned();
    }

    let stem = trimmed.split('.').next().unwrap_or_default();
    if WINDOWS_DEVICE_NAMES.contains(&stem.to_ascii_uppercase().as_str()) {
        return format!("_{}", trimmed);
    }

    trimmed.to_owned()
}

/// `photo.jpg` -> `photo-1a2b3c4d.jpg`
fn uniquified(name: &str) -> String {
    let tag = Uuid::new_v4().simple().to_string();
    let tag = &tag[..8];
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{}-{}.{}", stem, tag, ext),
        _ => format!("{}-{}", name, tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(temp: &TempDir) -> UploadStore {
        UploadStore::new(&StorageConfig {
            upload_dir: temp.path().join("profile"),
            public_path: "profile".into(),
        })
    }

    fn file(name: &str, contents: &'static [u8]) -> Option<IncomingFile> {
        Some(IncomingFile {
            file_name: name.into(),
            content_type: Some("image/png".into()),
            bytes: Bytes::from_static(contents),
        })
    }

    #[test]
    fn sanitize_strips_directories_and_spaces() {
        assert_eq!(sanitize_filename("My cool movie.mov"), "My_cool_movie.mov");
        assert_eq!(sanitize_filename("../../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("C:\\Users\\jane\\me.png"), "C_Users_jane_me.png");
        assert_eq!(sanitize_filename("photo (1).jpg"), "photo_1.jpg");
    }

    #[test]
    fn sanitize_drops_non_ascii_and_falls_back() {
        assert_eq!(sanitize_filename("사진.png"), "png");
        assert_eq!(sanitize_filename("..."), FALLBACK_NAME);
        assert_eq!(sanitize_filename(""), FALLBACK_NAME);
    }

    #[test]
    fn sanitize_transliterates_accents() {
        assert_eq!(sanitize_filename("café.png"), "cafe.png");
        assert_eq!(sanitize_filename("Résumé photo.jpg"), "Resume_photo.jpg");
        assert_eq!(sanitize_filename("ﬁle.png"), "file.png");
    }

    #[test]
    fn sanitize_guards_device_names() {
        assert_eq!(sanitize_filename("con.png"), "_con.png");
        assert_eq!(sanitize_filename("console.png"), "console.png");
    }

    #[test]
    fn uniquified_keeps_extension() {
        let name = uniquified("photo.jpg");
        assert!(name.starts_with("photo-"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), "photo-".len() + 8 + ".jpg".len());
        assert_eq!(sanitize_filename(&name), name);

        let bare = uniquified("README");
        assert!(bare.starts_with("README-"));
    }

    #[tokio::test]
    async fn store_without_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        store.ensure_root().await.unwrap();

        assert_eq!(store.store(None).await.unwrap(), "");
        assert_eq!(store.store(file("", b"ignored")).await.unwrap(), "");
    }

    #[tokio::test]
    async fn store_writes_bytes_under_root() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        store.ensure_root().await.unwrap();

        let image = store.store(file("jane doe.png", b"png-bytes")).await.unwrap();
        assert_eq!(image, "profile/jane_doe.png");

        let on_disk = std::fs::read(temp.path().join("profile/jane_doe.png")).unwrap();
        assert_eq!(on_disk, b"png-bytes");
    }

    #[tokio::test]
    async fn colliding_names_never_overwrite() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        store.ensure_root().await.unwrap();

        let first = store.store(file("me.png", b"first")).await.unwrap();
        let second = store.store(file("me.png", b"second")).await.unwrap();

        assert_eq!(first, "profile/me.png");
        assert_ne!(first, second);
        assert!(second.starts_with("profile/me-") && second.ends_with(".png"));

        let first_path = store.resolve(&first).unwrap();
        let second_path = store.resolve(&second).unwrap();
        assert_eq!(std::fs::read(first_path).unwrap(), b"first");
        assert_eq!(std::fs::read(second_path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn store_fails_without_root() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        // ensure_root() deliberately skipped

        let err = store.store(file("me.png", b"x")).await.unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
    }

    #[test]
    fn resolve_rejects_foreign_paths() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);

        assert!(store.resolve("profile/me.png").is_some());
        assert!(store.resolve("profile/../secret.txt").is_none());
        assert!(store.resolve("profile/a/b.png").is_none());
        assert!(store.resolve("other/me.png").is_none());
        assert!(store.resolve("profileme.png").is_none());
        assert!(store.resolve("profile/").is_none());
    }

    #[tokio::test]
    async fn discard_reports_outcome() {
        let temp = TempDir::new().unwrap();
        let store = test_store(&temp);
        store.ensure_root().await.unwrap();

        let image = store.store(file("me.png", b"x")).await.unwrap();
        let path = store.resolve(&image).unwrap();

        assert!(matches!(store.discard(&image).await, Cleanup::Removed(_)));
        assert!(!path.exists());
        assert!(matches!(store.discard(&image).await, Cleanup::Missing(_)));
        assert!(matches!(
            store.discard("../etc/passwd").await,
            Cleanup::Foreign(_)
        ));
    }
}
