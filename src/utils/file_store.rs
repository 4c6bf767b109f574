use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::services::error::ServiceError;

/// Blob area rooted at `MEDIA_ROOT`. Records store paths relative to the root.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.root).await
    }

    /// Writes `bytes` to `<prefix>/<uuid>_<sanitized name>` and returns that
    /// relative path.
    pub async fn save(
        &self,
        prefix: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, ServiceError> {
        let relative = format!(
            "{}/{}_{}",
            prefix.trim_matches('/'),
            Uuid::new_v4().simple(),
            sanitize_file_name(original_name)
        );
        let target = self.resolve(&relative)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                tracing::error!(error = %e, path = %parent.display(), "Failed to create upload directory");
                ServiceError::internal("Failed to store file.")
            })?;
        }

        let mut file = fs::File::create(&target).await.map_err(|e| {
            tracing::error!(error = %e, path = %target.display(), "Failed to create file");
            ServiceError::internal("Failed to store file.")
        })?;
        file.write_all(bytes).await.map_err(|e| {
            tracing::error!(error = %e, path = %target.display(), "Failed to write file");
            ServiceError::internal("Failed to store file.")
        })?;
        file.flush().await.map_err(|e| {
            tracing::error!(error = %e, path = %target.display(), "Failed to flush file");
            ServiceError::internal("Failed to store file.")
        })?;

        Ok(relative)
    }

    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, ServiceError> {
        let target = self.resolve(relative)?;
        match fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ServiceError::not_found("File not found on server."))
            }
            Err(e) => {
                tracing::error!(error = %e, path = %target.display(), "Failed to read file");
                Err(ServiceError::internal("Failed to read file."))
            }
        }
    }

    /// Missing files are not an error.
    pub async fn delete(&self, relative: &str) -> Result<(), ServiceError> {
        let target = self.resolve(relative)?;
        match fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, path = %target.display(), "Failed to delete file");
                Err(ServiceError::internal("Failed to delete file."))
            }
        }
    }

    /// Best-effort cleanup after a committed delete; failures are only logged.
    pub async fn delete_all<I, S>(&self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for path in paths {
            if let Err(e) = self.delete(path.as_ref()).await {
                tracing::warn!(path = %path.as_ref(), error = %e, "Orphaned file left in media root");
            }
        }
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf, ServiceError> {
        let path = Path::new(relative);
        let escapes = relative.is_empty()
            || path
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ServiceError::validation("Invalid file path."));
        }
        Ok(self.root.join(path))
    }
}

/// Strips path separators and reserved characters; never returns an empty name.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = sanitize_filename::sanitize(base).trim().replace(' ', "_");
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_directories_and_reserved_chars() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\docs\\syllabus.pdf"), "syllabus.pdf");
        assert_eq!(sanitize_file_name("week 1: notes?.pdf"), "week_1_notes.pdf");
        assert_eq!(sanitize_file_name(".."), "file");
        assert_eq!(sanitize_file_name(""), "file");
    }

    #[test]
    fn resolve_rejects_escaping_paths() {
        let store = FileStore::new("/tmp/media");
        assert!(store.resolve("../secret").is_err());
        assert!(store.resolve("/etc/passwd").is_err());
        assert!(store.resolve("").is_err());
        assert_eq!(
            store.resolve("attachments/a.pdf").unwrap(),
            PathBuf::from("/tmp/media/attachments/a.pdf")
        );
    }

    #[tokio::test]
    async fn save_read_delete() {
        let root = std::env::temp_dir().join(format!("qau-store-{}", Uuid::new_v4()));
        let store = FileStore::new(&root);

        let path = store.save("attachments", "syllabus.pdf", b"pdf").await.unwrap();
        assert!(path.starts_with("attachments/"));
        assert!(path.ends_with("_syllabus.pdf"));
        assert_eq!(store.read(&path).await.unwrap(), b"pdf");

        store.delete(&path).await.unwrap();
        store.delete(&path).await.unwrap();
        assert!(store.read(&path).await.is_err());

        let _ = tokio::fs::remove_dir_all(root).await;
    }
}
