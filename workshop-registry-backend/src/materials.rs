use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt as _};
use tracing::{debug, warn};

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct Material {
    pub file_name: String,
    pub bytes: Bytes,
}

impl Material {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[async_trait]
pub trait MaterialStore: Send + Sync + 'static {
    /// Persists the bytes and returns the opaque reference to retrieve them.
    async fn store(&self, bytes: Bytes, original_name: &str) -> std::io::Result<String>;

    async fn retrieve(&self, reference: &str) -> std::io::Result<Option<Bytes>>;
}

pub type DynMaterialStore = Arc<dyn MaterialStore>;

/// Keeps materials as plain files in one directory.
#[derive(Debug, Clone)]
pub struct DiskMaterialStore {
    directory: PathBuf,
}

impl DiskMaterialStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

fn sanitize_file_name(original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.trim_matches('.').is_empty() {
        "material".to_owned()
    } else {
        sanitized
    }
}

/// Writes a freshly created file. A file that could not be written completely
/// is removed so no reference points at a truncated material.
async fn fill_or_remove<W>(mut file: W, path: &Path, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        file.write_all(bytes).await?;
        file.flush().await
    }
    .await;
    if let Err(error) = written {
        drop(file);
        if let Err(remove_error) = tokio::fs::remove_file(path).await {
            warn!(path = %path.display(), "failed to remove partial material: {remove_error}");
        }
        return Err(error);
    }
    Ok(())
}

/// References we hand out never contain separators, so anything else is
/// not ours to resolve.
fn is_valid_reference(reference: &str) -> bool {
    !reference.is_empty()
        && !reference.contains(['/', '\\'])
        && !reference.contains("..")
}

#[async_trait]
impl MaterialStore for DiskMaterialStore {
    async fn store(&self, bytes: Bytes, original_name: &str) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.directory).await?;

        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_millis());
        let file_name = sanitize_file_name(original_name);

        let mut attempt = 0_u32;
        loop {
            let reference = if attempt == 0 {
                format!("{millis}_{file_name}")
            } else {
                format!("{millis}-{attempt}_{file_name}")
            };
            let path = self.directory.join(&reference);
            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => {
                    fill_or_remove(file, &path, &bytes).await?;
                    debug!(reference, size = bytes.len(), "stored material");
                    return Ok(reference);
                }
                Err(error) if error.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(error) => return Err(error),
            }
        }
    }

    async fn retrieve(&self, reference: &str) -> std::io::Result<Option<Bytes>> {
        if !is_valid_reference(reference) {
            return Ok(None);
        }
        match tokio::fs::read(self.directory.join(reference)).await {
            Ok(content) => Ok(Some(Bytes::from(content))),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }
}
