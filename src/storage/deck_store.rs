//! Local-disk storage for uploaded slide decks.

use std::path::PathBuf;

use tokio::io::AsyncWriteExt;

use crate::error::RelayError;

/// Longest file name component kept from an upload.
const MAX_NAME_LEN: usize = 120;

/// Fallback name when an upload carries no usable file name.
const DEFAULT_NAME: &str = "deck.pdf";

/// A deck that has been durably written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredDeck {
    /// Name of the file inside the uploads directory.
    pub file_name: String,
    /// Absolute path on disk.
    pub path: PathBuf,
    /// URL clients fetch the deck from.
    pub url: String,
}

/// Writes decks into a directory that is served at `<base_url>/files/`.
#[derive(Debug, Clone)]
pub struct DeckStore {
    root: PathBuf,
    public_base_url: String,
}

impl DeckStore {
    /// Creates a store writing into `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Writes `bytes` under a unique name derived from `original_name`.
    ///
    /// The file is flushed and synced before this returns, so a returned
    /// [`StoredDeck`] is always servable.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Storage`] if the directory cannot be created or
    /// the file cannot be written.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<StoredDeck, RelayError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let file_name = format!("{}-{}", uuid::Uuid::new_v4(), sanitize_file_name(original_name));
        let path = self.root.join(&file_name);

        let mut file = tokio::fs::File::create(&path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;

        let url = format!("{}/files/{}", self.public_base_url, file_name);
        tracing::debug!(path = %path.display(), size = bytes.len(), "deck written");
        Ok(StoredDeck {
            file_name,
            path,
            url,
        })
    }
}

/// Reduces an uploaded file name to a single safe path component made of
/// ASCII alphanumerics, `.`, `-` and `_`.
#[must_use]
pub fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_LEN)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}
