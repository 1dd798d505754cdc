//! API key resolution.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::IndexingError;
use aqua_indexer_shared::ApiKey;

/// Secret file read when neither `--api-key` nor `--api-key-file` is given.
pub const DEFAULT_API_KEY_FILE: &str = "../elasticsearch/apikey.txt";

/// Resolve the API key.
///
/// An explicit value wins over any file. An explicitly named file must be
/// readable and non-empty; the default file is optional and its absence means
/// requests are sent without credentials.
pub fn resolve_api_key(
    explicit: Option<&str>,
    file: Option<&Path>,
) -> Result<Option<ApiKey>, IndexingError> {
    if let Some(value) = explicit {
        let key = ApiKey::new(value);
        if key.is_empty() {
            return Err(IndexingError::config("API key is empty"));
        }
        info!("Using API key from command line or environment");
        return Ok(Some(key));
    }

    match file {
        Some(path) => {
            let contents = fs::read_to_string(path).map_err(|e| {
                IndexingError::config(format!(
                    "Failed to read API key file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let key = ApiKey::new(contents);
            if key.is_empty() {
                return Err(IndexingError::config(format!(
                    "API key file {} is empty",
                    path.display()
                )));
            }
            info!(path = %path.display(), "Using API key from file");
            Ok(Some(key))
        }
        None => {
            let path = Path::new(DEFAULT_API_KEY_FILE);
            match fs::read_to_string(path) {
                Ok(contents) => {
                    let key = ApiKey::new(contents);
                    if key.is_empty() {
                        warn!(path = %path.display(), "API key file is empty, sending no credentials");
                        return Ok(None);
                    }
                    info!(path = %path.display(), "Using API key from file");
                    Ok(Some(key))
                }
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    warn!(path = %path.display(), "No API key configured, sending no credentials");
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
