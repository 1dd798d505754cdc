//! Credential handed to the search engine client.

use std::fmt;

/// An Elasticsearch/OpenSearch API key, already in its encoded form.
///
/// Where the key comes from (environment, secret file, vault) is decided by
/// the caller. `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key value, trimming surrounding whitespace (secret files usually end with a newline).
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(key.as_ref().trim().to_string())
    }

    /// Whether the key is empty after trimming.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Value of the `Authorization` header for this key.
    pub fn authorization_header(&self) -> String {
        format!("ApiKey {}", self.0)
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_header_and_redaction() {
        let key = ApiKey::new("  c2VjcmV0\n");

        assert_eq!(key.authorization_header(), "ApiKey c2VjcmV0");
        assert_eq!(format!("{:?}", key), "ApiKey(<redacted>)");
        assert!(!key.is_empty());
        assert!(ApiKey::new(" \n").is_empty());
    }
}
