//! `lakefs://` URI parsing

use std::str::FromStr;

use crate::error::ClientError;

/// URI scheme of repository references
pub const SCHEME: &str = "lakefs://";

/// A `lakefs://<repository>/<ref>[/<path>]` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUri {
    /// Repository name
    pub repository: String,

    /// Branch, tag or commit
    pub reference: String,

    /// Optional object path under the ref
    pub path: Option<String>,
}

impl FromStr for RefUri {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(SCHEME)
            .ok_or_else(|| ClientError::InvalidUri(format!("{}: expected {} scheme", s, SCHEME)))?;

        let mut parts = rest.splitn(3, '/');
        let repository = parts.next().unwrap_or_default();
        let reference = parts.next().unwrap_or_default();
        if repository.is_empty() || reference.is_empty() {
            return Err(ClientError::InvalidUri(format!(
                "{}: expected {}<repository>/<ref>",
                s, SCHEME
            )));
        }

        let path = parts.next().filter(|p| !p.is_empty()).map(str::to_string);

        Ok(Self {
            repository: repository.to_string(),
            reference: reference.to_string(),
            path,
        })
    }
}

impl std::fmt::Display for RefUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}/{}", SCHEME, self.repository, self.reference)?;
        if let Some(path) = &self.path {
            write!(f, "/{}", path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ref_uri() {
        let uri: RefUri = "lakefs://example-repo/main".parse().unwrap();
        assert_eq!(uri.repository, "example-repo");
        assert_eq!(uri.reference, "main");
        assert_eq!(uri.path, None);
        assert_eq!(uri.to_string(), "lakefs://example-repo/main");
    }

    #[test]
    fn test_parse_ref_uri_with_path() {
        let uri: RefUri = "lakefs://repo/dev/data/2024/part-0.parquet".parse().unwrap();
        assert_eq!(uri.reference, "dev");
        assert_eq!(uri.path.as_deref(), Some("data/2024/part-0.parquet"));
    }

    #[test]
    fn test_parse_rejects_bad_uris() {
        for bad in ["s3://repo/main", "lakefs://", "lakefs://repo", "lakefs://repo/", "repo/main"] {
            assert!(
                matches!(bad.parse::<RefUri>(), Err(ClientError::InvalidUri(_))),
                "{} should be rejected",
                bad
            );
        }
    }
}
