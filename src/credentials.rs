//! Directory-service credentials.
//!
//! Credentials are loaded from a YAML file the operator points the CLI
//! at:
//!
//! ```yaml
//! host: https://directory.example.com:8443
//! username: csproot
//! password: secret
//! ```
//!
//! All three fields must be present and non-empty before a session is
//! attempted. The secret is never written back out and never appears in
//! log output.

use serde::Deserialize;
use std::fmt;
use std::path::Path;

#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Directory-service endpoint, scheme included.
    pub host: String,
    /// Principal to authenticate as.
    pub username: String,
    /// Secret for the principal.
    pub password: String,
}

impl Credentials {
    /// Load and validate credentials from a YAML file.
    ///
    /// The path is resolved to an absolute path before reading, so a
    /// path that cannot be resolved is reported separately from a file
    /// that cannot be read.
    pub fn load(path: &Path) -> Result<Self, CredentialsError> {
        let path = std::path::absolute(path).map_err(|source| CredentialsError::PathResolution {
            path: path.display().to_string(),
            source,
        })?;

        let text =
            std::fs::read_to_string(&path).map_err(|source| CredentialsError::Unreadable {
                path: path.display().to_string(),
                source,
            })?;

        let credentials: Credentials =
            serde_yaml::from_str(&text).map_err(|source| CredentialsError::Malformed {
                path: path.display().to_string(),
                source,
            })?;

        credentials.validate()?;
        Ok(credentials)
    }

    fn validate(&self) -> Result<(), CredentialsError> {
        let fields = [
            ("host", &self.host),
            ("username", &self.username),
            ("password", &self.password),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(CredentialsError::MissingField(name));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialsError {
    #[error("unable to resolve credentials path {path}: {source}")]
    PathResolution {
        path: String,
        source: std::io::Error,
    },

    #[error("unable to read credentials file {path}: {source}")]
    Unreadable {
        path: String,
        source: std::io::Error,
    },

    #[error("malformed credentials file {path}: {source}")]
    Malformed {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("credentials file is missing a value for {0}")]
    MissingField(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_complete_credentials_file() {
        let file = write_file(
            "host: https://directory.example.com\nusername: admin\npassword: secret\n",
        );

        let credentials = Credentials::load(file.path()).unwrap();
        assert_eq!(credentials.host, "https://directory.example.com");
        assert_eq!(credentials.username, "admin");
        assert_eq!(credentials.password, "secret");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = Credentials::load(Path::new("/nonexistent/creds.yaml")).unwrap_err();
        assert!(matches!(err, CredentialsError::Unreadable { .. }));
    }

    #[test]
    fn invalid_yaml_is_malformed() {
        let file = write_file("host: [unclosed\n");
        let err = Credentials::load(file.path()).unwrap_err();
        assert!(matches!(err, CredentialsError::Malformed { .. }));
    }

    #[test]
    fn empty_password_names_the_field() {
        let file = write_file("host: https://d.example.com\nusername: admin\npassword: \"\"\n");
        let err = Credentials::load(file.path()).unwrap_err();
        assert!(matches!(err, CredentialsError::MissingField("password")));
    }

    #[test]
    fn absent_field_is_malformed() {
        let file = write_file("host: https://d.example.com\nusername: admin\n");
        let err = Credentials::load(file.path()).unwrap_err();
        assert!(matches!(err, CredentialsError::Malformed { .. }));
    }

    #[test]
    fn debug_output_redacts_the_secret() {
        let credentials = Credentials {
            host: "https://d.example.com".into(),
            username: "admin".into(),
            password: "hunter2".into(),
        };
        let rendered = format!("{credentials:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }
}
