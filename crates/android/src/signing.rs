//! Release signing credentials
//!
//! Credentials come from a `key.properties` file next to the Android
//! project. A missing file is a valid state (the release build is left
//! unsigned); a file that exists but lacks a required key is fatal.
//! Passwords are wrapped in [`Secret`] and never reach logs or output.

use appshell_core::error::{Error, ErrorCode, Result};
use appshell_core::properties::Properties;
use std::fmt;
use std::path::{Path, PathBuf};

/// Keys that must be present and non-empty
pub const REQUIRED_KEYS: [&str; 4] = ["keyAlias", "keyPassword", "storeFile", "storePassword"];

/// A string that redacts itself in `Debug`
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a sensitive value
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Access the underlying value
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Material needed to sign a release artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningCredentials {
    /// Alias of the signing key in the keystore
    pub key_alias: String,
    /// Password of the signing key
    pub key_password: Secret,
    /// `storeFile` exactly as written in the properties file
    pub store_file: PathBuf,
    /// Password of the keystore
    pub store_password: Secret,
}

impl SigningCredentials {
    /// Keystore location; relative paths are taken from `base`
    #[must_use]
    pub fn store_file_in(&self, base: &Path) -> PathBuf {
        if self.store_file.is_absolute() {
            self.store_file.clone()
        } else {
            base.join(&self.store_file)
        }
    }

    fn from_properties(path: &Path, props: &Properties) -> Result<Self> {
        let problems: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter_map(|key| match props.get(key) {
                None => Some(format!("missing {key}")),
                Some(v) if v.trim().is_empty() => Some(format!("empty {key}")),
                Some(_) => None,
            })
            .collect();

        if !problems.is_empty() {
            return Err(Error::malformed_credentials(path, &problems));
        }

        // Presence checked above.
        let value = |key: &str| props.get(key).unwrap_or_default().to_string();

        Ok(Self {
            key_alias: value("keyAlias"),
            key_password: Secret::new(value("keyPassword")),
            store_file: PathBuf::from(value("storeFile")),
            store_password: Secret::new(value("storePassword")),
        })
    }
}

/// Load signing credentials from a properties file
///
/// Returns `Ok(None)` when the file does not exist.
pub fn resolve_signing_credentials(path: &Path) -> Result<Option<SigningCredentials>> {
    let props = match Properties::load(path) {
        Ok(props) => props,
        Err(e) if e.code == ErrorCode::FileNotFound => {
            tracing::debug!(path = %path.display(), "No signing properties file");
            return Ok(None);
        }
        Err(e) if e.code == ErrorCode::ConfigParseError => {
            return Err(Error::malformed_credentials(path, &[e.message]));
        }
        Err(e) => return Err(e.with_context(format!("Reading {}", path.display()))),
    };

    let credentials = SigningCredentials::from_properties(path, &props)?;
    tracing::info!(path = %path.display(), "Signing credentials loaded");
    Ok(Some(credentials))
}

/// Signing configuration handed to the release build type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningConfig {
    /// Build type the config belongs to
    pub name: String,
    /// `None` for an unsigned release
    pub credentials: Option<SigningCredentials>,
    /// Resolved keystore location when credentials are present
    pub store_path: Option<PathBuf>,
}

impl SigningConfig {
    /// Release config; relative `storeFile` entries resolve against `store_base`
    #[must_use]
    pub fn release(credentials: Option<SigningCredentials>, store_base: &Path) -> Self {
        let store_path = credentials.as_ref().map(|c| c.store_file_in(store_base));
        Self {
            name: "release".to_string(),
            credentials,
            store_path,
        }
    }

    /// Whether release artifacts will be signed
    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.credentials.is_some()
    }
}
