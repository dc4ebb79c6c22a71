//! Persistence of OAuth credentials between runs

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Access tokens this close to their expiry are treated as already expired
const EXPIRY_MARGIN_SECS: i64 = 60;

/// The token set issued by the Monzo OAuth endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Short-lived bearer token for API calls
    pub access_token: String,

    /// Long-lived token used to obtain a new access token
    pub refresh_token: String,

    /// When the access token stops being valid
    #[serde(with = "chrono::serde::ts_seconds")]
    pub expiry: DateTime<Utc>,
}

impl Credentials {
    /// Assemble a token set.
    ///
    /// The expiry is kept to whole seconds, which is all the credential file
    /// stores.
    #[must_use]
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expiry: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expiry: expiry.trunc_subsecs(0),
        }
    }

    /// Whether the access token can still be used at `now`
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && self.expiry - Duration::seconds(EXPIRY_MARGIN_SECS) > now
    }

    /// Whether a refresh grant can be attempted with these credentials
    #[must_use]
    pub fn is_refreshable(&self) -> bool {
        !self.refresh_token.is_empty()
    }
}

/// Reads and writes [`Credentials`] as a JSON document at a fixed path
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Create a store backed by the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The location of the credential file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored credentials.
    ///
    /// A missing file is not an error. A file that can't be read or parsed is
    /// logged and treated as missing, which sends the caller down the
    /// interactive authorisation route.
    #[must_use]
    pub fn load(&self) -> Option<Credentials> {
        match self.try_load() {
            Ok(credentials) => Some(credentials),
            Err(crate::Error::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no stored credentials");
                None
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring unusable credential file");
                None
            }
        }
    }

    fn try_load(&self) -> Result<Credentials> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Replace the stored credentials.
    ///
    /// The document is written to a sibling file and renamed into place, so a
    /// failed write never leaves a half-written file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory can't be created or the file can't be
    /// written.
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, serde_json::to_vec(credentials)?)?;
        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), "saved credentials");
        Ok(())
    }
}
