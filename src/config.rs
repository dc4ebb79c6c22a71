use std::path::{Path, PathBuf};

use rounder_lib::{resolve::DEFAULT_POT_NAME, Denomination};
use serde::{Deserialize, Serialize};

pub static BIN_NAME: &str = std::env!("CARGO_PKG_NAME");

/// Settings read from the config file
#[derive(Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Where Monzo redirects the operator after granting access
    pub redirect_uri: String,

    /// Where the OAuth tokens are kept between runs
    pub oauth_file: PathBuf,

    /// The pot that receives the rounding remainder
    pub pot_name: String,

    /// What the balance is rounded down to, in minor units
    pub denomination: Denomination,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            redirect_uri: "https://funky-monkey.markmcw.uk".to_string(),
            oauth_file: PathBuf::from("/app/config/oauth.json"),
            pot_name: DEFAULT_POT_NAME.to_string(),
            denomination: Denomination::default(),
        }
    }
}

pub fn settings(path: Option<&Path>) -> Result<Settings, confy::ConfyError> {
    match path {
        Some(path) => confy::load_path(path),
        None => confy::load(BIN_NAME, "config"),
    }
}
