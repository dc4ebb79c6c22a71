//! OAuth credential lifecycle
//!
//! Credentials are loaded from the [`CredentialStore`], reused or refreshed
//! where possible, and otherwise obtained interactively from the operator.
//! Every successful path ends with the current token set saved to disk.

use chrono::Utc;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    credentials::{CredentialStore, Credentials},
    Error, Result,
};

mod oauth;
pub use oauth::{Authenticator, MonzoOAuth, OAuthConfig};
mod prompt;
pub use prompt::{AuthorizationResponse, ConsolePrompt, CredentialPrompt};

/// Produce a usable token set and persist it.
///
/// # Errors
///
/// Fails if the interactive exchange fails (including a state token
/// mismatch), if a refresh fails for any reason other than the token being
/// rejected, or if the credentials can't be saved.
#[instrument(skip_all, fields(path = %store.path().display()))]
pub async fn authenticate(
    authenticator: &impl Authenticator,
    store: &CredentialStore,
    prompt: &mut impl CredentialPrompt,
) -> Result<Credentials> {
    let credentials = match store.load() {
        Some(stored) if stored.is_valid_at(Utc::now()) => {
            tracing::info!("reusing stored access token");
            stored
        }
        Some(stored) if stored.is_refreshable() => {
            match authenticator.refresh(&stored.refresh_token).await {
                Ok(refreshed) => {
                    tracing::info!("refreshed access token");
                    refreshed
                }
                Err(e) if e.is_rejected_grant() => {
                    tracing::warn!(error = %e, "stored refresh token rejected");
                    authorize(authenticator, prompt).await?
                }
                Err(e) => return Err(e),
            }
        }
        _ => authorize(authenticator, prompt).await?,
    };

    store.save(&credentials)?;
    Ok(credentials)
}

/// Run the interactive authorisation code flow
async fn authorize(
    authenticator: &impl Authenticator,
    prompt: &mut impl CredentialPrompt,
) -> Result<Credentials> {
    let state = Uuid::new_v4().simple().to_string();
    let url = authenticator.authorization_url(&state)?;

    let response = prompt.authorize(&url)?;
    if response.state != state {
        return Err(Error::StateMismatch);
    }

    let credentials = authenticator.exchange(&response.code).await?;
    tracing::info!("authorised via interactive flow");
    Ok(credentials)
}
