use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::{credentials::Credentials, Error, Result};

const AUTHORIZE_URL: &str = "https://auth.monzo.com/";
const TOKEN_URL: &str = "https://api.monzo.com/oauth2/token";

/// The identity of the OAuth application
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// The client ID issued by the Monzo developer portal
    pub client_id: String,

    /// The matching client secret
    pub client_secret: String,

    /// Where Monzo sends the operator after they approve access
    pub redirect_uri: String,
}

/// The OAuth token endpoint
#[allow(async_fn_in_trait)]
pub trait Authenticator {
    /// The URL the operator must visit to grant access
    ///
    /// # Errors
    ///
    /// Returns an error if the authorisation URL can't be built.
    fn authorization_url(&self, state: &str) -> Result<Url>;

    /// Exchange an authorisation code for a fresh token set
    async fn exchange(&self, code: &str) -> Result<Credentials>;

    /// Trade a refresh token for a new token set
    async fn refresh(&self, refresh_token: &str) -> Result<Credentials>;
}

/// [`Authenticator`] backed by the Monzo OAuth endpoints
#[derive(Debug, Clone)]
pub struct MonzoOAuth {
    http: reqwest::Client,
    config: OAuthConfig,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
}

impl MonzoOAuth {
    /// Create an authenticator for the given application
    pub fn new(config: OAuthConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    #[instrument(skip(self, form))]
    async fn request_tokens(&self, grant_type: &str, form: &[(&str, &str)]) -> Result<Credentials> {
        let mut params = vec![
            ("grant_type", grant_type),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];
        params.extend_from_slice(form);

        let response = self
            .http
            .post(TOKEN_URL)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(%status, %body, "token request failed");
            return Err(Error::TokenRejected { status, body });
        }

        let tokens: TokenResponse = serde_json::from_str(&response.text().await?)?;
        let credentials = Credentials::new(
            tokens.access_token,
            tokens.refresh_token.unwrap_or_default(),
            Utc::now() + Duration::seconds(tokens.expires_in),
        );
        tracing::info!(expiry = %credentials.expiry.to_rfc3339(), "received access token");

        Ok(credentials)
    }
}

impl Authenticator for MonzoOAuth {
    fn authorization_url(&self, state: &str) -> Result<Url> {
        let url = Url::parse_with_params(
            AUTHORIZE_URL,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("state", state),
            ],
        )?;

        Ok(url)
    }

    async fn exchange(&self, code: &str) -> Result<Credentials> {
        self.request_tokens(
            "authorization_code",
            &[
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("code", code),
            ],
        )
        .await
        .map_err(Error::during_exchange)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<Credentials> {
        let mut credentials = self
            .request_tokens("refresh_token", &[("refresh_token", refresh_token)])
            .await?;

        // Monzo rotates refresh tokens, but keep the old one if none came back
        if credentials.refresh_token.is_empty() {
            credentials.refresh_token = refresh_token.to_string();
        }

        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oauth() -> MonzoOAuth {
        MonzoOAuth::new(OAuthConfig {
            client_id: "oauth2client_123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "https://example.com/callback".to_string(),
        })
    }

    #[test]
    fn authorization_url_carries_client_and_state() {
        let url = oauth().authorization_url("abc").unwrap();
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("auth.monzo.com"));
        assert!(query.contains(&("client_id".to_string(), "oauth2client_123".to_string())));
        assert!(query.contains(&(
            "redirect_uri".to_string(),
            "https://example.com/callback".to_string()
        )));
        assert!(query.contains(&("response_type".to_string(), "code".to_string())));
        assert!(query.contains(&("state".to_string(), "abc".to_string())));
    }

    #[test]
    fn token_response_without_refresh_token() {
        let raw = r#"{"access_token": "a", "expires_in": 21600, "token_type": "Bearer"}"#;
        let tokens: TokenResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(tokens.refresh_token, None);
        assert_eq!(tokens.expires_in, 21600);
    }
}
