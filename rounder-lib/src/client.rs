use monzo::{accounts::Type as AccountType, inner_client::Quick};
use serde::Deserialize;
use tracing::{instrument, Level};

use crate::{
    auth::{self, Authenticator, CredentialPrompt},
    bank::{Account, AccountKind, Bank, Pot},
    credentials::{CredentialStore, Credentials},
    Result,
};

const API_URL: &str = "https://api.monzo.com";

/// The pot as returned by the deposit endpoint
#[derive(Debug, Deserialize)]
struct DepositedPot {
    id: String,
    name: String,
    #[serde(default)]
    deleted: bool,
    balance: i64,
    currency: String,
}

impl From<DepositedPot> for Pot {
    fn from(pot: DepositedPot) -> Self {
        Self {
            id: pot.id,
            name: pot.name,
            deleted: pot.deleted,
            balance: pot.balance,
            currency: pot.currency,
        }
    }
}

/// An authenticated connection to the Monzo API.
///
/// The session is created once per run and handed by reference to every step
/// that needs to talk to the bank.
#[derive(Debug)]
pub struct Session {
    credentials: Credentials,
    client: monzo::Client<Quick>,
    http: reqwest::Client,
}

impl Session {
    /// Create a session from an existing token set
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        let client = monzo::Client::new(credentials.access_token.clone());
        Self {
            credentials,
            client,
            http: reqwest::Client::new(),
        }
    }

    /// Authenticate (reusing, refreshing or interactively obtaining tokens as
    /// required), persist the resulting credentials, and open a session.
    ///
    /// # Errors
    ///
    /// See [`auth::authenticate`].
    pub async fn establish(
        authenticator: &impl Authenticator,
        store: &CredentialStore,
        prompt: &mut impl CredentialPrompt,
    ) -> Result<Self> {
        let credentials = auth::authenticate(authenticator, store, prompt).await?;
        Ok(Self::new(credentials))
    }

    /// The credentials this session authenticates with
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

fn account_kind(account_type: AccountType) -> AccountKind {
    match account_type {
        AccountType::UkRetail => AccountKind::Current,
        _ => AccountKind::Other,
    }
}

impl Bank for Session {
    #[instrument(skip(self))]
    async fn accounts(&self) -> Result<Vec<Account>> {
        let mut accounts = Vec::default();

        for account in self.client.accounts().await? {
            let balance = self.client.balance(&account.id).await?;
            accounts.push(Account {
                kind: account_kind(account.account_type),
                id: account.id,
                balance: balance.balance,
                total_balance: balance.total_balance,
                currency: balance.currency,
            });
        }

        tracing::event!(Level::INFO, count = accounts.len(), "received accounts");

        Ok(accounts)
    }

    #[instrument(skip(self))]
    async fn pots(&self, account_id: &str) -> Result<Vec<Pot>> {
        let pots = self.client.pots(account_id).await?;

        tracing::event!(Level::INFO, count = pots.len(), "received pots");

        Ok(pots.into_iter().map(Pot::from).collect())
    }

    #[instrument(skip(self))]
    async fn deposit(
        &self,
        pot_id: &str,
        source_account_id: &str,
        amount: u32,
        dedupe_id: &str,
    ) -> Result<Pot> {
        let amount = amount.to_string();
        let pot: DepositedPot = self
            .http
            .put(format!("{API_URL}/pots/{pot_id}/deposit"))
            .bearer_auth(&self.credentials.access_token)
            .form(&[
                ("source_account_id", source_account_id),
                ("amount", amount.as_str()),
                ("dedupe_id", dedupe_id),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        tracing::event!(Level::DEBUG, "processed deposit");

        Ok(pot.into())
    }
}
