use std::path::PathBuf;

use clap::Parser;
use rounder_lib::{
    auth::{ConsolePrompt, MonzoOAuth, OAuthConfig},
    resolve, CredentialStore, Outcome, Rounder, Session,
};
use tracing::{instrument, Level};

use crate::{config::Settings, Error};

#[derive(Debug, Parser, Clone)]
pub struct Run {
    /// The OAuth client ID
    #[clap(long, env = "CLIENT_ID", hide_env_values = true, required = true)]
    client_id: Option<String>,

    /// The OAuth client secret
    #[clap(long, env = "CLIENT_SECRET", hide_env_values = true, required = true)]
    client_secret: Option<String>,

    /// Where to keep the OAuth tokens, overriding the config file
    #[clap(long)]
    oauth_file: Option<PathBuf>,

    /// Work out the transfer without moving any money
    #[clap(long)]
    dry_run: bool,
}

impl Run {
    #[instrument(skip_all)]
    pub async fn run(self, settings: Settings) -> Result<(), Error> {
        let store = CredentialStore::new(self.oauth_file.unwrap_or(settings.oauth_file));
        let oauth = MonzoOAuth::new(OAuthConfig {
            client_id: self.client_id.ok_or(Error::Missing("CLIENT_ID"))?,
            client_secret: self.client_secret.ok_or(Error::Missing("CLIENT_SECRET"))?,
            redirect_uri: settings.redirect_uri,
        });

        let session = Session::establish(&oauth, &store, &mut ConsolePrompt).await?;

        let account = resolve::resolve_account(&session).await?;
        let pot = resolve::resolve_pot(&session, &account.id, &settings.pot_name).await?;
        tracing::event!(Level::DEBUG, account_id = %account.id, pot_id = %pot.id, "resolved account and pot");

        let outcome = Rounder::new(settings.denomination)
            .dry_run(self.dry_run)
            .run(&session, &account, &pot)
            .await?;

        match outcome {
            Outcome::NoAction => println!("No rounding required. Cya later alligator 🐊"),
            Outcome::Planned(amount) => println!(
                "Would move {} to {}",
                format_currency(amount, &account.currency),
                pot.name
            ),
            Outcome::Transferred { amount, pot } => println!(
                "💰 Moved {} to {}",
                format_currency(amount, &account.currency),
                pot.name
            ),
        }

        Ok(())
    }
}

fn format_currency(amount: u32, currency: &str) -> String {
    match rusty_money::iso::find(currency) {
        Some(currency) => rusty_money::Money::from_minor(i64::from(amount), currency).to_string(),
        None => format!("{} {}", amount, currency),
    }
}
