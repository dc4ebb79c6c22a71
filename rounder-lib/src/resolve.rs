//! Locating the account to round and the pot to round into

use tracing::instrument;

use crate::{
    bank::{Account, AccountKind, Bank, Pot},
    Error, Result,
};

/// The name of the pot that receives the rounding remainder, unless configured
/// otherwise
pub const DEFAULT_POT_NAME: &str = "Rounder";

/// Find the current account to round.
///
/// This is the first current account with a nonzero total balance. If there is
/// more than one such account the first is used, in the order returned by the
/// bank.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if there's no such account, or any error from
/// the bank.
#[instrument(skip(bank))]
pub async fn resolve_account(bank: &impl Bank) -> Result<Account> {
    let mut candidates = bank
        .accounts()
        .await?
        .into_iter()
        .filter(|account| account.kind == AccountKind::Current && account.total_balance != 0);

    let account = candidates
        .next()
        .ok_or_else(|| Error::NotFound("current account".to_string()))?;

    let others = candidates.count();
    if others > 0 {
        tracing::warn!(
            account_id = %account.id,
            others,
            "more than one current account with a balance, using the first"
        );
    }

    Ok(account)
}

/// Find the live pot called `name` within the given account.
///
/// Deleted pots are never matched, even if the name is identical.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if there's no such pot, or any error from the
/// bank.
#[instrument(skip(bank))]
pub async fn resolve_pot(bank: &impl Bank, account_id: &str, name: &str) -> Result<Pot> {
    bank.pots(account_id)
        .await?
        .into_iter()
        .filter(|pot| !pot.deleted)
        .find(|pot| pot.name == name)
        .ok_or_else(|| Error::NotFound(format!("pot \"{name}\"")))
}
