//! Rounding the account balance down to a whole denomination

use std::{fmt, num::NonZeroU32};

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    bank::{Account, Bank, Pot},
    transfer, Result,
};

/// The unit the balance is rounded down to, in minor currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Denomination(NonZeroU32);

impl Denomination {
    /// Wrap a non-zero number of minor units
    #[must_use]
    pub fn new(minor_units: u32) -> Option<Self> {
        NonZeroU32::new(minor_units).map(Self)
    }

    /// The denomination in minor units
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Denomination {
    /// £5.00
    fn default() -> Self {
        Self(NonZeroU32::new(500).unwrap_or(NonZeroU32::MIN))
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The amount that would be left over after rounding `balance` down to a whole
/// multiple of `denomination`.
///
/// Always in `0..denomination`, and such that `balance - remainder` is a
/// multiple of `denomination`.
#[must_use]
pub fn remainder(balance: i64, denomination: Denomination) -> i64 {
    balance.rem_euclid(i64::from(denomination.get()))
}

/// What a rounding run should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plan {
    /// The balance is already a whole multiple, or there's nothing to round
    NoAction,

    /// Move this many minor units into the pot
    Transfer(u32),
}

/// Decide what to move for the given balance.
///
/// Negative balances are never rounded.
#[must_use]
pub fn plan(balance: i64, denomination: Denomination) -> Plan {
    if balance < 0 {
        return Plan::NoAction;
    }

    match u32::try_from(remainder(balance, denomination)) {
        Ok(0) | Err(_) => Plan::NoAction,
        Ok(amount) => Plan::Transfer(amount),
    }
}

/// The result of a rounding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing needed moving
    NoAction,

    /// A transfer was computed but not carried out
    Planned(u32),

    /// The remainder was deposited; holds the pot as returned by the bank
    Transferred {
        /// The amount moved, in minor units
        amount: u32,
        /// The updated pot
        pot: Pot,
    },
}

/// Rounds an account balance down and sweeps the remainder into a pot
#[derive(Debug, Clone, Copy, Default)]
pub struct Rounder {
    denomination: Denomination,
    dry_run: bool,
}

impl Rounder {
    /// Create a rounder for the given denomination
    #[must_use]
    pub fn new(denomination: Denomination) -> Self {
        Self {
            denomination,
            dry_run: false,
        }
    }

    /// Compute the transfer without making it
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Round `account` down, moving the remainder into `pot`.
    ///
    /// # Errors
    ///
    /// Returns any error from the transfer.
    #[instrument(skip_all, fields(account_id = %account.id, pot_id = %pot.id, balance = account.balance))]
    pub async fn run(&self, bank: &impl Bank, account: &Account, pot: &Pot) -> Result<Outcome> {
        match plan(account.balance, self.denomination) {
            Plan::NoAction => {
                tracing::info!(denomination = %self.denomination, "no rounding required");
                Ok(Outcome::NoAction)
            }
            Plan::Transfer(amount) if self.dry_run => {
                tracing::info!(amount, "dry run, skipping transfer");
                Ok(Outcome::Planned(amount))
            }
            Plan::Transfer(amount) => {
                let pot = transfer::execute(bank, &account.id, &pot.id, amount).await?;
                Ok(Outcome::Transferred { amount, pot })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::{
        bank::AccountKind,
        test_support::{account, pot, FakeBank},
    };

    fn fiver() -> Denomination {
        Denomination::default()
    }

    #[test_case(1780 => 280; "pounds and pence")]
    #[test_case(1500 => 0; "exact multiple")]
    #[test_case(0 => 0; "empty")]
    #[test_case(499 => 499; "below denomination")]
    #[test_case(501 => 1; "just over")]
    #[test_case(-20 => 480; "overdrawn")]
    fn remainder_of(balance: i64) -> i64 {
        super::super::remainder(balance, fiver())
    }

    #[test]
    fn remainder_is_bounded_and_aligned() {
        let denomination = fiver();
        let d = i64::from(denomination.get());

        for balance in (0..5_000).chain([i64::from(u32::MAX), 1_000_000_007]) {
            let r = remainder(balance, denomination);
            assert!((0..d).contains(&r), "{balance} -> {r}");
            assert_eq!((balance - r) % d, 0);
            assert_eq!(r == 0, balance % d == 0);
        }
    }

    #[test_case(1780 => Plan::Transfer(280); "transfer")]
    #[test_case(1500 => Plan::NoAction; "exact multiple")]
    #[test_case(-1780 => Plan::NoAction; "negative")]
    fn plan_for(balance: i64) -> Plan {
        super::super::plan(balance, fiver())
    }

    #[test]
    fn zero_denomination_is_rejected() {
        assert_eq!(Denomination::new(0), None);
        assert_eq!(Denomination::new(100).map(Denomination::get), Some(100));
    }

    fn bank(balance: i64) -> (FakeBank, Account, Pot) {
        let current = account("acc_current", AccountKind::Current, balance);
        let rounder = pot("pot_rounder", "Rounder", false);
        let bank = FakeBank::new(vec![current.clone()], vec![rounder.clone()]);
        (bank, current, rounder)
    }

    #[tokio::test]
    async fn moves_the_remainder_once() {
        let (bank, account, pot) = bank(1780);

        let outcome = Rounder::new(fiver())
            .run(&bank, &account, &pot)
            .await
            .unwrap();

        let deposits = bank.deposits.borrow();
        assert_eq!(deposits.len(), 1);
        assert_eq!(deposits[0].amount, 280);
        assert_eq!(deposits[0].pot_id, "pot_rounder");
        assert_eq!(deposits[0].account_id, "acc_current");
        assert!(matches!(outcome, Outcome::Transferred { amount: 280, .. }));
    }

    #[tokio::test]
    async fn exact_multiple_moves_nothing() {
        let (bank, account, pot) = bank(1500);

        let outcome = Rounder::new(fiver())
            .run(&bank, &account, &pot)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::NoAction);
        assert!(bank.deposits.borrow().is_empty());
    }

    #[tokio::test]
    async fn dry_run_moves_nothing() {
        let (bank, account, pot) = bank(1780);

        let outcome = Rounder::new(fiver())
            .dry_run(true)
            .run(&bank, &account, &pot)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Planned(280));
        assert!(bank.deposits.borrow().is_empty());
    }
}
