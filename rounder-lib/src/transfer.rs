//! Moving the rounding remainder into the pot

use tracing::instrument;
use uuid::Uuid;

use crate::{
    bank::{Bank, Pot},
    Error, Result,
};

/// Deposit `amount` minor units from the account into the pot.
///
/// The pot is fetched again first, so a pot deleted since it was resolved is
/// not deposited into. Each call uses a fresh idempotency key; nothing is
/// retried here.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if the pot no longer exists, or any error from
/// the deposit.
#[instrument(skip(bank))]
pub async fn execute(
    bank: &impl Bank,
    account_id: &str,
    pot_id: &str,
    amount: u32,
) -> Result<Pot> {
    let pot = bank.pot(account_id, pot_id).await?;
    if pot.deleted {
        return Err(Error::NotFound(format!("pot {pot_id}")));
    }

    let dedupe_id = Uuid::new_v4().to_string();
    tracing::info!(%dedupe_id, pot = %pot.name, "depositing into pot");

    bank.deposit(&pot.id, account_id, amount, &dedupe_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bank::AccountKind,
        test_support::{account, pot, FakeBank},
    };

    fn bank(pots: Vec<Pot>) -> FakeBank {
        FakeBank::new(vec![account("acc_current", AccountKind::Current, 1780)], pots)
    }

    #[tokio::test]
    async fn deposits_into_the_pot() {
        let bank = bank(vec![pot("pot_rounder", "Rounder", false)]);

        let pot = execute(&bank, "acc_current", "pot_rounder", 280)
            .await
            .unwrap();

        assert_eq!(pot.balance, 280);
        let deposits = bank.deposits.borrow();
        assert_eq!(deposits.len(), 1);
        assert_eq!(deposits[0].amount, 280);
        assert!(Uuid::parse_str(&deposits[0].dedupe_id).is_ok());
    }

    #[tokio::test]
    async fn each_attempt_has_its_own_key() {
        let bank = bank(vec![pot("pot_rounder", "Rounder", false)]);

        execute(&bank, "acc_current", "pot_rounder", 1).await.unwrap();
        execute(&bank, "acc_current", "pot_rounder", 1).await.unwrap();

        let deposits = bank.deposits.borrow();
        assert_ne!(deposits[0].dedupe_id, deposits[1].dedupe_id);
    }

    #[tokio::test]
    async fn vanished_pot_is_not_found() {
        let bank = bank(vec![pot("pot_rounder", "Rounder", true)]);

        let result = execute(&bank, "acc_current", "pot_missing", 280).await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        let result = execute(&bank, "acc_current", "pot_rounder", 280).await;
        assert!(matches!(result, Err(Error::NotFound(_))));

        assert!(bank.deposits.borrow().is_empty());
    }
}
