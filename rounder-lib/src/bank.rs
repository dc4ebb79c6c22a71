//! The banking operations a rounding run depends on

/// The kind of a bank account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// A personal current (checking) account
    Current,

    /// Any other account (joint, flex, rewards, ...)
    Other,
}

/// A bank account together with its balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// The unique ID of the account
    pub id: String,

    /// What sort of account this is
    pub kind: AccountKind,

    /// The available balance, in minor currency units
    pub balance: i64,

    /// The balance including pots, in minor currency units
    pub total_balance: i64,

    /// ISO 4217 currency code
    pub currency: String,
}

/// A savings pot belonging to an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pot {
    /// The unique ID of the pot
    pub id: String,

    /// The display name of the pot
    pub name: String,

    /// Whether the pot has been deleted
    pub deleted: bool,

    /// The pot balance, in minor currency units
    pub balance: i64,

    /// ISO 4217 currency code
    pub currency: String,
}

impl From<monzo::Pot> for Pot {
    fn from(pot: monzo::Pot) -> Self {
        Self {
            id: pot.id,
            name: pot.name,
            deleted: pot.deleted,
            balance: pot.balance,
            currency: pot.currency,
        }
    }
}

/// Access to the accounts and pots of a single authenticated user.
///
/// This is implemented by [`Session`](crate::Session) for the real Monzo API.
#[allow(async_fn_in_trait)]
pub trait Bank {
    /// List the user's accounts, with balances
    async fn accounts(&self) -> crate::Result<Vec<Account>>;

    /// List the pots associated with the given account
    async fn pots(&self, account_id: &str) -> crate::Result<Vec<Pot>>;

    /// Fetch a single pot by ID
    ///
    /// The default implementation lists the pots of the account and picks the
    /// matching one.
    async fn pot(&self, account_id: &str, pot_id: &str) -> crate::Result<Pot> {
        self.pots(account_id)
            .await?
            .into_iter()
            .find(|pot| pot.id == pot_id)
            .ok_or_else(|| crate::Error::NotFound(format!("pot {pot_id}")))
    }

    /// Move `amount` minor units from the account into the pot.
    ///
    /// `dedupe_id` lets the API discard a repeated request for the same
    /// deposit.
    async fn deposit(
        &self,
        pot_id: &str,
        source_account_id: &str,
        amount: u32,
        dedupe_id: &str,
    ) -> crate::Result<Pot>;
}
