//! In-memory [`Bank`] for exercising resolvers and transfers

use std::cell::RefCell;

use crate::{
    bank::{Account, AccountKind, Bank, Pot},
    Result,
};

pub fn account(id: &str, kind: AccountKind, balance: i64) -> Account {
    Account {
        id: id.to_string(),
        kind,
        balance,
        total_balance: balance,
        currency: "GBP".to_string(),
    }
}

pub fn pot(id: &str, name: &str, deleted: bool) -> Pot {
    Pot {
        id: id.to_string(),
        name: name.to_string(),
        deleted,
        balance: 0,
        currency: "GBP".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deposit {
    pub pot_id: String,
    pub account_id: String,
    pub amount: u32,
    pub dedupe_id: String,
}

#[derive(Debug, Default)]
pub struct FakeBank {
    accounts: Vec<Account>,
    pots: RefCell<Vec<Pot>>,
    pub deposits: RefCell<Vec<Deposit>>,
}

impl FakeBank {
    pub fn new(accounts: Vec<Account>, pots: Vec<Pot>) -> Self {
        Self {
            accounts,
            pots: RefCell::new(pots),
            deposits: RefCell::default(),
        }
    }
}

impl Bank for FakeBank {
    async fn accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.clone())
    }

    async fn pots(&self, _account_id: &str) -> Result<Vec<Pot>> {
        Ok(self.pots.borrow().clone())
    }

    async fn deposit(
        &self,
        pot_id: &str,
        source_account_id: &str,
        amount: u32,
        dedupe_id: &str,
    ) -> Result<Pot> {
        self.deposits.borrow_mut().push(Deposit {
            pot_id: pot_id.to_string(),
            account_id: source_account_id.to_string(),
            amount,
            dedupe_id: dedupe_id.to_string(),
        });

        let mut pots = self.pots.borrow_mut();
        let pot = pots
            .iter_mut()
            .find(|pot| pot.id == pot_id)
            .ok_or_else(|| crate::Error::NotFound(format!("pot {pot_id}")))?;
        pot.balance += i64::from(amount);

        Ok(pot.clone())
    }
}
