//! Round a Monzo current account down to a whole denomination and sweep the
//! remainder into a savings pot

#![deny(
    clippy::all,
    missing_debug_implementations,
    missing_copy_implementations,
    missing_docs
)]
#![warn(clippy::pedantic)]

pub mod auth;
pub mod bank;
#[doc(inline)]
pub use bank::{Account, AccountKind, Bank, Pot};
mod client;
pub use client::Session;
pub mod credentials;
#[doc(inline)]
pub use credentials::{CredentialStore, Credentials};
mod error;
pub use error::{Error, Result};
pub mod resolve;
pub mod rounding;
#[doc(inline)]
pub use rounding::{Denomination, Outcome, Rounder};
pub mod transfer;

#[cfg(test)]
mod test_support;
