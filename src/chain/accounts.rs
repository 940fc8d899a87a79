// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tienda Project

//! Account roster: selector resolution for the server-held signing keys.
//!
//! The roster is a fixed operational set (admin, sellers) built once from
//! configuration and immutable for the process lifetime. End users are never
//! in it; they authenticate by wallet address only. Resolution is a pure
//! lookup with no network I/O.

use std::str::FromStr;

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use tokio::sync::Mutex;

use crate::config::KeyConfig;

use super::error::ChainError;

/// Selects which roster keypair signs a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountSelector {
    /// The first configured keypair (the operational admin).
    Admin,
    /// Position in the configured roster.
    Index(usize),
}

impl AccountSelector {
    fn position(self) -> usize {
        match self {
            AccountSelector::Admin => 0,
            AccountSelector::Index(i) => i,
        }
    }
}

impl From<Option<usize>> for AccountSelector {
    fn from(index: Option<usize>) -> Self {
        match index {
            Some(i) => AccountSelector::Index(i),
            None => AccountSelector::Admin,
        }
    }
}

#[derive(Debug)]
struct RosterEntry {
    address: Address,
    signer: Option<PrivateKeySigner>,
    /// Serializes nonce fetch through submission for this signer.
    nonce_lock: Mutex<()>,
}

/// The process-wide set of known accounts, in configuration order.
///
/// Entries past the end of the private-key list are watch-only: their address
/// is known (payout payees) but they cannot sign.
#[derive(Debug)]
pub struct AccountRoster {
    entries: Vec<RosterEntry>,
}

impl AccountRoster {
    /// Build the roster from key configuration.
    ///
    /// In list mode every private key must derive the address declared at the
    /// same position of the public list; a mismatch is a configuration error.
    pub fn from_config(keys: &KeyConfig) -> Result<Self, ChainError> {
        match keys {
            KeyConfig::Single { private_key } => {
                let signer = parse_signer(private_key)?;
                Ok(Self {
                    entries: vec![RosterEntry {
                        address: signer.address(),
                        signer: Some(signer),
                        nonce_lock: Mutex::new(()),
                    }],
                })
            }
            KeyConfig::List { public, private } => {
                if public.len() < private.len() {
                    return Err(ChainError::Configuration(format!(
                        "{} public addresses for {} private keys",
                        public.len(),
                        private.len()
                    )));
                }

                let mut entries = Vec::with_capacity(public.len());
                for (i, declared) in public.iter().enumerate() {
                    let address = Address::from_str(declared.trim()).map_err(|e| {
                        ChainError::Configuration(format!("bad public key #{i}: {e}"))
                    })?;

                    let signer = match private.get(i) {
                        Some(key) => {
                            let signer = parse_signer(key)?;
                            if signer.address() != address {
                                return Err(ChainError::Configuration(format!(
                                    "private key #{i} does not match public address {address}"
                                )));
                            }
                            Some(signer)
                        }
                        None => None,
                    };

                    entries.push(RosterEntry {
                        address,
                        signer,
                        nonce_lock: Mutex::new(()),
                    });
                }

                Ok(Self { entries })
            }
        }
    }

    /// An empty roster: read-only deployments with no signing accounts.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Resolve a selector to its signing key.
    pub fn resolve_signer(&self, selector: AccountSelector) -> Result<&PrivateKeySigner, ChainError> {
        let entry = self.entry(selector)?;
        entry.signer.as_ref().ok_or_else(|| {
            ChainError::AccountNotFound(format!(
                "account #{} is watch-only and cannot sign",
                selector.position()
            ))
        })
    }

    /// Resolve a selector to its public address.
    pub fn resolve_public_address(&self, selector: AccountSelector) -> Result<Address, ChainError> {
        Ok(self.entry(selector)?.address)
    }

    /// Every known account with its signing capability, in roster order.
    pub fn list_known_accounts(&self) -> Vec<(Address, bool)> {
        self.entries
            .iter()
            .map(|entry| (entry.address, entry.signer.is_some()))
            .collect()
    }

    /// The nonce lock of a signing account.
    pub(crate) fn nonce_lock(&self, selector: AccountSelector) -> Result<&Mutex<()>, ChainError> {
        Ok(&self.entry(selector)?.nonce_lock)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, selector: AccountSelector) -> Result<&RosterEntry, ChainError> {
        let position = selector.position();
        self.entries.get(position).ok_or_else(|| {
            ChainError::AccountNotFound(format!(
                "account #{position} is outside the configured roster of {}",
                self.entries.len()
            ))
        })
    }
}

fn parse_signer(private_key: &str) -> Result<PrivateKeySigner, ChainError> {
    let key_bytes = alloy::hex::decode(private_key.trim())
        .map_err(|e| ChainError::Configuration(format!("invalid private key: {e}")))?;

    PrivateKeySigner::from_slice(&key_bytes)
        .map_err(|e| ChainError::Configuration(format!("invalid private key: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    // Hardhat's first two well-known development keys.
    const KEY_0: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const ADDR_0: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";
    const KEY_1: &str = "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d";
    const ADDR_1: &str = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8";

    fn list_roster() -> AccountRoster {
        AccountRoster::from_config(&KeyConfig::List {
            public: vec![
                ADDR_0.to_string(),
                ADDR_1.to_string(),
                // Watch-only payee, no paired private key
                "0x3C44CdDdB6a900fa2b585dd299e03d12FA4293BC".to_string(),
            ],
            private: vec![KEY_0.to_string(), KEY_1.to_string()],
        })
        .unwrap()
    }

    #[test]
    fn signer_and_address_agree_for_every_selector() {
        let roster = list_roster();
        for selector in [
            AccountSelector::Admin,
            AccountSelector::Index(0),
            AccountSelector::Index(1),
        ] {
            let signer = roster.resolve_signer(selector).unwrap();
            let address = roster.resolve_public_address(selector).unwrap();
            assert_eq!(signer.address(), address);
        }
    }

    #[test]
    fn admin_is_the_first_entry() {
        let roster = list_roster();
        assert_eq!(
            roster.resolve_public_address(AccountSelector::Admin).unwrap(),
            roster
                .resolve_public_address(AccountSelector::Index(0))
                .unwrap()
        );
    }

    #[test]
    fn out_of_range_selector_is_account_not_found() {
        let roster = list_roster();
        let err = roster
            .resolve_signer(AccountSelector::Index(17))
            .unwrap_err();
        assert!(matches!(err, ChainError::AccountNotFound(_)));
        assert!(roster
            .resolve_public_address(AccountSelector::Index(17))
            .is_err());
    }

    #[test]
    fn watch_only_entry_cannot_sign() {
        let roster = list_roster();
        assert!(roster
            .resolve_public_address(AccountSelector::Index(2))
            .is_ok());
        let err = roster
            .resolve_signer(AccountSelector::Index(2))
            .unwrap_err();
        assert!(matches!(err, ChainError::AccountNotFound(_)));
    }

    #[test]
    fn list_known_accounts_reports_capability() {
        let roster = list_roster();
        let known = roster.list_known_accounts();
        assert_eq!(known.len(), 3);
        assert!(known[0].1 && known[1].1);
        assert!(!known[2].1);
    }

    #[test]
    fn key_address_mismatch_is_rejected() {
        let err = AccountRoster::from_config(&KeyConfig::List {
            public: vec![ADDR_1.to_string()],
            private: vec![KEY_0.to_string()],
        })
        .unwrap_err();
        assert!(matches!(err, ChainError::Configuration(_)));
    }

    #[test]
    fn single_mode_derives_admin_address() {
        let roster = AccountRoster::from_config(&KeyConfig::Single {
            private_key: format!("0x{KEY_0}"),
        })
        .unwrap();
        assert_eq!(
            roster
                .resolve_public_address(AccountSelector::Admin)
                .unwrap()
                .to_string(),
            ADDR_0
        );
    }

    #[tokio::test]
    async fn nonce_lock_serializes_same_signer() {
        let roster = Arc::new(list_roster());
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let roster = roster.clone();
            let in_flight = in_flight.clone();
            let peak = peak.clone();
            handles.push(tokio::spawn(async move {
                let lock = roster.nonce_lock(AccountSelector::Admin).unwrap();
                let _guard = lock.lock().await;
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::task::yield_now().await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(peak.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_signers_do_not_share_a_lock() {
        let roster = list_roster();
        let _guard_admin = roster
            .nonce_lock(AccountSelector::Admin)
            .unwrap()
            .lock()
            .await;
        // Would deadlock if Index(1) shared the admin lock
        let _guard_other = roster
            .nonce_lock(AccountSelector::Index(1))
            .unwrap()
            .lock()
            .await;
    }
}
