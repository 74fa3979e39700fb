//! Accounts, their posting nature, and catalog snapshots.
//!
//! The directory itself is a collaborator (`AccountDirectory`); the engine only
//! ever sees an immutable `AccountCatalog` for the duration of one evaluation.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use gestion_shared::config::EngineConfig;
use gestion_shared::types::AccountId;
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::line::AccountRef;

/// Default posting side of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountNature {
    /// Amounts post as debits.
    Debit,
    /// Amounts post as credits.
    Credit,
}

impl AccountNature {
    /// Derives the nature from a free-text account type tag.
    ///
    /// `EGRESO` and `GASTO` are credit-normal, `INGRESO` and anything
    /// unrecognised are debit-normal.
    #[must_use]
    pub fn from_type_tag(type_tag: &str) -> Self {
        match type_tag.trim().to_uppercase().as_str() {
            "EGRESO" | "GASTO" => Self::Credit,
            _ => Self::Debit,
        }
    }
}

/// A chart of accounts entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier.
    pub id: AccountId,
    /// Display name.
    pub name: String,
    /// Free-text type tag (INGRESO, EGRESO, GASTO, ...).
    pub type_tag: String,
}

impl Account {
    /// Creates an account.
    #[must_use]
    pub fn new(id: AccountId, name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }

    /// Posting nature derived from the type tag.
    #[must_use]
    pub fn nature(&self) -> AccountNature {
        AccountNature::from_type_tag(&self.type_tag)
    }

    /// Label shown in selectors: `"<name> (ID <id>)"`.
    #[must_use]
    pub fn display_label(&self) -> String {
        format!("{} (ID {})", self.name, self.id)
    }
}

/// Immutable snapshot of the account directory.
#[derive(Debug, Clone, Default)]
pub struct AccountCatalog {
    accounts: Vec<Account>,
    by_id: HashMap<AccountId, usize>,
}

impl AccountCatalog {
    /// Builds a catalog from a list of accounts. Later duplicates of an id are ignored.
    #[must_use]
    pub fn new(accounts: Vec<Account>) -> Self {
        let mut by_id = HashMap::with_capacity(accounts.len());
        for (index, account) in accounts.iter().enumerate() {
            by_id.entry(account.id).or_insert(index);
        }
        Self { accounts, by_id }
    }

    /// Looks up an account by id.
    #[must_use]
    pub fn get(&self, id: AccountId) -> Option<&Account> {
        self.by_id.get(&id).map(|&index| &self.accounts[index])
    }

    /// Resolves a line's account reference.
    ///
    /// Labels match an account name (case-insensitive) or its display label.
    #[must_use]
    pub fn resolve(&self, account: &AccountRef) -> Option<&Account> {
        match account {
            AccountRef::Unselected => None,
            AccountRef::Id(id) => self.get(*id),
            AccountRef::Label(label) => {
                let label = label.trim();
                self.accounts.iter().find(|account| {
                    account.name.eq_ignore_ascii_case(label) || account.display_label() == label
                })
            }
        }
    }

    /// All accounts in directory order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the directory returned no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

/// Account directory failures.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// The directory could not be read.
    #[error("account directory unavailable: {0}")]
    Unavailable(String),
}

impl DirectoryError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}

/// Read-only source of accounts.
///
/// This trait is implemented by the db crate.
pub trait AccountDirectory: Send + Sync {
    /// Lists every account.
    fn list_accounts(&self) -> impl Future<Output = Result<Vec<Account>, DirectoryError>> + Send;
}

/// Directory wrapper that reuses a loaded catalog for a short interval.
///
/// Failed loads are never cached.
pub struct CachedDirectory<D: AccountDirectory> {
    inner: D,
    cache: Cache<(), Arc<AccountCatalog>>,
}

impl<D: AccountDirectory> CachedDirectory<D> {
    /// Wraps `inner`, keeping catalogs for `ttl`.
    #[must_use]
    pub fn new(inner: D, ttl: Duration) -> Self {
        let cache = Cache::builder().max_capacity(1).time_to_live(ttl).build();
        Self { inner, cache }
    }

    /// Wraps `inner` with the reuse interval from `engine.catalog_ttl_secs`.
    #[must_use]
    pub fn from_config(inner: D, config: &EngineConfig) -> Self {
        Self::new(inner, Duration::from_secs(config.catalog_ttl_secs))
    }

    /// Returns the cached catalog or loads a fresh one.
    pub async fn catalog(&self) -> Result<Arc<AccountCatalog>, DirectoryError> {
        if let Some(catalog) = self.cache.get(&()) {
            return Ok(catalog);
        }

        let accounts = self.inner.list_accounts().await?;
        tracing::debug!(accounts = accounts.len(), "Loaded account catalog");

        let catalog = Arc::new(AccountCatalog::new(accounts));
        self.cache.insert((), Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Drops the cached catalog so the next call reloads it.
    pub fn invalidate(&self) {
        self.cache.invalidate(&());
    }
}
