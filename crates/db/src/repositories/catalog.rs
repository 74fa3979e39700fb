//! Client, company, bank and account catalogs.

use chrono::Utc;
use gestion_core::movement::{Account, AccountDirectory, CatalogRef, DirectoryError, RepositoryError};
use gestion_shared::types::{AccountId, BankId, ClientId, CompanyId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::movement::db_err;
use crate::entities::{bancos, clientes, cuentas, empresas};

/// Catalog repository for the header selectors and the account directory.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Active clients ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_clients(&self) -> Result<Vec<CatalogRef<ClientId>>, RepositoryError> {
        let rows = clientes::Entity::find()
            .filter(clientes::Column::Activo.eq(true))
            .order_by_asc(clientes::Column::Nombre)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|row| CatalogRef::new(ClientId::from_uuid(row.id), row.nombre))
            .collect())
    }

    /// Active companies ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_companies(&self) -> Result<Vec<CatalogRef<CompanyId>>, RepositoryError> {
        let rows = empresas::Entity::find()
            .filter(empresas::Column::Activo.eq(true))
            .order_by_asc(empresas::Column::Nombre)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|row| CatalogRef::new(CompanyId::from_uuid(row.id), row.nombre))
            .collect())
    }

    /// Active banks ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_banks(&self) -> Result<Vec<CatalogRef<BankId>>, RepositoryError> {
        let rows = bancos::Entity::find()
            .filter(bancos::Column::Activo.eq(true))
            .order_by_asc(bancos::Column::Nombre)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|row| CatalogRef::new(BankId::from_uuid(row.id), row.nombre))
            .collect())
    }

    /// Adds a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_client(&self, name: &str) -> Result<CatalogRef<ClientId>, RepositoryError> {
        let id = ClientId::new();
        clientes::ActiveModel {
            id: Set(id.into_inner()),
            nombre: Set(name.trim().to_string()),
            activo: Set(true),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(CatalogRef::new(id, name.trim()))
    }

    /// Adds a company.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_company(&self, name: &str) -> Result<CatalogRef<CompanyId>, RepositoryError> {
        let id = CompanyId::new();
        empresas::ActiveModel {
            id: Set(id.into_inner()),
            nombre: Set(name.trim().to_string()),
            activo: Set(true),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(CatalogRef::new(id, name.trim()))
    }

    /// Adds a bank.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_bank(&self, name: &str) -> Result<CatalogRef<BankId>, RepositoryError> {
        let id = BankId::new();
        bancos::ActiveModel {
            id: Set(id.into_inner()),
            nombre: Set(name.trim().to_string()),
            activo: Set(true),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(CatalogRef::new(id, name.trim()))
    }

    /// Adds an account with its type tag.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create_account(&self, name: &str, type_tag: &str) -> Result<Account, RepositoryError> {
        let id = AccountId::new();
        cuentas::ActiveModel {
            id: Set(id.into_inner()),
            nombre: Set(name.trim().to_string()),
            tipo: Set(type_tag.trim().to_string()),
            activo: Set(true),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;
        Ok(Account::new(id, name.trim(), type_tag.trim()))
    }

    /// Hides an account from the directory without touching stored lines.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the account does not exist.
    pub async fn deactivate_account(&self, id: AccountId) -> Result<(), RepositoryError> {
        let result = cuentas::Entity::update_many()
            .col_expr(cuentas::Column::Activo, sea_orm::sea_query::Expr::value(false))
            .filter(cuentas::Column::Id.eq(id.into_inner()))
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound(format!("account {id}")));
        }
        Ok(())
    }

    async fn active_accounts(&self) -> Result<Vec<cuentas::Model>, sea_orm::DbErr> {
        cuentas::Entity::find()
            .filter(cuentas::Column::Activo.eq(true))
            .order_by_asc(cuentas::Column::Nombre)
            .all(&self.db)
            .await
    }
}

fn account_from(row: cuentas::Model) -> Account {
    Account::new(AccountId::from_uuid(row.id), row.nombre, row.tipo)
}

impl AccountDirectory for CatalogRepository {
    async fn list_accounts(&self) -> Result<Vec<Account>, DirectoryError> {
        let rows = self
            .active_accounts()
            .await
            .map_err(|e| DirectoryError::unavailable(e.to_string()))?;
        tracing::debug!(accounts = rows.len(), "Loaded account directory");
        Ok(rows.into_iter().map(account_from).collect())
    }
}
