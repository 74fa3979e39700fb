//! User repository for database operations.

use chrono::{DateTime, Utc};
use gestion_core::auth::{
    NewUserInput, PasswordError, Role, UserInputError, hash_password, validate_new_user,
    validate_password_reset, verify_password,
};
use gestion_shared::types::{RoleId, UserId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, sea_query::OnConflict,
};

use crate::entities::{roles, usuarios};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Form input was rejected.
    #[error(transparent)]
    Input(#[from] UserInputError),

    /// Hashing or verifying a password failed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// The role has no row in `roles`.
    #[error("Role not found: {0}")]
    UnknownRole(String),

    /// The username is taken.
    #[error("Username already exists: {0}")]
    DuplicateUsername(String),

    /// User not found.
    #[error("User not found: {0}")]
    NotFound(UserId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl UserError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Input(e) => e.error_code(),
            Self::Password(e) => e.error_code(),
            Self::UnknownRole(_) => "UNKNOWN_ROLE",
            Self::DuplicateUsername(_) => "DUPLICATE_USERNAME",
            Self::NotFound(_) => "USER_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

/// A user as seen after login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// User id.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Display name.
    pub full_name: Option<String>,
    /// Role.
    pub role: Role,
    /// Whether the user may log in.
    pub active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A stored role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleRecord {
    /// Row id.
    pub id: RoleId,
    /// Role.
    pub role: Role,
}

fn account_from(user: usuarios::Model, role: Option<&roles::Model>) -> UserAccount {
    UserAccount {
        id: UserId::from_uuid(user.id),
        username: user.username,
        full_name: user.nombre,
        role: role.map(|r| Role::from_name(&r.nombre)).unwrap_or_default(),
        active: user.activo,
        created_at: user.created_at.with_timezone(&Utc),
    }
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts any role from `Role::ALL` that has no row yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ensure_roles(&self) -> Result<Vec<RoleRecord>, UserError> {
        let existing = roles::Entity::find().all(&self.db).await?;
        for role in Role::ALL {
            if existing.iter().any(|r| r.nombre == role.as_str()) {
                continue;
            }
            let row = roles::ActiveModel {
                id: Set(RoleId::new().into_inner()),
                nombre: Set(role.as_str().to_string()),
                created_at: Set(Utc::now().into()),
            };
            let inserted = roles::Entity::insert(row)
                .on_conflict(
                    OnConflict::column(roles::Column::Nombre)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&self.db)
                .await?;
            if inserted > 0 {
                tracing::info!(role = role.as_str(), "Role created");
            }
        }
        self.list_roles().await
    }

    /// Stored roles ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_roles(&self) -> Result<Vec<RoleRecord>, UserError> {
        let rows = roles::Entity::find()
            .order_by_asc(roles::Column::Nombre)
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|r| RoleRecord {
                id: RoleId::from_uuid(r.id),
                role: Role::from_name(&r.nombre),
            })
            .collect())
    }

    /// Checks credentials. Returns the user only if it exists, is active and
    /// the password verifies.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored hash is malformed.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<UserAccount>, UserError> {
        let found = usuarios::Entity::find()
            .filter(usuarios::Column::Username.eq(username.trim()))
            .filter(usuarios::Column::Activo.eq(true))
            .find_also_related(roles::Entity)
            .one(&self.db)
            .await?;

        let Some((user, role)) = found else {
            tracing::debug!(username, "Login rejected: unknown or inactive user");
            return Ok(None);
        };
        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(username, "Login rejected: wrong password");
            return Ok(None);
        }
        Ok(Some(account_from(user, role.as_ref())))
    }

    /// Creates a user after validating the form input.
    ///
    /// # Errors
    ///
    /// Returns `Input` for rejected input, `UnknownRole` if the role row is
    /// missing and `DuplicateUsername` if the name is taken.
    pub async fn create_user(&self, input: &NewUserInput) -> Result<UserAccount, UserError> {
        let valid = validate_new_user(input)?;
        let role = roles::Entity::find()
            .filter(roles::Column::Nombre.eq(valid.role.as_str()))
            .one(&self.db)
            .await?
            .ok_or_else(|| UserError::UnknownRole(valid.role.as_str().to_string()))?;
        let password_hash = hash_password(&input.password)?;

        let now = Utc::now().into();
        let user = usuarios::ActiveModel {
            id: Set(UserId::new().into_inner()),
            username: Set(valid.username.clone()),
            nombre: Set(valid.full_name),
            password_hash: Set(password_hash),
            rol_id: Set(role.id),
            activo: Set(valid.active),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                UserError::DuplicateUsername(valid.username.clone())
            }
            _ => UserError::Database(e),
        })?;

        tracing::info!(username = %user.username, role = valid.role.as_str(), "User created");
        Ok(account_from(user, Some(&role)))
    }

    /// Every user with its role, ordered by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_users(&self) -> Result<Vec<UserAccount>, UserError> {
        let rows = usuarios::Entity::find()
            .find_also_related(roles::Entity)
            .order_by_asc(usuarios::Column::Username)
            .all(&self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(user, role)| account_from(user, role.as_ref()))
            .collect())
    }

    /// Enables or disables login for a user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist.
    pub async fn set_active(&self, id: UserId, active: bool) -> Result<(), UserError> {
        let mut user: usuarios::ActiveModel = self.find_model(id).await?.into();
        user.activo = Set(active);
        user.updated_at = Set(Utc::now().into());
        user.update(&self.db).await?;
        tracing::info!(user_id = %id, active, "User activation changed");
        Ok(())
    }

    /// Replaces a user's password.
    ///
    /// # Errors
    ///
    /// Returns `Input` if the passwords are empty or differ, `NotFound` if the
    /// user does not exist.
    pub async fn reset_password(
        &self,
        id: UserId,
        password: &str,
        confirmation: &str,
    ) -> Result<(), UserError> {
        validate_password_reset(password, confirmation)?;
        let mut user: usuarios::ActiveModel = self.find_model(id).await?.into();
        user.password_hash = Set(hash_password(password)?);
        user.updated_at = Set(Utc::now().into());
        user.update(&self.db).await?;
        tracing::info!(user_id = %id, "Password reset");
        Ok(())
    }

    async fn find_model(&self, id: UserId) -> Result<usuarios::Model, UserError> {
        usuarios::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(id))
    }
}
