//! Roles, page access, password hashing and user input checks.

mod password;
mod user;

pub use password::{PasswordError, hash_password, verify_password};
pub use user::{NewUserInput, UserInputError, ValidNewUser, validate_new_user, validate_password_reset};

use serde::{Deserialize, Serialize};

/// User roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Full access.
    Admin,
    /// Enters movements.
    Asistente,
    /// Partner; enters and reviews movements.
    Socio,
    /// Reads reports.
    Contador,
    /// Home page only.
    #[default]
    Consulta,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 5] = [
        Self::Admin,
        Self::Asistente,
        Self::Socio,
        Self::Contador,
        Self::Consulta,
    ];

    /// Stored role name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Asistente => "ASISTENTE",
            Self::Socio => "SOCIO",
            Self::Contador => "CONTADOR",
            Self::Consulta => "CONSULTA",
        }
    }

    /// Parses a stored role name. Unknown names fall back to `Consulta`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    /// Returns true if this role may open the page.
    #[must_use]
    pub const fn can_access(&self, page: Page) -> bool {
        match page {
            Page::Home => true,
            Page::Movements | Page::Roles => {
                matches!(self, Self::Admin | Self::Asistente | Self::Socio)
            }
            Page::Reports => matches!(self, Self::Admin | Self::Contador),
            Page::Users | Page::Catalogs => matches!(self, Self::Admin),
        }
    }

    /// Returns true if this role can enter movements.
    #[must_use]
    pub const fn can_post_movements(&self) -> bool {
        self.can_access(Page::Movements)
    }

    /// Returns true if this role can manage users.
    #[must_use]
    pub const fn can_manage_users(&self) -> bool {
        self.can_access(Page::Users)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application pages guarded by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Page {
    /// Landing page.
    Home,
    /// Movement entry and listing.
    Movements,
    /// Movement reports.
    Reports,
    /// User administration.
    Users,
    /// Role administration.
    Roles,
    /// Client, company, bank and account catalogs.
    Catalogs,
}
