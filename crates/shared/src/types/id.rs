//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `BankId` where a `ClientId` is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a user.");
typed_id!(RoleId, "Unique identifier for a role.");
typed_id!(ClientId, "Unique identifier for a client.");
typed_id!(CompanyId, "Unique identifier for a company.");
typed_id!(BankId, "Unique identifier for a bank.");
typed_id!(AccountId, "Unique identifier for a chart of accounts entry.");
typed_id!(MovementId, "Unique identifier for a movement header.");
typed_id!(
    LineId,
    "Stable identity of a movement line, assigned when the line is created."
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use uuid::Uuid;

    #[test]
    fn test_typed_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = MovementId::from_uuid(uuid);
        assert_eq!(id.into_inner(), uuid);
    }

    #[test]
    fn test_typed_id_display_and_parse() {
        let id = AccountId::new();
        let parsed = AccountId::from_str(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
        assert!(AccountId::from_str("1010").is_err());
    }

    #[test]
    fn test_line_ids_are_unique() {
        let first = LineId::new();
        let second = LineId::new();
        assert_ne!(first, second);
    }
}
