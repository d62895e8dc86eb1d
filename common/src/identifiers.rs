//! Identifier types for ledger records.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw store-assigned key.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Get the raw key.
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

record_id!(
    /// Primary key of an account. Assigned by the store in insertion order.
    AccountId
);
record_id!(
    /// Primary key of a journal.
    JournalId
);
record_id!(
    /// Primary key of a posting.
    PostingId
);
record_id!(
    /// Primary key of a tax definition.
    TaxId
);
record_id!(
    /// Primary key of a cost center.
    CostCenterId
);
record_id!(
    /// Primary key of a statutory group.
    GroupId
);

/// Polymorphic reference to a record owned by the host application.
///
/// The ledger stores and passes this through; it never resolves it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountableRef {
    /// Entity type name, e.g. `"Customer"`.
    pub entity_type: String,
    /// Identifier of the entity within its type.
    pub id: String,
}

impl AccountableRef {
    /// Create a new tagged reference.
    pub fn new(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for AccountableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.entity_type, self.id)
    }
}
