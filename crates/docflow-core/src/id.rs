//! Typed identifiers.
//!
//! Every identifier wraps a UUIDv7: random enough to be collision-resistant when
//! many items are created within the same millisecond, while still sorting
//! roughly by creation time.

use std::str::FromStr;

use derive_more::{Debug, Display, From, Into};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[derive(Debug, Display, From, Into)]
        #[debug("{_0}")]
        #[display("{_0}")]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Allocates a new unique identifier.
            #[inline]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an identifier from an existing UUID.
            #[inline]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Creates a deterministic identifier, mostly useful for fixtures.
            #[inline]
            pub const fn from_u128(value: u128) -> Self {
                Self(Uuid::from_u128(value))
            }

            /// Returns the underlying UUID.
            #[inline]
            pub const fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl FromStr for $name {
            type Err = crate::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::from_str(s.trim()).map(Self).map_err(|e| {
                    crate::Error::from_source(crate::ErrorKind::InvalidInput, e)
                        .with_message(format!("'{s}' is not a valid identifier"))
                })
            }
        }
    };
}

define_id!(
    /// Unique identifier for an uploaded document.
    DocumentId
);

define_id!(
    /// Unique identifier for a workflow definition.
    WorkflowId
);

define_id!(
    /// Identifier of a step, unique within its workflow.
    StepId
);

define_id!(
    /// Unique identifier for a workflow run record.
    RunId
);

define_id!(
    /// Unique identifier for a chat message.
    MessageId
);

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_ids_are_unique_under_rapid_allocation() {
        let ids: HashSet<WorkflowId> = (0..10_000).map(|_| WorkflowId::new()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_id_from_str() {
        let id = DocumentId::from_u128(7);
        let parsed: DocumentId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_from_str_invalid() {
        let err = "r1".parse::<RunId>().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = StepId::from_u128(1);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.as_uuid()));
    }
}
