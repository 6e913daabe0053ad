//! Typed identifiers for catalog entries and graph elements.
//!
//! Every entity in a patlang document is addressed by a stable string
//! identifier that is only unique within its own namespace (a wire type id
//! and a box type id may collide without meaning anything). Each namespace
//! gets its own newtype so the compiler keeps them apart; all of them
//! serialize transparently as plain JSON strings.
//!
//! Identifiers are user-authored data and must round-trip through the
//! snapshot payload byte-for-byte, so they are stored as owned strings
//! rather than interned symbols.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from any string-like value.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

id_type! {
    /// Identifier of a wire type (a "signal kind") in the catalog.
    WireTypeId
}

// `Rejection::TypeMismatch` in the `patlang` crate has a field named
// `source` of this type, which thiserror's derive treats as the error
// source and therefore requires to implement `Error`.
impl std::error::Error for WireTypeId {}

id_type! {
    /// Identifier of a box type in the catalog.
    BoxTypeId
}

id_type! {
    /// Identifier of a diagram in the catalog.
    DiagramId
}

id_type! {
    /// Identifier of an equation in the catalog.
    EquationId
}

id_type! {
    /// Identifier of a placed node instance within a diagram.
    NodeId
}

id_type! {
    /// Identifier of an edge instance within a diagram.
    EdgeId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_serde_round_trip() {
        let id = WireTypeId::new("t-f32");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"t-f32\"");
        let back: WireTypeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn borrow_allows_str_keyed_lookup() {
        use std::collections::HashMap;

        let mut map: HashMap<BoxTypeId, u32> = HashMap::new();
        map.insert(BoxTypeId::new("boxes-box-1"), 7);
        assert_eq!(map.get("boxes-box-1"), Some(&7));
    }
}
