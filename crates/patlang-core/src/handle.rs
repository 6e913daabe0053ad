//! Port handle references in `in-<n>` / `out-<n>` form.
//!
//! Every port on a placed box is addressed by a handle string: the direction
//! token (`in` or `out`) followed by a dash and the zero-based port index.
//! The canvas collaborator and the snapshot payload both speak this string
//! form; the engine parses it once into a [`Handle`] and works with the
//! typed value from then on.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Which side of a box a handle sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// An input port on the left side of a box.
    In,
    /// An output port on the right side of a box.
    Out,
}

impl Direction {
    /// Returns the direction token used in the string form.
    pub fn token(self) -> &'static str {
        match self {
            Direction::In => "in",
            Direction::Out => "out",
        }
    }
}

/// A parsed port reference: direction plus zero-based port index.
///
/// # Examples
///
/// ```
/// use patlang_core::handle::{Direction, Handle};
///
/// let handle: Handle = "out-2".parse().unwrap();
/// assert_eq!(handle.direction(), Direction::Out);
/// assert_eq!(handle.index(), 2);
/// assert_eq!(handle.to_string(), "out-2");
///
/// assert!("out2".parse::<Handle>().is_err());
/// assert!("up-1".parse::<Handle>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    direction: Direction,
    index: usize,
}

/// Error produced when a handle string does not match the
/// `in-<index>` / `out-<index>` grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed port handle `{0}`")]
pub struct ParseHandleError(String);

impl Handle {
    /// Creates an input handle at the given port index.
    pub fn input(index: usize) -> Self {
        Self {
            direction: Direction::In,
            index,
        }
    }

    /// Creates an output handle at the given port index.
    pub fn output(index: usize) -> Self {
        Self {
            direction: Direction::Out,
            index,
        }
    }

    /// Returns which side of the box this handle addresses.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the zero-based port index.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl FromStr for Handle {
    type Err = ParseHandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseHandleError(s.to_owned());

        let (token, index) = s.split_once('-').ok_or_else(malformed)?;
        let direction = match token {
            "in" => Direction::In,
            "out" => Direction::Out,
            _ => return Err(malformed()),
        };
        if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let index = index.parse().map_err(|_| malformed())?;

        Ok(Self { direction, index })
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.direction.token(), self.index)
    }
}

impl Serialize for Handle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn parses_both_directions() {
        assert_eq!("in-0".parse::<Handle>().unwrap(), Handle::input(0));
        assert_eq!("out-13".parse::<Handle>().unwrap(), Handle::output(13));
    }

    #[test]
    fn rejects_malformed_references() {
        for s in ["", "in", "out-", "in--1", "output-0", "in-a", "0-in", "in 0"] {
            assert!(s.parse::<Handle>().is_err(), "accepted malformed `{s}`");
        }
    }

    #[test]
    fn serde_uses_string_form() {
        let json = serde_json::to_string(&Handle::input(4)).unwrap();
        assert_eq!(json, "\"in-4\"");
        let back: Handle = serde_json::from_str("\"out-0\"").unwrap();
        assert_eq!(back, Handle::output(0));
        assert!(serde_json::from_str::<Handle>("\"sideways-0\"").is_err());
    }

    proptest! {
        #[test]
        fn display_parse_round_trip(out in any::<bool>(), index in 0usize..10_000) {
            let handle = if out { Handle::output(index) } else { Handle::input(index) };
            let parsed: Handle = handle.to_string().parse().unwrap();
            prop_assert_eq!(parsed, handle);
        }
    }
}
