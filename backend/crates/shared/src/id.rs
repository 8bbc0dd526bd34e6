//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities.
//!
//! Ids are 12 bytes rendered as 24 lowercase hex characters:
//! a 4-byte big-endian unix timestamp, 5 bytes of per-process randomness
//! and a 3-byte counter. Ids created later in the same process compare
//! greater, which gives a stable tie-breaker when sorting.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::LazyLock;
use std::sync::atomic::{AtomicU32, Ordering as AtomicOrdering};

use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const ID_LEN: usize = 12;

static PROCESS_UNIQUE: LazyLock<[u8; 5]> = LazyLock::new(|| {
    let mut bytes = [0u8; 5];
    rand::rng().fill_bytes(&mut bytes);
    bytes
});

static COUNTER: LazyLock<AtomicU32> = LazyLock::new(|| AtomicU32::new(rand::rng().next_u32()));

/// Rejected id string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id: expected 24 hex characters")]
pub struct IdParseError;

/// Generic typed ID wrapper
///
/// Usage:
/// ```
/// use kernel::id::{Id, markers};
/// type BlogId = Id<markers::Blog>;
///
/// let id = BlogId::new();
/// let parsed: BlogId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
pub struct Id<T> {
    bytes: [u8; ID_LEN],
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    /// Create a new id stamped with the current time
    pub fn new() -> Self {
        let secs = chrono::Utc::now().timestamp() as u32;
        let count = COUNTER.fetch_add(1, AtomicOrdering::Relaxed) & 0x00ff_ffff;

        let mut bytes = [0u8; ID_LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        bytes[4..9].copy_from_slice(&*PROCESS_UNIQUE);
        bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

        Self::from_bytes(bytes)
    }

    pub fn from_bytes(bytes: [u8; ID_LEN]) -> Self {
        Self {
            bytes,
            _marker: PhantomData,
        }
    }

    /// `None` unless `s` is exactly 24 hex characters
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.bytes
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes.cmp(&other.bytes)
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.bytes))
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ID_LEN * 2 {
            return Err(IdParseError);
        }
        let mut bytes = [0u8; ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|_| IdParseError)?;
        Ok(Self::from_bytes(bytes))
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Marker types for different entity IDs
pub mod markers {
    #[derive(Debug)]
    pub struct Blog;
    #[derive(Debug)]
    pub struct Post;
    #[derive(Debug)]
    pub struct Comment;
    #[derive(Debug)]
    pub struct User;
    #[derive(Debug)]
    pub struct Device;
}

pub type BlogId = Id<markers::Blog>;
pub type PostId = Id<markers::Post>;
pub type CommentId = Id<markers::Comment>;
pub type UserId = Id<markers::User>;
pub type DeviceId = Id<markers::Device>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_24_hex() {
        let id = BlogId::new();
        let s = id.to_string();
        assert_eq!(s.len(), 24);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_parse_roundtrip() {
        let id = PostId::new();
        assert_eq!(PostId::parse(&id.to_string()), Some(id));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(UserId::parse("").is_none());
        assert!(UserId::parse("123").is_none());
        assert!(UserId::parse("zzzzzzzzzzzzzzzzzzzzzzzz").is_none());
        assert!(UserId::parse("0123456789abcdef012345678").is_none());
    }

    #[test]
    fn test_parse_accepts_uppercase_hex() {
        let id = UserId::parse("0123456789ABCDEF01234567").unwrap();
        assert_eq!(id.to_string(), "0123456789abcdef01234567");
    }

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let a = CommentId::new();
        let b = CommentId::new();
        assert_ne!(a, b);
        assert!(b > a || a.as_bytes()[9..] == [0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_serde_as_string() {
        let id = DeviceId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: DeviceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
