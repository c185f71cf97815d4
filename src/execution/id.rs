//! Identity types for the execution layer.
//!
//! IDs are newtypes over `u32`. `LocalityId` doubles as the index of the
//! runtime that hosts the locality inside a `LocalityPool`.

use std::fmt;

/// Index of a compute locality.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct LocalityId(pub u32);

impl LocalityId {
    /// The locality of the calling process.
    pub const HERE: LocalityId = LocalityId(0);
    pub const INVALID: LocalityId = LocalityId(u32::MAX);

    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for LocalityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "LocalityId(INVALID)")
        } else {
            write!(f, "LocalityId({})", self.0)
        }
    }
}

impl fmt::Display for LocalityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locality_id() {
        let id = LocalityId(3);
        assert!(id.is_valid());
        assert_eq!(id.index(), 3);
        assert!(!LocalityId::INVALID.is_valid());
        assert_eq!(LocalityId::HERE, LocalityId::default());
    }

    #[test]
    fn test_locality_id_debug() {
        assert_eq!(format!("{:?}", LocalityId(7)), "LocalityId(7)");
        assert_eq!(format!("{}", LocalityId::INVALID), "LocalityId(INVALID)");
    }
}
