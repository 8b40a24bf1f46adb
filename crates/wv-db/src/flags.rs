//! Dictionary-membership bitset.
//!
//! Membership of a word in the known external word lists is a small fixed set
//! of boolean facts, stored as one flag byte instead of a join table. Bit
//! positions are part of the on-disk format and must not be reordered.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A known external dictionary source.
///
/// The discriminant order fixes each source's bit position in
/// [`DictFlags`]; new sources append at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dictionary {
    Octordle,
    Otcwl,
    Quordle,
    Sowpods,
    Wordle,
    Wwf,
}

impl Dictionary {
    /// All known sources, in bit-position order.
    pub const ALL: [Dictionary; 6] = [
        Dictionary::Octordle,
        Dictionary::Otcwl,
        Dictionary::Quordle,
        Dictionary::Sowpods,
        Dictionary::Wordle,
        Dictionary::Wwf,
    ];

    /// Bit position of this source in the flag byte.
    pub fn bit(self) -> u8 {
        match self {
            Dictionary::Octordle => 0,
            Dictionary::Otcwl => 1,
            Dictionary::Quordle => 2,
            Dictionary::Sowpods => 3,
            Dictionary::Wordle => 4,
            Dictionary::Wwf => 5,
        }
    }

    /// Canonical lowercase name of this source.
    pub fn as_str(self) -> &'static str {
        match self {
            Dictionary::Octordle => "octordle",
            Dictionary::Otcwl => "otcwl",
            Dictionary::Quordle => "quordle",
            Dictionary::Sowpods => "sowpods",
            Dictionary::Wordle => "wordle",
            Dictionary::Wwf => "wwf",
        }
    }

    /// Look up a source by name. Returns `None` for unknown names; callers
    /// decide whether that is a validation failure.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "octordle" => Some(Dictionary::Octordle),
            "otcwl" => Some(Dictionary::Otcwl),
            "quordle" => Some(Dictionary::Quordle),
            "sowpods" => Some(Dictionary::Sowpods),
            "wordle" => Some(Dictionary::Wordle),
            "wwf" => Some(Dictionary::Wwf),
            _ => None,
        }
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mask of the bits that correspond to known sources.
const KNOWN_BITS: u8 = 0b0011_1111;

/// Membership bitset over the known dictionary sources.
///
/// An empty set is valid (word from an unlisted source). Re-ingest merges by
/// union, so recorded membership is never lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DictFlags(u8);

impl DictFlags {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Reconstruct from a stored flag byte. Unknown bits are dropped.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits & KNOWN_BITS)
    }

    /// Build from a source-name -> membership mapping.
    ///
    /// Returns the first unknown source name as the error value; callers
    /// attach the surrounding record context.
    pub fn from_matches(matches: &BTreeMap<String, bool>) -> Result<Self, String> {
        let mut flags = Self::empty();
        for (name, is_match) in matches {
            let dict = Dictionary::from_name(name).ok_or_else(|| name.clone())?;
            if *is_match {
                flags.insert(dict);
            }
        }
        Ok(flags)
    }

    /// The raw flag byte, as stored in the `dict_flags` column.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// True when no source contains the word.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Membership test for a single source.
    pub fn contains(self, dict: Dictionary) -> bool {
        self.0 & (1 << dict.bit()) != 0
    }

    /// Add a source.
    pub fn insert(&mut self, dict: Dictionary) {
        self.0 |= 1 << dict.bit();
    }

    /// Set union (the merge operation applied on re-ingest).
    pub fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Names of the sources that contain the word, in bit order.
    pub fn names(self) -> Vec<&'static str> {
        Dictionary::ALL
            .iter()
            .filter(|d| self.contains(**d))
            .map(|d| d.as_str())
            .collect()
    }

    /// Expand back into the full source-name -> membership mapping.
    pub fn to_matches(self) -> BTreeMap<&'static str, bool> {
        Dictionary::ALL
            .iter()
            .map(|d| (d.as_str(), self.contains(*d)))
            .collect()
    }
}

impl fmt::Display for DictFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("-")
        } else {
            f.write_str(&self.names().join(","))
        }
    }
}

// Serialized as the expanded mapping so consumers never see raw bits.
impl Serialize for DictFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let matches = self.to_matches();
        let mut map = serializer.serialize_map(Some(matches.len()))?;
        for (name, is_match) in matches {
            map.serialize_entry(name, &is_match)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pairs: &[(&str, bool)]) -> BTreeMap<String, bool> {
        pairs
            .iter()
            .map(|(name, m)| (name.to_string(), *m))
            .collect()
    }

    #[test]
    fn test_bit_positions_are_stable() {
        // On-disk format: these values must never change.
        assert_eq!(Dictionary::Octordle.bit(), 0);
        assert_eq!(Dictionary::Otcwl.bit(), 1);
        assert_eq!(Dictionary::Quordle.bit(), 2);
        assert_eq!(Dictionary::Sowpods.bit(), 3);
        assert_eq!(Dictionary::Wordle.bit(), 4);
        assert_eq!(Dictionary::Wwf.bit(), 5);
    }

    #[test]
    fn test_from_matches_sets_only_true_entries() {
        let flags =
            DictFlags::from_matches(&matches(&[("wordle", true), ("wwf", false)])).unwrap();
        assert!(flags.contains(Dictionary::Wordle));
        assert!(!flags.contains(Dictionary::Wwf));
        assert_eq!(flags.bits(), 1 << 4);
    }

    #[test]
    fn test_from_matches_rejects_unknown_source() {
        let err = DictFlags::from_matches(&matches(&[("scrabble3000", true)])).unwrap_err();
        assert_eq!(err, "scrabble3000");
    }

    #[test]
    fn test_union_is_monotonic() {
        let first = DictFlags::from_matches(&matches(&[("wordle", true)])).unwrap();
        let second = DictFlags::from_matches(&matches(&[("sowpods", true)])).unwrap();
        let merged = first.union(second);
        assert!(merged.contains(Dictionary::Wordle));
        assert!(merged.contains(Dictionary::Sowpods));
        // Union with a subset never clears bits.
        assert_eq!(merged.union(first), merged);
    }

    #[test]
    fn test_roundtrip_through_matches() {
        let flags = DictFlags::from_bits(0b10_0101);
        let expanded = flags.to_matches();
        let back: BTreeMap<String, bool> = expanded
            .into_iter()
            .map(|(name, m)| (name.to_string(), m))
            .collect();
        assert_eq!(DictFlags::from_matches(&back).unwrap(), flags);
    }

    #[test]
    fn test_from_bits_drops_unknown_bits() {
        assert_eq!(DictFlags::from_bits(0xFF).bits(), KNOWN_BITS);
    }

    #[test]
    fn test_display() {
        assert_eq!(DictFlags::empty().to_string(), "-");
        let flags = DictFlags::from_matches(&matches(&[("otcwl", true), ("wwf", true)])).unwrap();
        assert_eq!(flags.to_string(), "otcwl,wwf");
    }
}
