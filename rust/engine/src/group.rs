use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of groups in the tournament (A through L)
pub const GROUP_COUNT: usize = 12;
/// Slots per group, which is also the number of pools
pub const SLOTS_PER_GROUP: u8 = 4;
/// Number of seeding pools
pub const POOL_COUNT: u8 = 4;

const LETTERS: &[u8; GROUP_COUNT] = b"ABCDEFGHIJKL";

/// One of the twelve groups, identified by its letter.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct GroupId(u8);

impl GroupId {
    /// Group at position `index` in alphabetical order, if in range.
    pub fn from_index(index: usize) -> Option<GroupId> {
        (index < GROUP_COUNT).then_some(GroupId(index as u8))
    }

    pub fn from_letter(letter: char) -> Option<GroupId> {
        let upper = letter.to_ascii_uppercase() as u8;
        LETTERS
            .iter()
            .position(|&l| l == upper)
            .map(|i| GroupId(i as u8))
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn letter(&self) -> char {
        LETTERS[self.0 as usize] as char
    }
}

/// All groups in their fixed alphabetical iteration order.
pub fn all_groups() -> impl Iterator<Item = GroupId> {
    (0..GROUP_COUNT as u8).map(GroupId)
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

impl FromStr for GroupId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => GroupId::from_letter(c).ok_or_else(|| format!("unknown group: {}", s)),
            _ => Err(format!("unknown group: {}", s)),
        }
    }
}

impl Serialize for GroupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A position inside a group, rendered as group letter plus position (`A1`..`L4`).
/// Position 1 is reserved for pool-1 seeds.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Slot {
    pub group: GroupId,
    /// 1-based position within the group
    pub position: u8,
}

impl Slot {
    pub fn new(group: GroupId, position: u8) -> Self {
        Self { group, position }
    }

    pub fn seed(group: GroupId) -> Self {
        Self::new(group, 1)
    }
}

/// The four slots of a group in position order.
pub fn group_slots(group: GroupId) -> Vec<Slot> {
    (1..=SLOTS_PER_GROUP).map(|p| Slot::new(group, p)).collect()
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.group, self.position)
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let group = chars
            .next()
            .and_then(GroupId::from_letter)
            .ok_or_else(|| format!("invalid slot: {}", s))?;
        let position: u8 = chars
            .as_str()
            .parse()
            .map_err(|_| format!("invalid slot: {}", s))?;
        if !(1..=SLOTS_PER_GROUP).contains(&position) {
            return Err(format!("invalid slot: {}", s));
        }
        Ok(Slot::new(group, position))
    }
}

impl Serialize for Slot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Slot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
