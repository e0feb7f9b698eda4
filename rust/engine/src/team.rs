use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Continental governing body a team belongs to.
/// The draw uses it as the distribution constraint between teams of a group.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confederation {
    /// Europe
    Uefa,
    /// South America
    Conmebol,
    /// North and Central America, Caribbean
    Concacaf,
    /// Asia
    Afc,
    /// Africa
    Caf,
    /// Oceania
    Ofc,
}

impl Confederation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confederation::Uefa => "UEFA",
            Confederation::Conmebol => "CONMEBOL",
            Confederation::Concacaf => "CONCACAF",
            Confederation::Afc => "AFC",
            Confederation::Caf => "CAF",
            Confederation::Ofc => "OFC",
        }
    }

    /// Dense index used by count tables.
    pub fn index(&self) -> usize {
        match self {
            Confederation::Uefa => 0,
            Confederation::Conmebol => 1,
            Confederation::Concacaf => 2,
            Confederation::Afc => 3,
            Confederation::Caf => 4,
            Confederation::Ofc => 5,
        }
    }
}

pub fn all_confederations() -> [Confederation; 6] {
    [
        Confederation::Uefa,
        Confederation::Conmebol,
        Confederation::Concacaf,
        Confederation::Afc,
        Confederation::Caf,
        Confederation::Ofc,
    ]
}

impl fmt::Display for Confederation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Confederation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_confederations()
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown confederation: {}", s))
    }
}

/// A qualified team as it appears in the pool table.
/// Pool and host flag are fixed before the draw starts.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Team {
    /// Three-letter team code (e.g. "MEX")
    pub code: String,
    /// Display name, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Confederation used by the distribution rule
    pub confederation: Confederation,
    /// Seeding pool, 1 through 4
    pub pool: u8,
    /// Host teams occupy a predetermined group
    #[serde(default)]
    pub host: bool,
}

impl Team {
    pub fn new(code: &str, confederation: Confederation, pool: u8) -> Self {
        Self {
            code: code.to_string(),
            name: None,
            confederation,
            pool,
            host: false,
        }
    }

    pub fn host(code: &str, confederation: Confederation) -> Self {
        Self {
            host: true,
            ..Self::new(code, confederation, 1)
        }
    }
}
