use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Regional shard a player account lives on.
///
/// A player id is only unique within its region, so the pair of id and
/// region forms the identity used throughout the crawler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Na,
    Euw,
    Eune,
    Kr,
    Br,
    Jp,
    Oce,
    Lan,
    Las,
    Tr,
    Ru,
}

impl Region {
    /// Lowercase shard name as used in API paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Na => "na",
            Region::Euw => "euw",
            Region::Eune => "eune",
            Region::Kr => "kr",
            Region::Br => "br",
            Region::Jp => "jp",
            Region::Oce => "oce",
            Region::Lan => "lan",
            Region::Las => "las",
            Region::Tr => "tr",
            Region::Ru => "ru",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "na" => Ok(Region::Na),
            "euw" => Ok(Region::Euw),
            "eune" => Ok(Region::Eune),
            "kr" => Ok(Region::Kr),
            "br" => Ok(Region::Br),
            "jp" => Ok(Region::Jp),
            "oce" => Ok(Region::Oce),
            "lan" => Ok(Region::Lan),
            "las" => Ok(Region::Las),
            "tr" => Ok(Region::Tr),
            "ru" => Ok(Region::Ru),
            other => Err(format!("unknown region '{}'", other)),
        }
    }
}

/// Ranked ladder tier, ordered from lowest to highest.
///
/// Ordering is derived, so `rank >= Rank::Gold` style comparisons work
/// directly in player filters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Unranked,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

/// Identity of a player: stable id plus the region that scopes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerKey {
    pub id: String,
    pub region: Region,
}

impl fmt::Display for PlayerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.region, self.id)
    }
}

/// A player account as fetched from the remote source.
///
/// The id/region pair is stable; name, level and rank are mutable remote
/// attributes captured at fetch time. Snapshots are immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub region: Region,
    pub level: u32,
    #[serde(default)]
    pub rank: Option<Rank>,
}

impl Player {
    /// Returns the identity key of this player.
    pub fn key(&self) -> PlayerKey {
        PlayerKey {
            id: self.id.clone(),
            region: self.region,
        }
    }
}
