use crate::error::SnapError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Medal tier summarizing a sighting's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Diamond,
}

impl Tier {
    pub const DIAMOND_MIN: u32 = 4000;
    pub const GOLD_MIN: u32 = 3500;
    pub const SILVER_MIN: u32 = 2500;

    pub fn from_score(score: u32) -> Self {
        if score >= Self::DIAMOND_MIN {
            Tier::Diamond
        } else if score >= Self::GOLD_MIN {
            Tier::Gold
        } else if score >= Self::SILVER_MIN {
            Tier::Silver
        } else {
            Tier::Bronze
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Diamond => "Diamond",
        }
    }

    /// Label with medal, e.g. "💎 Diamond".
    pub fn label(&self) -> String {
        let medal = match self {
            Tier::Bronze => "🥉",
            Tier::Silver => "🥈",
            Tier::Gold => "🥇",
            Tier::Diamond => "💎",
        };
        format!("{} {}", medal, self.name())
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tier {
    type Err = SnapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bronze" => Ok(Tier::Bronze),
            "silver" => Ok(Tier::Silver),
            "gold" => Ok(Tier::Gold),
            "diamond" => Ok(Tier::Diamond),
            _ => Err(SnapError::InvalidTier(s.to_string())),
        }
    }
}

/// Behaviour rating, one to four stars. Persisted as its integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Stars {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

impl Stars {
    pub fn count(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Stars {
    type Error = SnapError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Stars::One),
            2 => Ok(Stars::Two),
            3 => Ok(Stars::Three),
            4 => Ok(Stars::Four),
            other => Err(SnapError::InvalidStars(other)),
        }
    }
}

impl From<Stars> for u8 {
    fn from(stars: Stars) -> Self {
        stars.count()
    }
}

impl fmt::Display for Stars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&"⭐".repeat(self.count() as usize))
    }
}

/// How a record's tier is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TierPolicy {
    /// Computed from the score; any tier given on submission is ignored.
    #[default]
    Derived,
    /// Picked by the user on every submission.
    Chosen,
}
