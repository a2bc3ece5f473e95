pub mod fixture;
pub mod match_result;
pub mod player;
pub mod stage;
pub mod team;

pub use fixture::Fixture;
pub use match_result::{
    Contribution, ContributionKind, ExtraTime, MatchResult, Outcome, PenaltyShootoutResult,
};
pub use player::{Player, PlayerStats, PositionCategory};
pub use stage::KnockoutStage;
pub use team::{Formation, Manager, Team};

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id!(TeamId);
string_id!(PlayerId);
string_id!(ManagerId);
string_id!(LeagueId);
