pub mod awards;
pub mod domestic;
pub mod knockout;
pub mod lineup;
pub mod match_sim;
pub mod player_rating;
pub mod scheduler;
pub mod standings;
pub mod tournament;

pub use knockout::{BracketOutcome, KnockoutEngine, KnockoutRound, KnockoutTie, TieMethod};
pub use match_sim::MatchSimulator;
pub use scheduler::{Schedule, SwissScheduler};
pub use standings::{StandingsRow, StandingsTable};
