//! # euro_core - Seeded Continental Tournament Simulation Engine
//!
//! Runs a Swiss-model league phase, a knockout bracket and the player awards
//! that follow from them, all driven by one injectable random source.
//!
//! ## Features
//! - Same seed, same tournament
//! - Balanced league-phase scheduling (unique opponents, home/away parity)
//! - Two-legged ties, extra time and penalty shootouts
//! - Per-player goals, assists, clean sheets, ratings and form
//! - Leaderboards, Best XI, best player and Manager of the Tournament
//!
//! ```rust
//! use euro_core::{CompetitionFormat, EngineConfig, Tournament};
//! use euro_core::demo::synthetic_dataset;
//!
//! let dataset = synthetic_dataset(36, 7).unwrap();
//! let tournament = Tournament::with_seed(
//!     EngineConfig::default(),
//!     CompetitionFormat::champions_league(),
//!     dataset.teams,
//!     dataset.players,
//!     dataset.managers,
//!     42,
//! )
//! .unwrap();
//! let report = tournament.run().unwrap();
//! assert!(report.champion.is_some());
//! ```

// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Simulation entry points thread config, registry, rng and warnings together
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod data;
pub mod demo;
pub mod engine;
pub mod error;
pub mod models;
pub mod qualification;
pub mod rating;
pub mod registry;

pub use config::{BracketShape, CompetitionFormat, EngineConfig};
pub use data::{DataProvider, Dataset, InMemoryProvider};
pub use engine::domestic::{DomesticSeason, SeasonReport};
pub use engine::tournament::{Tournament, TournamentReport};
pub use error::{EngineError, EngineWarning, Result, WarningLog};
pub use models::{
    Fixture, KnockoutStage, LeagueId, Manager, ManagerId, MatchResult, Player, PlayerId,
    PositionCategory, Team, TeamId,
};
pub use qualification::QualificationRules;
pub use rating::{RatingProvider, WeightedClubStrength};
pub use registry::PlayerRegistry;
