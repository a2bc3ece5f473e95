//! Player registry: the single owner of every player's running statistics.
//!
//! Players are stored by id and only change through the accessor methods
//! below, which keeps `avg_rating == round(total / matches, 2)` true after
//! every write.

use crate::config::FormConfig;
use crate::error::{EngineError, Result};
use crate::models::{Contribution, ContributionKind, Player, PlayerId, Team};
use rand::Rng;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: BTreeMap<PlayerId, Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry and roll each player's starting form.
    pub fn from_players<R: Rng + ?Sized>(
        players: impl IntoIterator<Item = Player>,
        form: &FormConfig,
        rng: &mut R,
    ) -> Result<Self> {
        let mut registry = Self::new();
        for mut player in players {
            player.form = if form.initial_min < form.initial_max {
                round2(rng.gen_range(form.initial_min..=form.initial_max))
            } else {
                form.initial_min
            };
            registry.insert(player)?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, player: Player) -> Result<()> {
        if self.players.contains_key(&player.id) {
            return Err(EngineError::DuplicateId(player.id.to_string()));
        }
        self.players.insert(player.id.clone(), player);
        Ok(())
    }

    pub fn get(&self, id: &PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn contains(&self, id: &PlayerId) -> bool {
        self.players.contains_key(id)
    }

    /// Players in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Registered players of `team`, in roster order. Unknown ids are skipped.
    pub fn roster(&self, team: &Team) -> Vec<&Player> {
        team.player_ids.iter().filter_map(|id| self.players.get(id)).collect()
    }

    fn player_mut(&mut self, id: &PlayerId) -> Result<&mut Player> {
        self.players.get_mut(id).ok_or_else(|| EngineError::UnknownPlayer(id.clone()))
    }

    pub fn record_goal(&mut self, id: &PlayerId) -> Result<()> {
        self.player_mut(id)?.stats.goals += 1;
        Ok(())
    }

    pub fn record_assist(&mut self, id: &PlayerId) -> Result<()> {
        self.player_mut(id)?.stats.assists += 1;
        Ok(())
    }

    pub fn record_clean_sheet(&mut self, id: &PlayerId) -> Result<()> {
        self.player_mut(id)?.stats.clean_sheets += 1;
        Ok(())
    }

    pub fn record_contributions(&mut self, contributions: &[Contribution]) -> Result<()> {
        for c in contributions {
            match c.kind {
                ContributionKind::Goal => self.record_goal(&c.player)?,
                ContributionKind::Assist => self.record_assist(&c.player)?,
            }
        }
        Ok(())
    }

    /// Count one appearance with `rating`, refresh the average and move form.
    pub fn apply_match_rating(&mut self, id: &PlayerId, rating: f64, form: &FormConfig) -> Result<()> {
        let player = self.player_mut(id)?;
        player.stats.matches_played += 1;
        player.stats.total_rating_points += rating;
        player.stats.refresh_average();

        player.form = if rating > form.good_rating {
            round2(player.form + form.step).min(form.max)
        } else if rating < form.poor_rating {
            round2(player.form - form.step).max(form.min)
        } else {
            round2(player.form * form.drift_retention + (1.0 - form.drift_retention))
        };
        Ok(())
    }

    /// Add `bonus` rating points to every player of `team` who has appeared
    /// at least once. Returns how many players received it.
    pub fn apply_stage_bonus(&mut self, team: &Team, bonus: f64) -> usize {
        let mut awarded = 0;
        for id in &team.player_ids {
            if let Some(player) = self.players.get_mut(id) {
                if player.stats.matches_played > 0 {
                    player.stats.total_rating_points += bonus;
                    player.stats.refresh_average();
                    awarded += 1;
                }
            }
        }
        awarded
    }

    pub fn into_players(self) -> Vec<Player> {
        self.players.into_values().collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
