//! Post-tournament views over the player registry and league table:
//! leaderboards, best player, Best XI and Manager of the Tournament.

use crate::config::{AwardsConfig, BestXiSlot};
use crate::engine::standings::StandingsRow;
use crate::models::{Manager, ManagerId, Player, PlayerId, PositionCategory, TeamId};
use crate::registry::PlayerRegistry;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: PlayerId,
    pub name: String,
    pub team: TeamId,
    pub position: PositionCategory,
    pub matches_played: u32,
    pub value: f64,
}

impl LeaderboardEntry {
    fn from_player(player: &Player, value: f64) -> Self {
        Self {
            player: player.id.clone(),
            name: player.name.clone(),
            team: player.team_id.clone(),
            position: player.position,
            matches_played: player.stats().matches_played(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Leaderboards {
    pub top_scorers: Vec<LeaderboardEntry>,
    pub top_assisters: Vec<LeaderboardEntry>,
    pub goal_contributions: Vec<LeaderboardEntry>,
    pub clean_sheets: Vec<LeaderboardEntry>,
    pub average_rating: Vec<LeaderboardEntry>,
}

/// Highest `value` first; ties go to fewer appearances, then id.
fn board<'p>(
    players: impl Iterator<Item = &'p Player>,
    value: impl Fn(&Player) -> f64,
    size: usize,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = players
        .map(|p| LeaderboardEntry::from_player(p, value(p)))
        .filter(|e| e.value > 0.0)
        .collect();
    entries.sort_by(|a, b| {
        b.value
            .total_cmp(&a.value)
            .then_with(|| a.matches_played.cmp(&b.matches_played))
            .then_with(|| a.player.cmp(&b.player))
    });
    entries.truncate(size);
    entries
}

pub fn leaderboards(registry: &PlayerRegistry, cfg: &AwardsConfig) -> Leaderboards {
    let qualified = |p: &&Player| p.stats().matches_played() >= cfg.min_appearances;
    Leaderboards {
        top_scorers: board(registry.iter(), |p| p.stats().goals() as f64, cfg.leaderboard_size),
        top_assisters: board(registry.iter(), |p| p.stats().assists() as f64, cfg.leaderboard_size),
        goal_contributions: board(
            registry.iter(),
            |p| p.stats().goals_and_assists() as f64,
            cfg.leaderboard_size,
        ),
        clean_sheets: board(
            registry.iter().filter(|p| p.position.is_goalkeeper()).filter(qualified),
            |p| p.stats().clean_sheets() as f64,
            cfg.clean_sheet_board_size,
        ),
        average_rating: board(
            registry.iter().filter(qualified),
            |p| p.stats().avg_rating(),
            cfg.leaderboard_size,
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestPlayer {
    pub player: PlayerId,
    pub name: String,
    pub team: TeamId,
    pub position: PositionCategory,
    pub score: f64,
}

/// Rating points plus weighted goals, assists and goalkeeper clean sheets,
/// among players with enough appearances.
pub fn best_player(registry: &PlayerRegistry, cfg: &AwardsConfig) -> Option<BestPlayer> {
    registry
        .iter()
        .filter(|p| p.stats().matches_played() >= cfg.min_appearances)
        .map(|p| {
            let s = p.stats();
            let mut score = s.total_rating_points()
                + s.goals() as f64 * cfg.best_player_goal_weight
                + s.assists() as f64 * cfg.best_player_assist_weight;
            if p.position.is_goalkeeper() {
                score += s.clean_sheets() as f64 * cfg.best_player_clean_sheet_weight;
            }
            (p, score)
        })
        .max_by(|(a, sa), (b, sb)| sa.total_cmp(sb).then_with(|| b.id.cmp(&a.id)))
        .map(|(p, score)| BestPlayer {
            player: p.id.clone(),
            name: p.name.clone(),
            team: p.team_id.clone(),
            position: p.position,
            score,
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestXiPick {
    pub slot: BestXiSlot,
    pub player: PlayerId,
    pub name: String,
    pub team: TeamId,
    pub position: PositionCategory,
    pub avg_rating: f64,
    /// Average rating after the out-of-position penalty.
    pub adjusted_rating: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BestXi {
    /// Picks in pitch order (GK, back line, midfield, attack).
    pub picks: Vec<BestXiPick>,
    pub unfilled: Vec<BestXiSlot>,
}

impl BestXi {
    pub fn is_complete(&self) -> bool {
        self.unfilled.is_empty() && self.picks.len() == 11
    }
}

/// Fill each slot in the configured order with the best unused player by
/// penalty-adjusted average rating. Slots nobody can fill are reported in
/// `unfilled`, never padded.
pub fn best_xi(registry: &PlayerRegistry, cfg: &AwardsConfig) -> BestXi {
    let qualified: Vec<&Player> = registry
        .iter()
        .filter(|p| p.stats().matches_played() >= cfg.min_appearances)
        .collect();

    let mut used: HashSet<&PlayerId> = HashSet::new();
    let mut xi = BestXi::default();
    for rule in &cfg.best_xi {
        let best = qualified
            .iter()
            .filter(|p| !used.contains(&p.id))
            .filter_map(|p| {
                rule.eligible
                    .iter()
                    .find(|(category, _)| *category == p.position)
                    .map(|(_, penalty)| (*p, p.stats().avg_rating() * (1.0 - penalty)))
            })
            .max_by(|(a, ra), (b, rb)| ra.total_cmp(rb).then_with(|| b.id.cmp(&a.id)));

        match best {
            Some((player, adjusted)) => {
                used.insert(&player.id);
                xi.picks.push(BestXiPick {
                    slot: rule.slot,
                    player: player.id.clone(),
                    name: player.name.clone(),
                    team: player.team_id.clone(),
                    position: player.position,
                    avg_rating: player.stats().avg_rating(),
                    adjusted_rating: (adjusted * 100.0).round() / 100.0,
                });
            }
            None => xi.unfilled.push(rule.slot),
        }
    }
    xi.picks.sort_by_key(|p| p.slot as u8);
    xi
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerAward {
    pub manager: ManagerId,
    pub name: String,
    pub team: TeamId,
    pub league_position: usize,
    pub score: f64,
}

/// Score every manager whose team appears in the league-phase table.
/// `direct` and `knockout` are the last positions that qualify straight for
/// the main bracket and for the knockout stage at all.
pub fn manager_rankings(
    managers: &[Manager],
    table: &[StandingsRow],
    direct: usize,
    knockout: usize,
    cfg: &AwardsConfig,
) -> Vec<ManagerAward> {
    let weights = &cfg.manager;
    let team_count = table.len();
    let mut awards: Vec<ManagerAward> = managers
        .iter()
        .filter_map(|m| {
            let team = m.team_id.as_ref()?;
            let idx = table.iter().position(|r| &r.team == team)?;
            let row = &table[idx];
            let position = idx + 1;

            let qualifier_bonus = if position <= direct {
                weights.direct_qualifier_bonus
            } else if position <= knockout {
                weights.knockout_qualifier_bonus
            } else {
                0.0
            };
            let score = row.points as f64 * weights.points_weight
                + (team_count + 1).saturating_sub(position) as f64 * weights.position_weight
                + row.goal_difference() as f64 * weights.goal_difference_weight
                + qualifier_bonus
                + row.win_rate() * weights.win_rate_weight;

            Some(ManagerAward {
                manager: m.id.clone(),
                name: m.name.clone(),
                team: team.clone(),
                league_position: position,
                score,
            })
        })
        .collect();

    awards.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.league_position.cmp(&b.league_position))
    });
    awards.truncate(weights.shortlist_size);
    awards
}
