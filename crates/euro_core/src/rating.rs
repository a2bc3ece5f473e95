//! Club strength scoring.
//!
//! The engine only needs one number per team; how it is derived is
//! pluggable through [`RatingProvider`].

use crate::config::StrengthBounds;
use crate::data::ClubRecord;
use crate::models::Player;

pub trait RatingProvider {
    /// Strength on the 0-100 scale for `club`, whose known players are `squad`.
    fn club_strength(&self, club: &ClubRecord, squad: &[&Player]) -> f64;
}

/// Weighted sum of reputation, financial clout and silverware, optionally
/// blended with squad quality.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedClubStrength {
    pub reputation_weight: f64,
    /// Transfer budget per clout point (default: 5M)
    pub budget_per_point: f64,
    /// Weekly wage bill per clout point (default: 100k)
    pub wages_per_point: f64,
    pub financial_cap: f64,
    pub league_title_points: f64,
    pub continental_title_points: f64,
    pub pedigree_cap: f64,
    /// Share of the final value taken from squad skill when a squad is known
    pub squad_weight: f64,
    /// Players counted towards squad skill, best first (default: 20)
    pub squad_depth: usize,
    pub bounds: StrengthBounds,
}

impl Default for WeightedClubStrength {
    fn default() -> Self {
        Self {
            reputation_weight: 0.6,
            budget_per_point: 5_000_000.0,
            wages_per_point: 100_000.0,
            financial_cap: 20.0,
            league_title_points: 2.0,
            continental_title_points: 5.0,
            pedigree_cap: 20.0,
            squad_weight: 0.5,
            squad_depth: 20,
            bounds: StrengthBounds::default(),
        }
    }
}

impl WeightedClubStrength {
    pub fn with_bounds(bounds: StrengthBounds) -> Self {
        Self { bounds, ..Self::default() }
    }

    fn club_score(&self, club: &ClubRecord) -> f64 {
        let financial = (club.transfer_budget.max(0.0) / self.budget_per_point
            + club.weekly_wages.max(0.0) / self.wages_per_point)
            .min(self.financial_cap);
        let pedigree = (club.league_titles as f64 * self.league_title_points
            + club.continental_titles as f64 * self.continental_title_points)
            .min(self.pedigree_cap);
        club.reputation * self.reputation_weight + financial + pedigree
    }
}

impl RatingProvider for WeightedClubStrength {
    fn club_strength(&self, club: &ClubRecord, squad: &[&Player]) -> f64 {
        let club_score = self.club_score(club);
        let strength = match squad_average(squad, self.squad_depth) {
            Some(avg) => club_score * (1.0 - self.squad_weight) + avg * self.squad_weight,
            None => club_score,
        };
        self.bounds.clamp(strength)
    }
}

/// Mean skill of the best `depth` players.
fn squad_average(squad: &[&Player], depth: usize) -> Option<f64> {
    let mut skills: Vec<f64> = squad.iter().map(|p| p.skill).collect();
    if skills.is_empty() || depth == 0 {
        return None;
    }
    skills.sort_by(|a, b| b.total_cmp(a));
    skills.truncate(depth);
    Some(skills.iter().sum::<f64>() / skills.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PositionCategory;

    #[test]
    fn reputation_only_club() {
        let provider = WeightedClubStrength::default();
        let club = ClubRecord::new("c", "Club");
        // 70 * 0.6 = 42
        assert!((provider.club_strength(&club, &[]) - 42.0).abs() < 1e-9);
    }

    #[test]
    fn financial_and_pedigree_are_capped() {
        let provider = WeightedClubStrength::default();
        let mut club = ClubRecord::new("c", "Club");
        club.reputation = 90.0;
        club.transfer_budget = 500_000_000.0;
        club.league_titles = 30;
        club.continental_titles = 10;
        assert!((provider.club_strength(&club, &[]) - (54.0 + 20.0 + 20.0)).abs() < 1e-9);
    }

    #[test]
    fn squad_quality_blends_in_and_result_is_clamped() {
        let provider = WeightedClubStrength::default();
        let club = ClubRecord::new("c", "Club");
        let players: Vec<Player> = (0..25)
            .map(|i| Player::new(format!("p{}", i), "P", "c", PositionCategory::MID, if i < 20 { 80.0 } else { 10.0 }))
            .collect();
        let squad: Vec<&Player> = players.iter().collect();
        // (42 + 80) / 2
        assert!((provider.club_strength(&club, &squad) - 61.0).abs() < 1e-9);

        let mut weak = ClubRecord::new("w", "Weak");
        weak.reputation = 5.0;
        assert_eq!(provider.club_strength(&weak, &[]), provider.bounds.min);
    }
}
