//! Starting XI selection.

use crate::models::{Formation, Player, PlayerId};
use std::cmp::Ordering;

pub const XI_SIZE: usize = 11;

/// Best eleven for `formation`: each template category is filled with its
/// highest-skill players, then any open slots go to the best players left
/// regardless of category. Returns fewer than eleven only when the roster
/// itself is smaller.
pub fn select_best_eleven(roster: &[&Player], formation: &Formation) -> Vec<PlayerId> {
    let mut pool: Vec<&Player> = roster.to_vec();
    pool.sort_by(|a, b| by_skill_desc(a, b));
    pool.dedup_by(|a, b| a.id == b.id);

    let mut used = vec![false; pool.len()];
    let mut selected = Vec::with_capacity(XI_SIZE);

    for (category, count) in formation.template() {
        let mut taken = 0;
        for (i, player) in pool.iter().enumerate() {
            if taken == count {
                break;
            }
            if !used[i] && player.position == category {
                used[i] = true;
                selected.push(player.id.clone());
                taken += 1;
            }
        }
    }

    for (i, player) in pool.iter().enumerate() {
        if selected.len() == XI_SIZE {
            break;
        }
        if !used[i] {
            used[i] = true;
            selected.push(player.id.clone());
        }
    }

    selected
}

fn by_skill_desc(a: &Player, b: &Player) -> Ordering {
    b.skill.total_cmp(&a.skill).then_with(|| a.id.cmp(&b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PositionCategory::{self, DEF, FWD, GK, MID};

    fn squad(layout: &[(PositionCategory, f64)]) -> Vec<Player> {
        layout.iter()
            .enumerate()
            .map(|(i, (pos, skill))| Player::new(format!("p{:02}", i), "P", "t", *pos, *skill))
            .collect()
    }

    fn count(ids: &[PlayerId], players: &[Player], pos: PositionCategory) -> usize {
        ids.iter()
            .filter(|id| players.iter().any(|p| &p.id == *id && p.position == pos))
            .count()
    }

    #[test]
    fn fills_433_template_with_best_per_category() {
        let mut layout = vec![(GK, 80.0), (GK, 60.0)];
        layout.extend((0..6).map(|i| (DEF, 60.0 + i as f64)));
        layout.extend((0..5).map(|i| (MID, 60.0 + i as f64)));
        layout.extend((0..4).map(|i| (FWD, 60.0 + i as f64)));
        let players = squad(&layout);
        let roster: Vec<&Player> = players.iter().collect();

        let xi = select_best_eleven(&roster, &Formation::F433);
        assert_eq!(xi.len(), 11);
        assert_eq!(count(&xi, &players, GK), 1);
        assert_eq!(count(&xi, &players, DEF), 4);
        assert_eq!(count(&xi, &players, MID), 3);
        assert_eq!(count(&xi, &players, FWD), 3);
        assert_eq!(xi[0], PlayerId::from("p00"));
        // weakest defender (60.0) is left out
        assert!(!xi.contains(&PlayerId::from("p02")));
    }

    #[test]
    fn short_category_is_filled_from_any_position() {
        let mut layout = vec![(GK, 70.0)];
        layout.extend((0..2).map(|_| (DEF, 65.0)));
        layout.extend((0..8).map(|_| (MID, 70.0)));
        layout.extend((0..3).map(|_| (FWD, 75.0)));
        let players = squad(&layout);
        let roster: Vec<&Player> = players.iter().collect();

        let xi = select_best_eleven(&roster, &Formation::F433);
        assert_eq!(xi.len(), 11);
        assert_eq!(count(&xi, &players, DEF), 2);
        assert_eq!(count(&xi, &players, MID), 5);
    }

    #[test]
    fn small_roster_returns_everyone_without_duplicates() {
        let players = squad(&[(GK, 70.0), (DEF, 70.0), (MID, 70.0), (FWD, 70.0)]);
        let roster: Vec<&Player> = players.iter().collect();
        let xi = select_best_eleven(&roster, &Formation::F442);
        assert_eq!(xi.len(), 4);
        let mut unique = xi.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
    }
}
