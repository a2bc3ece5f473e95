//! Domestic leagues to continental competition.

use crate::data::League;
use crate::models::{LeagueId, Team, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualificationRules {
    /// Places per domestic league.
    pub spots: BTreeMap<LeagueId, usize>,
    /// Field size; shortfalls are topped up by strength, overflow trimmed by strength.
    pub cap: usize,
}

impl QualificationRules {
    pub fn new(cap: usize) -> Self {
        Self { spots: BTreeMap::new(), cap }
    }

    pub fn with_spots(mut self, league: impl Into<LeagueId>, spots: usize) -> Self {
        self.spots.insert(league.into(), spots);
        self
    }

    pub fn champions_league(leagues: &[League], cap: usize) -> Self {
        let mut rules = Self::new(cap);
        for league in leagues {
            rules.spots.insert(league.id.clone(), league.champions_league_spots);
        }
        rules
    }

    pub fn europa_league(leagues: &[League], cap: usize) -> Self {
        let mut rules = Self::new(cap);
        for league in leagues {
            rules.spots.insert(league.id.clone(), league.europa_league_spots);
        }
        rules
    }

    /// Pick the field. Each league sends its top clubs by domestic finish when
    /// `domestic` has a ranking for it, otherwise by strength. Clubs in
    /// `excluded` never qualify. Result is ordered strongest first.
    pub fn qualify(
        &self,
        teams: &[Team],
        domestic: &HashMap<LeagueId, Vec<TeamId>>,
        excluded: &HashSet<TeamId>,
    ) -> Vec<Team> {
        let by_id: HashMap<&TeamId, &Team> = teams.iter().map(|t| (&t.id, t)).collect();
        let mut picked: Vec<&Team> = Vec::new();
        let mut taken: HashSet<&TeamId> = HashSet::new();

        for (league, &spots) in &self.spots {
            let ranking: Vec<&Team> = match domestic.get(league) {
                Some(order) => order.iter().filter_map(|id| by_id.get(id).copied()).collect(),
                None => {
                    let mut members: Vec<&Team> =
                        teams.iter().filter(|t| t.league.as_ref() == Some(league)).collect();
                    members.sort_by(|a, b| by_strength(a, b));
                    members
                }
            };
            let mut sent = 0;
            for team in ranking {
                if sent == spots {
                    break;
                }
                if excluded.contains(&team.id) || taken.contains(&team.id) {
                    continue;
                }
                taken.insert(&team.id);
                picked.push(team);
                sent += 1;
            }
            if sent < spots {
                tracing::warn!(league = %league, sent, spots, "league could not fill its places");
            }
        }

        if picked.len() < self.cap {
            let mut rest: Vec<&Team> = teams
                .iter()
                .filter(|t| !excluded.contains(&t.id) && !taken.contains(&t.id))
                .collect();
            rest.sort_by(|a, b| by_strength(a, b));
            let needed = self.cap - picked.len();
            if !rest.is_empty() {
                tracing::info!(needed, "topping up qualifiers by strength");
            }
            picked.extend(rest.into_iter().take(needed));
        }

        picked.sort_by(|a, b| by_strength(a, b));
        picked.truncate(self.cap);
        picked.into_iter().cloned().collect()
    }
}

fn by_strength(a: &Team, b: &Team) -> std::cmp::Ordering {
    b.strength().total_cmp(&a.strength()).then_with(|| a.id.cmp(&b.id))
}
