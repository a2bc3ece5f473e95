//! Console reports.

use euro_core::engine::awards::LeaderboardEntry;
use euro_core::engine::standings::StandingsRow;
use euro_core::{SeasonReport, TournamentReport};

pub fn print_domestic(season: &SeasonReport) {
    println!("\n🏟  {} ({} matches)", season.league, season.results.len());
    print_table(&season.table, 5);
    if let Some(champion) = season.champion() {
        println!("   🥇 Champion: {} ({} pts)", champion.name, champion.points);
    }
}

pub fn print_tournament(report: &TournamentReport) {
    println!("\n🏆 {}", report.competition);
    if let Some(seed) = report.seed {
        println!("   Seed: {}", seed);
    }
    println!("   League phase: {} teams, {} fixtures", report.league_table.len(), report.fixtures.len());
    print_table(&report.league_table, 8);

    for round in &report.knockout.rounds {
        println!("\n   {}", round.stage);
        for tie in &round.ties {
            let penalties = tie
                .shootout
                .map(|s| format!(" ({}-{} pens)", s.home, s.away))
                .unwrap_or_default();
            println!(
                "     {:<24} {:>2}-{:<2} {:<24}{}  → {}",
                report.team_name(&tie.team_a),
                tie.aggregate.0,
                tie.aggregate.1,
                report.team_name(&tie.team_b),
                penalties,
                report.team_name(&tie.winner),
            );
        }
    }

    match (&report.champion, &report.runner_up) {
        (Some(champion), Some(runner_up)) => println!(
            "\n   🥇 Champion: {}   🥈 Runner-up: {}",
            report.team_name(champion),
            report.team_name(runner_up)
        ),
        (Some(champion), None) => println!("\n   🥇 Champion: {}", report.team_name(champion)),
        _ => println!("\n   No knockout stage was played"),
    }

    print_leaders("Top scorers", &report.leaderboards.top_scorers, report, 0);
    print_leaders("Top assisters", &report.leaderboards.top_assisters, report, 0);
    print_leaders("Clean sheets", &report.leaderboards.clean_sheets, report, 0);
    print_leaders("Average rating", &report.leaderboards.average_rating, report, 2);

    if let Some(best) = &report.best_player {
        println!(
            "\n   ⭐ Best player: {} ({}, {:.1})",
            best.name,
            report.team_name(&best.team),
            best.score
        );
    }

    println!("\n   Best XI:");
    for pick in &report.best_xi.picks {
        println!(
            "     {:<12} {:<24} {:<24} {:.2}",
            pick.slot.label(),
            pick.name,
            report.team_name(&pick.team),
            pick.adjusted_rating
        );
    }
    for slot in &report.best_xi.unfilled {
        println!("     {:<12} (no eligible player)", slot.label());
    }

    if let Some(manager) = &report.manager_of_the_tournament {
        println!(
            "\n   🎩 Manager of the Tournament: {} ({}, {:.1})",
            manager.name,
            report.team_name(&manager.team),
            manager.score
        );
    }

    if !report.warnings.is_empty() {
        println!("\n   ⚠️  {} warning(s):", report.warnings.len());
        for warning in &report.warnings {
            println!("     - {}", warning);
        }
    }
}

fn print_table(rows: &[StandingsRow], limit: usize) {
    println!("   {:>3} {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4}", "#", "Club", "P", "W", "D", "L", "GD", "Pts");
    for (i, row) in rows.iter().take(limit).enumerate() {
        println!(
            "   {:>3} {:<24} {:>3} {:>3} {:>3} {:>3} {:>+4} {:>4}",
            i + 1,
            row.name,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goal_difference(),
            row.points
        );
    }
    if rows.len() > limit {
        println!("   ... {} more", rows.len() - limit);
    }
}

fn print_leaders(title: &str, entries: &[LeaderboardEntry], report: &TournamentReport, precision: usize) {
    if entries.is_empty() {
        return;
    }
    println!("\n   {}:", title);
    for (i, entry) in entries.iter().take(5).enumerate() {
        println!(
            "     {}. {:<24} {:<24} {:.*}",
            i + 1,
            entry.name,
            report.team_name(&entry.team),
            precision,
            entry.value
        );
    }
}
