use colored::{ColoredString, Colorize};

use crate::domain::MatchOutcome;
use crate::services::EntrantAchievements;
use crate::standings::{Standings, StandingsRow};

pub fn render_standings(standings: &Standings) -> String {
    let mut lines = vec![format!(
        "{:>4}  {:<24} {:>9} {:>4} {:>4} {:>4} {:>4}  {:<5} {:>8}",
        "#", "Name", "Rating", "MP", "W", "D", "L", "Form", "Diff"
    )
    .bold()
    .to_string()];

    lines.extend(standings.rows.iter().map(render_row));

    if let Some(row) = &standings.on_fire {
        lines.push(format!("{} {}", "On fire:".green().bold(), row.name));
    }
    if let Some(row) = &standings.struggling {
        lines.push(format!("{} {}", "Struggling:".red().bold(), row.name));
    }

    lines.join("\n")
}

fn render_row(row: &StandingsRow) -> String {
    let form: String = row.form.iter().map(|o| colored_outcome(*o).to_string()).collect();
    let padding = " ".repeat(5usize.saturating_sub(row.form.len()));

    format!(
        "{:>4}  {:<24} {:>9.1} {:>4} {:>4} {:>4} {:>4}  {}{} {:>8}",
        row.rank,
        row.name,
        row.current_rating,
        row.match_count,
        row.win_count,
        row.draw_count,
        row.loss_count,
        form,
        padding,
        colored_diff(row.point_diff),
    )
}

fn colored_outcome(outcome: MatchOutcome) -> ColoredString {
    let code = outcome.as_str();
    match outcome {
        MatchOutcome::Win => code.green(),
        MatchOutcome::Draw => code.yellow(),
        MatchOutcome::Loss => code.red(),
    }
}

fn colored_diff(diff: f64) -> ColoredString {
    let text = format!("{:+.1}", diff);
    if diff > 0.0 {
        text.green()
    } else if diff < 0.0 {
        text.red()
    } else {
        text.normal()
    }
}

pub fn render_achievements(name: &str, achievements: &EntrantAchievements) -> String {
    if achievements.earned.is_empty() {
        return format!("{} has no achievements yet", name);
    }

    let mut lines = vec![format!("Achievements of {}", name).bold().to_string()];
    for earned in &achievements.earned {
        lines.push(format!(
            "  {:<26} {}  {}",
            earned.achievement_type.cyan(),
            earned.achieved_at.format("%Y-%m-%d"),
            earned.description.as_deref().unwrap_or("")
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(rank: usize, name: &str, form: Vec<MatchOutcome>, point_diff: f64) -> StandingsRow {
        StandingsRow {
            rank,
            entrant_id: rank as i64,
            name: name.to_string(),
            current_rating: 1216.0,
            match_count: form.len(),
            win_count: form.iter().filter(|o| **o == MatchOutcome::Win).count(),
            draw_count: 0,
            loss_count: form.iter().filter(|o| **o == MatchOutcome::Loss).count(),
            form,
            point_diff,
        }
    }

    #[test]
    fn test_render_standings_plain() {
        colored::control::set_override(false);

        let leader = row(1, "Alice", vec![MatchOutcome::Win, MatchOutcome::Loss], 16.0);
        let standings = Standings {
            rows: vec![leader.clone()],
            on_fire: Some(leader.clone()),
            struggling: Some(leader),
        };

        let rendered = render_standings(&standings);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("Alice"));
        assert!(lines[1].contains("1216.0"));
        assert!(lines[1].contains("WL"));
        assert!(lines[1].ends_with("+16.0"));
        assert_eq!(lines[2], "On fire: Alice");
        assert_eq!(lines[3], "Struggling: Alice");
    }
}
