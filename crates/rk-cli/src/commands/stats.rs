use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::Context;

const BAR_WIDTH: f64 = 30.0;

pub async fn run(ctx: &Context, die: Option<&str>) -> Result<(), String> {
    let store = ctx.store().await?;
    let stats = store.statistics().await.map_err(|e| e.to_string())?;

    if stats.total_rolls == 0 {
        println!("  No rolls recorded yet.");
        return Ok(());
    }

    println!("  {} {}", "Total rolls:".bold(), stats.total_rolls);
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Dice", "Rolls", "Average", "Min", "Max", "Share"]);
    for s in &stats.dice_type_stats {
        table.add_row(vec![
            s.dice_type.clone(),
            s.count.to_string(),
            format!("{:.2}", s.average),
            s.min.to_string(),
            s.max.to_string(),
            format!("{:.1}%", s.percentage),
        ]);
    }
    println!("{table}");
    println!();

    let streaks = &stats.streaks;
    println!("  {}", "Streaks".bold().underline());
    println!(
        "  current: {} high / {} low",
        streaks.current_win_streak, streaks.current_loss_streak
    );
    println!(
        "  longest: {} high / {} low",
        streaks.longest_win_streak, streaks.longest_loss_streak
    );

    if let Some(die) = die {
        let die = die.trim().to_lowercase();
        let dist = stats
            .distribution_for(&die)
            .ok_or_else(|| format!("no rolls recorded for {die}"))?;
        println!();
        println!("  {}", format!("Distribution ({die})").bold().underline());
        let peak = dist
            .results
            .iter()
            .map(|f| f.percentage)
            .fold(0.0_f64, f64::max);
        for f in &dist.results {
            let width = if peak > 0.0 {
                (f.percentage / peak * BAR_WIDTH).round() as usize
            } else {
                0
            };
            println!(
                "  {:>4} | {:<30} {} ({:.1}%)",
                f.result,
                "#".repeat(width),
                f.frequency,
                f.percentage
            );
        }
    }
    Ok(())
}
