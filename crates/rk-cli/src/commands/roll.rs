use colored::Colorize;
use rk_engine::{DiceExpr, RollMode, RollOutcome};
use rk_history::{RollTags, Roller};

use super::Context;

pub async fn run(
    ctx: &Context,
    expr: &str,
    mode: RollMode,
    tags: RollTags,
    no_log: bool,
) -> Result<(), String> {
    let expr: DiceExpr = expr.parse().map_err(|e| format!("{e}"))?;

    let (outcome, id) = if no_log {
        let outcome = expr
            .roll(&mut ctx.engine(), mode)
            .map_err(|e| e.to_string())?;
        (outcome, None)
    } else {
        let store = ctx.store().await?;
        let mut roller = Roller::new(ctx.engine(), store).with_tags(tags);
        let logged = roller
            .roll_expr(&expr, mode)
            .await
            .map_err(|e| e.to_string())?;
        (logged.roll, Some(logged.id))
    };

    print_outcome(&expr, &outcome);
    if let Some(id) = id {
        println!("  {}", format!("logged as #{id}").dimmed());
    }
    Ok(())
}

fn print_outcome(expr: &DiceExpr, outcome: &RollOutcome) {
    let mode = match outcome.mode {
        RollMode::Normal => String::new(),
        m => format!(" ({m})"),
    };
    println!("  {} {expr}{mode}", "Rolling".bold());
    println!("  {outcome}");
    println!("  Total: {}", outcome.total().to_string().bold());

    if outcome.has_critical_hit() {
        println!("  {}", "Critical hit!".green().bold());
    }
    if outcome.has_critical_fail() {
        println!("  {}", "Critical fail!".red().bold());
    }
}
