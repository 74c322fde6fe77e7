use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rk_engine::{DiceSlot, Die, Modifier, RollMode, SlotRoll};
use rk_history::Roller;

use super::{Context, selected_role};

pub fn list(ctx: &Context) -> Result<(), String> {
    let profile = ctx.load_profile()?;
    let role = selected_role(&profile)?;
    let config = profile.config_or_default(role);

    if config.is_empty() {
        println!("  No slots configured for {role}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Roll", "Id"]);
    for (i, slot) in config.slots().iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            slot.name.clone(),
            slot.describe(),
            slot.id.to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} slots ({role})", config.len());
    Ok(())
}

pub fn add(
    ctx: &Context,
    name: &str,
    die: &str,
    mode: &str,
    modifiers: &[String],
) -> Result<(), String> {
    let mut profile = ctx.load_profile()?;
    let role = selected_role(&profile)?;

    let die: Die = die.parse().map_err(|_| {
        let known: Vec<String> = Die::ALL_STANDARD.iter().map(|d| d.to_string()).collect();
        format!("unknown die: \"{die}\". Use e.g. {}", known.join(", "))
    })?;
    let mode: RollMode = mode.parse().map_err(|e| format!("{e}"))?;
    let mut slot = DiceSlot::new(name.trim(), die).with_mode(mode);
    for m in modifiers {
        let modifier: Modifier = m.parse().map_err(|e| format!("{e}"))?;
        slot = slot.with_modifier(modifier);
    }
    if slot.name.is_empty() {
        return Err("slot name cannot be empty".into());
    }

    let summary = slot.describe();
    let slot_name = slot.name.clone();
    profile
        .config_mut(role)
        .add_slot(slot)
        .map_err(|e| e.to_string())?;
    ctx.save_profile(&profile)?;
    println!("  Added slot \"{}\" ({summary})", slot_name.bold());
    Ok(())
}

pub fn remove(ctx: &Context, reference: &str) -> Result<(), String> {
    let mut profile = ctx.load_profile()?;
    let role = selected_role(&profile)?;
    let config = profile.config_mut(role);
    let id = config.find_slot(reference).map_err(|e| e.to_string())?.id;
    let removed = config.remove_slot(id).map_err(|e| e.to_string())?;
    ctx.save_profile(&profile)?;
    println!("  Removed slot \"{}\"", removed.name);
    Ok(())
}

pub async fn roll(ctx: &Context, reference: &str) -> Result<(), String> {
    let profile = ctx.load_profile()?;
    let role = selected_role(&profile)?;
    let config = profile.config_or_default(role);
    let slot = config.find_slot(reference).map_err(|e| e.to_string())?;

    let store = ctx.store().await?;
    let mut roller = Roller::new(ctx.engine(), store).with_tags(ctx.tags());
    let logged = roller.roll_slot(slot).await.map_err(|e| e.to_string())?;

    print_slot_roll(&logged.roll);
    println!("  {}", format!("logged as #{}", logged.id).dimmed());
    Ok(())
}

pub async fn roll_all(ctx: &Context) -> Result<(), String> {
    let profile = ctx.load_profile()?;
    let role = selected_role(&profile)?;
    let config = profile.config_or_default(role);
    if config.is_empty() {
        return Err(format!("no slots configured for {role}"));
    }

    let store = ctx.store().await?;
    let mut roller = Roller::new(ctx.engine(), store).with_tags(ctx.tags());
    let (rolls, tally) = roller.roll_all(&config).await.map_err(|e| e.to_string())?;

    for (logged, entry) in rolls.iter().zip(tally.entries()) {
        print_slot_roll(&logged.roll);
        println!("    running total: {}", entry.running);
    }
    println!();
    println!(
        "  {} {} rolls, sum {}, average {:.2}",
        "Tally:".bold(),
        tally.count(),
        tally.sum(),
        tally.average()
    );
    if let (Some(high), Some(low)) = (tally.highest(), tally.lowest()) {
        println!("  Highest {high}, lowest {low}");
    }
    Ok(())
}

fn print_slot_roll(roll: &SlotRoll) {
    println!("  {roll}");
    if roll.is_critical_hit() {
        println!("  {}", "Critical hit!".green().bold());
    } else if roll.is_critical_fail() {
        println!("  {}", "Critical fail!".red().bold());
    }
}
