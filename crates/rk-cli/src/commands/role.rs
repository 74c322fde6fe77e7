use colored::Colorize;
use rk_engine::Role;

use super::Context;

pub fn show(ctx: &Context) -> Result<(), String> {
    let profile = ctx.load_profile()?;
    match profile.role {
        Some(role) => {
            let config = profile.config_or_default(role);
            println!("  {} {role}", "Role:".bold());
            println!("  {} slots in \"{}\"", config.len(), config.name);
        }
        None => {
            println!("  No role selected.");
            let roles: Vec<String> = Role::ALL.iter().map(|r| r.to_string()).collect();
            println!("  Available: {}", roles.join(", "));
            println!("  Run: rk role set <player|dm>");
        }
    }
    Ok(())
}

pub fn set(ctx: &Context, role: &str) -> Result<(), String> {
    let role: Role = role.parse().map_err(|e| format!("{e}. Use: player, dm"))?;
    let mut profile = ctx.load_profile()?;
    profile.select_role(role);
    profile.config_mut(role);
    ctx.save_profile(&profile)?;
    println!("  Role set to {}", role.to_string().bold());
    Ok(())
}

pub fn clear(ctx: &Context) -> Result<(), String> {
    let mut profile = ctx.load_profile()?;
    profile.clear_role();
    ctx.save_profile(&profile)?;
    println!("  Role cleared");
    Ok(())
}
