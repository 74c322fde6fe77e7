use chrono::{Duration, Utc};

use super::Context;

pub async fn run(ctx: &Context, days: u32) -> Result<(), String> {
    let cutoff = Utc::now() - Duration::days(i64::from(days));
    let store = ctx.store().await?;
    let removed = store
        .delete_older_than(cutoff)
        .await
        .map_err(|e| e.to_string())?;
    println!("  Removed {removed} rolls older than {days} days");
    Ok(())
}
