use std::path::Path;

use chrono::Utc;
use rk_history::{DateRange, ExportFormat, ExportOptions};

use super::Context;

pub async fn run(
    ctx: &Context,
    format: &str,
    output: Option<&Path>,
    include_stats: bool,
    range: Option<&str>,
) -> Result<(), String> {
    let format: ExportFormat = format.parse().map_err(|e| format!("{e}"))?;
    let range: DateRange = match range {
        Some(r) => r.parse().map_err(|e| format!("{e}"))?,
        None => DateRange::AllTime,
    };
    let options = ExportOptions::new(format)
        .with_statistics(include_stats)
        .with_range(range);

    let store = ctx.store().await?;
    let content = store
        .export(&options, Utc::now())
        .await
        .map_err(|e| e.to_string())?;

    if let Some(path) = output {
        std::fs::write(path, &content)
            .map_err(|e| format!("cannot write to {}: {e}", path.display()))?;
        println!("  Exported to {}", path.display());
    } else {
        print!("{content}");
    }

    Ok(())
}
