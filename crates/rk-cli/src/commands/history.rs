use chrono::Utc;
use comfy_table::{ContentArrangement, Table};
use rk_history::{DateRange, HistoryFilter, RollRecord};

use super::{Context, format_time, signed};

/// Options for the history listing.
pub struct Query {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub die: Option<String>,
    pub session: Option<String>,
    pub character: Option<String>,
    pub context: Option<String>,
    pub range: Option<String>,
}

impl Query {
    fn filter(&self) -> Result<HistoryFilter, String> {
        let mut filter = HistoryFilter::new();
        if let Some(die) = &self.die {
            filter = filter.dice_type(die.trim().to_lowercase());
        }
        if let Some(session) = &self.session {
            filter = filter.session(session.as_str());
        }
        if let Some(character) = &self.character {
            filter = filter.character(character.as_str());
        }
        if let Some(context) = &self.context {
            filter = filter.context(context.as_str());
        }
        if let Some(range) = &self.range {
            let range: DateRange = range.parse().map_err(|e| format!("{e}"))?;
            filter = filter.date_range(range);
        }
        Ok(filter)
    }
}

pub async fn run(ctx: &Context, query: Query) -> Result<(), String> {
    let store = ctx.store().await?;

    let records = match query.page {
        Some(_) if query.session.is_some() => {
            return Err("--page lists the full history and cannot be combined with --session".into());
        }
        Some(page) => store
            .page(page, ctx.config.page_size)
            .await
            .map_err(|e| e.to_string())?,
        None => {
            let filter = query.filter()?;
            let limit = query.limit.unwrap_or(ctx.config.recent_limit);
            store
                .filtered(&filter, Utc::now(), Some(limit))
                .await
                .map_err(|e| e.to_string())?
        }
    };

    if records.is_empty() {
        println!("  No rolls found.");
        return Ok(());
    }

    println!("{}", history_table(&records));
    println!();
    match query.page {
        Some(page) => println!("  {} rolls (page {page})", records.len()),
        None => println!("  {} rolls", records.len()),
    }
    Ok(())
}

fn history_table(records: &[RollRecord]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Id", "Dice", "Result", "Mod", "Total", "Time", "Context", "Character",
    ]);
    for r in records {
        table.add_row(vec![
            r.id.to_string(),
            r.dice_type.clone(),
            r.result.to_string(),
            signed(r.modifier),
            r.total.to_string(),
            format_time(r.timestamp),
            r.context.clone().unwrap_or_else(|| "-".into()),
            r.character_name.clone().unwrap_or_else(|| "-".into()),
        ]);
    }
    table
}
