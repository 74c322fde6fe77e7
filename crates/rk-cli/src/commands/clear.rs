use super::Context;

pub async fn run(ctx: &Context) -> Result<(), String> {
    let store = ctx.store().await?;
    let removed = store.clear().await.map_err(|e| e.to_string())?;
    println!("  Cleared {removed} rolls");
    Ok(())
}
