use super::Context;

pub async fn run(ctx: &Context, id: i64) -> Result<(), String> {
    let store = ctx.store().await?;
    store
        .delete_existing(id)
        .await
        .map_err(|e| e.to_string())?;
    println!("  Deleted roll #{id}");
    Ok(())
}
