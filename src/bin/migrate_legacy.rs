#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dshub_rust::run_legacy_import().await {
        eprintln!("migrate-legacy fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
