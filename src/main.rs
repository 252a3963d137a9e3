#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = dshub_rust::run().await {
        eprintln!("dshub-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
