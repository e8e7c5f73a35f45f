#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = studtest_rust::run().await {
        eprintln!("studtest-rust fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
