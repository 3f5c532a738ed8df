use docserve::client::{ProbeConfig, probe};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = ProbeConfig::load()?;
    let report = probe(&cfg).await?;

    println!("Response from server:\n{}", report.response);
    println!("Round-Trip Time (RTT): {:.2} ms", report.rtt_ms);

    Ok(())
}
