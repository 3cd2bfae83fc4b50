#[tokio::main]
async fn main() {
    if let Err(err) = agentkit::mcp::server::run_stdio().await {
        eprintln!("agentkit: {}", err);
        std::process::exit(1);
    }
}
