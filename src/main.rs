use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    stepframe_cli::cli::app::run().await
}
