use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    buildgraph_lib::main().await
}
