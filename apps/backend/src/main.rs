#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dettato_backend::run().await
}
