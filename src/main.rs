#[tokio::main]
async fn main() {
    commerce_backend::run().await;
}
