#[tokio::main]
async fn main() {
    if let Err(e) = cinema_reviews_be::start_server().await {
        eprintln!("Failed to start server: {e}");
        std::process::exit(1);
    }
}
