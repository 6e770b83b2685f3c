#[tokio::main]
async fn main() {
    docathome::bootstrap::init_base().await;

    if let Err(err) = docathome::bootstrap::init_server().await {
        err.report();
        std::process::exit(1);
    }
}
