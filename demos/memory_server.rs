use arcadia::prelude::*;
use std::env;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    // Backends
    // Nothing is persisted; everything is gone when the process exits.
    let games = InMemoryGameStore::new();
    let covers = InMemoryCoverStorage::new();

    // Build App
    let app = CatalogServer::default().build(games, covers);

    // Serve
    let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");
    println!("Server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
