//! Demo: coordinating work through a Redis-backed shared mutex
//!
//! Run with: `cargo run --example redis_mutex`
//!
//! Requires a Redis server. Set REDIS_URL environment variable
//! or modify the URL below.

use shared_mutex::*;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Get Redis URL from environment or use default
    let redis_url = std::env::var("REDIS_URL")
        .unwrap_or_else(|_| "redis://localhost:6379".to_string());

    println!("Connecting to Redis...");
    let provider = RedisMutexProvider::builder()
        .url(&redis_url)
        .ttl(Duration::from_secs(30))
        .build()
        .await?;

    let mutex = provider.create_mutex("example-resource")?;
    println!("Created mutex: {}", mutex.name());

    // Watch the channel from a second handle, the way another process would
    let watcher = provider.create_mutex("example-resource")?;
    let mut notifications = watcher.subscribe().await?;
    let listener = tokio::spawn(async move {
        for _ in 0..2 {
            match notifications.next().await {
                Ok(Some(n)) => println!("  [watcher] {}", n),
                Ok(None) => break,
                Err(e) => {
                    eprintln!("  [watcher] {}", e);
                    break;
                }
            }
        }
        notifications.close().await
    });

    mutex.acquire().await?;
    println!("Mutex acquired (expires in 30s unless released)");

    // A contender fails fast instead of waiting
    match watcher.acquire().await {
        Err(e) if e.is_already_locked() => println!("Second handle: {}", e),
        other => println!("Second handle: unexpected {:?}", other),
    }

    println!("Doing work...");
    tokio::time::sleep(Duration::from_secs(1)).await;

    mutex.release().await?;
    println!("Mutex released");

    listener.await??;
    Ok(())
}
