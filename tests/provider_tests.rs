//! Tests for provider abstraction.

use shared_mutex_core::prelude::*;

mod common;
use common::mock_store::MockMutexProvider;

/// Tests that any provider can be used with the same code.
async fn test_provider_abstraction_with_name<P: MutexProvider>(provider: &P, name: &str) {
    let mutex = provider.create_mutex(name).unwrap();
    assert_eq!(mutex.name(), name);
    assert_eq!(mutex.ttl(), provider.default_ttl());

    mutex.acquire().await.unwrap();
    assert!(mutex.is_locked().await.unwrap());

    // A second mutex for the same name contends on the same record
    let other = provider.create_mutex(name).unwrap();
    assert!(other.acquire().await.unwrap_err().is_already_locked());

    mutex.release().await.unwrap();

    // Now we should be able to acquire it again
    assert!(other.try_acquire().await.unwrap());
    other.release().await.unwrap();
}

/// Tests provider extension methods work with any provider.
async fn test_provider_extensions_with_name<P: MutexProvider + MutexProviderExt>(
    provider: &P,
    name: &str,
) {
    let mutex = provider.acquire_mutex(name).await.unwrap();
    assert!(mutex.is_locked().await.unwrap());

    // Held, so the extension reports contention
    let Err(err) = provider.acquire_mutex(name).await else {
        panic!("acquire_mutex succeeded on a held mutex");
    };
    assert!(err.is_already_locked());
    assert!(provider.try_acquire_mutex(name).await.unwrap().is_none());

    mutex.release().await.unwrap();

    let mutex = provider.try_acquire_mutex(name).await.unwrap();
    assert!(mutex.is_some());
    mutex.unwrap().release().await.unwrap();
}

#[tokio::test]
async fn test_mock_provider_abstraction() {
    let provider = MockMutexProvider::new(Ttl::DEFAULT);
    test_provider_abstraction_with_name(&provider, "test-resource").await;
}

#[tokio::test]
async fn test_mock_provider_extensions() {
    let provider = MockMutexProvider::new(Ttl::DEFAULT);
    test_provider_extensions_with_name(&provider, "test-resource").await;
}

#[tokio::test]
async fn test_provider_ttl_override() {
    let provider = MockMutexProvider::new(Ttl::DEFAULT);

    let mutex = provider
        .create_mutex_with_ttl("short-lived", Ttl::from_millis(5).unwrap())
        .unwrap();
    mutex.acquire().await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert!(!mutex.is_locked().await.unwrap());

    // The default (one hour) is still in force for other mutexes
    let mutex = provider.create_mutex("long-lived").unwrap();
    assert_eq!(mutex.ttl(), Ttl::DEFAULT);
    mutex.acquire().await.unwrap();
    assert!(provider.store().contains_key("long-lived"));
}

#[tokio::test]
async fn test_provider_rejects_empty_name() {
    let provider = MockMutexProvider::new(Ttl::NONE);
    assert!(matches!(
        provider.create_mutex(""),
        Err(LockError::InvalidArgument(_))
    ));
    assert!(matches!(
        provider.acquire_mutex("").await,
        Err(LockError::InvalidArgument(_))
    ));
}
