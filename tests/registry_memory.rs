mod common;

use chrono::{Duration, Utc};
use std::sync::Arc;
use link_registry::application::services::LinkRegistry;
use link_registry::error::ErrorKind;
use link_registry::infrastructure::persistence::InMemoryLinkRepository;

fn create_registry() -> (
    Arc<LinkRegistry<InMemoryLinkRepository>>,
    Arc<InMemoryLinkRepository>,
) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    (Arc::new(LinkRegistry::new(repo.clone())), repo)
}

#[tokio::test]
async fn test_create_then_resolve() {
    let (registry, _repo) = create_registry();

    let link = registry
        .create("https://example.com/page", Some("MyLink"))
        .await
        .unwrap();
    assert_eq!(link.code, "mylink");

    let resolution = registry.resolve("MYLINK").await.unwrap();
    assert_eq!(resolution.target_url, "https://example.com/page");
    assert!(resolution.hit_recorded);
    assert_eq!(resolution.link.clicks, 1);

    let stored = registry.get_by_code("mylink").await.unwrap();
    assert_eq!(stored.clicks, 1);
    assert_eq!(stored.last_clicked, resolution.link.last_clicked);
}

#[tokio::test]
async fn test_generated_code_is_normalized() {
    let (registry, _repo) = create_registry();

    let link = registry.create("https://example.com", None).await.unwrap();

    assert_eq!(link.code.len(), 7);
    assert_eq!(link.code, link.code.to_lowercase());
    assert!(registry.get_by_code(&link.code).await.is_ok());
}

#[tokio::test]
async fn test_code_taken_case_insensitive() {
    let (registry, _repo) = create_registry();
    registry
        .create("https://a.com", Some("promo"))
        .await
        .unwrap();

    let err = registry
        .create("https://b.com", Some("PROMO"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::CodeTaken);
    assert_eq!(
        registry.get_by_code("promo").await.unwrap().url,
        "https://a.com"
    );
}

#[tokio::test]
async fn test_invalid_inputs_leave_store_untouched() {
    let (registry, _repo) = create_registry();

    let err = registry
        .create("example.com/page", Some("ok"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidUrl);

    let err = registry
        .create("https://example.com", Some("bad code"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);

    assert!(registry.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_then_not_found() {
    let (registry, _repo) = create_registry();
    registry
        .create("https://example.com", Some("gone"))
        .await
        .unwrap();

    assert_eq!(registry.delete_by_code("GONE").await.unwrap(), 1);
    assert_eq!(registry.delete_by_code("gone").await.unwrap(), 0);

    let err = registry.resolve("gone").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_code_reusable_after_delete() {
    let (registry, _repo) = create_registry();
    registry
        .create("https://old.com", Some("again"))
        .await
        .unwrap();
    registry.delete_by_code("again").await.unwrap();

    let link = registry
        .create("https://new.com", Some("again"))
        .await
        .unwrap();

    assert_eq!(link.url, "https://new.com");
    assert_eq!(link.clicks, 0);
}

#[tokio::test]
async fn test_legacy_schemeless_url_resolves_with_https() {
    let (registry, repo) = create_registry();
    common::seed_link(&repo, "abc", "example.com/page");

    let resolution = registry.resolve("ABC").await.unwrap();

    assert_eq!(resolution.target_url, "https://example.com/page");
    assert_eq!(resolution.link.url, "example.com/page");
    assert_eq!(resolution.link.clicks, 1);
}

#[tokio::test]
async fn test_list_all_newest_first() {
    let (registry, repo) = create_registry();
    let now = Utc::now();
    common::seed_link_at(&repo, "first", "https://a.com", now - Duration::minutes(5));
    common::seed_link_at(&repo, "second", "https://b.com", now);

    let codes: Vec<String> = registry
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|l| l.code)
        .collect();

    assert_eq!(codes, ["second", "first"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolves_count_every_click() {
    const VISITS: i64 = 50;

    let (registry, _repo) = create_registry();
    registry
        .create("https://example.com", Some("busy"))
        .await
        .unwrap();

    let handles: Vec<_> = (0..VISITS)
        .map(|_| {
            let registry = registry.clone();
            tokio::spawn(async move { registry.resolve("busy").await })
        })
        .collect();

    for handle in handles {
        let resolution = handle.await.unwrap().unwrap();
        assert!(resolution.hit_recorded);
    }

    let link = registry.get_by_code("busy").await.unwrap();
    assert_eq!(link.clicks, VISITS);
    assert!(link.last_clicked.is_some());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_with_same_code() {
    let (registry, _repo) = create_registry();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = registry.clone();
            tokio::spawn(async move {
                registry
                    .create(&format!("https://site{}.com", i), Some("race"))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert_eq!(e.kind(), ErrorKind::CodeTaken),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(registry.list_all().await.unwrap().len(), 1);
}
