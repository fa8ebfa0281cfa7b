// SPDX-License-Identifier: MIT

//! Following-feed integration tests: self-inclusion, follow-graph
//! changes, and cursor pagination.
//!
//! These tests require the Firestore emulator to be running.

mod common;
use common::{seed_user, test_repos};

#[tokio::test]
async fn test_feed_includes_own_items_with_empty_follow_set() {
    require_emulator!();
    let repos = test_repos().await;
    let loner = seed_user(&repos, "feed-loner").await;

    repos
        .activities
        .create_basic(&loner, "solo session", vec![])
        .await
        .unwrap();

    let feed = repos.feed.following_feed(&loner.id).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].author().id, loner.id);
}

#[tokio::test]
async fn test_feed_reflects_follow_and_unfollow() {
    require_emulator!();
    let repos = test_repos().await;
    let reader = seed_user(&repos, "feed-reader").await;
    let writer = seed_user(&repos, "feed-writer").await;

    repos
        .activities
        .create_basic(&writer, "morning board session", vec![])
        .await
        .unwrap();

    // Not following yet: the writer's post is invisible.
    assert!(repos.feed.following_feed(&reader.id).await.unwrap().is_empty());

    assert!(repos
        .relationships
        .follow(&reader.id, &writer.id)
        .await
        .unwrap());
    let feed = repos.feed.following_feed(&reader.id).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].author().id, writer.id);

    repos
        .relationships
        .unfollow(&reader.id, &writer.id)
        .await
        .unwrap();
    assert!(repos.feed.following_feed(&reader.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_follow_is_idempotent() {
    require_emulator!();
    let repos = test_repos().await;
    let a = seed_user(&repos, "fol-a").await;
    let b = seed_user(&repos, "fol-b").await;

    assert!(repos.relationships.follow(&a.id, &b.id).await.unwrap());
    assert!(!repos.relationships.follow(&a.id, &b.id).await.unwrap());
    assert!(repos.relationships.is_following(&a.id, &b.id).await.unwrap());

    let following = repos.relationships.get_following(&a.id).await.unwrap();
    assert_eq!(following.len(), 1);
    let followers = repos.relationships.get_followers(&b.id).await.unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0].id, a.id);
}

#[tokio::test]
async fn test_feed_pagination_is_exactly_once_and_ordered() {
    require_emulator!();
    let repos = test_repos().await;
    let reader = seed_user(&repos, "page-reader").await;
    let writer = seed_user(&repos, "page-writer").await;
    repos
        .relationships
        .follow(&reader.id, &writer.id)
        .await
        .unwrap();

    let mut created = Vec::new();
    for n in 0..5 {
        let item = repos
            .activities
            .create_basic(&writer, &format!("post {}", n), vec![])
            .await
            .unwrap();
        created.push(item.id().to_string());
    }

    let mut seen: Vec<String> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;
    loop {
        let page = repos
            .feed
            .following_feed_page(&reader.id, 2, cursor.as_deref())
            .await
            .unwrap();
        assert!(page.items.len() <= 2);
        for item in &page.items {
            seen.push(item.id().to_string());
        }
        pages += 1;
        assert!(pages <= 5, "pagination failed to terminate");
        match page.next_cursor {
            Some(next) => {
                assert!(page.has_more);
                cursor = Some(next);
            }
            None => {
                assert!(!page.has_more);
                break;
            }
        }
    }

    // Every item exactly once.
    assert_eq!(seen.len(), 5);
    let mut unique = seen.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 5, "pagination duplicated an item");

    let mut created_sorted = created.clone();
    created_sorted.sort();
    assert_eq!(unique, created_sorted);

    // Paged traversal must agree with the unpaged feed ordering.
    let feed = repos.feed.following_feed(&reader.id).await.unwrap();
    let feed_ids: Vec<String> = feed.iter().map(|i| i.id().to_string()).collect();
    assert_eq!(seen, feed_ids, "paged order must match unpaged order");
}

#[tokio::test]
async fn test_page_rejects_garbage_cursor() {
    require_emulator!();
    let repos = test_repos().await;
    let reader = seed_user(&repos, "cur-reader").await;

    let result = repos
        .feed
        .following_feed_page(&reader.id, 2, Some("definitely-not-a-cursor!"))
        .await;
    assert!(matches!(result, Err(chalkline::AppError::InvalidState(_))));
}
