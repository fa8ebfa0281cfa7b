// SPDX-License-Identifier: MIT

//! Engagement integration tests: likes, comments, counters, and
//! cascade deletion.
//!
//! These tests require the Firestore emulator to be running.

mod common;
use common::{make_gym, seed_gym, seed_user, test_repos, unique_id};

#[tokio::test]
async fn test_like_is_idempotent() {
    require_emulator!();
    let repos = test_repos().await;
    let author = seed_user(&repos, "like-author").await;
    let fan = seed_user(&repos, "like-fan").await;

    let item = repos
        .activities
        .create_basic(&author, "projecting the pink V5", vec![])
        .await
        .unwrap();

    assert!(repos.activities.like(item.id(), &fan.id).await.unwrap());
    // Second like from the same user changes nothing.
    assert!(!repos.activities.like(item.id(), &fan.id).await.unwrap());

    let fetched = repos.activities.get(item.id()).await.unwrap();
    assert_eq!(fetched.like_count(), 1);
    assert!(repos.activities.has_liked(item.id(), &fan.id).await.unwrap());
}

#[tokio::test]
async fn test_unlike_never_goes_negative() {
    require_emulator!();
    let repos = test_repos().await;
    let author = seed_user(&repos, "unlike-author").await;
    let fan = seed_user(&repos, "unlike-fan").await;

    let item = repos
        .activities
        .create_basic(&author, "rest day thoughts", vec![])
        .await
        .unwrap();

    // Unliking before ever liking is a no-op.
    assert!(!repos.activities.unlike(item.id(), &fan.id).await.unwrap());

    repos.activities.like(item.id(), &fan.id).await.unwrap();
    assert!(repos.activities.unlike(item.id(), &fan.id).await.unwrap());
    assert!(!repos.activities.unlike(item.id(), &fan.id).await.unwrap());

    let fetched = repos.activities.get(item.id()).await.unwrap();
    assert_eq!(fetched.like_count(), 0);
}

#[tokio::test]
async fn test_comment_adjusts_count_and_resolves_author() {
    require_emulator!();
    let repos = test_repos().await;
    let author = seed_user(&repos, "cmt-author").await;
    let commenter = seed_user(&repos, "cmt-commenter").await;

    let item = repos
        .activities
        .create_basic(&author, "new set in the cave", vec![])
        .await
        .unwrap();

    let comment = repos
        .comments
        .add(item.id(), &commenter.id, "that heel hook is wild")
        .await
        .unwrap();
    assert_eq!(comment.author.id, commenter.id);

    let comments = repos.comments.fetch(item.id()).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(repos.activities.get(item.id()).await.unwrap().comment_count(), 1);

    repos.comments.delete(&comment.id).await.unwrap();
    assert!(repos.comments.fetch(item.id()).await.unwrap().is_empty());
    assert_eq!(repos.activities.get(item.id()).await.unwrap().comment_count(), 0);
}

#[tokio::test]
async fn test_post_count_tracks_posts_but_not_visits() {
    require_emulator!();
    let repos = test_repos().await;
    let author = seed_user(&repos, "pc-author").await;
    let gym = seed_gym(&repos, "pc-gym").await;

    repos
        .activities
        .create_basic(&author, "first post", vec![])
        .await
        .unwrap();
    repos
        .activities
        .create_beta(&author, &gym, "drop knee on the arete")
        .await
        .unwrap();
    repos
        .activities
        .create_visit(
            &author,
            chalkline::repos::NewVisit {
                gym: gym.clone(),
                visit_date: chrono::Utc::now(),
                duration_minutes: 120,
                description: None,
            },
        )
        .await
        .unwrap();

    let user = repos.users.get(&author.id).await.unwrap();
    assert_eq!(user.post_count, 2, "visits must not count as posts");
}

#[tokio::test]
async fn test_delete_cascades_likes_and_comments() {
    require_emulator!();
    let repos = test_repos().await;
    let author = seed_user(&repos, "del-author").await;
    let fan = seed_user(&repos, "del-fan").await;

    let item = repos
        .activities
        .create_basic(&author, "short lived", vec![])
        .await
        .unwrap();
    repos.activities.like(item.id(), &fan.id).await.unwrap();
    repos
        .comments
        .add(item.id(), &fan.id, "nice one")
        .await
        .unwrap();

    repos.activities.delete_item(item.id()).await.unwrap();

    assert!(matches!(
        repos.activities.get(item.id()).await,
        Err(chalkline::AppError::NotFound(_))
    ));
    assert!(repos.comments.fetch(item.id()).await.unwrap().is_empty());
    assert!(!repos.activities.has_liked(item.id(), &fan.id).await.unwrap());

    let user = repos.users.get(&author.id).await.unwrap();
    assert_eq!(user.post_count, 0);
}

#[tokio::test]
async fn test_unresolvable_references_drop_items_not_batches() {
    require_emulator!();
    let repos = test_repos().await;
    let author = seed_user(&repos, "drop-author").await;

    let kept = repos
        .activities
        .create_basic(&author, "still standing", vec![])
        .await
        .unwrap();

    // Beta referencing a gym that was never stored: the item writes
    // fine, but batch reconstruction cannot resolve the gym.
    let ghost_gym = make_gym("drop-gym");
    let orphan_beta = repos
        .activities
        .create_beta(&author, &ghost_gym, "beta into the void")
        .await
        .unwrap();

    let items = repos.activities.fetch_by_author(&author.id).await.unwrap();
    let ids: Vec<&str> = items.iter().map(|i| i.id()).collect();
    assert!(ids.contains(&kept.id()));
    assert!(
        !ids.contains(&orphan_beta.id()),
        "beta with unresolvable gym must be dropped, not fail the batch"
    );

    // Single-item get surfaces the reconstruction failure instead.
    assert!(matches!(
        repos.activities.get(orphan_beta.id()).await,
        Err(chalkline::AppError::InvalidState(_))
    ));

    // Item whose author profile was never stored drops the same way.
    let phantom = chalkline::models::User {
        id: unique_id("drop-phantom"),
        email: "phantom@example.com".to_string(),
        first_name: "Phantom".to_string(),
        last_name: "Author".to_string(),
        bio: None,
        post_count: 0,
        logged_hours: 0.0,
        image_url: None,
        created_at: chrono::Utc::now(),
    };
    repos
        .activities
        .create_basic(&phantom, "nobody wrote this", vec![])
        .await
        .unwrap();
    let orphaned = repos.activities.fetch_by_author(&phantom.id).await.unwrap();
    assert!(
        orphaned.is_empty(),
        "items with unresolvable author must be dropped"
    );
}

#[tokio::test]
async fn test_event_registration_capacity() {
    require_emulator!();
    let repos = test_repos().await;
    let host = seed_user(&repos, "evt-host").await;
    let alice = seed_user(&repos, "evt-alice").await;
    let bob = seed_user(&repos, "evt-bob").await;

    let event = repos
        .activities
        .create_event(
            &host,
            chalkline::repos::NewEvent {
                title: "Tiny comp".to_string(),
                description: None,
                event_date: chrono::Utc::now(),
                location: "Back wall".to_string(),
                max_attendees: 1,
                gym: None,
            },
        )
        .await
        .unwrap();

    assert!(repos
        .activities
        .register_event(event.id(), &alice.id)
        .await
        .unwrap());
    // Re-registering is a no-op, not a capacity error.
    assert!(!repos
        .activities
        .register_event(event.id(), &alice.id)
        .await
        .unwrap());

    assert!(matches!(
        repos.activities.register_event(event.id(), &bob.id).await,
        Err(chalkline::AppError::InvalidState(_))
    ));

    assert!(repos
        .activities
        .unregister_event(event.id(), &alice.id)
        .await
        .unwrap());
    assert!(repos
        .activities
        .register_event(event.id(), &bob.id)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_visit_status_transitions_enforced() {
    require_emulator!();
    let repos = test_repos().await;
    let author = seed_user(&repos, "vs-author").await;
    let gym = seed_gym(&repos, "vs-gym").await;

    let visit = repos
        .activities
        .create_visit(
            &author,
            chalkline::repos::NewVisit {
                gym,
                visit_date: chrono::Utc::now(),
                duration_minutes: 60,
                description: None,
            },
        )
        .await
        .unwrap();

    use chalkline::models::VisitStatus;
    // Planned cannot jump straight to completed.
    assert!(matches!(
        repos
            .activities
            .update_visit_status(visit.id(), VisitStatus::Completed)
            .await,
        Err(chalkline::AppError::InvalidState(_))
    ));

    repos
        .activities
        .update_visit_status(visit.id(), VisitStatus::Ongoing)
        .await
        .unwrap();
    repos
        .activities
        .update_visit_status(visit.id(), VisitStatus::Completed)
        .await
        .unwrap();

    // Completed is terminal.
    assert!(matches!(
        repos
            .activities
            .update_visit_status(visit.id(), VisitStatus::Cancelled)
            .await,
        Err(chalkline::AppError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_join_and_leave_visit() {
    require_emulator!();
    let repos = test_repos().await;
    let author = seed_user(&repos, "jv-author").await;
    let friend = seed_user(&repos, "jv-friend").await;
    let gym = seed_gym(&repos, "jv-gym").await;

    let visit = repos
        .activities
        .create_visit(
            &author,
            chalkline::repos::NewVisit {
                gym,
                visit_date: chrono::Utc::now(),
                duration_minutes: 60,
                description: None,
            },
        )
        .await
        .unwrap();

    assert!(repos
        .activities
        .join_visit(visit.id(), &friend.id)
        .await
        .unwrap());
    assert!(!repos
        .activities
        .join_visit(visit.id(), &friend.id)
        .await
        .unwrap());

    match repos.activities.get(visit.id()).await.unwrap() {
        chalkline::models::ActivityItem::Visit(v) => {
            assert_eq!(v.attendees, vec![author.id.clone(), friend.id.clone()]);
        }
        other => panic!("expected visit, got {:?}", other.kind()),
    }

    assert!(repos
        .activities
        .leave_visit(visit.id(), &friend.id)
        .await
        .unwrap());
    assert!(!repos
        .activities
        .leave_visit(visit.id(), &friend.id)
        .await
        .unwrap());

    // Joining a non-visit item is rejected.
    let post = repos
        .activities
        .create_basic(&author, "not a visit", vec![])
        .await
        .unwrap();
    assert!(matches!(
        repos.activities.join_visit(post.id(), &friend.id).await,
        Err(chalkline::AppError::InvalidState(_))
    ));
}
