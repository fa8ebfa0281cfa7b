// SPDX-License-Identifier: MIT

//! Daily gym-visit roster integration tests.
//!
//! These tests require the Firestore emulator to be running.

mod common;
use common::{seed_gym, seed_user, test_repos};

use chalkline::time_utils::day_key;
use chrono::Utc;

#[tokio::test]
async fn test_check_in_is_idempotent_per_day() {
    require_emulator!();
    let repos = test_repos().await;
    let alice = seed_user(&repos, "roster-alice").await;
    let gym = seed_gym(&repos, "roster-gym").await;

    let now = Utc::now();
    assert!(repos
        .visits
        .check_in(&gym.id, &alice.id, now, None)
        .await
        .unwrap());
    // Second check-in on the same day changes nothing.
    assert!(!repos
        .visits
        .check_in(&gym.id, &alice.id, now, None)
        .await
        .unwrap());

    let visitors = repos
        .visits
        .visitors_for_day(&gym.id, &day_key(now))
        .await
        .unwrap();
    assert_eq!(visitors.len(), 1);
    assert_eq!(visitors[0].user.id, alice.id);
}

#[tokio::test]
async fn test_last_visitor_removal_deletes_roster() {
    require_emulator!();
    let repos = test_repos().await;
    let alice = seed_user(&repos, "last-alice").await;
    let bob = seed_user(&repos, "last-bob").await;
    let gym = seed_gym(&repos, "last-gym").await;

    let now = Utc::now();
    let day = day_key(now);
    repos
        .visits
        .check_in(&gym.id, &alice.id, now, None)
        .await
        .unwrap();
    repos
        .visits
        .check_in(&gym.id, &bob.id, now, None)
        .await
        .unwrap();

    assert!(repos
        .visits
        .remove_visitor(&gym.id, &day, &alice.id)
        .await
        .unwrap());
    assert_eq!(
        repos.visits.visitors_for_day(&gym.id, &day).await.unwrap().len(),
        1
    );

    assert!(repos
        .visits
        .remove_visitor(&gym.id, &day, &bob.id)
        .await
        .unwrap());
    assert!(repos
        .visits
        .visitors_for_day(&gym.id, &day)
        .await
        .unwrap()
        .is_empty());

    // Removing from a now-absent roster is a no-op.
    assert!(!repos
        .visits
        .remove_visitor(&gym.id, &day, &bob.id)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_friends_visits_today_filters_to_follow_set() {
    require_emulator!();
    let repos = test_repos().await;
    let viewer = seed_user(&repos, "fvt-viewer").await;
    let friend = seed_user(&repos, "fvt-friend").await;
    let stranger = seed_user(&repos, "fvt-stranger").await;
    let gym = seed_gym(&repos, "fvt-gym").await;

    repos
        .relationships
        .follow(&viewer.id, &friend.id)
        .await
        .unwrap();

    let now = Utc::now();
    repos
        .visits
        .check_in(&gym.id, &friend.id, now, None)
        .await
        .unwrap();
    repos
        .visits
        .check_in(&gym.id, &stranger.id, now, None)
        .await
        .unwrap();

    let groups = repos.feed.friends_visits_today(&viewer.id).await.unwrap();
    let group = groups
        .iter()
        .find(|g| g.gym.id == gym.id)
        .expect("friend's gym should appear");
    assert_eq!(group.visitors.len(), 1, "strangers must be filtered out");
    assert_eq!(group.visitors[0].user.id, friend.id);
}
