use std::{cell::Cell, sync::Arc};

use follow_graph::{
    repositories::memory::InMemoryStore,
    services::{follow_service::FollowService, user_service::UserService},
    utils::{api_errors::ApiError, password::PasswordHasher, range::ListRange},
};
use rstest::{fixture, rstest};
use uuid::Uuid;

struct Services {
    users: UserService,
    follows: FollowService,
}

impl Services {
    async fn create(&self, username: &str) -> Uuid {
        self.users
            .create(username, Some("password"))
            .await
            .unwrap()
            .id
    }
}

#[fixture]
fn services() -> Services {
    let store = Arc::new(InMemoryStore::new());
    let follows = FollowService::new(store.clone(), store.clone());
    let hasher = PasswordHasher::with_costs(64, 1, 1).unwrap();
    let users = UserService::with_hasher(store, follows.clone(), hasher);
    Services { users, follows }
}

// .follow() and .unfollow()

#[rstest]
#[tokio::test]
async fn allows_a_user_to_follow_another_user(services: Services) {
    let uid = services.create("user1").await;
    let followuid = services.create("user2").await;

    services.follows.follow(uid, followuid).await.unwrap();

    assert!(services.follows.is_following(uid, followuid).await.unwrap());
    assert!(!services.follows.is_following(followuid, uid).await.unwrap());
}

#[rstest]
#[tokio::test]
async fn does_not_allow_following_yourself(services: Services) {
    let uid = services.create("user1").await;

    let err = services.follows.follow(uid, uid).await.unwrap_err();

    assert!(matches!(err, ApiError::SelfFollow));
    assert_eq!(err.to_string(), "[[error:you-cant-follow-yourself]]");
}

#[rstest]
#[tokio::test]
async fn does_not_allow_following_a_missing_user(services: Services) {
    let uid = services.create("user1").await;

    let err = services.follows.follow(uid, Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.to_string(), "[[error:no-user]]");

    let err = services.follows.follow(Uuid::new_v4(), uid).await.unwrap_err();
    assert!(matches!(err, ApiError::NoUser));

    assert!(services
        .follows
        .get_followers(uid, ListRange::ALL)
        .await
        .unwrap()
        .is_empty());
}

#[rstest]
#[tokio::test]
async fn does_not_allow_following_twice(services: Services) {
    let uid = services.create("user1").await;
    let followuid = services.create("user2").await;

    services.follows.follow(uid, followuid).await.unwrap();
    let err = services.follows.follow(uid, followuid).await.unwrap_err();

    assert!(matches!(err, ApiError::AlreadyFollowing));
    assert_eq!(err.to_string(), "[[error:already-following]]");
    assert_eq!(
        services
            .follows
            .get_following(uid, ListRange::ALL)
            .await
            .unwrap(),
        vec![followuid]
    );
}

#[rstest]
#[tokio::test]
async fn rejects_nil_ids(services: Services) {
    let uid = services.create("user1").await;

    let err = services.follows.follow(uid, Uuid::nil()).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidUid));
    assert!(!services.follows.is_following(Uuid::nil(), uid).await.unwrap());
    assert!(services
        .follows
        .get_following(Uuid::nil(), ListRange::ALL)
        .await
        .unwrap()
        .is_empty());
}

#[rstest]
#[tokio::test]
async fn allows_a_user_to_unfollow_another_user(services: Services) {
    let uid = services.create("user1").await;
    let followuid = services.create("user2").await;

    services.follows.follow(uid, followuid).await.unwrap();
    let removed = services.follows.unfollow(uid, followuid).await.unwrap();

    assert!(removed);
    assert!(!services.follows.is_following(uid, followuid).await.unwrap());
}

#[rstest]
#[tokio::test]
async fn unfollowing_without_an_edge_is_a_no_op(services: Services) {
    let uid = services.create("user1").await;
    let followuid = services.create("user2").await;

    let removed = services.follows.unfollow(uid, followuid).await.unwrap();

    assert!(!removed);
    assert!(!services.follows.is_following(uid, followuid).await.unwrap());
}

#[rstest]
#[tokio::test]
async fn can_follow_again_after_unfollowing(services: Services) {
    let uid = services.create("user1").await;
    let followuid = services.create("user2").await;

    services.follows.follow(uid, followuid).await.unwrap();
    services.follows.unfollow(uid, followuid).await.unwrap();
    services.follows.follow(uid, followuid).await.unwrap();

    assert!(services.follows.is_following(uid, followuid).await.unwrap());
}

#[rstest]
#[tokio::test]
async fn concurrent_duplicate_follows_succeed_once(services: Services) {
    let uid = services.create("user1").await;
    let followuid = services.create("user2").await;

    let (first, second) = tokio::join!(
        services.follows.follow(uid, followuid),
        services.follows.follow(uid, followuid)
    );

    assert_eq!(
        [first.is_ok(), second.is_ok()].iter().filter(|ok| **ok).count(),
        1
    );
    assert_eq!(services.follows.follow_stats(uid).await.unwrap().following_count, 1);
}

// Following and followers

#[rstest]
#[tokio::test]
async fn returns_the_users_a_user_is_following(services: Services) {
    let uid = services.create("user1").await;
    let followuid1 = services.create("user2").await;
    let followuid2 = services.create("user3").await;

    services.follows.follow(uid, followuid1).await.unwrap();
    services.follows.follow(uid, followuid2).await.unwrap();
    let following = services
        .follows
        .get_following(uid, ListRange::new(0, -1))
        .await
        .unwrap();

    assert_eq!(following.len(), 2);
    assert!(following.contains(&followuid1));
    assert!(following.contains(&followuid2));
}

#[rstest]
#[tokio::test]
async fn returns_the_followers_of_a_user(services: Services) {
    let uid = services.create("user1").await;
    let followuid1 = services.create("user2").await;
    let followuid2 = services.create("user3").await;

    services.follows.follow(followuid1, uid).await.unwrap();
    services.follows.follow(followuid2, uid).await.unwrap();
    let followers = services
        .follows
        .get_followers(uid, ListRange::new(0, -1))
        .await
        .unwrap();

    assert_eq!(followers.len(), 2);
    assert!(followers.contains(&followuid1));
    assert!(followers.contains(&followuid2));
}

#[rstest]
#[tokio::test]
async fn fresh_users_have_empty_lists(services: Services) {
    let uid = services.create("user1").await;

    assert!(services
        .follows
        .get_following(uid, ListRange::ALL)
        .await
        .unwrap()
        .is_empty());
    assert!(services
        .follows
        .get_followers(uid, ListRange::ALL)
        .await
        .unwrap()
        .is_empty());
}

#[rstest]
#[tokio::test]
async fn pages_are_contiguous_slices(services: Services) {
    let uid = services.create("user1").await;
    let mut followed = Vec::new();
    for i in 0..5 {
        let id = services.create(&format!("followed{}", i)).await;
        services.follows.follow(uid, id).await.unwrap();
        followed.push(id);
    }

    let all = services
        .follows
        .get_following(uid, ListRange::ALL)
        .await
        .unwrap();
    let first = services
        .follows
        .get_following(uid, ListRange::new(0, 1))
        .await
        .unwrap();
    let rest = services
        .follows
        .get_following(uid, ListRange::new(2, -1))
        .await
        .unwrap();

    assert_eq!(all.len(), 5);
    assert_eq!(first, all[0..2].to_vec());
    assert_eq!(rest, all[2..].to_vec());
    for id in &followed {
        assert!(all.contains(id));
    }
}

#[rstest]
#[tokio::test]
async fn stats_track_the_edge_set(services: Services) {
    let uid = services.create("user1").await;
    let followuid1 = services.create("user2").await;
    let followuid2 = services.create("user3").await;

    services.follows.follow(uid, followuid1).await.unwrap();
    services.follows.follow(uid, followuid2).await.unwrap();
    services.follows.follow(followuid1, uid).await.unwrap();
    services.follows.unfollow(uid, followuid2).await.unwrap();

    let stats = services.follows.follow_stats(uid).await.unwrap();
    assert_eq!(stats.following_count, 1);
    assert_eq!(stats.follower_count, 1);

    let user = services.users.get_user(followuid1).await.unwrap().unwrap();
    assert_eq!(user.following_count, 1);
    assert_eq!(user.follower_count, 1);
}

// Users

#[rstest]
#[tokio::test]
async fn rejects_duplicate_and_invalid_usernames(services: Services) {
    services.create("user1").await;

    let err = services.users.create("user1", None).await.unwrap_err();
    assert!(matches!(err, ApiError::UsernameTaken));

    let err = services.users.create(" ", None).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidUsername));

    let err = services
        .users
        .create(&"x".repeat(25), None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidUsername));
}

#[rstest]
#[tokio::test]
async fn stores_password_hashes(services: Services) {
    services.create("user1").await;

    assert!(services
        .users
        .verify_password("user1", "password")
        .await
        .unwrap());
    assert!(!services.users.verify_password("user1", "nope").await.unwrap());
    assert!(!services
        .users
        .verify_password("missing", "password")
        .await
        .unwrap());
}

#[rstest]
#[tokio::test]
async fn get_users_keeps_the_requested_order(services: Services) {
    let a = services.create("user1").await;
    let b = services.create("user2").await;

    let users = services
        .users
        .get_users(&[b, Uuid::new_v4(), a])
        .await
        .unwrap();

    assert_eq!(
        users.iter().map(|u| u.id).collect::<Vec<_>>(),
        vec![b, a]
    );
}

#[rstest]
#[tokio::test]
async fn get_users_reports_counts_for_each_user(services: Services) {
    let uid = services.create("user1").await;
    let followuid1 = services.create("user2").await;
    let followuid2 = services.create("user3").await;

    services.follows.follow(uid, followuid1).await.unwrap();
    services.follows.follow(uid, followuid2).await.unwrap();
    services.follows.follow(followuid1, uid).await.unwrap();

    let users = services
        .users
        .get_users(&[uid, followuid1, followuid2])
        .await
        .unwrap();

    let counts: Vec<(i64, i64)> = users
        .iter()
        .map(|u| (u.following_count, u.follower_count))
        .collect();
    assert_eq!(counts, vec![(2, 1), (1, 1), (0, 1)]);
}

#[rstest]
#[tokio::test]
async fn verify_password_trims_the_username(services: Services) {
    services
        .users
        .create(" user1 ", Some("password"))
        .await
        .unwrap();

    assert!(services
        .users
        .verify_password(" user1 ", "password")
        .await
        .unwrap());
    assert!(services
        .users
        .verify_password("user1", "password")
        .await
        .unwrap());
}

#[rstest]
#[tokio::test]
async fn hashing_does_not_hold_the_runtime_thread(services: Services) {
    let done = Cell::new(false);

    let create = async {
        let user = services.users.create("user1", Some("password")).await;
        done.set(true);
        user
    };
    let ticker = async {
        let mut ticks = 0;
        while !done.get() {
            ticks += 1;
            tokio::task::yield_now().await;
        }
        ticks
    };
    let (user, ticks) = tokio::join!(create, ticker);

    user.unwrap();
    assert!(ticks > 0);
}
