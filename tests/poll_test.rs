mod integration_db;

use chrono::{Duration, Utc};
use integration_db::IntegrationTestDb;
use poll_server::db::{self, poll::PollId};
use poll_server::error::PollError;
use poll_server::services::{
    poll::{self, CreatePoll},
    vote,
};

#[actix_rt::test]
async fn test_create_poll_keeps_option_order() {
    let test_db = IntegrationTestDb::new().await;
    let admin = test_db.admin().await;

    let created = test_db
        .poll(&admin, "  Best color? ", &["Red ", "", " Blue", "Green"], None, true)
        .await;
    assert_eq!(created.poll.question, "Best color?");
    assert!(created.poll.active);
    assert_eq!(created.poll.expiry, None);

    let fetched = poll::poll_with_options(&test_db.pool(), created.poll.id)
        .await
        .unwrap();
    let texts: Vec<&str> = fetched.options.iter().map(|o| o.text.as_str()).collect();
    assert_eq!(texts, vec!["Red", "Blue", "Green"]);
    assert_eq!(fetched.poll, created.poll);
    assert!(fetched.options.iter().all(|o| o.poll_id == created.poll.id));
}

#[actix_rt::test]
async fn test_invalid_poll_writes_nothing() {
    let test_db = IntegrationTestDb::new().await;
    let admin = test_db.admin().await;

    let request = CreatePoll {
        question: "Best color?".to_owned(),
        options: vec!["Red".to_owned(), "   ".to_owned()],
        expiry: None,
        active: true,
    };
    let result = poll::create_poll(&test_db.pool(), &admin, request, Utc::now()).await;
    assert!(matches!(result, Err(PollError::Validation(_))));

    let request = CreatePoll {
        question: "  ".to_owned(),
        options: vec!["Red".to_owned(), "Blue".to_owned()],
        ..Default::default()
    };
    let result = poll::create_poll(&test_db.pool(), &admin, request, Utc::now()).await;
    assert!(matches!(result, Err(PollError::Validation(_))));

    assert_eq!(test_db.count("polls").await, 0);
    assert_eq!(test_db.count("options").await, 0);
}

#[actix_rt::test]
async fn test_failed_option_insert_rolls_back_poll() {
    let test_db = IntegrationTestDb::new().await;
    let admin = test_db.admin().await;
    sqlx::query(
        r#"
        CREATE TRIGGER reject_options BEFORE INSERT ON options
        BEGIN SELECT RAISE(ABORT, 'options are read only'); END;
        "#,
    )
    .execute(&test_db.pool())
    .await
    .unwrap();

    let request = CreatePoll {
        question: "Best color?".to_owned(),
        options: vec!["Red".to_owned(), "Blue".to_owned()],
        expiry: None,
        active: true,
    };
    let result = poll::create_poll(&test_db.pool(), &admin, request, Utc::now()).await;
    assert!(matches!(result, Err(PollError::Storage(_))));
    assert_eq!(test_db.count("polls").await, 0);
}

#[actix_rt::test]
async fn test_list_polls_newest_first() {
    let test_db = IntegrationTestDb::new().await;
    let admin = test_db.admin().await;

    let first = test_db.poll(&admin, "First?", &["a", "b"], None, true).await;
    let second = test_db.poll(&admin, "Second?", &["a", "b"], None, false).await;
    let third = test_db.poll(&admin, "Third?", &["a", "b"], None, true).await;

    let all = poll::list_polls(&test_db.pool(), &admin, false).await.unwrap();
    let ids: Vec<PollId> = all.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![third.poll.id, second.poll.id, first.poll.id]);

    let active = poll::list_polls(&test_db.pool(), &admin, true).await.unwrap();
    let ids: Vec<PollId> = active.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![third.poll.id, first.poll.id]);
}

#[actix_rt::test]
async fn test_open_polls_skip_expired_and_inactive() {
    let test_db = IntegrationTestDb::new().await;
    let admin = test_db.admin().await;
    let now = Utc::now();

    let open = test_db
        .poll(&admin, "Open?", &["a", "b"], Some(now + Duration::days(1)), true)
        .await;
    test_db
        .poll(&admin, "Expired?", &["a", "b"], Some(now - Duration::days(1)), true)
        .await;
    test_db.poll(&admin, "Inactive?", &["a", "b"], None, false).await;

    let polls = poll::list_open_polls(&test_db.pool(), now).await.unwrap();
    assert_eq!(polls.len(), 1);
    assert_eq!(polls[0].id, open.poll.id);
}

#[actix_rt::test]
async fn test_toggle_active() {
    let test_db = IntegrationTestDb::new().await;
    let admin = test_db.admin().await;
    let created = test_db.poll(&admin, "Best color?", &["Red", "Blue"], None, true).await;

    let toggled = poll::toggle_active(&test_db.pool(), &admin, created.poll.id)
        .await
        .unwrap();
    assert!(!toggled.active);
    let toggled = poll::toggle_active(&test_db.pool(), &admin, created.poll.id)
        .await
        .unwrap();
    assert!(toggled.active);

    let missing = poll::toggle_active(&test_db.pool(), &admin, PollId::new()).await;
    assert!(matches!(missing, Err(PollError::NotFound("poll"))));
}

#[actix_rt::test]
async fn test_delete_poll_cascades() {
    let test_db = IntegrationTestDb::new().await;
    let admin = test_db.admin().await;
    let user = test_db.user("kari").await;
    let kept = test_db.poll(&admin, "Kept?", &["a", "b"], None, true).await;
    let doomed = test_db.poll(&admin, "Doomed?", &["a", "b"], None, true).await;

    vote::cast_vote(&test_db.pool(), user.id, doomed.poll.id, doomed.options[0].id, Utc::now())
        .await
        .unwrap();
    vote::cast_vote(&test_db.pool(), user.id, kept.poll.id, kept.options[1].id, Utc::now())
        .await
        .unwrap();

    poll::delete_poll(&test_db.pool(), &admin, doomed.poll.id)
        .await
        .unwrap();

    let fetched = poll::poll_with_options(&test_db.pool(), doomed.poll.id).await;
    assert!(matches!(fetched, Err(PollError::NotFound("poll"))));
    let options = db::option::options_for_poll(&test_db.pool(), doomed.poll.id)
        .await
        .unwrap();
    assert!(options.is_empty());
    assert_eq!(
        db::vote::count_for_poll(&test_db.pool(), doomed.poll.id).await.unwrap(),
        0
    );

    // The other poll is untouched
    assert_eq!(test_db.count("options").await, 2);
    assert_eq!(test_db.count("votes").await, 1);

    let again = poll::delete_poll(&test_db.pool(), &admin, doomed.poll.id).await;
    assert!(matches!(again, Err(PollError::NotFound("poll"))));
}
