use crate::helpers::{login_admin, no_cb, spawn_app, TestApp};
use admin_client_core::{RestStrategy, StrategyTable};
use admin_shared::{
    errors::AdminError,
    id::RecordId,
    resource::{ListParams, ReferenceParams, Sort, SortOrder},
};
use serde_json::{json, Value};

fn seed_posts(app: &TestApp) -> Vec<RecordId> {
    app.backend
        .seed_records(
            "posts",
            vec![
                json!({"title": "first", "author": "amy", "views": 5}),
                json!({"title": "second", "author": "bob", "views": 1}),
                json!({"title": "third", "author": "amy", "views": 9}),
            ],
        )
        .iter()
        .map(id_of)
        .collect()
}

fn id_of(record: &Value) -> RecordId {
    record["id"].as_u64().expect("seeded records have numeric ids").into()
}

fn titles(records: &[Value]) -> Vec<&str> {
    records
        .iter()
        .map(|r| r["title"].as_str().unwrap_or_default())
        .collect()
}

#[tokio::test]
async fn get_list_filters_sorts_and_counts() {
    // Arrange
    let app = spawn_app().await;
    seed_posts(&app);
    let params = ListParams::new(1, 10)
        .sort(Sort::new("views", SortOrder::Desc))
        .filter("author", "amy");

    // Act
    let list = app
        .core_client
        .get_list("posts", params, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(titles(&list.data), ["third", "first"]);
    assert_eq!(list.total, 2);
    let request = app.backend.last_request().unwrap();
    assert_eq!(request.path, "/api/posts");
    assert_eq!(request.query_values("sort"), ["views"]);
    assert_eq!(request.query_values("order"), ["DESC"]);
    assert_eq!(request.authorization, None);
}

#[tokio::test]
async fn get_list_total_comes_from_header() {
    // Arrange
    let app = spawn_app().await;
    seed_posts(&app);

    // Act
    let list = app
        .core_client
        .get_list("posts", ListParams::new(2, 2), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(titles(&list.data), ["third"]);
    assert_eq!(list.total, 3);
}

#[tokio::test]
async fn get_list_of_empty_resource() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let list = app
        .core_client
        .get_list("tags", ListParams::default(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert!(list.data.is_empty());
    assert_eq!(list.total, 0);
}

#[tokio::test]
async fn get_one_and_missing_record() {
    // Arrange
    let app = spawn_app().await;
    let ids = seed_posts(&app);

    // Act
    let found = app
        .core_client
        .get_one("posts", ids[1].clone(), no_cb)
        .await
        .unwrap()
        .unwrap();
    let missing = app
        .core_client
        .get_one("posts", "999".into(), no_cb)
        .await
        .unwrap();

    // Assert
    assert_eq!(found.data["title"], "second");
    assert!(
        matches!(&missing, Err(AdminError::Http { message, .. }) if message == "Record not found"),
        "{missing:?}"
    );
}

#[tokio::test]
async fn get_many_by_ids() {
    // Arrange
    let app = spawn_app().await;
    let ids = seed_posts(&app);

    // Act
    let many = app
        .core_client
        .get_many("posts", vec![ids[0].clone(), ids[2].clone()], no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(titles(&many.data), ["first", "third"]);
    let request = app.backend.last_request().unwrap();
    assert_eq!(
        request.query_values("id"),
        [ids[0].as_str(), ids[2].as_str()]
    );
}

#[tokio::test]
async fn get_many_reference_by_target() {
    // Arrange
    let app = spawn_app().await;
    let ids = seed_posts(&app);
    let post_id = ids[0].to_string().parse::<u64>().unwrap();
    app.backend.seed_records(
        "comments",
        vec![
            json!({"title": "c1", "post_id": post_id}),
            json!({"title": "c2", "post_id": post_id + 100}),
            json!({"title": "c3", "post_id": post_id}),
        ],
    );
    let params = ReferenceParams::new("post_id", ids[0].clone())
        .pagination(1, 10)
        .sort(Sort::new("title", SortOrder::Asc));

    // Act
    let list = app
        .core_client
        .get_many_reference("comments", params, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(titles(&list.data), ["c1", "c3"]);
    assert_eq!(list.total, 2);
}

#[tokio::test]
async fn create_merges_assigned_id() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let created = app
        .core_client
        .create("posts", json!({"title": "new"}), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let stored = app.backend.records("posts");
    assert_eq!(stored.len(), 1);
    assert_eq!(created.data, json!({"title": "new", "id": stored[0]["id"]}));
}

#[tokio::test]
async fn update_returns_server_record() {
    // Arrange
    let app = spawn_app().await;
    let ids = seed_posts(&app);

    // Act
    let updated = app
        .core_client
        .update(
            "posts",
            ids[0].clone(),
            json!({"views": 6}),
            json!({"title": "first", "views": 5}),
            no_cb,
        )
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(updated.data["title"], "first");
    assert_eq!(updated.data["views"], 6);
    assert_eq!(app.backend.last_request().unwrap().method, "PUT");
}

#[tokio::test]
async fn update_many_uses_id_filter() {
    // Arrange
    let app = spawn_app().await;
    let ids = seed_posts(&app);

    // Act
    let updated = app
        .core_client
        .update_many(
            "posts",
            vec![ids[0].clone(), ids[1].clone()],
            json!({"author": "zed"}),
            no_cb,
        )
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(updated.data.len(), 2);
    let authors: Vec<_> = app
        .backend
        .records("posts")
        .iter()
        .map(|r| r["author"].clone())
        .collect();
    assert_eq!(authors, [json!("zed"), json!("zed"), json!("amy")]);
    let request = app.backend.last_request().unwrap();
    let filter: Value = serde_json::from_str(request.query_values("filter")[0]).unwrap();
    assert_eq!(filter, json!({"id": [ids[0], ids[1]]}));
}

#[tokio::test]
async fn delete_and_delete_many() {
    // Arrange
    let app = spawn_app().await;
    let ids = seed_posts(&app);

    // Act
    let deleted = app
        .core_client
        .delete("posts", ids[0].clone(), json!({}), no_cb)
        .await
        .unwrap()
        .unwrap();
    let deleted_many = app
        .core_client
        .delete_many("posts", vec![ids[1].clone(), ids[2].clone()], no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(deleted.data["title"], "first");
    assert_eq!(titles(&deleted_many.data), ["second", "third"]);
    assert!(app.backend.records("posts").is_empty());
}

#[tokio::test]
async fn generic_requests_are_sent_without_token() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;

    // Act
    app.core_client
        .get_list("posts", ListParams::default(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(app.backend.last_request().unwrap().authorization, None);
}

#[tokio::test]
async fn registered_strategy_attaches_token() {
    // Arrange
    let app = spawn_app().await;
    let auth = login_admin(&app).await;
    let client = app
        .core_client
        .clone()
        .with_strategies(StrategyTable::default().register("posts", RestStrategy::with_bearer()));

    // Act
    client
        .get_list("posts", ListParams::default(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(
        app.backend.last_request().unwrap().authorization,
        Some(format!("Bearer {}", auth.token))
    );
}
