use crate::helpers::{login_admin, no_cb, spawn_app, TestUser};
use admin_shared::{
    errors::AdminError,
    id::RecordId,
    req_args::RegisterReqArgs,
    resource::ListParams,
    uac::UserRecord,
};
use serde_json::json;

#[tokio::test]
async fn list_total_is_page_length() {
    // Arrange
    let app = spawn_app().await;
    app.backend
        .add_user("third", "third@example.com", "password", "Manager");
    login_admin(&app).await;

    // Act
    let list = app
        .core_client
        .get_list("users", ListParams::new(1, 50), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(list.total, 3);
    let users: Vec<UserRecord> = list.records().unwrap();
    let roles: Vec<_> = users.iter().map(|u| u.role.to_string()).collect();
    assert_eq!(roles, ["user", "admin", "manager"]);
}

#[tokio::test]
async fn list_total_does_not_count_other_pages() {
    // Arrange
    let app = spawn_app().await;
    app.backend
        .add_user("third", "third@example.com", "password", "Manager");
    login_admin(&app).await;

    // Act
    let list = app
        .core_client
        .get_list("users", ListParams::new(1, 2), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(list.data.len(), 2);
    assert_eq!(list.total, 2);
    let request = app.backend.last_request().unwrap();
    assert_eq!(request.path, "/api/auth/users");
    assert_eq!(request.query_values("pageNumber"), ["1"]);
    assert_eq!(request.query_values("pageSize"), ["2"]);
}

#[tokio::test]
async fn get_one_normalizes_backend_user() {
    // Arrange
    let app = spawn_app().await;
    let id = app
        .backend
        .add_user("snapshot-user", "snap@example.com", "password", "Manager");
    login_admin(&app).await;

    // Act
    let user = app
        .core_client
        .get_user(id.into(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    insta::assert_json_snapshot!(user, @r###"
    {
      "id": "3",
      "username": "snapshot-user",
      "email": "snap@example.com",
      "role": "manager"
    }
    "###);
}

#[tokio::test]
async fn get_one_unknown_user_is_backend_error() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;

    // Act
    let outcome = app
        .core_client
        .get_user("404".into(), no_cb)
        .await
        .unwrap();

    // Assert
    assert!(
        matches!(&outcome, Err(AdminError::Backend(msg)) if msg == "User not found"),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn update_round_trip_sends_backend_field_names() {
    // Arrange
    let app = spawn_app().await;
    let auth = login_admin(&app).await;
    let original = app
        .core_client
        .get_user(app.test_user.id_text().into(), no_cb)
        .await
        .unwrap()
        .unwrap();
    let mut changed = original.clone();
    changed.email = "changed@example.com".to_string();
    changed.role = "manager".into();

    // Act
    let updated = app
        .core_client
        .update_user(&changed, &original, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(updated, changed);
    let request = app.backend.last_request().unwrap();
    assert_eq!(request.method, "PUT");
    assert_eq!(request.path, format!("/api/auth/user/{}", original.id));
    assert_eq!(request.authorization, Some(format!("Bearer {}", auth.token)));
    assert_eq!(
        request.body,
        Some(json!({
            "UserName": original.username,
            "Email": "changed@example.com",
            "Role": "manager",
        }))
    );
    let stored = app.backend.user(app.test_user.id.unwrap()).unwrap();
    assert_eq!(stored.email, "changed@example.com");
    assert_eq!(stored.roles, ["Manager"]);
}

#[tokio::test]
async fn update_returns_caller_data_unchanged() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;
    let id: RecordId = app.test_user.id_text().into();
    let data = json!({
        "id": id,
        "username": app.test_user.username,
        "email": app.test_user.email,
        "role": "user",
        "note": "kept as is",
    });

    // Act
    let record = app
        .core_client
        .update("users", id, data.clone(), json!({}), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(record.data, data);
}

#[tokio::test]
async fn create_user_with_session_token() {
    // Arrange
    let app = spawn_app().await;
    let auth = login_admin(&app).await;
    let new_user = TestUser::generate("created", "User");
    let args = RegisterReqArgs::new(
        new_user.username.clone(),
        new_user.email.clone(),
        new_user.password.clone().into(),
    );

    // Act
    let created = app
        .core_client
        .create_user(args, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let stored = app.backend.user_by_name(&new_user.username).unwrap();
    assert_eq!(
        created,
        UserRecord {
            id: stored.id.into(),
            username: new_user.username,
            email: new_user.email,
            role: "user".into(),
        }
    );
    let request = app.backend.last_request().unwrap();
    assert_eq!(request.path, "/api/auth/register");
    assert_eq!(request.authorization, Some(format!("Bearer {}", auth.token)));
}

#[tokio::test]
async fn generic_create_sends_default_role() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;
    let new_user = TestUser::generate("plain", "User");
    let data = json!({
        "username": new_user.username,
        "email": new_user.email,
        "password": new_user.password,
    });

    // Act
    let created = app
        .core_client
        .create("users", data, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let request = app.backend.last_request().unwrap();
    assert_eq!(request.body.unwrap()["role"], "user");
    assert_eq!(created.data["role"], "user");
    let stored = app.backend.user_by_name(&new_user.username).unwrap();
    assert_eq!(stored.roles, ["User"]);
}

#[tokio::test]
async fn create_duplicate_user_fails() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;

    // Act
    let outcome = app
        .core_client
        .create_user(app.test_user.register_args(), no_cb)
        .await
        .unwrap();

    // Assert
    assert!(
        matches!(&outcome, Err(AdminError::Http { message, .. }) if message == "Username is already taken"),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn delete_returns_previous_record() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;
    let user = app
        .core_client
        .get_user(app.test_user.id_text().into(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Act
    let deleted = app
        .core_client
        .delete_user(&user, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(deleted, user);
    assert!(app.backend.user(app.test_user.id.unwrap()).is_none());
    assert_eq!(app.backend.last_request().unwrap().method, "DELETE");
}

#[tokio::test]
async fn users_endpoints_without_login_are_rejected() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let error = app
        .core_client
        .get_list("users", ListParams::default(), no_cb)
        .await
        .unwrap()
        .unwrap_err();

    // Assert
    let request = app.backend.last_request().unwrap();
    assert_eq!(request.authorization, None);
    assert!(error.is_auth_rejection(), "{error:?}");
    assert!(app.core_client.check_error(&error).is_err());
}
