use crate::helpers::{login_admin, login_as, no_cb, spawn_app};
use admin_shared::{errors::AdminError, req_args::LoginReqArgs, session::SessionKey};
use serde_json::json;

#[tokio::test]
async fn login_success_stores_session() {
    // Arrange
    let app = spawn_app().await;
    assert!(!app.core_client.is_logged_in());

    // Act
    let response = login_admin(&app).await;

    // Assert
    let session = app.core_client.session();
    assert_eq!(response.username, app.admin_user.username);
    assert_eq!(response.role, "admin");
    assert_eq!(session.get(SessionKey::Token), Some(response.token.clone()));
    assert_eq!(session.get(SessionKey::UserId), Some(app.admin_user.id_text()));
    assert_eq!(
        session.get(SessionKey::Username).as_deref(),
        Some(app.admin_user.username.as_str())
    );
    assert_eq!(session.get(SessionKey::Role).as_deref(), Some("admin"));
    assert!(app.core_client.is_logged_in());
}

#[tokio::test]
async fn login_then_permissions_follow_role() {
    // Arrange
    let app = spawn_app().await;

    // Act
    login_admin(&app).await;
    let permissions = app.core_client.get_permissions().unwrap();

    // Assert
    assert_eq!(permissions.names(), ["admin", "users", "limited"]);
}

#[tokio::test]
async fn login_sends_credentials_only() {
    // Arrange
    let app = spawn_app().await;

    // Act
    login_as(&app, &app.test_user).await.unwrap();

    // Assert
    let request = app.backend.last_request().unwrap();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/auth/login");
    assert_eq!(request.authorization, None);
    assert_eq!(
        request.body,
        Some(json!({
            "username": app.test_user.username,
            "password": app.test_user.password,
        }))
    );
}

#[tokio::test]
async fn login_failure_invalid_password() {
    // Arrange
    let app = spawn_app().await;
    let login_args = app
        .test_user
        .login_args()
        .password("random-password".to_string().into());

    // Act
    let outcome = app.core_client.login(login_args, no_cb).await.unwrap();

    // Assert
    assert!(
        matches!(&outcome, Err(AdminError::Authentication(msg)) if msg == "Invalid username or password"),
        "{outcome:?}"
    );
    assert!(app.core_client.session().is_empty());
}

#[tokio::test]
async fn login_failure_invalid_user() {
    // Arrange
    let app = spawn_app().await;
    let login_args = LoginReqArgs::new("random-username", "random-password".to_string().into());

    // Act
    let outcome = app.core_client.login(login_args, no_cb).await.unwrap();

    // Assert
    assert_eq!(
        outcome.unwrap_err().to_string(),
        "Invalid username or password"
    );
}

#[tokio::test]
async fn failed_login_keeps_existing_session() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;
    let before = app.core_client.session().session();
    let login_args = app
        .test_user
        .login_args()
        .password("random-password".to_string().into());

    // Act
    let outcome = app.core_client.login(login_args, no_cb).await.unwrap();

    // Assert
    assert!(outcome.is_err());
    assert_eq!(app.core_client.session().session(), before);
}

#[tokio::test]
async fn login_replaces_previous_session() {
    // Arrange
    let app = spawn_app().await;
    login_as(&app, &app.test_user).await.unwrap();

    // Act
    login_admin(&app).await;

    // Assert
    let identity = app.core_client.get_identity().unwrap();
    assert_eq!(identity.full_name, app.admin_user.username);
    assert_eq!(identity.role.as_deref(), Some("admin"));
}

#[tokio::test]
async fn transport_failure_is_reported() {
    // Arrange
    let app = spawn_app().await;
    app.core_client
        .set_server_address("http://127.0.0.1:1/api".to_string());

    // Act
    let outcome = login_as(&app, &app.test_user).await;

    // Assert
    assert!(matches!(outcome, Err(AdminError::Transport(_))), "{outcome:?}");
    assert!(app.core_client.session().is_empty());
}

#[tokio::test]
async fn ui_notify_called_once_result_ready() {
    // Arrange
    let app = spawn_app().await;
    let (notify_tx, notify_rx) = std::sync::mpsc::channel();

    // Act
    let rx = app
        .core_client
        .login(app.test_user.login_args(), move || {
            notify_tx.send(()).unwrap();
        });
    let outcome = rx.await.unwrap();

    // Assert
    assert!(outcome.is_ok());
    assert!(notify_rx.try_recv().is_ok());
}
