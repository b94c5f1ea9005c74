use crate::helpers::{login_as, no_cb, spawn_app, TestUser};
use admin_shared::{
    errors::{AdminError, ValidationError},
    req_args::RegisterReqArgs,
};
use serde_json::json;

#[tokio::test]
async fn register_success_then_login() {
    // Arrange
    let app = spawn_app().await;
    let mut new_user = TestUser::generate("new", "Manager");

    // Act
    let response = app
        .core_client
        .register(new_user.register_args(), no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert!(response.is_success);
    let stored = app.backend.user_by_name(&new_user.username).unwrap();
    assert_eq!(response.id.map(String::from), Some(stored.id.to_string()));
    assert_eq!(stored.roles, ["Manager"]);
    new_user.id = Some(stored.id);
    let auth = login_as(&app, &new_user).await.unwrap();
    assert_eq!(auth.role, "manager");
}

#[tokio::test]
async fn register_defaults_role_to_user() {
    // Arrange
    let app = spawn_app().await;
    let new_user = TestUser::generate("new", "User");
    let args = RegisterReqArgs::new(
        new_user.username.clone(),
        new_user.email.clone(),
        new_user.password.clone().into(),
    );

    // Act
    app.core_client
        .register(args, no_cb)
        .await
        .unwrap()
        .unwrap();

    // Assert
    let request = app.backend.last_request().unwrap();
    assert_eq!(request.path, "/api/auth/register");
    assert_eq!(
        request.body,
        Some(json!({
            "username": new_user.username,
            "email": new_user.email,
            "password": new_user.password,
            "role": "user",
        }))
    );
}

#[tokio::test]
async fn register_duplicate_username_uses_server_message() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let outcome = app
        .core_client
        .register(app.test_user.register_args(), no_cb)
        .await
        .unwrap();

    // Assert
    assert!(
        matches!(&outcome, Err(AdminError::Registration(msg)) if msg == "Username is already taken"),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn register_flagged_unsuccessful_is_error() {
    // Arrange
    let app = spawn_app().await;
    let new_user = TestUser::generate("new", "User");
    let args = RegisterReqArgs::new(
        new_user.username,
        app.test_user.email.clone(),
        new_user.password.into(),
    );

    // Act
    let outcome = app.core_client.register(args, no_cb).await.unwrap();

    // Assert
    assert!(
        matches!(&outcome, Err(AdminError::Registration(msg)) if msg == "Email is already registered"),
        "{outcome:?}"
    );
}

#[tokio::test]
async fn register_invalid_input_sends_nothing() {
    // Arrange
    let app = spawn_app().await;
    let new_user = TestUser::generate("new", "User");
    let args = RegisterReqArgs::new(new_user.username, new_user.email, "short".to_string().into());

    // Act
    let outcome = app.core_client.register(args, no_cb).await.unwrap();

    // Assert
    assert!(
        matches!(
            outcome,
            Err(AdminError::InvalidInput(ValidationError::PasswordTooShort))
        ),
        "{outcome:?}"
    );
    assert!(app.backend.requests().is_empty());
}

#[tokio::test]
async fn register_confirmation_must_match() {
    // Arrange
    let app = spawn_app().await;
    let new_user = TestUser::generate("new", "User");
    let args = new_user
        .register_args()
        .password_confirmation("something-else".to_string().into());

    // Act
    let outcome = app.core_client.register(args, no_cb).await.unwrap();

    // Assert
    assert!(matches!(
        outcome,
        Err(AdminError::InvalidInput(ValidationError::PasswordsDoNotMatch))
    ));
    assert_eq!(app.backend.user_count(), 2);
}
