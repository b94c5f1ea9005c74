use crate::helpers::{fake_expired_token, login_admin, no_cb, spawn_app};
use admin_client_core::Client;
use admin_shared::{
    const_config::client::CLIENT_LOGIN_REDIRECT,
    errors::AdminError,
    resource::ListParams,
    session::{SessionKey, SessionStore},
    uac::Identity,
};

#[tokio::test]
async fn check_auth_requires_login() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let outcome = app.core_client.check_auth();

    // Assert
    assert!(matches!(outcome, Err(AdminError::AuthenticationRequired)));
}

#[tokio::test]
async fn check_auth_accepts_fresh_login() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;

    // Act
    let outcome = app.core_client.check_auth();

    // Assert
    assert!(outcome.is_ok(), "{outcome:?}");
}

#[tokio::test]
async fn check_auth_expired_token_clears_session() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;
    app.core_client
        .session()
        .set(SessionKey::Token, fake_expired_token());

    // Act
    let outcome = app.core_client.check_auth();

    // Assert
    assert!(matches!(outcome, Err(AdminError::SessionExpired)));
    assert!(app.core_client.session().is_empty());
}

#[tokio::test]
async fn check_auth_malformed_token_fails_open() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;
    app.core_client
        .session()
        .set(SessionKey::Token, "not.a-valid.token");

    // Act
    let outcome = app.core_client.check_auth();

    // Assert
    assert!(outcome.is_ok());
    assert!(!app.core_client.session().is_empty());
}

#[tokio::test]
async fn identity_after_login() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;

    // Act
    let identity = app.core_client.get_identity().unwrap();

    // Assert
    assert_eq!(
        identity,
        Identity {
            id: app.admin_user.id_text(),
            full_name: app.admin_user.username.clone(),
            role: Some("admin".to_string()),
        }
    );
}

#[tokio::test]
async fn logout_clears_everything() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;

    // Act
    app.core_client.logout();

    // Assert
    assert!(app.core_client.session().is_empty());
    assert!(matches!(
        app.core_client.get_identity(),
        Err(AdminError::IdentityNotFound)
    ));
    assert!(matches!(
        app.core_client.get_permissions(),
        Err(AdminError::NoRole)
    ));
    assert!(matches!(
        app.core_client.check_auth(),
        Err(AdminError::AuthenticationRequired)
    ));
}

#[tokio::test]
async fn session_survives_save_and_load() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;
    let path = std::env::temp_dir().join(format!(
        "admin-client-session-{}.ron",
        app.admin_user.username
    ));

    // Act
    app.core_client.session().save(&path).unwrap();
    let loaded = SessionStore::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    let restarted = Client::new(app.address.clone(), loaded);

    // Assert
    assert!(restarted.check_auth().is_ok());
    assert_eq!(
        restarted.get_identity().unwrap(),
        app.core_client.get_identity().unwrap()
    );
    let list = restarted
        .get_list("users", ListParams::new(1, 10), no_cb)
        .await
        .unwrap();
    assert!(list.is_ok(), "{list:?}");
}

#[tokio::test]
async fn rejected_token_leads_to_login_redirect() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;
    app.core_client
        .session()
        .set(SessionKey::Token, "revoked-token");

    // Act
    let error = app
        .core_client
        .get_list("users", ListParams::new(1, 10), no_cb)
        .await
        .unwrap()
        .unwrap_err();
    let outcome = app.core_client.check_error(&error);

    // Assert
    assert_eq!(error.status(), Some(reqwest::StatusCode::UNAUTHORIZED));
    assert_eq!(
        outcome.unwrap_err().redirect_to(),
        Some(CLIENT_LOGIN_REDIRECT)
    );
    assert!(app.core_client.session().is_empty());
}

#[tokio::test]
async fn not_found_does_not_affect_session() {
    // Arrange
    let app = spawn_app().await;
    login_admin(&app).await;

    // Act
    let error = app
        .core_client
        .get_one("posts", "999".into(), no_cb)
        .await
        .unwrap()
        .unwrap_err();
    let outcome = app.core_client.check_error(&error);

    // Assert
    assert_eq!(error.status(), Some(reqwest::StatusCode::NOT_FOUND));
    assert!(outcome.is_ok());
    assert!(app.core_client.session().session().is_some());
}

#[tokio::test]
async fn clones_share_session() {
    // Arrange
    let app = spawn_app().await;
    let clone = app.core_client.clone();

    // Act
    login_admin(&app).await;

    // Assert
    assert!(clone.check_auth().is_ok());
    clone.logout();
    assert!(!app.core_client.is_logged_in());
}
