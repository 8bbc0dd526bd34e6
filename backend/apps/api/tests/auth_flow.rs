mod common;

use auth::domain::repository::UserRepository;
use axum::http::{Method, StatusCode};
use common::{PASSWORD, TestApp, call};
use serde_json::json;

#[tokio::test]
async fn test_registration_and_confirmation() {
    let app = TestApp::new();
    let body = json!({
        "login": "alice",
        "password": PASSWORD,
        "email": "alice@example.com"
    });

    let response = app
        .send(call(Method::POST, "/auth/registration").json(body.clone()))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .send(call(Method::POST, "/auth/registration").json(body))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_fields(), vec!["login"]);

    let user = UserRepository::find_user_by_login(app.users.as_ref(), "alice")
        .await
        .unwrap()
        .unwrap();
    assert!(!user.is_confirmed);
    let code = user.confirmation.unwrap().code;

    let response = app
        .send(call(Method::POST, "/auth/registration-confirmation").json(json!({"code": code})))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .send(call(Method::POST, "/auth/registration-confirmation").json(json!({"code": code})))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_fields(), vec!["code"]);

    let response = app
        .send(
            call(Method::POST, "/auth/registration-email-resending")
                .json(json!({"email": "alice@example.com"})),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_fields(), vec!["email"]);
}

#[tokio::test]
async fn test_login_me_refresh_logout() {
    let app = TestApp::new();
    let user = app.create_user("alice").await;

    let response = app
        .send(call(Method::POST, "/auth/login").json(json!({
            "loginOrEmail": "alice",
            "password": "wrong-password"
        })))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let login = app.login("alice@example.com").await;
    let access = login.body["accessToken"].as_str().unwrap().to_string();
    let first_cookie = login.refresh_cookie();
    assert!(first_cookie.starts_with("refreshToken="));

    let response = app.send(call(Method::GET, "/auth/me").bearer(&access)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["login"], "alice");
    assert_eq!(response.body["email"], "alice@example.com");
    assert_eq!(response.body["userId"], user["id"]);

    let response = app.send(call(Method::GET, "/auth/me")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let refreshed = app
        .send(call(Method::POST, "/auth/refresh-token").cookie(&first_cookie))
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    assert!(refreshed.body["accessToken"].is_string());
    let second_cookie = refreshed.refresh_cookie();
    assert_ne!(second_cookie, first_cookie);

    // the rotated-out token is dead
    let response = app
        .send(call(Method::POST, "/auth/refresh-token").cookie(&first_cookie))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .send(call(Method::GET, "/security/devices").cookie(&second_cookie))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 1);

    let response = app
        .send(call(Method::POST, "/auth/logout").cookie(&second_cookie))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .send(call(Method::POST, "/auth/refresh-token").cookie(&second_cookie))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rate_limit() {
    let app = TestApp::new();
    let attempt = |ip: &str| {
        call(Method::POST, "/auth/login")
            .from_ip(ip)
            .json(json!({"loginOrEmail": "ghost", "password": "qwerty1"}))
    };

    for _ in 0..5 {
        let response = app.send(attempt("10.0.0.1")).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
    let response = app.send(attempt("10.0.0.1")).await;
    assert_eq!(response.status, StatusCode::TOO_MANY_REQUESTS);

    let response = app.send(attempt("10.0.0.2")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    // the wipe also forgets rate-limit counters
    let response = app.send(call(Method::DELETE, "/testing/all-data")).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = app.send(attempt("10.0.0.1")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_users_admin() {
    let app = TestApp::new();
    let response = app.send(call(Method::GET, "/users")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let alice = app.create_user("alice").await;
    app.create_user("bob").await;

    let response = app
        .send(call(Method::GET, "/users?searchLoginTerm=ALI").admin())
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["totalCount"], 1);
    assert_eq!(response.body["items"][0]["login"], "alice");

    let id = alice["id"].as_str().unwrap();
    let response = app
        .send(call(Method::DELETE, &format!("/users/{}", id)).admin())
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let response = app
        .send(call(Method::DELETE, &format!("/users/{}", id)).admin())
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_terminate_single_device() {
    let app = TestApp::new();
    app.create_user("alice").await;
    app.create_user("bob").await;

    let alice_first = app.login("alice").await.refresh_cookie();
    let response = app
        .send(call(Method::GET, "/security/devices").cookie(&alice_first))
        .await;
    let first_device = response.body[0]["deviceId"].as_str().unwrap().to_string();
    let alice_second = app.login("alice").await.refresh_cookie();

    let bob = app.login("bob").await.refresh_cookie();
    let response = app.send(call(Method::GET, "/security/devices").cookie(&bob)).await;
    let bob_device = response.body[0]["deviceId"].as_str().unwrap().to_string();

    let response = app
        .send(
            call(Method::DELETE, &format!("/security/devices/{}", bob_device))
                .cookie(&alice_second),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    for unknown in ["0123456789abcdef01234567", "not-a-device"] {
        let response = app
            .send(
                call(Method::DELETE, &format!("/security/devices/{}", unknown))
                    .cookie(&alice_second),
            )
            .await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    let response = app
        .send(
            call(Method::DELETE, &format!("/security/devices/{}", first_device))
                .cookie(&alice_second),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .send(call(Method::POST, "/auth/refresh-token").cookie(&alice_first))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .send(call(Method::GET, "/security/devices").cookie(&alice_second))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body.as_array().unwrap().len(), 1);

    // bob's device survived the forbidden attempt
    let response = app.send(call(Method::GET, "/security/devices").cookie(&bob)).await;
    assert_eq!(response.body[0]["deviceId"], bob_device.as_str());
}

#[tokio::test]
async fn test_password_recovery_and_new_password() {
    let app = TestApp::new();
    app.create_user("alice").await;

    let response = app
        .send(call(Method::POST, "/auth/password-recovery").json(json!({"email": "ghost@example.com"})))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app
        .send(call(Method::POST, "/auth/password-recovery").json(json!({"email": "alice@example.com"})))
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let user = UserRepository::find_user_by_login(app.users.as_ref(), "alice")
        .await
        .unwrap()
        .unwrap();
    let code = user.recovery.unwrap().code;

    let reset = |recovery_code: &str| {
        call(Method::POST, "/auth/new-password").json(json!({
            "newPassword": "newpass1",
            "recoveryCode": recovery_code
        }))
    };

    let response = app.send(reset("not-the-code")).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_fields(), vec!["recoveryCode"]);

    let response = app.send(reset(&code)).await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    let response = app.send(reset(&code)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error_fields(), vec!["recoveryCode"]);

    let response = app
        .send(call(Method::POST, "/auth/login").json(json!({
            "loginOrEmail": "alice",
            "password": PASSWORD
        })))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = app
        .send(call(Method::POST, "/auth/login").json(json!({
            "loginOrEmail": "alice",
            "password": "newpass1"
        })))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}
