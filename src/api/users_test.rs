use std::sync::Arc;

use serde_json::{Value, json};

use super::*;
use crate::net::transport::Method;
use crate::test_helpers::{logged_in, test_config};

#[tokio::test]
async fn update_user_patches_names() {
    let h = logged_in().await;
    h.transport.respond(Method::PATCH, "/users/u1", 204, Value::Null);
    let users = UsersApi::new(&test_config(), Arc::clone(&h.session));

    let update = UpdateUserRequest { first_name: "Ada".to_owned(), last_name: "Lovelace".to_owned() };
    users.update_user("u1", &update).await.unwrap();

    let sent = h.transport.requests().pop().unwrap();
    assert_eq!(sent.url, "http://identity.test/users/u1");
    assert_eq!(sent.bearer.as_deref(), Some("tok1"));
    assert_eq!(sent.body, Some(json!({ "firstName": "Ada", "lastName": "Lovelace" })));
}

#[tokio::test]
async fn change_password_sends_both_passwords() {
    let h = logged_in().await;
    h.transport.respond(Method::PATCH, "/users/u1/password", 204, Value::Null);
    let users = UsersApi::new(&test_config(), Arc::clone(&h.session));

    users.change_password("u1", "old", "new").await.unwrap();

    let sent = h.transport.requests().pop().unwrap();
    assert_eq!(sent.body, Some(json!({ "currentPassword": "old", "newPassword": "new" })));
}

#[tokio::test]
async fn wrong_current_password_is_status_error() {
    let h = logged_in().await;
    h.transport.respond(Method::PATCH, "/users/u1/password", 400, json!({ "error": "Current password is incorrect" }));
    let users = UsersApi::new(&test_config(), Arc::clone(&h.session));

    let err = users.change_password("u1", "bad", "new").await.unwrap_err();
    assert_eq!(err, ApiError::Status { status: 400, message: Some("Current password is incorrect".to_owned()) });
    assert!(h.session.is_authenticated());
}
