use serde_json::{Value, json};

use super::*;
use crate::net::transport::{Credentials, Method};
use crate::test_helpers::{MockTransport, test_config};

#[tokio::test]
async fn subscribe_posts_trimmed_email() {
    let transport = MockTransport::new();
    transport.respond(Method::POST, "/subscribers", 201, Value::Null);
    let api = SubscribersApi::new(&test_config(), transport.clone());

    api.subscribe("  ada@example.com ").await.unwrap();

    let sent = &transport.requests()[0];
    assert_eq!(sent.url, "http://blog.test/subscribers");
    assert_eq!(sent.body, Some(json!({ "email": "ada@example.com" })));
    assert_eq!(sent.credentials, Credentials::Omit);
    assert!(sent.bearer.is_none());
}

#[tokio::test]
async fn rejected_address_surfaces_backend_message() {
    let transport = MockTransport::new();
    transport.respond(Method::POST, "/subscribers", 409, json!({ "message": "Already subscribed" }));
    let api = SubscribersApi::new(&test_config(), transport);

    let err = api.subscribe("ada@example.com").await.unwrap_err();
    assert_eq!(err.user_message(), "Already subscribed");
}
