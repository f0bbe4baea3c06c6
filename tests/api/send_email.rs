use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{
    any,
    body_json,
    header,
    method,
    path,
};
use wiremock::{
    Mock,
    ResponseTemplate,
};

use gba_mailer::routes::MAX_BODY_BYTES;
use lettre::transport::stub::AsyncStubTransport;

use crate::helpers::*;

fn order_confirmation() -> serde_json::Value {
    json!({
        "to": "client@example.com",
        "subject": "Commande validée",
        "body": "Votre commande #12345 a été validée",
        "type": "order_confirmation"
    })
}

#[actix_rt::test]
async fn preflight_returns_200_with_cors_headers_whatever_the_body() {
    let test_app = spawn_app(sendgrid_test_mode).await;

    for body in ["", "invalid json{", "{\"to\":\"a@b.com\"}"].iter() {
        let response = test_app.send_raw(Method::OPTIONS, body.to_string()).await;

        assert_eq!(200, response.status().as_u16());
        let headers = response.headers();
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            headers["Access-Control-Allow-Headers"],
            "Content-Type, Authorization"
        );
        assert_eq!(headers["Access-Control-Allow-Methods"], "POST, OPTIONS");
        assert_eq!(response.text().await.unwrap(), "");
    }
}

#[actix_rt::test]
async fn preflight_is_answered_before_the_body_is_read() {
    let test_app = spawn_app(sendgrid_test_mode).await;

    let response = test_app
        .send_raw(Method::OPTIONS, "x".repeat(MAX_BODY_BYTES + 1))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
}

#[actix_rt::test]
async fn large_html_body_is_accepted() {
    let test_app = spawn_app(sendgrid_test_mode).await;
    let body = format!("<p>{}</p>", "Votre commande a été validée. ".repeat(10_000));
    assert!(body.len() > 256 * 1024);

    let response = test_app
        .send_json(&json!({
            "to": "client@example.com",
            "subject": "Récapitulatif de commande",
            "body": body
        }))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({
            "success": true,
            "provider": "sendgrid",
            "message": "TEST_MODE - simulated send"
        })
    );
}

#[actix_rt::test]
async fn oversized_body_returns_a_json_error() {
    let test_app = spawn_app(sendgrid_test_mode).await;

    let response = test_app
        .send_raw(Method::POST, "x".repeat(MAX_BODY_BYTES + 1))
        .await;

    assert_eq!(413, response.status().as_u16());
    assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
    assert_eq!(
        response_json(response).await,
        json!({ "success": false, "error": "Payload too large" })
    );
}

#[actix_rt::test]
async fn other_methods_are_rejected_before_the_body_is_read() {
    let test_app = spawn_app(sendgrid_test_mode).await;

    let response = test_app
        .send_raw(Method::PUT, "x".repeat(MAX_BODY_BYTES + 1))
        .await;

    assert_eq!(405, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "success": false, "error": "Method not allowed" })
    );
}

#[actix_rt::test]
async fn other_methods_return_405() {
    let test_app = spawn_app(sendgrid_test_mode).await;

    for verb in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH].iter() {
        let response = test_app.send_raw(verb.clone(), "").await;

        assert_eq!(405, response.status().as_u16(), "method: {}", verb);
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            response_json(response).await,
            json!({ "success": false, "error": "Method not allowed" })
        );
    }
}

#[actix_rt::test]
async fn unparsable_body_returns_400() {
    let test_app = spawn_app(sendgrid_test_mode).await;

    let response = test_app.send_raw(Method::POST, "invalid json{").await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "success": false, "error": "Invalid JSON body" })
    );
}

#[actix_rt::test]
async fn missing_fields_return_400() {
    let test_app = spawn_app(sendgrid_test_mode).await;
    let invalid_data = vec![
        (json!({ "to": "a@b.com" }), "missing subject and body"),
        (json!({ "subject": "Test", "body": "Test body" }), "missing to"),
        (
            json!({ "to": "a@b.com", "subject": "", "body": "Test body" }),
            "empty subject",
        ),
        (json!({}), "empty object"),
        (json!(null), "null document"),
    ];

    for (body, error_message) in invalid_data {
        let response = test_app.send_json(&body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "Send request with {} did not fail",
            error_message
        );
        let body = response_json(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Missing required fields"));
    }
}

#[actix_rt::test]
async fn empty_body_returns_missing_fields() {
    let test_app = spawn_app(sendgrid_test_mode).await;

    let response = test_app.send_raw(Method::POST, "").await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(
        response_json(response).await["error"],
        "Missing required fields: to, subject, body"
    );
}

#[actix_rt::test]
async fn invalid_email_returns_400() {
    let test_app = spawn_app(sendgrid_test_mode).await;

    let response = test_app
        .send_json(&json!({
            "to": "invalid-email",
            "subject": "Test",
            "body": "Test body"
        }))
        .await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "success": false, "error": "Invalid email address" })
    );
}

#[actix_rt::test]
async fn test_mode_with_sendgrid_key_simulates_a_sendgrid_send() {
    let test_app = spawn_app(sendgrid_test_mode).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    for _ in 0..2 {
        let response = test_app.send_json(&order_confirmation()).await;

        assert_eq!(200, response.status().as_u16());
        assert_eq!(
            response_json(response).await,
            json!({
                "success": true,
                "provider": "sendgrid",
                "message": "TEST_MODE - simulated send"
            })
        );
    }
}

#[actix_rt::test]
async fn test_mode_without_sendgrid_key_simulates_an_smtp_send() {
    let test_app = spawn_app(|email| email.test_mode = true).await;

    let response = test_app.send_json(&order_confirmation()).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({
            "success": true,
            "provider": "nodemailer",
            "message": "TEST_MODE - simulated send"
        })
    );
}

#[actix_rt::test]
async fn sendgrid_receives_the_request_fields_unmodified() {
    let test_app = spawn_app(|email| {
        email.sendgrid.api_key = Some("SG.live".into());
        email.sendgrid.from_email = Some("shop@gba.example".into());
    })
    .await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .and(header("Authorization", "Bearer SG.live"))
        .and(body_json(json!({
            "personalizations": [{ "to": [{ "email": "client@example.com" }] }],
            "from": { "email": "shop@gba.example" },
            "subject": "Commande validée",
            "content": [
                { "type": "text/plain", "value": "Votre commande #12345 a été validée" },
                {
                    "type": "text/html",
                    "value": "<div style=\"font-family: Arial, sans-serif;\">Votre commande #12345 a été validée</div>"
                }
            ]
        })))
        .respond_with(ResponseTemplate::new(202).insert_header("X-Message-Id", "sg-12345"))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.send_json(&order_confirmation()).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({
            "success": true,
            "provider": "sendgrid",
            "result": { "statusCode": 202, "messageId": "sg-12345" }
        })
    );
}

#[actix_rt::test]
async fn sendgrid_failure_returns_500_without_retry() {
    let test_app = spawn_app(|email| {
        email.sendgrid.api_key = Some("SG.revoked".into());
        email.sendgrid.from_email = Some("shop@gba.example".into());
    })
    .await;

    Mock::given(method("POST"))
        .and(path("/v3/mail/send"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": [{ "message": "The provided authorization grant is invalid, expired, or revoked" }]
        })))
        .expect(1)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.send_json(&order_confirmation()).await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({
            "success": false,
            "error": "The provided authorization grant is invalid, expired, or revoked"
        })
    );
}

#[actix_rt::test]
async fn sendgrid_without_sender_returns_500() {
    let test_app = spawn_app(|email| email.sendgrid.api_key = Some("SG.live".into())).await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&test_app.email_server)
        .await;

    let response = test_app.send_json(&order_confirmation()).await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "success": false, "error": "SENDGRID_FROM_EMAIL not set" })
    );
}

#[actix_rt::test]
async fn smtp_without_credentials_returns_500() {
    let test_app = spawn_app(|_| {}).await;

    let response = test_app.send_json(&order_confirmation()).await;

    assert_eq!(500, response.status().as_u16());
    let body = response_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("No email provider configured"));
}

#[actix_rt::test]
async fn smtp_delivery_returns_the_message_id() {
    let outbox = AsyncStubTransport::new_ok();
    let test_app = spawn_app_with_outbox(smtp_login, outbox.clone()).await;

    let response = test_app.send_json(&order_confirmation()).await;

    assert_eq!(200, response.status().as_u16());
    let body = response_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["provider"], "nodemailer");
    let message_id = body["messageId"].as_str().unwrap();
    assert!(message_id.starts_with('<') && message_id.ends_with("@gba.example>"));
    assert_eq!(body.as_object().unwrap().len(), 3);

    let sent = outbox.messages().await;
    assert_eq!(sent.len(), 1);
    let (envelope, raw) = &sent[0];
    assert_eq!(envelope.to()[0].to_string(), "client@example.com");
    assert!(raw.contains(message_id));
}

#[actix_rt::test]
async fn smtp_failure_returns_500_with_the_relay_error() {
    let test_app = spawn_app_with_outbox(smtp_login, AsyncStubTransport::new_error()).await;

    let response = test_app.send_json(&order_confirmation()).await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "success": false, "error": "stub error" })
    );
}

#[actix_rt::test]
async fn legacy_function_path_is_served() {
    let test_app = spawn_app(sendgrid_test_mode).await;

    let response = reqwest::Client::new()
        .post(&format!(
            "{}/.netlify/functions/send-email",
            test_app.address
        ))
        .json(&order_confirmation())
        .send()
        .await
        .expect("Fail to execute post request");

    assert_eq!(200, response.status().as_u16());
    assert_eq!(response_json(response).await["provider"], "sendgrid");
}
