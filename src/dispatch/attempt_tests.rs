//! Tests for single-attempt execution.

use std::time::Duration;

use serde_json::json;

use super::test_support::{MockClient, connection_error};
use super::{
    DispatchStatus, FailureKind, HttpError, HttpRequest, HttpResponse, MAX_RESPONSE_TEXT_CHARS,
    NetworkErrorCode, execute_attempt,
};

fn request() -> HttpRequest {
    HttpRequest::new(
        http::Method::POST,
        url::Url::parse("https://hooks.example.com/in").unwrap(),
    )
}

const TIMEOUT: Duration = Duration::from_secs(5);

mod responses {
    use super::*;

    #[tokio::test]
    async fn success_decodes_json_body() {
        let client = MockClient::ok_json(r#"{"id": 7, "ok": true}"#);

        let outcome = execute_attempt(&client, request(), TIMEOUT).await;

        assert!(outcome.is_success());
        assert_eq!(outcome.http_status, Some(200));
        assert!(outcome.failure.is_none());
        assert!(outcome.error_message.is_none());
        let body = outcome.response_body.unwrap();
        assert!(body.is_json());
        assert_eq!(body.decoded, json!({ "id": 7, "ok": true }));
    }

    #[tokio::test]
    async fn non_json_body_is_kept_as_text() {
        let client = MockClient::new(vec![Ok(HttpResponse::with_status(200, "accepted"))]);

        let outcome = execute_attempt(&client, request(), TIMEOUT).await;

        let body = outcome.response_body.unwrap();
        assert!(!body.is_json());
        assert_eq!(body.raw, "accepted");
        assert_eq!(body.decoded, json!("accepted"));
    }

    #[tokio::test]
    async fn empty_body_yields_no_payload() {
        let client = MockClient::statuses(&[204]);

        let outcome = execute_attempt(&client, request(), TIMEOUT).await;

        assert!(outcome.is_success());
        assert!(outcome.response_body.is_none());
    }

    #[tokio::test]
    async fn non_2xx_is_an_http_failure_not_an_error() {
        let client = MockClient::new(vec![Ok(HttpResponse::with_status(
            404,
            r#"{"error":"missing"}"#,
        ))]);

        let outcome = execute_attempt(&client, request(), TIMEOUT).await;

        assert_eq!(outcome.status, DispatchStatus::Error);
        assert_eq!(outcome.failure, Some(FailureKind::Http));
        assert_eq!(outcome.http_status, Some(404));
        assert_eq!(outcome.error_message.as_deref(), Some("HTTP 404 Not Found"));
        assert_eq!(
            outcome.response_body.unwrap().decoded,
            json!({ "error": "missing" })
        );
    }

    #[tokio::test]
    async fn redirect_status_is_not_success() {
        let client = MockClient::statuses(&[302]);

        let outcome = execute_attempt(&client, request(), TIMEOUT).await;

        assert_eq!(outcome.status, DispatchStatus::Error);
        assert_eq!(outcome.http_status, Some(302));
    }

    #[tokio::test]
    async fn request_is_passed_through_unchanged() {
        let client = MockClient::statuses(&[200]);
        let sent = request().with_body(b"payload".to_vec());

        execute_attempt(&client, sent, TIMEOUT).await;

        let captured = client.captured_requests();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].body_text(), Some("payload"));
        assert_eq!(captured[0].method, http::Method::POST);
    }
}

mod failures {
    use super::*;

    #[tokio::test]
    async fn connection_error_is_network_failure() {
        let client = MockClient::new(vec![Err(connection_error(
            NetworkErrorCode::ConnectionRefused,
        ))]);

        let outcome = execute_attempt(&client, request(), TIMEOUT).await;

        assert_eq!(outcome.status, DispatchStatus::Error);
        assert_eq!(outcome.failure, Some(FailureKind::Network));
        assert_eq!(outcome.error_code, Some(NetworkErrorCode::ConnectionRefused));
        assert!(outcome.http_status.is_none());
        assert!(outcome.error_message.unwrap().contains("connection-refused"));
    }

    #[tokio::test]
    async fn aborted_connection_is_classified_as_timeout() {
        let client = MockClient::new(vec![Err(connection_error(NetworkErrorCode::Aborted))]);

        let outcome = execute_attempt(&client, request(), TIMEOUT).await;

        assert_eq!(outcome.status, DispatchStatus::Timeout);
        assert_eq!(outcome.failure, Some(FailureKind::Timeout));
        assert_eq!(outcome.error_code, Some(NetworkErrorCode::Aborted));
    }

    #[tokio::test]
    async fn client_timeout_is_classified_as_timeout() {
        let client = MockClient::new(vec![Err(HttpError::Timeout)]);

        let outcome = execute_attempt(&client, request(), TIMEOUT).await;

        assert_eq!(outcome.status, DispatchStatus::Timeout);
        assert_eq!(outcome.error_code, Some(NetworkErrorCode::Timeout));
    }

    #[tokio::test]
    async fn invalid_request_has_no_error_code() {
        let client = MockClient::new(vec![Err(HttpError::InvalidRequest("bad".into()))]);

        let outcome = execute_attempt(&client, request(), TIMEOUT).await;

        assert_eq!(outcome.failure, Some(FailureKind::Network));
        assert!(outcome.error_code.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_produces_timeout_with_elapsed_time() {
        let client = MockClient::slow(Duration::from_secs(60), HttpResponse::with_status(200, ""));

        let outcome = execute_attempt(&client, request(), Duration::from_millis(250)).await;

        assert_eq!(outcome.status, DispatchStatus::Timeout);
        assert_eq!(
            outcome.error_message.as_deref(),
            Some("Request timed out after 250ms")
        );
        assert!(outcome.elapsed >= Duration::from_millis(250));
        assert!(outcome.elapsed < Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_but_within_deadline_succeeds() {
        let client = MockClient::slow(Duration::from_secs(2), HttpResponse::with_status(200, "ok"));

        let outcome = execute_attempt(&client, request(), Duration::from_secs(3)).await;

        assert!(outcome.is_success());
        assert!(outcome.elapsed >= Duration::from_secs(2));
    }
}

mod records {
    use super::*;

    #[tokio::test]
    async fn record_copies_outcome_fields() {
        let client = MockClient::statuses(&[503]);
        let outcome = execute_attempt(&client, request(), TIMEOUT).await;

        let record = outcome.record(2);

        assert_eq!(record.attempt_number, 2);
        assert_eq!(record.status, DispatchStatus::Error);
        assert_eq!(record.http_status_code, Some(503));
        assert_eq!(record.failure, Some(FailureKind::Http));
        assert_eq!(record.error_message, outcome.error_message);
    }

    #[tokio::test]
    async fn long_bodies_are_truncated_only_in_text_form() {
        let long = "x".repeat(MAX_RESPONSE_TEXT_CHARS + 50);
        let client = MockClient::new(vec![Ok(HttpResponse::with_status(500, long.clone()))]);

        let outcome = execute_attempt(&client, request(), TIMEOUT).await;

        let body = outcome.response_body.unwrap();
        assert_eq!(body.raw.len(), long.len());
        assert_eq!(body.truncated_text().chars().count(), MAX_RESPONSE_TEXT_CHARS);
    }
}
