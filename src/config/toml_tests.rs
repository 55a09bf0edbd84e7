//! Tests for TOML configuration parsing.

use serde_json::json;

use super::toml::{TomlConfig, default_config_template};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [request]
            url = "https://example.com/webhook"
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(
            config.request.url.as_deref(),
            Some("https://example.com/webhook")
        );
        assert!(config.request.method.is_none());
        assert!(config.request.headers.is_empty());
        assert!(config.extract.is_empty());
    }

    #[test]
    fn parse_full_request_section() {
        let toml = r#"
            [request]
            url = "https://api.example.com/deals/{{deal.id}}"
            method = "PUT"
            timeout_ms = 2500
            body = '{"stage": "{{deal.stage}}"}'

            [request.headers]
            Authorization = "Bearer {{secrets.token}}"
            X-Source = "crm"

            [request.params]
            notify = true
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let request = &config.request;

        assert_eq!(request.method.as_deref(), Some("PUT"));
        assert_eq!(request.timeout_ms, Some(2500));
        assert_eq!(request.body, Some(json!(r#"{"stage": "{{deal.stage}}"}"#)));
        assert_eq!(request.headers.len(), 2);
        assert_eq!(
            request.headers.get("Authorization").map(String::as_str),
            Some("Bearer {{secrets.token}}")
        );
        assert_eq!(request.params.as_ref().unwrap()["notify"], json!(true));
    }

    #[test]
    fn parse_nested_table_body() {
        let toml = r#"
            [request]
            url = "https://example.com/"

            [request.body]
            name = "{{object.name}}"

            [request.body.meta]
            count = 3
            ratio = 0.5
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(
            config.request.body,
            Some(json!({ "name": "{{object.name}}", "meta": { "count": 3, "ratio": 0.5 } }))
        );
    }

    #[test]
    fn parse_retry_section() {
        let toml = r#"
            [retry]
            max_retries = 2
            initial_delay_ms = 100
            max_delay_ms = 800
            multiplier = 3.0
            retryable_status_codes = [503]
            retryable_error_codes = ["timeout"]
        "#;

        let config = TomlConfig::parse(toml).unwrap();
        let retry = &config.retry;

        assert_eq!(retry.max_retries, Some(2));
        assert_eq!(retry.initial_delay_ms, Some(100));
        assert_eq!(retry.max_delay_ms, Some(800));
        assert_eq!(retry.multiplier, Some(3.0));
        assert_eq!(retry.retryable_status_codes, Some(vec![503]));
        assert_eq!(retry.retryable_error_codes, Some(vec!["timeout".to_string()]));
    }

    #[test]
    fn parse_extract_array() {
        let toml = r#"
            [[extract]]
            output_name = "ticket"
            path = "data.ticket.id"

            [[extract]]
            output_name = "first"
            path = "items[0]"
        "#;

        let config = TomlConfig::parse(toml).unwrap();

        assert_eq!(config.extract.len(), 2);
        assert_eq!(config.extract[1].path, "items[0]");
    }

    #[test]
    fn empty_document_is_all_defaults() {
        let config = TomlConfig::parse("").unwrap();

        assert!(config.request.url.is_none());
        assert!(config.retry.max_retries.is_none());
        assert!(config.extract.is_empty());
    }
}

mod rejection {
    use super::*;

    #[test]
    fn unknown_section_is_rejected() {
        assert!(TomlConfig::parse("[webhook]\nurl = \"x\"").is_err());
    }

    #[test]
    fn unknown_retry_key_is_rejected() {
        assert!(TomlConfig::parse("[retry]\nmax_attempts = 3").is_err());
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(TomlConfig::parse("[request]\ntimeout_ms = \"fast\"").is_err());
    }
}

mod template {
    use super::*;

    #[test]
    fn default_template_parses() {
        let config = TomlConfig::parse(&default_config_template()).unwrap();

        assert_eq!(
            config.request.url.as_deref(),
            Some("https://api.example.com/contacts/{{contact.id}}")
        );
    }

    #[test]
    fn default_template_documents_every_section() {
        let template = default_config_template();

        for needle in ["[request]", "[retry]", "[[extract]]", "timeout_ms", "multiplier"] {
            assert!(template.contains(needle), "missing {needle}");
        }
    }
}
