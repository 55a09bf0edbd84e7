//! Tests for request fields: method, headers, body, params, extract.

use super::*;
use crate::dispatch::DispatchMethod;

mod method {
    use super::*;

    #[test]
    fn method_is_case_insensitive() {
        for (raw, expected) in [
            ("get", DispatchMethod::Get),
            ("Post", DispatchMethod::Post),
            ("PUT", DispatchMethod::Put),
            ("patch", DispatchMethod::Patch),
            ("DELETE", DispatchMethod::Delete),
        ] {
            let args = send(&["--url", "https://example.com/", "--method", raw]);
            let config = ValidatedConfig::from_raw(&args, None, empty_context()).unwrap();
            assert_eq!(config.dispatch.method, expected, "{raw}");
        }
    }

    #[test]
    fn unsupported_method_is_rejected() {
        let args = send(&["--url", "https://example.com/", "--method", "TRACE"]);

        let result = ValidatedConfig::from_raw(&args, None, empty_context());

        assert!(matches!(result, Err(ConfigError::InvalidMethod(m)) if m == "TRACE"));
    }
}

mod headers {
    use super::*;

    #[test]
    fn cli_headers_in_both_formats() {
        let args = send(&[
            "--url",
            "https://example.com/",
            "--header",
            "X-Api-Key=secret",
            "--header",
            "Authorization: Bearer a=b",
        ]);

        let config = ValidatedConfig::from_raw(&args, None, empty_context()).unwrap();
        let headers = config.dispatch.headers.unwrap();

        assert_eq!(headers["X-Api-Key"], "secret");
        assert_eq!(headers["Authorization"], "Bearer a=b");
    }

    #[test]
    fn cli_header_replaces_toml_header_case_insensitively() {
        let toml = toml(
            r#"
            [request]
            url = "https://example.com/"

            [request.headers]
            X-Token = "from-toml"
            X-Keep = "kept"
        "#,
        );
        let args = send(&["--header", "x-token=from-cli"]);

        let config = ValidatedConfig::from_raw(&args, Some(&toml), empty_context()).unwrap();
        let headers = config.dispatch.headers.unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers["x-token"], "from-cli");
        assert_eq!(headers["X-Keep"], "kept");
    }

    #[test]
    fn header_values_stay_templates() {
        let args = send(&[
            "--url",
            "https://example.com/",
            "--header",
            "X-Contact={{contact.id}}",
        ]);

        let config = ValidatedConfig::from_raw(&args, None, empty_context()).unwrap();

        assert_eq!(config.dispatch.headers.unwrap()["X-Contact"], "{{contact.id}}");
    }

    #[test]
    fn header_without_separator_is_rejected() {
        let args = send(&["--url", "https://example.com/", "--header", "NoSeparator"]);

        assert!(matches!(
            ValidatedConfig::from_raw(&args, None, empty_context()),
            Err(ConfigError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn header_with_empty_name_is_rejected() {
        let args = send(&["--url", "https://example.com/", "--header", "=value"]);

        assert!(matches!(
            ValidatedConfig::from_raw(&args, None, empty_context()),
            Err(ConfigError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn illegal_header_name_is_rejected() {
        let toml = toml(
            r#"
            [request]
            url = "https://example.com/"

            [request.headers]
            "Bad Name" = "x"
        "#,
        );

        assert!(matches!(
            ValidatedConfig::from_raw(&send(&[]), Some(&toml), empty_context()),
            Err(ConfigError::InvalidHeaderName { .. })
        ));
    }
}

mod body_and_params {
    use super::*;

    #[test]
    fn string_body_is_kept_verbatim() {
        let toml = toml(
            r#"
            [request]
            url = "https://example.com/"
            body = '{"email": "{{contact.email}}"}'
        "#,
        );

        let config = ValidatedConfig::from_raw(&send(&[]), Some(&toml), empty_context()).unwrap();

        assert_eq!(
            config.dispatch.body,
            Some(json!(r#"{"email": "{{contact.email}}"}"#))
        );
    }

    #[test]
    fn table_body_becomes_structured_json() {
        let toml = toml(
            r#"
            [request]
            url = "https://example.com/"
            method = "GET"

            [request.body]
            email = "{{contact.email}}"
            limit = 10
            tags = ["a", "b"]
        "#,
        );

        let config = ValidatedConfig::from_raw(&send(&[]), Some(&toml), empty_context()).unwrap();

        assert_eq!(
            config.dispatch.body,
            Some(json!({ "email": "{{contact.email}}", "limit": 10, "tags": ["a", "b"] }))
        );
    }

    #[test]
    fn params_table_is_loaded() {
        let toml = toml(
            r#"
            [request]
            url = "https://example.com/"

            [request.params]
            source = "crm"
            id = "{{contact.id}}"
        "#,
        );

        let config = ValidatedConfig::from_raw(&send(&[]), Some(&toml), empty_context()).unwrap();
        let params = config.dispatch.params.unwrap();

        assert_eq!(params["source"], "crm");
        assert_eq!(params["id"], "{{contact.id}}");
    }
}

mod extract {
    use super::*;
    use crate::extract::FieldMapping;

    #[test]
    fn extract_mappings_are_loaded() {
        let toml = toml(
            r#"
            [request]
            url = "https://example.com/"

            [[extract]]
            output_name = "first_tag"
            path = "user.tags[0]"

            [[extract]]
            outputName = "id"
            path = "data.id"
        "#,
        );

        let config = ValidatedConfig::from_raw(&send(&[]), Some(&toml), empty_context()).unwrap();

        assert_eq!(
            config.extract,
            vec![
                FieldMapping::new("first_tag", "user.tags[0]"),
                FieldMapping::new("id", "data.id"),
            ]
        );
    }

    #[test]
    fn malformed_mapping_is_rejected() {
        let toml = toml(
            r#"
            [request]
            url = "https://example.com/"

            [[extract]]
            output_name = "bad"
            path = "a[b]"
        "#,
        );

        assert!(matches!(
            ValidatedConfig::from_raw(&send(&[]), Some(&toml), empty_context()),
            Err(ConfigError::InvalidExtract(_))
        ));
    }
}
