use crate::errors::ToolkitError;
use crate::response::{content_disposition, JsonResponse, APPLICATION_JSON};
use crate::types::Tools;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use hyper::StatusCode;
use serde_json::{json, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn body_json(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    // **JSON WRITER TESTS**
    #[test]
    fn test_write_json_status_and_body() {
        let tools = Tools::default();
        let response = tools
            .write_json(StatusCode::CREATED, &json!({"status": "ok", "count": 42}))
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()[CONTENT_TYPE], APPLICATION_JSON);

        let value = body_json(response.body());
        assert_eq!(value["status"], "ok");
        assert_eq!(value["count"], 42);
    }

    #[test]
    fn test_write_json_unicode() {
        let tools = Tools::default();
        let response = tools
            .write_json(StatusCode::OK, &json!({"message": "Hello, 世界! 🌍"}))
            .unwrap();

        assert!(std::str::from_utf8(response.body()).is_ok());
        assert_eq!(body_json(response.body())["message"], "Hello, 世界! 🌍");
    }

    #[test]
    fn test_write_json_with_headers() {
        let tools = Tools::default();
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", HeaderValue::from_static("abc-123"));
        headers.append("vary", HeaderValue::from_static("accept"));
        headers.append("vary", HeaderValue::from_static("origin"));

        let response = tools
            .write_json_with_headers(StatusCode::OK, &json!({"ok": true}), &headers)
            .unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
        let vary: Vec<&HeaderValue> = response.headers().get_all("vary").iter().collect();
        assert_eq!(vary, vec!["accept", "origin"]);
    }

    #[test]
    fn test_content_type_always_json() {
        let tools = Tools::default();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/html"));

        let response = tools
            .write_json_with_headers(StatusCode::OK, &json!([]), &headers)
            .unwrap();

        let values: Vec<&HeaderValue> = response.headers().get_all(CONTENT_TYPE).iter().collect();
        assert_eq!(values, vec![APPLICATION_JSON]);
    }

    #[test]
    fn test_write_json_serialization_failure() {
        let tools = Tools::default();
        let mut bad = BTreeMap::new();
        bad.insert((1u8, 2u8), "tuple keys are not JSON object keys");

        match tools.write_json(StatusCode::OK, &bad) {
            Err(ToolkitError::Serialization(_)) => {}
            other => panic!("Wrong error type: {:?}", other),
        }
    }

    // **ERROR ENVELOPE TESTS**
    #[test]
    fn test_error_json_defaults_to_bad_request() {
        let tools = Tools::default();
        let response = tools.error_json(&ToolkitError::EmptyBody).unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value = body_json(response.body());
        assert_eq!(value["error"], true);
        assert_eq!(value["message"], "body must not be empty");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn test_error_json_with_status() {
        let tools = Tools::default();
        let err = ToolkitError::SizeExceeded { limit: 10 };
        let response = tools.error_json_with_status(&err, err.status()).unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let envelope: JsonResponse = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(envelope, JsonResponse::failure(err.to_string()));
    }

    #[test]
    fn test_error_json_plain_message() {
        let tools = Tools::default();
        let response = tools
            .error_json_with_status("service unavailable", StatusCode::SERVICE_UNAVAILABLE)
            .unwrap();
        assert_eq!(body_json(response.body())["message"], "service unavailable");
    }

    // **ENVELOPE TESTS**
    #[test]
    fn test_envelope_omits_missing_data() {
        let text = serde_json::to_string(&JsonResponse::success("saved")).unwrap();
        assert_eq!(text, r#"{"error":false,"message":"saved"}"#);
    }

    #[test]
    fn test_envelope_with_data() {
        let envelope = JsonResponse::success("found").with_data(json!({"id": 7}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["data"]["id"], 7);
        assert_eq!(value["error"], false);
    }

    // **DOWNLOAD TESTS**
    #[test]
    fn test_download_static_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("report.txt"), b"quarterly numbers\n").unwrap();

        let response = Tools::default()
            .download_static_file(tmp.path(), "report.txt", "Q3 report.txt")
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_DISPOSITION],
            "attachment; filename=\"Q3 report.txt\""
        );
        assert_eq!(response.headers()[CONTENT_LENGTH], "18");
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
        assert_eq!(response.body(), b"quarterly numbers\n");
    }

    #[test]
    fn test_download_length_matches_binary_file() {
        let tmp = TempDir::new().unwrap();
        let data: Vec<u8> = (0..=255u8).cycle().take(5000).collect();
        fs::create_dir(tmp.path().join("assets")).unwrap();
        fs::write(tmp.path().join("assets").join("blob.bin"), &data).unwrap();

        let response = Tools::default()
            .download_static_file(tmp.path(), "assets/blob.bin", "blob.bin")
            .unwrap();

        assert_eq!(response.headers()[CONTENT_LENGTH], "5000");
        assert_eq!(response.body().len(), 5000);
    }

    #[test]
    fn test_download_missing_file() {
        let tmp = TempDir::new().unwrap();
        let result = Tools::default().download_static_file(tmp.path(), "absent.pdf", "absent.pdf");
        assert!(matches!(result, Err(ToolkitError::FileNotFound { .. })));
    }

    #[test]
    fn test_download_rejects_traversal() {
        let tmp = TempDir::new().unwrap();
        let tools = Tools::default();

        for file in ["../secret.txt", "a/../../b", "/etc/passwd", ""] {
            match tools.download_static_file(tmp.path(), file, "x") {
                Err(ToolkitError::InvalidPath { path }) => assert_eq!(path, file),
                other => panic!("Wrong error type for {:?}: {:?}", file, other),
            }
        }
    }

    #[test]
    fn test_content_disposition_escapes_quotes() {
        let value = content_disposition(r#"say "hi".txt"#).unwrap();
        assert_eq!(value, r#"attachment; filename="say \"hi\".txt""#);
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let value = content_disposition("résumé.pdf").unwrap();
        let text = String::from_utf8(value.as_bytes().to_vec()).unwrap();
        assert!(text.starts_with("attachment; filename=\"résumé.pdf\""));
        assert!(text.ends_with("; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"));
    }

    #[test]
    fn test_content_disposition_rejects_control_characters() {
        assert!(matches!(
            content_disposition("bad\nname.txt"),
            Err(ToolkitError::InvalidHeader { name: "Content-Disposition" })
        ));
    }
}
