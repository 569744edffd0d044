//! Unit and integration tests for formpress-api

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use formpress_api::app;
use http_body_util::BodyExt;
use serde_json::json;
use tower::util::ServiceExt;

#[cfg(test)]
mod unit_tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use formpress::FormError;
    use formpress_api::api::AppError;

    #[test]
    fn test_document_format_maps_to_bad_request() {
        let error: AppError = FormError::DocumentFormat("missing trailer".to_string()).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_other_core_errors_map_to_internal() {
        let error: AppError = FormError::Flatten("boom".to_string()).into();
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_request_variant() {
        let response = AppError::BadRequest("duplicate field id: a".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_health_check_endpoint() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .method("GET")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "formpress API");
        assert!(json["version"].is_string());
    }

    #[tokio::test]
    async fn test_export_endpoint_returns_pdf() {
        let layout = json!([
            {
                "id": "name",
                "type": "text",
                "label": "Text input",
                "x": 50.0,
                "y": 50.0,
                "width": 200.0,
                "height": 30.0
            }
        ]);

        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/export")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(layout.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/pdf"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.starts_with(b"%PDF-1.7"));
    }

    #[tokio::test]
    async fn test_export_rejects_duplicate_ids() {
        let layout = json!([
            {
                "id": "a",
                "type": "text",
                "label": "Text input",
                "x": 50.0,
                "y": 50.0,
                "width": 200.0,
                "height": 30.0
            },
            {
                "id": "a",
                "type": "checkbox",
                "label": "Checkbox",
                "x": 50.0,
                "y": 100.0,
                "width": 20.0,
                "height": 20.0
            }
        ]);

        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/export")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(layout.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("duplicate"));
    }

    #[tokio::test]
    async fn test_flatten_endpoint_rejects_garbage() {
        let boundary = "X-FORMPRESS-TEST";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"x.pdf\"\r\nContent-Type: application/pdf\r\n\r\nnot a pdf\r\n--{boundary}--\r\n"
        );

        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/flatten")
                    .method("POST")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_flatten_endpoint_round_trip() {
        // Export a form first, then flatten the result
        let layout = json!([
            {
                "id": "name",
                "type": "text",
                "label": "Text input",
                "x": 50.0,
                "y": 50.0,
                "width": 200.0,
                "height": 30.0
            }
        ]);

        let export_response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/export")
                    .method("POST")
                    .header("content-type", "application/json")
                    .body(Body::from(layout.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let pdf = export_response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes();

        let boundary = "X-FORMPRESS-TEST";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"form.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(&pdf);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/flatten")
                    .method("POST")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let flattened = response.into_body().collect().await.unwrap().to_bytes();
        assert!(flattened.starts_with(b"%PDF-1.7"));
        assert!(!String::from_utf8_lossy(&flattened).contains("/AcroForm"));
    }

    #[tokio::test]
    async fn test_flatten_without_file_field() {
        let boundary = "X-FORMPRESS-TEST";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
        );

        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/api/flatten")
                    .method("POST")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={boundary}"),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
