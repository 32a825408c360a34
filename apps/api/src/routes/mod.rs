pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::cover_letter::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::handle_index))
        .route("/health", get(health::health_handler))
        .route("/api/v1/cover-letters", post(handlers::handle_generate))
        .route(
            "/api/v1/cover-letters/download",
            post(handlers::handle_download),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::cover_letter::stages::cover_letter_stages;
    use crate::documents::tests::docx_bytes;
    use crate::pipeline::{GenerationError, TextGenerator};

    const BOUNDARY: &str = "cover-letter-test-boundary";

    #[derive(Default)]
    struct StubGenerator {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(GenerationError::new("upstream 500"));
            }
            Ok(format!("stage {n} text"))
        }
    }

    fn test_state(generator: Arc<StubGenerator>) -> AppState {
        AppState {
            generator,
            stages: cover_letter_stages().into(),
            config: Config {
                anthropic_api_key: "test-key".to_string(),
                port: 0,
                rust_log: "info".to_string(),
                run_timeout: Duration::from_secs(30),
                max_upload_bytes: 1024 * 1024,
            },
            shutdown: CancellationToken::new(),
        }
    }

    enum Part<'a> {
        File(&'a str, &'a str, Vec<u8>),
        Text(&'a str, &'a str),
    }

    fn multipart_request(parts: Vec<Part<'_>>) -> Request<Body> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::File(name, file_name, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(&bytes);
                }
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/cover-letters")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn valid_parts<'a>() -> Vec<Part<'a>> {
        vec![
            Part::File("resume", "resume.docx", docx_bytes(&["5 years Python"])),
            Part::File(
                "job_description",
                "jd.docx",
                docx_bytes(&["Need Python backend engineer"]),
            ),
            Part::Text("tone", "formal"),
        ]
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_ok() {
        let app = build_router(test_state(Arc::default()));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let app = build_router(test_state(Arc::default()));
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("<form"));
        assert!(html.contains("cover_letter.txt"));
    }

    #[tokio::test]
    async fn test_generate_returns_letter_and_stage_outputs() {
        let generator = Arc::new(StubGenerator::default());
        let app = build_router(test_state(generator.clone()));

        let response = app.oneshot(multipart_request(valid_parts())).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["cover_letter"], "stage 6 text");
        assert_eq!(body["tone"], "formal");
        assert_eq!(body["download_name"], "cover_letter.txt");
        assert_eq!(body["stages"].as_array().unwrap().len(), 6);
        assert_eq!(body["stages"][0]["stage"], "input_collection");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn test_missing_tone_is_bad_request() {
        let generator = Arc::new(StubGenerator::default());
        let app = build_router(test_state(generator.clone()));
        let mut parts = valid_parts();
        parts.pop();

        let response = app.oneshot(multipart_request(parts)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_tone_is_bad_request() {
        let app = build_router(test_state(Arc::default()));
        let mut parts = valid_parts();
        parts.pop();
        parts.push(Part::Text("tone", "sarcastic"));

        let response = app.oneshot(multipart_request(parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_job_description_is_bad_request() {
        let app = build_router(test_state(Arc::default()));
        let parts = vec![
            Part::File("resume", "resume.docx", docx_bytes(&["5 years Python"])),
            Part::File("job_description", "", Vec::new()),
            Part::Text("tone", "formal"),
        ];

        let response = app.oneshot(multipart_request(parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("job_description"));
    }

    #[tokio::test]
    async fn test_unsupported_format_is_415_before_generation() {
        let generator = Arc::new(StubGenerator::default());
        let app = build_router(test_state(generator.clone()));
        let mut parts = valid_parts();
        parts[0] = Part::File("resume", "resume.txt", b"5 years Python".to_vec());

        let response = app.oneshot(multipart_request(parts)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(json_body(response).await["error"]["code"], "UNSUPPORTED_FORMAT");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_declared_format_overrides_extension() {
        let app = build_router(test_state(Arc::default()));
        let mut parts = valid_parts();
        parts[0] = Part::File("resume", "upload.bin", docx_bytes(&["5 years Python"]));
        parts.push(Part::Text("resume_format", "docx"));

        let response = app.oneshot(multipart_request(parts)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_generation_failure_is_502() {
        let generator = Arc::new(StubGenerator {
            fail: true,
            ..Default::default()
        });
        let app = build_router(test_state(generator.clone()));

        let response = app.oneshot(multipart_request(valid_parts())).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(response).await["error"]["code"], "GENERATION_FAILURE");
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_new_runs() {
        let generator = Arc::new(StubGenerator::default());
        let state = test_state(generator.clone());
        state.shutdown.cancel();
        let app = build_router(state);

        let response = app.oneshot(multipart_request(valid_parts())).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_download_sets_attachment_name() {
        let app = build_router(test_state(Arc::default()));
        let request = Request::post("/api/v1/cover-letters/download")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"cover_letter":"Dear Hiring Manager,"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert_eq!(disposition, "attachment; filename=\"cover_letter.txt\"");
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Dear Hiring Manager,");
    }

    #[tokio::test]
    async fn test_download_rejects_blank_letter() {
        let app = build_router(test_state(Arc::default()));
        let request = Request::post("/api/v1/cover-letters/download")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"cover_letter":"   "}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
