//! HTTP tests for the prediction endpoint, driven through the router with
//! stand-in classifiers.

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::Request,
    http::{StatusCode, header},
};
use gateway::{
    error::ErrorBody,
    server::{HOME_MESSAGE, build_router},
    state::AppState,
};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use inference::{
    Classifier, InferenceError, LabelNames, PredictionPayload, PredictionService, RawScore,
};
use preprocess::{DEFAULT_INPUT_SIZE, FeatureTensor};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tower::ServiceExt;

const BOUNDARY: &str = "------------------------bean-test-boundary";
const BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Scores an image by its mean intensity.
struct MeanClassifier;

impl Classifier for MeanClassifier {
    fn infer(&self, tensor: &FeatureTensor) -> Result<RawScore, InferenceError> {
        let view = tensor.view();
        Ok(view.sum() / view.len() as f32)
    }
}

struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn infer(&self, _tensor: &FeatureTensor) -> Result<RawScore, InferenceError> {
        Err(InferenceError::Runtime("device lost".to_string()))
    }
}

/// Panics on the first call, then behaves.
struct PanicOnceClassifier {
    panicked: AtomicBool,
}

impl Classifier for PanicOnceClassifier {
    fn infer(&self, _tensor: &FeatureTensor) -> Result<RawScore, InferenceError> {
        if !self.panicked.swap(true, Ordering::SeqCst) {
            panic!("simulated runtime crash");
        }
        Ok(0.25)
    }
}

struct Part<'a> {
    name: &'a str,
    filename: Option<&'a str>,
    content_type: Option<&'a str>,
    data: &'a [u8],
}

impl<'a> Part<'a> {
    fn file(data: &'a [u8]) -> Self {
        Self {
            name: "file",
            filename: Some("bean.png"),
            content_type: Some("image/png"),
            data,
        }
    }
}

fn app(classifier: Arc<dyn Classifier>) -> Router {
    let service = PredictionService::new(classifier, DEFAULT_INPUT_SIZE);
    build_router(AppState::new(service, LabelNames::default()), BODY_LIMIT)
}

fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(filename) = part.filename {
            disposition.push_str(&format!("; filename=\"{}\"", filename));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn predict_request(parts: &[Part]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn encode_png(image: DynamicImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode_png(DynamicImage::ImageRgb8(RgbImage::from_pixel(
        width,
        height,
        Rgb(color),
    )))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

async fn expect_error(app: Router, request: Request<Body>, status: StatusCode) -> String {
    let (actual, body) = send(app, request).await;
    assert_eq!(actual, status, "body: {}", String::from_utf8_lossy(&body));
    let body: ErrorBody = serde_json::from_slice(&body).unwrap();
    body.error
}

async fn expect_prediction(app: Router, request: Request<Body>) -> PredictionPayload {
    let (status, body) = send(app, request).await;
    assert_eq!(
        status,
        StatusCode::OK,
        "body: {}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_home_is_alive() {
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, body) = send(app(Arc::new(MeanClassifier)), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(body).unwrap(), HOME_MESSAGE);
}

#[tokio::test]
async fn test_valid_image_is_classified() {
    let png = solid_png(300, 300, [180, 120, 60]);

    let payload = expect_prediction(
        app(Arc::new(MeanClassifier)),
        predict_request(&[Part::file(&png)]),
    )
    .await;

    assert!(
        payload.prediction == "biji bagus" || payload.prediction == "biji rusak",
        "unexpected label {}",
        payload.prediction
    );
    assert!((0.0..=1.0).contains(&payload.raw_output));

    let (whole, fraction) = payload.confidence.split_once('.').unwrap();
    assert_eq!(whole.len(), 1);
    assert_eq!(fraction.len(), 4, "confidence {}", payload.confidence);
    let confidence: f32 = payload.confidence.parse().unwrap();
    assert!((0.5..=1.0).contains(&confidence));
}

#[tokio::test]
async fn test_label_follows_score() {
    let white = solid_png(64, 64, [255, 255, 255]);
    let black = solid_png(64, 64, [0, 0, 0]);

    let payload = expect_prediction(
        app(Arc::new(MeanClassifier)),
        predict_request(&[Part::file(&white)]),
    )
    .await;
    assert_eq!(payload.prediction, "biji rusak");
    assert_eq!(payload.confidence, "1.0000");

    let payload = expect_prediction(
        app(Arc::new(MeanClassifier)),
        predict_request(&[Part::file(&black)]),
    )
    .await;
    assert_eq!(payload.prediction, "biji bagus");
    assert_eq!(payload.confidence, "1.0000");
    assert_eq!(payload.raw_output, 0.0);
}

#[tokio::test]
async fn test_grayscale_png_is_accepted() {
    let png = encode_png(DynamicImage::ImageLuma8(GrayImage::from_pixel(
        90,
        45,
        Luma([10]),
    )));

    let payload = expect_prediction(
        app(Arc::new(MeanClassifier)),
        predict_request(&[Part::file(&png)]),
    )
    .await;

    assert_eq!(payload.prediction, "biji bagus");
}

#[tokio::test]
async fn test_missing_file_part() {
    let request = predict_request(&[Part {
        name: "image",
        filename: Some("bean.png"),
        content_type: Some("image/png"),
        data: b"irrelevant",
    }]);

    let error = expect_error(
        app(Arc::new(MeanClassifier)),
        request,
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert!(error.contains("No file part"), "error: {}", error);
}

#[tokio::test]
async fn test_file_field_without_filename_is_not_a_file_part() {
    let request = predict_request(&[Part {
        name: "file",
        filename: None,
        content_type: None,
        data: b"plain form value",
    }]);

    let error = expect_error(
        app(Arc::new(MeanClassifier)),
        request,
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert!(error.contains("No file part"), "error: {}", error);
}

#[tokio::test]
async fn test_non_multipart_body_has_no_file_part() {
    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"file": "bean.png"}"#))
        .unwrap();

    let error = expect_error(
        app(Arc::new(MeanClassifier)),
        request,
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert!(error.contains("No file part"), "error: {}", error);
}

#[tokio::test]
async fn test_empty_filename() {
    let png = solid_png(10, 10, [1, 2, 3]);
    let request = predict_request(&[Part {
        filename: Some(""),
        ..Part::file(&png)
    }]);

    let error = expect_error(
        app(Arc::new(MeanClassifier)),
        request,
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert!(error.contains("No file selected"), "error: {}", error);
}

#[tokio::test]
async fn test_corrupt_bytes() {
    let request = predict_request(&[Part {
        content_type: Some("text/plain"),
        ..Part::file(b"this is not an image")
    }]);

    let error = expect_error(
        app(Arc::new(MeanClassifier)),
        request,
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert!(error.starts_with("Failed to open image"), "error: {}", error);
}

#[tokio::test]
async fn test_empty_payload() {
    let request = predict_request(&[Part::file(b"")]);

    let error = expect_error(
        app(Arc::new(MeanClassifier)),
        request,
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert!(error.starts_with("Failed to open image"), "error: {}", error);
}

#[tokio::test]
async fn test_mislabelled_content_type_is_accepted() {
    let png = solid_png(32, 32, [200, 200, 200]);
    let request = predict_request(&[Part {
        content_type: Some("application/octet-stream"),
        ..Part::file(&png)
    }]);

    let payload = expect_prediction(app(Arc::new(MeanClassifier)), request).await;

    assert_eq!(payload.prediction, "biji rusak");
}

#[tokio::test]
async fn test_inference_failure_is_server_error() {
    let png = solid_png(300, 300, [0, 0, 0]);

    let error = expect_error(
        app(Arc::new(FailingClassifier)),
        predict_request(&[Part::file(&png)]),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;

    assert!(
        error.starts_with("Failed to process image or perform prediction"),
        "error: {}",
        error
    );
    assert!(error.contains("device lost"), "error: {}", error);
}

#[tokio::test]
async fn test_classifier_panic_does_not_take_down_the_service() {
    let router = app(Arc::new(PanicOnceClassifier {
        panicked: AtomicBool::new(false),
    }));
    let png = solid_png(50, 50, [0, 0, 0]);

    expect_error(
        router.clone(),
        predict_request(&[Part::file(&png)]),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;

    let payload = expect_prediction(router, predict_request(&[Part::file(&png)])).await;
    assert_eq!(payload.prediction, "biji bagus");
    assert_eq!(payload.confidence, "0.7500");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();

    let response = app(Arc::new(MeanClassifier)).oneshot(request).await.unwrap();

    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_concurrent_requests_are_isolated() {
    let router = app(Arc::new(MeanClassifier));

    let handles: Vec<_> = (0..16u32)
        .map(|i| {
            let router = router.clone();
            tokio::spawn(async move {
                let level = (i * 16) as u8;
                let png = solid_png(120, 80, [level; 3]);
                let payload = expect_prediction(router, predict_request(&[Part::file(&png)])).await;
                (level, payload)
            })
        })
        .collect();

    for handle in handles {
        let (level, payload) = handle.await.unwrap();
        let expected = level as f32 / 255.0;
        assert!(
            (payload.raw_output - expected).abs() < 5e-3,
            "level {} scored {}",
            level,
            payload.raw_output
        );
        let expected_label = if expected > 0.5 {
            "biji rusak"
        } else {
            "biji bagus"
        };
        assert_eq!(payload.prediction, expected_label);
    }
}

#[tokio::test]
async fn test_oversized_upload_is_rejected_with_clear_message() {
    let service = PredictionService::new(Arc::new(MeanClassifier), DEFAULT_INPUT_SIZE);
    let router = build_router(AppState::new(service, LabelNames::default()), 1024);
    let payload = vec![0u8; 4096];

    let error = expect_error(
        router,
        predict_request(&[Part::file(&payload)]),
        StatusCode::PAYLOAD_TOO_LARGE,
    )
    .await;

    assert!(error.starts_with("Upload too large"), "error: {}", error);
    assert!(!error.contains("Malformed multipart body"), "error: {}", error);
}
