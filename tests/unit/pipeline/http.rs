use super::*;
use crate::pipeline::assets::AssetRole;

fn status(code: u16) -> HttpCallError {
    HttpCallError::Status {
        status: code,
        body: String::new(),
    }
}

#[test]
fn rate_limits_and_server_errors_are_transient() {
    assert!(status(429).is_transient());
    assert!(status(500).is_transient());
    assert!(status(503).is_transient());
    assert!(!status(400).is_transient());
    assert!(!status(404).is_transient());
    assert!(!HttpCallError::Decode("bad".into()).is_transient());
}

#[test]
fn timeouts_are_classified_separately() {
    assert!(HttpCallError::Timeout.is_timeout());
    assert!(!HttpCallError::Timeout.is_transient());
    assert!(!status(504).is_timeout());
}

#[test]
fn status_errors_carry_the_body() {
    let e = HttpCallError::Status {
        status: 422,
        body: "missing fps".into(),
    };
    assert_eq!(e.to_string(), "HTTP 422: missing fps");
}

#[tokio::test]
async fn upload_needs_a_local_path() {
    let client = HttpClient::new(Duration::from_secs(1), None, RetryPolicy::none()).unwrap();
    let uploader = HttpUploader::new(client, "http://127.0.0.1:9/upload".into());
    let file = UploadFile::new("track.mp3", AssetRole::Music, 1);
    let err = uploader.upload("p1", 0, &file).await.unwrap_err();
    assert!(err.to_string().contains("no local path"));
}
