use crate::config::ShareConfig;
use crate::upload::error::ShareError;
use crate::upload::progress::UploadProgress;
use crate::upload::types::{EmailRequest, PendingSelection, ShareResult};
use bytes::Bytes;
use futures::{stream, TryStreamExt};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

/// Multipart field the backend reads the file from.
const UPLOAD_FIELD: &str = "myfile";
const CHUNK_SIZE: usize = 64 * 1024;
const GENERIC_EMAIL_ERROR: &str = "Email failed!";

#[derive(Deserialize)]
struct UploadResponse {
    file: Option<String>,
    uuid: Option<String>,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    #[serde(default)]
    success: Value,
    #[serde(default)]
    error: Value,
}

/// HTTP side of the share workflow: one upload endpoint, one email endpoint.
#[derive(Clone, Debug)]
pub struct ShareClient {
    http: reqwest::Client,
    api_base: String,
    upload_timeout: Duration,
    email_timeout: Duration,
}

impl ShareClient {
    pub fn new(config: &ShareConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            upload_timeout: config.upload_timeout,
            email_timeout: config.email_timeout,
        })
    }

    pub fn upload_url(&self) -> String {
        format!("{}/api/files", self.api_base)
    }

    pub fn email_url(&self) -> String {
        format!("{}/api/files/send", self.api_base)
    }

    /// Uploads one file, calling `on_progress` as each chunk of the body is
    /// handed to the transport. A server that answers before reading the
    /// whole body can leave late calls after this future resolves; callers
    /// that need strict ordering drop them.
    pub async fn upload<F>(
        &self,
        selection: PendingSelection,
        mut on_progress: F,
    ) -> Result<ShareResult, ShareError>
    where
        F: FnMut(UploadProgress) + Send + Sync + 'static,
    {
        let url = self.upload_url();
        let total = selection.size();
        tracing::info!(file = %selection.name, bytes = total, %url, "Uploading file");

        let mut sent = 0u64;
        let chunks = split_into_chunks(&selection.content);
        let body = stream::iter(chunks.into_iter().map(Ok::<Bytes, std::io::Error>)).inspect_ok(
            move |chunk| {
                sent += chunk.len() as u64;
                on_progress(UploadProgress {
                    bytes_sent: sent,
                    bytes_total: total,
                });
            },
        );

        let part =
            Part::stream_with_length(Body::wrap_stream(body), total).file_name(selection.name);
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self
            .http
            .post(&url)
            .timeout(self.upload_timeout)
            .multipart(form)
            .send()
            .await
            .map_err(ShareError::from_upload_transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(status = status.as_u16(), "Upload rejected by server");
            return Err(ShareError::UploadFailed {
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(ShareError::from_upload_transport)?;
        let share = parse_upload_response(&text)?;
        tracing::info!(identifier = %share.identifier, "Upload completed");
        Ok(share)
    }

    pub async fn send_email(&self, request: &EmailRequest) -> Result<(), ShareError> {
        tracing::info!(identifier = %request.identifier, "Sending share email");

        let response = self
            .http
            .post(self.email_url())
            .timeout(self.email_timeout)
            .json(request)
            .send()
            .await
            .map_err(ShareError::from_email_transport)?;

        let status = response.status();
        let body: SendEmailResponse = response
            .json()
            .await
            .map_err(ShareError::from_email_transport)?;

        if is_truthy(&body.success) {
            tracing::info!(identifier = %request.identifier, "Share email sent");
            Ok(())
        } else {
            let message = match &body.error {
                Value::String(s) if !s.is_empty() => s.clone(),
                other if is_truthy(other) => other.to_string(),
                _ => GENERIC_EMAIL_ERROR.to_string(),
            };
            tracing::warn!(status = status.as_u16(), %message, "Share email rejected");
            Err(ShareError::EmailFailed(message))
        }
    }
}

fn split_into_chunks(content: &Bytes) -> Vec<Bytes> {
    let mut chunks = Vec::with_capacity(content.len() / CHUNK_SIZE + 1);
    let mut start = 0;
    while start < content.len() {
        let end = (start + CHUNK_SIZE).min(content.len());
        chunks.push(content.slice(start..end));
        start = end;
    }
    chunks
}

fn parse_upload_response(body: &str) -> Result<ShareResult, ShareError> {
    let parsed: UploadResponse =
        serde_json::from_str(body).map_err(|e| ShareError::InvalidResponse {
            detail: e.to_string(),
        })?;

    let link = parsed.file.filter(|s| !s.is_empty());
    let identifier = parsed.uuid.filter(|s| !s.is_empty());
    match (link, identifier) {
        (Some(link), Some(identifier)) => Ok(ShareResult { link, identifier }),
        _ => Err(ShareError::IncompleteResponse),
    }
}

/// The backend's `success` flag is not guaranteed to be a boolean.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn client_for(api_base: &str) -> ShareClient {
        ShareClient::new(&ShareConfig {
            api_base: api_base.to_string(),
            ..ShareConfig::default()
        })
        .unwrap()
    }

    fn selection(size: usize) -> PendingSelection {
        PendingSelection {
            name: "report.bin".into(),
            content: Bytes::from(vec![b'x'; size]),
        }
    }

    fn share() -> ShareResult {
        ShareResult {
            link: "https://x/y".into(),
            identifier: "abc".into(),
        }
    }

    #[test]
    fn urls_are_built_from_the_base() {
        let client = client_for("http://localhost:9000/");
        assert_eq!(client.upload_url(), "http://localhost:9000/api/files");
        assert_eq!(client.email_url(), "http://localhost:9000/api/files/send");
    }

    #[test]
    fn chunks_cover_the_whole_body() {
        let content = Bytes::from(vec![0u8; CHUNK_SIZE * 2 + 10]);
        let chunks = split_into_chunks(&content);
        assert_eq!(
            chunks.iter().map(Bytes::len).collect::<Vec<_>>(),
            vec![CHUNK_SIZE, CHUNK_SIZE, 10]
        );
        assert!(split_into_chunks(&Bytes::new()).is_empty());
    }

    #[test]
    fn upload_response_classification() {
        assert_eq!(
            parse_upload_response(r#"{"file":"https://x/y","uuid":"abc"}"#),
            Ok(share())
        );
        assert_eq!(
            parse_upload_response(r#"{"file":"https://x/y"}"#),
            Err(ShareError::IncompleteResponse)
        );
        assert_eq!(
            parse_upload_response(r#"{"file":"","uuid":"abc"}"#),
            Err(ShareError::IncompleteResponse)
        );
        assert_eq!(
            parse_upload_response(r#"{"file":null,"uuid":"abc"}"#),
            Err(ShareError::IncompleteResponse)
        );
        assert!(matches!(
            parse_upload_response("<html>oops</html>"),
            Err(ShareError::InvalidResponse { .. })
        ));
        assert!(matches!(
            parse_upload_response("[1,2,3]"),
            Err(ShareError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn truthiness_follows_the_backend_conventions() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("yes")));
        assert!(is_truthy(&json!({})));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
    }

    #[tokio::test]
    async fn upload_sends_multipart_and_reports_progress() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/files")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data".to_string()),
            )
            .match_body(Matcher::Regex(r#"name="myfile""#.to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"file":"https://x/y","uuid":"abc"}"#)
            .create_async()
            .await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let result = client_for(&server.url())
            .upload(selection(1000), move |p| {
                sink.lock().unwrap().push(p.percent().unwrap())
            })
            .await;

        mock.assert_async().await;
        assert_eq!(result, Ok(share()));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn large_upload_reports_several_steps() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/files")
            .with_status(200)
            .with_body(r#"{"file":"https://x/big","uuid":"big"}"#)
            .create_async()
            .await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        client_for(&server.url())
            .upload(selection(CHUNK_SIZE * 4), move |p| {
                sink.lock().unwrap().push(p.percent().unwrap())
            })
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![25, 50, 75, 100]);
    }

    #[tokio::test]
    async fn non_200_status_is_an_upload_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/files")
            .with_status(500)
            .with_body(r#"{"file":"https://x/y","uuid":"abc"}"#)
            .create_async()
            .await;

        let result = client_for(&server.url())
            .upload(selection(10), |_| {})
            .await;
        assert_eq!(result, Err(ShareError::UploadFailed { status: 500 }));
    }

    #[tokio::test]
    async fn created_status_is_still_a_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/files")
            .with_status(201)
            .with_body(r#"{"file":"https://x/y","uuid":"abc"}"#)
            .create_async()
            .await;

        let result = client_for(&server.url())
            .upload(selection(10), |_| {})
            .await;
        assert_eq!(result, Err(ShareError::UploadFailed { status: 201 }));
    }

    #[tokio::test]
    async fn missing_identifier_is_incomplete() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/files")
            .with_status(200)
            .with_body(r#"{"file":"https://x/y"}"#)
            .create_async()
            .await;

        let result = client_for(&server.url())
            .upload(selection(10), |_| {})
            .await;
        assert_eq!(result, Err(ShareError::IncompleteResponse));
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let result = client_for(&format!("http://{}", addr))
            .upload(selection(10), |_| {})
            .await;
        assert!(matches!(result, Err(ShareError::Transport { .. })));
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        // Accepts connections via the backlog but never answers.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = ShareClient::new(&ShareConfig {
            api_base: format!("http://{}", addr),
            upload_timeout: Duration::from_millis(200),
            ..ShareConfig::default()
        })
        .unwrap();

        let result = client.upload(selection(10), |_| {}).await;
        assert_eq!(result, Err(ShareError::Timeout));
        drop(listener);
    }

    #[tokio::test]
    async fn email_request_body_matches_wire_format() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/files/send")
            .match_body(Matcher::Json(
                json!({ "uuid": "abc", "emailFrom": "a@x.com", "emailTo": "b@y.com" }),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true}"#)
            .create_async()
            .await;

        let request = EmailRequest::new(&share(), "a@x.com", "b@y.com");
        let result = client_for(&server.url()).send_email(&request).await;

        mock.assert_async().await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn email_failure_uses_the_server_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/files/send")
            .with_status(400)
            .with_body(r#"{"success":false,"error":"bad address"}"#)
            .create_async()
            .await;

        let request = EmailRequest::new(&share(), "a@x.com", "b@y.com");
        let err = client_for(&server.url())
            .send_email(&request)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "bad address");
    }

    #[tokio::test]
    async fn email_failure_without_message_is_generic() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/files/send")
            .with_status(200)
            .with_body(r#"{"success":false}"#)
            .create_async()
            .await;

        let request = EmailRequest::new(&share(), "a@x.com", "b@y.com");
        let result = client_for(&server.url()).send_email(&request).await;
        assert_eq!(
            result,
            Err(ShareError::EmailFailed(GENERIC_EMAIL_ERROR.to_string()))
        );
    }

    #[tokio::test]
    async fn unparsable_email_response_is_a_transport_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/files/send")
            .with_status(502)
            .with_body("Bad Gateway")
            .create_async()
            .await;

        let request = EmailRequest::new(&share(), "a@x.com", "b@y.com");
        let result = client_for(&server.url()).send_email(&request).await;
        assert!(matches!(result, Err(ShareError::EmailTransport { .. })));
    }
}
