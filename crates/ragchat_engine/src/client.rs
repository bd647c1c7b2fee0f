use std::time::Duration;

use chat_logging::{chat_debug, chat_warn};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use crate::{Answer, BackendError, BackendReply, BackendRequest, UploadFile};

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Prefix every backend path hangs off, e.g. `http://localhost:8000/api`.
    pub api_root: String,
    pub connect_timeout: Duration,
    /// Whole-request guard. Generation can be slow, so keep this generous.
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_root: "http://localhost:8000/api".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(600),
        }
    }
}

/// The six lifecycle calls a stack exposes. No call is retried.
#[async_trait::async_trait]
pub trait BackendClient: Send + Sync {
    async fn reset(&self, stack: &str) -> Result<(), BackendError>;

    async fn list_files(&self, stack: &str) -> Result<Vec<String>, BackendError>;

    async fn add_files(&self, stack: &str, files: &[UploadFile]) -> Result<(), BackendError>;

    async fn clear_files(&self, stack: &str) -> Result<(), BackendError>;

    async fn add_conversation(&self, stack: &str, text: &str)
        -> Result<Vec<Answer>, BackendError>;

    async fn clear_conversation(&self, stack: &str) -> Result<(), BackendError>;

    /// Runs `request` through the matching call.
    async fn execute(
        &self,
        stack: &str,
        request: &BackendRequest,
    ) -> Result<BackendReply, BackendError> {
        match request {
            BackendRequest::Reset => self.reset(stack).await.map(|()| BackendReply::Done),
            BackendRequest::ListFiles => self.list_files(stack).await.map(BackendReply::Files),
            BackendRequest::AddFiles(files) => self
                .add_files(stack, files)
                .await
                .map(|()| BackendReply::Done),
            BackendRequest::ClearFiles => {
                self.clear_files(stack).await.map(|()| BackendReply::Done)
            }
            BackendRequest::AddConversation(text) => self
                .add_conversation(stack, text)
                .await
                .map(BackendReply::Answers),
            BackendRequest::ClearConversation => self
                .clear_conversation(stack)
                .await
                .map(|()| BackendReply::Done),
        }
    }
}

#[derive(Serialize)]
struct ConversationTurn<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Clone)]
pub struct ReqwestBackendClient {
    settings: ClientSettings,
    client: reqwest::Client,
}

impl ReqwestBackendClient {
    pub fn new(settings: ClientSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, stack: &str, action: &str) -> Result<reqwest::Url, BackendError> {
        let root = self.settings.api_root.trim_end_matches('/');
        let raw = format!("{root}/{stack}/{action}");
        reqwest::Url::parse(&raw).map_err(|err| BackendError::InvalidUrl(format!("{raw}: {err}")))
    }

    async fn post_empty(&self, stack: &str, request: &BackendRequest) -> Result<(), BackendError> {
        let url = self.endpoint(stack, request.name())?;
        chat_debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response).await.map(drop)
    }
}

#[async_trait::async_trait]
impl BackendClient for ReqwestBackendClient {
    async fn reset(&self, stack: &str) -> Result<(), BackendError> {
        self.post_empty(stack, &BackendRequest::Reset).await
    }

    async fn list_files(&self, stack: &str) -> Result<Vec<String>, BackendError> {
        let url = self.endpoint(stack, BackendRequest::ListFiles.name())?;
        chat_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(ensure_success(response).await?).await
    }

    async fn add_files(&self, stack: &str, files: &[UploadFile]) -> Result<(), BackendError> {
        let url = self.endpoint(stack, "add-files")?;
        let mut form = Form::new();
        for file in files {
            form = form.part("files", file_part(file).await?);
        }
        chat_debug!("POST {} ({} file(s))", url, files.len());
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        ensure_success(response).await.map(drop)
    }

    async fn clear_files(&self, stack: &str) -> Result<(), BackendError> {
        self.post_empty(stack, &BackendRequest::ClearFiles).await
    }

    async fn add_conversation(
        &self,
        stack: &str,
        text: &str,
    ) -> Result<Vec<Answer>, BackendError> {
        let url = self.endpoint(stack, "add-conversation")?;
        chat_debug!("POST {} ({} chars)", url, text.chars().count());
        let response = self
            .client
            .post(url)
            .json(&ConversationTurn { text })
            .send()
            .await
            .map_err(map_reqwest_error)?;
        decode_json(ensure_success(response).await?).await
    }

    async fn clear_conversation(&self, stack: &str) -> Result<(), BackendError> {
        self.post_empty(stack, &BackendRequest::ClearConversation)
            .await
    }
}

/// Streams one file from disk as a `files` multipart part.
async fn file_part(file: &UploadFile) -> Result<Part, BackendError> {
    let file_error = |err: std::io::Error| BackendError::File {
        name: file.name.clone(),
        message: err.to_string(),
    };
    let handle = tokio::fs::File::open(&file.path).await.map_err(file_error)?;
    let length = handle.metadata().await.map_err(file_error)?.len();
    let body = reqwest::Body::wrap_stream(ReaderStream::new(handle));
    Ok(Part::stream_with_length(body, length).file_name(file.name.clone()))
}

async fn ensure_success(response: Response) -> Result<Response, BackendError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(err) => {
            chat_warn!("Could not read error body for {}: {}", status, err);
            Default::default()
        }
    };
    Err(BackendError::Status {
        status: status.as_u16(),
        message: error_message(status, &body),
    })
}

/// Prefers the backend's `{message}`; otherwise any plain text, then the status line.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(parsed) = serde_json::from_slice::<ErrorBody>(body) {
        return parsed.message;
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status.to_string()
    } else {
        text.to_string()
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| BackendError::Decode(err.to_string()))
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::Transport(format!("request timed out: {err}"));
    }
    BackendError::Transport(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_json_message() {
        let msg = error_message(StatusCode::TOO_MANY_REQUESTS, br#"{"message":"slow down"}"#);
        assert_eq!(msg, "slow down");
    }

    #[test]
    fn error_message_falls_back_to_text_then_status() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b"  upstream died \n"),
            "upstream died"
        );
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b""),
            "502 Bad Gateway"
        );
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = ReqwestBackendClient::new(ClientSettings {
            api_root: "http://localhost:8000/api/".into(),
            ..ClientSettings::default()
        })
        .unwrap();
        assert_eq!(
            client.endpoint("openai", "list-files").unwrap().as_str(),
            "http://localhost:8000/api/openai/list-files"
        );
    }
}
