//! Model invocation contract.
//!
//! A gateway sends one transcript and returns the model's raw text. It never
//! retries; every failure is one of three kinds and is fatal to the caller's
//! task.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::prompt::PromptTranscript;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("model call timed out")]
    Timeout,

    /// Transport or service failure other than a timeout.
    #[error("model upstream error: {0}")]
    Upstream(String),

    /// The call succeeded but carried no usable text.
    #[error("model returned no usable text")]
    EmptyResponse,
}

impl GatewayError {
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Stable label for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Upstream(_) => "upstream",
            Self::EmptyResponse => "empty_response",
        }
    }
}

#[async_trait]
pub trait ModelGateway: Send + Sync {
    async fn invoke(&self, transcript: &PromptTranscript) -> Result<String, GatewayError>;
}

#[async_trait]
impl<G> ModelGateway for Arc<G>
where
    G: ModelGateway + ?Sized,
{
    async fn invoke(&self, transcript: &PromptTranscript) -> Result<String, GatewayError> {
        (**self).invoke(transcript).await
    }
}

/// Accept model content only when it has visible text. The text itself is
/// returned unchanged.
pub fn usable_text(content: Option<String>) -> Result<String, GatewayError> {
    match content {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(GatewayError::EmptyResponse),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptMessage;
    use crate::testing::ScriptedGateway;

    #[test]
    fn blank_content_is_an_empty_response() {
        assert_eq!(usable_text(None), Err(GatewayError::EmptyResponse));
        assert_eq!(usable_text(Some(String::new())), Err(GatewayError::EmptyResponse));
        assert_eq!(usable_text(Some(" \n\t".to_string())), Err(GatewayError::EmptyResponse));
        assert_eq!(usable_text(Some("  ok \n".to_string())), Ok("  ok \n".to_string()));
    }

    #[tokio::test]
    async fn shared_gateway_forwards_to_the_inner_one() {
        let inner = ScriptedGateway::replying("hello");
        let shared: Arc<dyn ModelGateway> = Arc::new(inner.clone());

        let transcript: PromptTranscript = [PromptMessage::user("hi")].into_iter().collect();
        assert_eq!(shared.invoke(&transcript).await.unwrap(), "hello");
        assert_eq!(inner.transcripts(), vec![transcript]);
    }
}
