// Tests for the suggestion invoker: timeout handling and fallback text.

use anyhow::anyhow;
use async_trait::async_trait;
use meetline::{fallback_text, SuggestionInvoker, SuggestionRequest, SuggestionService};
use std::sync::Arc;
use std::time::Duration;

struct Replies(String);

#[async_trait]
impl SuggestionService for Replies {
    async fn generate(&self, _request: &SuggestionRequest) -> anyhow::Result<String> {
        Ok(self.0.clone())
    }
}

struct Fails;

#[async_trait]
impl SuggestionService for Fails {
    async fn generate(&self, _request: &SuggestionRequest) -> anyhow::Result<String> {
        Err(anyhow!("quota exceeded"))
    }
}

struct Hangs;

#[async_trait]
impl SuggestionService for Hangs {
    async fn generate(&self, _request: &SuggestionRequest) -> anyhow::Result<String> {
        std::future::pending::<()>().await;
        unreachable!()
    }
}

#[test]
fn fallback_text_is_language_appropriate() {
    assert_eq!(
        fallback_text("en-US"),
        "Sorry, a suggestion could not be generated right now."
    );
    assert_eq!(
        fallback_text("ko-KR"),
        "죄송합니다. 지금은 답변 제안을 생성할 수 없습니다."
    );
    assert_eq!(fallback_text("ko"), fallback_text("ko-KR"));
    // Unknown languages get the English default
    assert_eq!(fallback_text("fr-FR"), fallback_text("en-US"));
    assert_eq!(fallback_text(""), fallback_text("en-US"));
}

#[tokio::test]
async fn successful_call_carries_the_response() {
    let invoker =
        SuggestionInvoker::new(Arc::new(Replies("Sounds good, let's proceed.".to_string())));

    let result = invoker
        .suggest("hello there", "Be brief.", "en-US")
        .await;

    assert!(result.ok);
    assert_eq!(result.response_text, "Sounds good, let's proceed.");
    assert_eq!(result.request_text, "hello there");
    assert_eq!(result.style_prompt_used, "Be brief.");
    assert_eq!(result.language_used, "en-US");
}

#[tokio::test]
async fn failure_degrades_to_fallback() {
    let invoker = SuggestionInvoker::new(Arc::new(Fails));

    let result = invoker.suggest("hello", "Be brief.", "ko-KR").await;

    assert!(!result.ok);
    assert_eq!(result.response_text, fallback_text("ko-KR"));
}

#[tokio::test]
async fn timeout_degrades_to_fallback() {
    let invoker =
        SuggestionInvoker::new(Arc::new(Hangs)).with_timeout(Duration::from_millis(50));

    let started = std::time::Instant::now();
    let result = invoker.suggest("let's sign", "Be brief.", "en-US").await;

    assert!(!result.ok);
    assert_eq!(result.response_text, fallback_text("en-US"));
    assert!(started.elapsed() < Duration::from_secs(1));
}
