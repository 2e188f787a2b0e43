//! Bullet-point summarization via an OpenAI-compatible chat endpoint.
//!
//! One completion request is made per query group. The user prompt is a
//! concatenation of `- title: description` lines, newest articles first,
//! bounded by a fixed character budget; older articles are elided when
//! the budget runs out. The response is parsed into bullet points by
//! splitting lines and stripping list markers.
//!
//! The [`ChatCompleter`] trait is the seam between prompt construction
//! and the HTTP call, so tests can substitute a canned model.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{Error, Result};
use crate::models::{Article, Summary};
use crate::utils::truncate_for_log;

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Character budget for the article lines of one user prompt. Keeps the
/// request comfortably inside the model's input limit.
const PROMPT_CHAR_BUDGET: usize = 6_000;

/// Per-article clamp so one verbose description cannot starve the rest.
const DESCRIPTION_CLAMP: usize = 300;

const SYSTEM_PROMPT: &str = "You are an expert in healthcare IT, EHR systems, and regulatory \
    compliance. Summarize ONLY healthcare IT related news in a concise, informative manner for \
    EHR developers and healthcare IT professionals. Ignore any news not directly related to \
    healthcare IT, EHR systems, or health technology. Respond with a short list of bullet \
    points, one per line, each line starting with \"- \".";

/// Leading list markers: `-`, `*`, `•`, or `1.` / `1)` numbering.
static BULLET_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*•]+|\d+[.)])\s*").unwrap());

/// A chat model that turns a system instruction and a user prompt into text.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// OpenAI chat-completions client.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    model: String,
}

impl fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| {
                Error::Configuration(format!("failed to build completion HTTP client: {e}"))
            })?;
        Ok(Self {
            http,
            api_key,
            model,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl ChatCompleter for OpenAiClient {
    #[instrument(level = "info", skip_all, fields(model = %self.model))]
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.2,
        };

        let t0 = Instant::now();
        let response = self
            .http
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Summarization(format!("request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Summarization(format!("failed to read response: {e}")))?;
        let elapsed_ms = t0.elapsed().as_millis();

        if !status.is_success() {
            warn!(
                %status,
                elapsed_ms,
                body_preview = %truncate_for_log(&body, 300),
                "Completion API returned an error"
            );
            return Err(Error::Summarization(format!(
                "completion API returned HTTP {status}"
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, body_preview = %truncate_for_log(&body, 300), "Unparseable completion response");
            Error::Summarization(format!("invalid completion response: {e}"))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::Summarization("model returned an empty response".to_string()))?;

        info!(elapsed_ms, response_bytes = content.len(), "Completion succeeded");
        Ok(content)
    }
}

/// Produces one [`Summary`] per query group from an article set.
pub struct Summarizer {
    completer: Arc<dyn ChatCompleter>,
}

impl Summarizer {
    pub fn new(completer: Arc<dyn ChatCompleter>) -> Self {
        Self { completer }
    }

    /// Summarize one group of articles into bullet points.
    ///
    /// Fails with [`Error::Summarization`] when the completion call fails
    /// or the response yields no usable bullet points; the caller omits
    /// the summary for this group and reports the error without aborting
    /// the other groups.
    #[instrument(level = "info", skip_all, fields(label = %label, articles = articles.len()))]
    pub async fn summarize_group(&self, label: &str, articles: &[Article]) -> Result<Summary> {
        if articles.is_empty() {
            return Err(Error::Summarization(format!(
                "no articles to summarize for {label}"
            )));
        }

        let prompt = build_user_prompt(label, articles);
        let response = self.completer.complete(SYSTEM_PROMPT, &prompt).await?;

        let bullet_points = parse_bullets(&response);
        if bullet_points.is_empty() {
            warn!(
                label,
                response_preview = %truncate_for_log(&response, 300),
                "Model response contained no bullet points"
            );
            return Err(Error::Summarization(
                "model response contained no bullet points".to_string(),
            ));
        }

        info!(label, bullets = bullet_points.len(), "Summarized group");
        Ok(Summary {
            label: label.to_string(),
            bullet_points,
        })
    }
}

/// Build the user prompt for one group: an instruction line followed by
/// `- title: description` lines, newest first, until the character budget
/// is exhausted. Older articles beyond the budget are elided entirely.
pub fn build_user_prompt(label: &str, articles: &[Article]) -> String {
    let mut by_recency: Vec<&Article> = articles.iter().collect();
    by_recency.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    let mut prompt = format!(
        "Summarize the following recent news about {label} for healthcare-IT professionals:\n\n"
    );
    let mut used = 0usize;
    let mut elided = 0usize;

    for article in by_recency {
        let description = if article.description.is_empty() {
            "No description available"
        } else {
            &article.description
        };
        let description: String = description.chars().take(DESCRIPTION_CLAMP).collect();
        let line = format!("- {}: {}\n", article.title, description);

        if used + line.len() > PROMPT_CHAR_BUDGET {
            elided += 1;
            continue;
        }
        used += line.len();
        prompt.push_str(&line);
    }

    if elided > 0 {
        debug!(label, elided, "Elided articles beyond prompt budget");
    }
    prompt
}

/// Split a model response into bullet points: one per non-empty line,
/// with list markers stripped. Markdown headers are dropped.
pub fn parse_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| BULLET_MARKER.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, Utc};

    struct CannedModel(&'static str);

    #[async_trait]
    impl ChatCompleter for CannedModel {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl ChatCompleter for FailingModel {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Err(Error::Summarization("completion API timed out".to_string()))
        }
    }

    fn article(title: &str, description: &str, age_days: i64) -> Article {
        Article {
            title: title.to_string(),
            source: "test".to_string(),
            url: format!("https://example.com/{title}"),
            published_at: Utc::now() - ChronoDuration::days(age_days),
            description: description.to_string(),
            category: None,
        }
    }

    #[test]
    fn test_parse_bullets_markers() {
        let text = "- first point\n* second point\n• third point\n2. fourth point\n";
        let bullets = parse_bullets(text);
        assert_eq!(
            bullets,
            vec!["first point", "second point", "third point", "fourth point"]
        );
    }

    #[test]
    fn test_parse_bullets_skips_headers_and_blanks() {
        let text = "## Market Trends\n\n- only point\n\n";
        assert_eq!(parse_bullets(text), vec!["only point"]);
    }

    #[test]
    fn test_prompt_contains_title_and_description() {
        let prompt = build_user_prompt(
            "Market Trends",
            &[article("Epic expands", "New hospital deals announced", 0)],
        );
        assert!(prompt.contains("Market Trends"));
        assert!(prompt.contains("- Epic expands: New hospital deals announced"));
    }

    #[test]
    fn test_prompt_budget_elides_oldest() {
        let long_description = "d".repeat(DESCRIPTION_CLAMP * 2);
        let articles: Vec<Article> = (0..40)
            .map(|i| article(&format!("story-{i}"), &long_description, i as i64))
            .collect();

        let prompt = build_user_prompt("AI in Healthcare", &articles);
        // Budget holds: roughly 19 clamped lines fit in 6000 chars.
        assert!(prompt.len() < PROMPT_CHAR_BUDGET + 200);
        // Newest article survives; the oldest is elided.
        assert!(prompt.contains("story-0"));
        assert!(!prompt.contains("story-39:"));
    }

    #[test]
    fn test_prompt_clamps_descriptions() {
        let prompt = build_user_prompt(
            "Market Trends",
            &[article("verbose", &"x".repeat(1000), 0)],
        );
        let line = prompt.lines().last().unwrap();
        assert!(line.len() < DESCRIPTION_CLAMP + 50);
    }

    #[tokio::test]
    async fn test_summarize_group_returns_bullets() {
        let summarizer = Summarizer::new(Arc::new(CannedModel(
            "- ONC issued a new rule\n- Epic announced a partnership",
        )));
        let summary = summarizer
            .summarize_group("Regulatory & Compliance", &[article("a", "b", 0)])
            .await
            .unwrap();
        assert_eq!(summary.label, "Regulatory & Compliance");
        assert_eq!(summary.bullet_points.len(), 2);
    }

    #[tokio::test]
    async fn test_summarize_group_propagates_model_failure() {
        let summarizer = Summarizer::new(Arc::new(FailingModel));
        let err = summarizer
            .summarize_group("Market Trends", &[article("a", "b", 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Summarization(_)));
    }

    #[tokio::test]
    async fn test_summarize_group_rejects_unusable_response() {
        let summarizer = Summarizer::new(Arc::new(CannedModel("   \n\n")));
        let err = summarizer
            .summarize_group("Market Trends", &[article("a", "b", 0)])
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Summarization(_)));
    }

    #[tokio::test]
    async fn test_summarize_empty_group_is_an_error() {
        let summarizer = Summarizer::new(Arc::new(CannedModel("- bullet")));
        let err = summarizer.summarize_group("Empty", &[]).await.unwrap_err();
        assert!(matches!(err, Error::Summarization(_)));
    }

    #[test]
    fn test_chat_response_parsing() {
        let json = r#"{
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "- a point"},
                "finish_reason": "stop"
            }]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.choices[0].message.content.as_deref(),
            Some("- a point")
        );
    }
}
