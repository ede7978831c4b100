//! Analysis service: transcript -> LLM -> clip plan or report

use tracing::{info, warn};

use crate::config::Config;
use crate::domain::model::{ClipPlan, Transcript};
use crate::error::Result;
use crate::llm::prompts::render_transcript;
use crate::llm::{parse_clip_plan, AnalysisTask, ChatBackend, ChatMessage, ChatParams, LlmClient};

/// What an analysis run produced
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// A structured clipping plan (smart-clip task)
    Plan(ClipPlan),
    /// Free-form analysis text (summary and speaker tasks)
    Report(String),
}

/// Orchestrates prompting and reply handling for one provider
pub struct AnalysisService {
    config: Config,
}

impl AnalysisService {
    /// Create an analysis service over the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Analyze a transcript with the named provider (default when `None`).
    ///
    /// `media_duration` bounds plan segments; pass the probed duration when
    /// available, otherwise the transcript's own extent works.
    pub async fn analyze(
        &self,
        transcript: &Transcript,
        task: AnalysisTask,
        provider: Option<&str>,
        media_duration: f64,
    ) -> Result<AnalysisOutcome> {
        let provider_name = provider.unwrap_or(&self.config.default_provider);
        let provider_config = self.config.provider(provider_name)?;
        let client = LlmClient::new(provider_name, provider_config)?;

        info!(
            "Requesting {:?} analysis from provider '{}'",
            task, provider_name
        );
        Self::analyze_with_backend(&client, transcript, task, media_duration).await
    }

    /// Analyze against any chat backend; the seam the tests fake
    pub async fn analyze_with_backend(
        backend: &dyn ChatBackend,
        transcript: &Transcript,
        task: AnalysisTask,
        media_duration: f64,
    ) -> Result<AnalysisOutcome> {
        let subtitles = render_transcript(transcript);
        let messages = [
            ChatMessage::system(task.system_prompt()),
            ChatMessage::user(task.user_prompt(&subtitles)),
        ];

        let reply = backend.chat(&messages, &ChatParams::default()).await?;

        match task {
            AnalysisTask::SmartClip => {
                let mut plan = parse_clip_plan(&reply.content, &transcript.source)?;
                let dropped = plan.validate_against(media_duration);
                if dropped > 0 {
                    warn!(
                        "Dropped {} segment(s) outside the {:.1}s media duration",
                        dropped, media_duration
                    );
                }
                info!(
                    "Plan contains {} segment(s), {:.1}s total",
                    plan.segments.len(),
                    plan.total_duration()
                );
                Ok(AnalysisOutcome::Plan(plan))
            }
            AnalysisTask::Summary | AnalysisTask::SpeakerAnalysis => {
                Ok(AnalysisOutcome::Report(reply.content))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Sentence;
    use crate::llm::{ChatReply, TokenUsage};
    use async_trait::async_trait;

    /// Backend returning a canned reply
    struct FakeBackend {
        reply: String,
    }

    #[async_trait]
    impl ChatBackend for FakeBackend {
        async fn chat(&self, _messages: &[ChatMessage], _params: &ChatParams) -> Result<ChatReply> {
            Ok(ChatReply {
                content: self.reply.clone(),
                model: "fake".to_string(),
                usage: TokenUsage::default(),
            })
        }
    }

    fn make_transcript() -> Transcript {
        let mut transcript = Transcript::new("talk.mp4", "en");
        transcript
            .sentences
            .push(Sentence::new("the interesting part", 10.0, 20.0).unwrap());
        transcript
    }

    #[tokio::test]
    async fn test_smart_clip_reply_becomes_bounded_plan() {
        let backend = FakeBackend {
            reply: r#"{"segments": [
                {"start_time": 10.0, "end_time": 18.0, "description": "core point", "score": 9},
                {"start_time": 500.0, "end_time": 600.0, "description": "past the end"}
            ]}"#
            .to_string(),
        };

        let outcome = AnalysisService::analyze_with_backend(
            &backend,
            &make_transcript(),
            AnalysisTask::SmartClip,
            60.0,
        )
        .await
        .unwrap();

        match outcome {
            AnalysisOutcome::Plan(plan) => {
                assert_eq!(plan.segments.len(), 1);
                assert_eq!(plan.segments[0].description, "core point");
            }
            AnalysisOutcome::Report(_) => panic!("expected a plan"),
        }
    }

    #[tokio::test]
    async fn test_summary_reply_passes_through() {
        let backend = FakeBackend {
            reply: "A fine talk about interesting things.".to_string(),
        };

        let outcome = AnalysisService::analyze_with_backend(
            &backend,
            &make_transcript(),
            AnalysisTask::Summary,
            60.0,
        )
        .await
        .unwrap();

        match outcome {
            AnalysisOutcome::Report(report) => assert!(report.contains("fine talk")),
            AnalysisOutcome::Plan(_) => panic!("expected a report"),
        }
    }

    #[tokio::test]
    async fn test_garbage_smart_clip_reply_is_error() {
        let backend = FakeBackend {
            reply: "I could not find anything worth clipping.".to_string(),
        };

        let result = AnalysisService::analyze_with_backend(
            &backend,
            &make_transcript(),
            AnalysisTask::SmartClip,
            60.0,
        )
        .await;

        assert!(result.is_err());
    }
}
