//! Assistant Application Service
//!
//! Guardrail -> prompt -> model call -> decoder, for every assistant task.
//!
//! The model is called once per request under a timeout. When the call fails (error status,
//! timeout or no provider configured) suggestion-list tasks answer with local fallback
//! suggestions marked `source: fallback`; every other task reports the upstream failure.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;

use tight5::domain::entities::{
    FlowAnalysis, JokeImprovement, PerformanceInsights, PerformanceSummary, PlacementCandidate,
    PlacementSuggestions, RoutineJokeSummary, RoutineOptimization, WeaknessReport,
};
use tight5::domain::services::decoder::HEURISTIC_LIMIT;
use tight5::domain::services::guardrail::{is_on_topic, INVALID_INPUT_MESSAGE};
use tight5::domain::services::{
    build_prompt, decode_object, decode_suggestions, ensure_permutation, fallback,
};
use tight5::ports::to_messages;
use tight5::{AssistantTask, DomainError, LlmProvider, SuggestionSource};

/// Suggestions with their provenance
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionList {
    pub suggestions: Vec<String>,
    pub source: SuggestionSource,
}

/// Application service for model-assisted writing
pub struct AssistantService {
    provider: Option<Arc<dyn LlmProvider>>,
    timeout: Duration,
}

impl AssistantService {
    pub fn new(provider: Option<Arc<dyn LlmProvider>>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    /// Reject empty or off-topic free text before anything is sent downstream
    fn screen(task: &AssistantTask) -> Result<(), DomainError> {
        fn required(fields: &[&String]) -> Result<(), DomainError> {
            if fields.iter().any(|f| f.trim().is_empty()) {
                return Err(DomainError::Validation(INVALID_INPUT_MESSAGE.to_string()));
            }
            Ok(())
        }

        fn on_topic(text: &str) -> Result<(), DomainError> {
            if is_on_topic(text) {
                Ok(())
            } else {
                Err(DomainError::OffTopic)
            }
        }

        match task {
            AssistantTask::SetupGeneration { premise } => {
                required(&[premise])?;
                on_topic(premise)
            }
            AssistantTask::PunchlineGeneration { setup } => {
                required(&[setup])?;
                on_topic(setup)
            }
            AssistantTask::StructurePart { premise, .. } => {
                required(&[premise])?;
                on_topic(premise)
            }
            AssistantTask::JokeImprovement {
                setup,
                punchline,
                direction,
            } => {
                required(&[setup, punchline, direction])?;
                on_topic(direction)
            }
            AssistantTask::JokeAnalysis {
                setup, punchline, ..
            }
            | AssistantTask::TagSuggestion { setup, punchline } => required(&[setup, punchline]),
            AssistantTask::RoutineFlow { jokes } | AssistantTask::RoutineOptimization { jokes } => {
                if jokes.is_empty() {
                    return Err(DomainError::Validation(
                        "Routine must contain at least one joke".to_string(),
                    ));
                }
                Ok(())
            }
            AssistantTask::Placement { new_joke, .. } => required(&[&new_joke.title]),
            AssistantTask::PerformanceAnalysis { performances } => {
                if performances.is_empty() {
                    return Err(DomainError::Validation(
                        "Performances array is required".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }

    /// One model call; returns the raw completion text
    async fn complete(&self, task: &AssistantTask) -> Result<String, DomainError> {
        let request = build_prompt(task)?;
        let provider = self.provider.as_ref().ok_or_else(|| {
            DomainError::ExternalService("No model provider configured".to_string())
        })?;

        let (messages, options) = to_messages(&request);
        tracing::debug!(
            "Asking {}/{} for {}",
            provider.provider_name(),
            provider.model_id(),
            task.name()
        );
        let response = tokio::time::timeout(self.timeout, provider.complete(&messages, &options))
            .await
            .map_err(|_| {
                DomainError::ExternalService(format!(
                    "{}/{} timed out after {}s",
                    provider.provider_name(),
                    provider.model_id(),
                    self.timeout.as_secs_f32()
                ))
            })??;

        tracing::info!(
            "Model answered {} ({}, {} tokens)",
            task.name(),
            response.model,
            response.usage.total_tokens
        );

        Ok(response.content)
    }

    /// Run a suggestion-list task (setups, punchlines, structure part options, tags)
    pub async fn suggest(&self, task: AssistantTask) -> Result<SuggestionList, DomainError> {
        Self::screen(&task)?;

        match self.complete(&task).await {
            Ok(raw) => {
                let suggestions =
                    decode_suggestions(&raw, Some(HEURISTIC_LIMIT)).map_err(|e| {
                        tracing::warn!("Could not decode {} reply: {}", task.name(), e);
                        DomainError::from(e)
                    })?;
                Ok(SuggestionList {
                    suggestions,
                    source: SuggestionSource::Model,
                })
            }
            Err(DomainError::ExternalService(reason)) => match fallback::suggestions(&task) {
                Some(suggestions) => {
                    tracing::warn!(
                        "⚠️  Model call failed for {} ({}) - using fallback",
                        task.name(),
                        reason
                    );
                    Ok(SuggestionList {
                        suggestions,
                        source: SuggestionSource::Fallback,
                    })
                }
                None => Err(DomainError::ExternalService(reason)),
            },
            Err(e) => Err(e),
        }
    }

    async fn decode<T: DeserializeOwned>(&self, task: AssistantTask) -> Result<T, DomainError> {
        Self::screen(&task)?;
        let raw = self.complete(&task).await?;
        decode_object(&raw).map_err(|e| {
            tracing::warn!("Could not decode {} reply: {}", task.name(), e);
            DomainError::from(e)
        })
    }

    pub async fn improve(
        &self,
        setup: String,
        punchline: String,
        direction: String,
    ) -> Result<JokeImprovement, DomainError> {
        self.decode(AssistantTask::JokeImprovement {
            setup,
            punchline,
            direction,
        })
        .await
    }

    pub async fn analyze_joke(
        &self,
        setup: String,
        punchline: String,
        tags: Vec<String>,
    ) -> Result<WeaknessReport, DomainError> {
        self.decode(AssistantTask::JokeAnalysis {
            setup,
            punchline,
            tags,
        })
        .await
    }

    pub async fn analyze_flow(
        &self,
        jokes: Vec<RoutineJokeSummary>,
    ) -> Result<FlowAnalysis, DomainError> {
        self.decode(AssistantTask::RoutineFlow { jokes }).await
    }

    /// Proposed running order; rejected unless it uses every input id exactly once
    pub async fn optimize(
        &self,
        jokes: Vec<RoutineJokeSummary>,
    ) -> Result<RoutineOptimization, DomainError> {
        let ids: Vec<String> = jokes.iter().map(|j| j.id.clone()).collect();
        let optimization: RoutineOptimization =
            self.decode(AssistantTask::RoutineOptimization { jokes }).await?;

        ensure_permutation(&optimization.optimized_order, &ids).map_err(|e| {
            tracing::warn!(
                "Optimized order {:?} is not a permutation of {:?}",
                optimization.optimized_order,
                ids
            );
            DomainError::from(e)
        })?;

        Ok(optimization)
    }

    pub async fn placement(
        &self,
        new_joke: PlacementCandidate,
        jokes: Vec<RoutineJokeSummary>,
    ) -> Result<PlacementSuggestions, DomainError> {
        self.decode(AssistantTask::Placement { new_joke, jokes }).await
    }

    pub async fn analyze_performances(
        &self,
        performances: Vec<PerformanceSummary>,
    ) -> Result<PerformanceInsights, DomainError> {
        self.decode(AssistantTask::PerformanceAnalysis { performances })
            .await
    }
}
