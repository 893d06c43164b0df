use tracing::warn;

use crate::domain::{
    common::entities::app_errors::CoreError,
    evidence::entities::IngredientRecord,
    explanation::{
        entities::Explanation,
        ports::{ReasoningRequest, ReasoningService},
        prompt::{SYNTHESIS_TEMPERATURE, SYSTEM_PROMPT, build_user_prompt},
    },
};

/// Asks the reasoning service for a five-section explanation of `raw_text`
/// grounded in `evidence`. Exactly one external call is made and the response
/// is returned as-is.
pub async fn synthesize<RS>(
    reasoning_service: &RS,
    raw_text: &str,
    evidence: &[IngredientRecord],
) -> Result<Explanation, CoreError>
where
    RS: ReasoningService,
{
    let request = ReasoningRequest {
        system: SYSTEM_PROMPT.to_string(),
        user: build_user_prompt(raw_text, evidence),
        temperature: SYNTHESIS_TEMPERATURE,
    };

    let text = reasoning_service
        .complete(request)
        .await
        .map_err(|e| match e {
            CoreError::SynthesisError(_) => e,
            other => CoreError::SynthesisError(other.to_string()),
        })?;

    let explanation = Explanation::new(text);
    if !explanation.is_complete() {
        warn!(
            missing = ?explanation.missing_sections,
            "reasoning response is missing expected sections"
        );
    }

    Ok(explanation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::explanation::ports::MockReasoningService;

    #[tokio::test]
    async fn test_synthesize_sends_fixed_prompt_and_returns_text_unmodified() {
        let mut reasoning = MockReasoningService::new();
        reasoning
            .expect_complete()
            .withf(|request| {
                request.system == SYSTEM_PROMPT
                    && request.temperature == SYNTHESIS_TEMPERATURE
                    && request.user
                        == "Raw ingredient text:\nsugar, maltodextrin\n\nEvidence:\n\
                            - maltodextrin: thickener"
            })
            .times(1)
            .returning(|_| Box::pin(async { Ok("  What stands out\nsugar  ".to_string()) }));

        let evidence = vec![IngredientRecord::new("maltodextrin", "thickener")];
        let explanation = synthesize(&reasoning, "sugar, maltodextrin", &evidence)
            .await
            .unwrap();

        assert_eq!(explanation.text, "  What stands out\nsugar  ");
        assert_eq!(explanation.missing_sections.len(), 4);
    }

    #[tokio::test]
    async fn test_synthesize_reports_service_failure() {
        let mut reasoning = MockReasoningService::new();
        reasoning.expect_complete().times(1).returning(|_| {
            Box::pin(async { Err(CoreError::SynthesisError("quota exceeded".to_string())) })
        });

        let result = synthesize(&reasoning, "sugar", &[]).await;

        assert_eq!(
            result,
            Err(CoreError::SynthesisError("quota exceeded".to_string()))
        );
    }

    #[tokio::test]
    async fn test_synthesize_wraps_foreign_errors() {
        let mut reasoning = MockReasoningService::new();
        reasoning.expect_complete().returning(|_| {
            Box::pin(async { Err(CoreError::ConfigError("bad key".to_string())) })
        });

        let result = synthesize(&reasoning, "sugar", &[]).await;

        assert!(matches!(result, Err(CoreError::SynthesisError(_))));
    }
}
