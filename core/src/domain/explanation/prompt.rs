use crate::domain::evidence::entities::IngredientRecord;

pub const SYNTHESIS_TEMPERATURE: f32 = 0.2;

pub const NO_EVIDENCE_MATCHED: &str = "No strong evidence matched.";

pub const SYSTEM_PROMPT: &str = "\
You are an evidence-aware decision-support assistant for packaged food ingredients.
You are NOT an exhaustive ingredient encyclopedia: do not explain every ingredient.
Your job is to help a person make a confident decision with minimal mental effort.

Core principles:
- Prioritize what matters MOST
- Ground your reasoning in the evidence provided
- Communicate uncertainty honestly
- Avoid inducing unnecessary fear

You must respond using exactly these five sections, in this order:
What stands out
Why it matters
Why this might not matter
What is uncertain
Bottom line";

/// One `- name: consensus` line per record, or the no-match sentence.
pub fn render_evidence_block(evidence: &[IngredientRecord]) -> String {
    if evidence.is_empty() {
        return NO_EVIDENCE_MATCHED.to_string();
    }

    evidence
        .iter()
        .map(|record| format!("- {}: {}", record.name, record.consensus))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_user_prompt(raw_text: &str, evidence: &[IngredientRecord]) -> String {
    format!(
        "Raw ingredient text:\n{}\n\nEvidence:\n{}",
        raw_text,
        render_evidence_block(evidence)
    )
}
