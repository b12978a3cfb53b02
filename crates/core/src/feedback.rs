//! Structured interview feedback: reply schema, prompt construction, reply
//! parsing, and the [`FeedbackRequester`] that ties them to a
//! [`TextGenerator`].
//!
//! A failed or unparseable generation never aborts the pipeline. It yields
//! [`FeedbackOutcome::Degraded`], which still serializes to a stable shape
//! (`error`, `details`, `fallback_metrics`) so the write path stays uniform.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::metrics::TechnicalMetrics;
use crate::provider::TextGenerator;
use crate::types::Language;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Role assigned to the candidate's own turns in the conversation history.
pub const STUDENT_ROLE: &str = "student";

/// Speaking rate below which pacing is considered too slow.
pub const MIN_COMFORTABLE_WPM: u32 = 110;

/// Speaking rate above which pacing is considered too fast.
pub const MAX_COMFORTABLE_WPM: u32 = 160;

/// Message stored in [`DegradedFeedback::error`].
pub const DEGRADED_ERROR: &str = "Analysis generation failed.";

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// One turn of the interview conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: String,
    pub text: String,
}

impl ConversationTurn {
    pub fn student(text: impl Into<String>) -> Self {
        Self {
            role: STUDENT_ROLE.to_string(),
            text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reply schema
// ---------------------------------------------------------------------------

/// Delivery assessment from the public-speaking coach persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OratoryAssessment {
    /// Overall delivery score in `[0, 100]`.
    pub score: f64,
    pub summary: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    pub pacing_feedback: String,
}

/// Hiring decision from the recruiter persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecruiterVerdict {
    pub passed: bool,
    pub decision_rationale: String,
    pub star_method_check: String,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub red_flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementPlan {
    pub immediate_action: String,
    pub long_term_advice: String,
}

/// The three-section feedback document the generator must return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackPayload {
    pub oratory_expert: OratoryAssessment,
    pub recruiter_verdict: RecruiterVerdict,
    pub improvement_plan: ImprovementPlan,
}

/// Stand-in payload recorded when generation fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedFeedback {
    pub error: String,
    pub details: String,
    pub fallback_metrics: TechnicalMetrics,
}

/// Result of a feedback request: generated, or degraded with failure detail.
///
/// Serialized untagged, so a generated outcome is stored as the bare
/// [`FeedbackPayload`] and a degraded one as [`DegradedFeedback`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedbackOutcome {
    Generated(FeedbackPayload),
    Degraded(DegradedFeedback),
}

impl FeedbackOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, FeedbackOutcome::Degraded(_))
    }

    /// Oratory score, or `0` when no feedback was generated.
    pub fn summary_score(&self) -> f64 {
        match self {
            FeedbackOutcome::Generated(payload) => payload.oratory_expert.score,
            FeedbackOutcome::Degraded(_) => 0.0,
        }
    }

    /// Recruiter pass/fail, or `false` when no feedback was generated.
    pub fn summary_verdict(&self) -> bool {
        match self {
            FeedbackOutcome::Generated(payload) => payload.recruiter_verdict.passed,
            FeedbackOutcome::Degraded(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Reply parsing
// ---------------------------------------------------------------------------

/// Reasons a generator reply could not be turned into a [`FeedbackPayload`].
#[derive(Debug, thiserror::Error)]
pub enum FeedbackParseError {
    #[error("reply is not valid feedback JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("oratory score {0} is outside 0-100")]
    ScoreOutOfRange(f64),
}

/// Parse a generator reply, tolerating a surrounding Markdown code fence.
pub fn parse_feedback(reply: &str) -> Result<FeedbackPayload, FeedbackParseError> {
    let payload: FeedbackPayload = serde_json::from_str(strip_code_fence(reply))?;
    let score = payload.oratory_expert.score;
    if !(0.0..=100.0).contains(&score) {
        return Err(FeedbackParseError::ScoreOutOfRange(score));
    }
    Ok(payload)
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Build the single prompt sent to the generator.
///
/// The prompt is authored in English but instructs the model to write every
/// prose field in `language`.
pub fn build_prompt(
    history: &[ConversationTurn],
    metrics: &TechnicalMetrics,
    language: Language,
) -> String {
    let conversation = serde_json::to_string_pretty(history).unwrap_or_else(|_| "[]".into());
    let metrics_json = serde_json::to_string(metrics).unwrap_or_else(|_| "{}".into());
    let lang = language.feedback_name();
    let market = language.market_context();
    let wpm = metrics.wpm;

    format!(
        r#"You are an evaluation system that reviews a software engineering job interview from two expert perspectives.

INPUT
- Feedback language: {lang}
- Audio metrics: {metrics_json}
- Conversation (oldest first, the last "student" turn is the answer under review):
{conversation}

LANGUAGE REQUIREMENT
Every summary, rationale, piece of feedback and advice in your JSON reply MUST be written in {lang}.

PERSPECTIVE 1: PUBLIC SPEAKING COACH
Assess delivery, structure and clarity.
1. Toulmin model: is each claim backed by data and a warrant?
2. Cohesion: penalise circumlocution, reward concise answers.
3. Confidence: contrast hedging ("I think", "maybe") with assertive language.
4. Pacing: the measured rate is {wpm} WPM. Below {min} is too slow, above {max} is too fast.

PERSPECTIVE 2: SENIOR RECRUITER ({market} market)
Assess technical competence and behavioural fit.
1. STAR method: situation, task, action and result in behavioural answers.
2. Ownership: "I implemented" versus "we did" or "it happened".
3. Red flags: inconsistencies, shallow answers, defensiveness.

OUTPUT
Reply with JSON only, exactly in this shape:
{{
  "oratory_expert": {{
    "score": <number 0-100>,
    "summary": "<communication style summary in {lang}>",
    "strengths": ["<point>"],
    "weaknesses": ["<point>"],
    "pacing_feedback": "<pace and pause feedback in {lang}>"
  }},
  "recruiter_verdict": {{
    "passed": <boolean>,
    "decision_rationale": "<hiring justification in {lang}>",
    "star_method_check": "<STAR analysis in {lang}>",
    "soft_skills": ["<skill>"],
    "red_flags": ["<flag>"]
  }},
  "improvement_plan": {{
    "immediate_action": "<single most useful tip in {lang}>",
    "long_term_advice": "<career development advice in {lang}>"
  }}
}}
"#,
        min = MIN_COMFORTABLE_WPM,
        max = MAX_COMFORTABLE_WPM,
    )
}

// ---------------------------------------------------------------------------
// Requester
// ---------------------------------------------------------------------------

/// Requests structured feedback from a [`TextGenerator`], degrading on failure.
#[derive(Clone)]
pub struct FeedbackRequester {
    generator: Arc<dyn TextGenerator>,
}

impl FeedbackRequester {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Issue exactly one generation call and parse its reply.
    pub async fn request(
        &self,
        history: &[ConversationTurn],
        metrics: &TechnicalMetrics,
        language: Language,
    ) -> FeedbackOutcome {
        let prompt = build_prompt(history, metrics, language);

        let details = match self.generator.generate(&prompt).await {
            Ok(reply) => match parse_feedback(&reply) {
                Ok(payload) => return FeedbackOutcome::Generated(payload),
                Err(e) => e.to_string(),
            },
            Err(e) => e.to_string(),
        };

        tracing::warn!(error = %details, "Feedback generation degraded");
        FeedbackOutcome::Degraded(DegradedFeedback {
            error: DEGRADED_ERROR.to_string(),
            details,
            fallback_metrics: metrics.clone(),
        })
    }
}
