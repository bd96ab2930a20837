//! LLM-written narrative analysis of the raw evidence.
//!
//! Optional and independent of the rule-based verdict: any provider failure
//! is logged and the narrative is simply left out of the report.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::analyzer::Evidence;
use crate::config::NarrativeConfig;
use crate::providers::{build_provider, CompletionRequest, LlmProvider, Message, Role};

/// Instructions placed ahead of the JSON-encoded logs.
const NARRATIVE_TEMPLATE: &str = "\
You are an Android power management and kernel expert. Analyze the following logs in this specific order:

**Analysis Steps:**
1. First, check `/d/suspend_stats` to determine if suspend succeeded or failed
   - Look for: success count, fail count, failed_suspend, failed_resume, etc.
   - Report: Whether suspend is working or failing

2. Second, check `dumpsys suspend_control_internal` for wakelocks
   - Look for: active wakelocks, last_failed_suspend counter, blocking components
   - Report: If any wakelocks are preventing suspend

3. Third, only if suspend failed AND no wakelocks found, analyze `dmesg` for root cause
   - Look for: suspend entry failures, driver errors, kernel messages
   - Report: Specific error messages and failing components

**Output Format:**
## Suspend Status
[Based on suspend_stats: success/failure counts and status]

## Wakelock Analysis
[Based on dumpsys: any blocking wakelocks or components]

## Root Cause (if applicable)
[Based on dmesg: only if suspend failed without wakelocks]

## Recommendations
[Specific, actionable steps to fix the issue]

**Logs:**
";

/// Generates the narrative section through an [`LlmProvider`].
#[derive(Clone)]
pub struct NarrativeReporter {
    provider: Arc<dyn LlmProvider>,
    max_log_chars: usize,
    max_tokens: u32,
}

impl NarrativeReporter {
    /// Create a reporter around an existing provider.
    pub fn new(provider: Arc<dyn LlmProvider>, max_log_chars: usize, max_tokens: u32) -> Self {
        Self {
            provider,
            max_log_chars,
            max_tokens,
        }
    }

    /// Create a reporter for the provider named in the config.
    ///
    /// # Errors
    ///
    /// Returns an error if the model spec is malformed or unsupported.
    pub fn from_config(config: &NarrativeConfig) -> anyhow::Result<Self> {
        let provider = build_provider(config)?;
        Ok(Self::new(provider, config.max_log_chars, config.max_tokens))
    }

    /// Ask the model for a narrative analysis.
    ///
    /// Returns `None` when the call fails or the model returns no text.
    pub async fn generate(&self, evidence: &Evidence) -> Option<String> {
        let prompt = build_prompt(evidence, self.max_log_chars);
        debug!(
            model = %self.provider.model_id(),
            prompt_chars = prompt.chars().count(),
            "requesting narrative"
        );

        let request = CompletionRequest {
            messages: vec![Message {
                role: Role::User,
                content: prompt,
            }],
            system: None,
            max_tokens: Some(self.max_tokens),
        };

        let response = match self.provider.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(model = %self.provider.model_id(), error = %e, "narrative generation failed");
                return None;
            }
        };

        let text = response.text.trim();
        if text.is_empty() {
            debug!("narrative response was empty");
            return None;
        }

        info!(
            model = %response.model,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "narrative generated"
        );
        Some(text.to_owned())
    }
}

/// Build the full prompt: instructions followed by the capped logs as JSON.
pub fn build_prompt(evidence: &Evidence, max_log_chars: usize) -> String {
    let logs = serde_json::json!({
        "dmesg": truncate_chars(&evidence.dmesg, max_log_chars),
        "dumpsys_suspend": truncate_chars(&evidence.wakelocks, max_log_chars),
        "suspend_stats": truncate_chars(&evidence.stats, max_log_chars),
    });
    format!("{NARRATIVE_TEMPLATE}{logs}")
}

/// First `max_chars` characters of `text`.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
