use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};

use crate::core::config::Settings;

const SOURCE_TAG: &str = "ai";

/// An exercise candidate parsed out of the model response, ready to be
/// persisted by the caller. This component itself stores nothing.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GeneratedExercise {
    pub(crate) code: String,
    pub(crate) kind: String,
    pub(crate) question: String,
    pub(crate) options: Vec<String>,
    pub(crate) correct_index: Option<i64>,
    pub(crate) solution: Option<String>,
    pub(crate) explanation: Option<String>,
    pub(crate) concepts: Vec<String>,
    pub(crate) estimated_time: Option<String>,
    pub(crate) subject: String,
    pub(crate) level: String,
    pub(crate) source: String,
}

#[derive(Debug, Clone)]
pub(crate) struct GenerateRequest {
    pub(crate) course_content: String,
    pub(crate) subject: String,
    pub(crate) level: String,
    pub(crate) count: usize,
    pub(crate) kinds: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeneratorStatus {
    pub(crate) configured: bool,
    pub(crate) model: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ExerciseGenerator {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    max_output_tokens: u32,
    temperature: f64,
    top_p: f64,
    top_k: u32,
    content_char_budget: usize,
}

impl ExerciseGenerator {
    pub(crate) fn from_settings(settings: &Settings) -> Result<Self> {
        let ai = settings.ai();
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(ai.request_timeout))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: resolve_api_key(&ai.gemini_api_key, &ai.config_file),
            base_url: ai.gemini_base_url.trim_end_matches('/').to_string(),
            model: ai.model.clone(),
            max_output_tokens: ai.max_output_tokens,
            temperature: ai.temperature,
            top_p: ai.top_p,
            top_k: ai.top_k,
            content_char_budget: ai.content_char_budget,
        })
    }

    pub(crate) fn status(&self) -> GeneratorStatus {
        GeneratorStatus { configured: self.api_key.is_some(), model: self.model.clone() }
    }

    /// Produce up to `request.count` exercise candidates from course text.
    ///
    /// Every failure mode — missing credential, transport error, non-2xx
    /// status, malformed model output — degrades to an empty list. Nothing
    /// distinguishes the causes for the caller, and no retry is attempted;
    /// failures are only logged.
    pub(crate) async fn generate(&self, request: GenerateRequest) -> Vec<GeneratedExercise> {
        let Some(api_key) = self.api_key.as_ref() else {
            tracing::warn!("No Gemini API key configured; skipping exercise generation");
            return Vec::new();
        };

        let kinds = match &request.kinds {
            Some(kinds) if !kinds.is_empty() => kinds.clone(),
            _ => default_kinds(&request.subject),
        };
        let prompt = build_prompt(&request, &kinds, self.content_char_budget);

        let payload = json!({
            "contents": [{"parts": [{"text": prompt}]}],
            "generationConfig": {
                "temperature": self.temperature,
                "topP": self.top_p,
                "topK": self.top_k,
                "maxOutputTokens": self.max_output_tokens,
            }
        });

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        tracing::info!(
            subject = %request.subject,
            count = request.count,
            "Requesting exercise generation"
        );

        let response =
            match self.client.post(&url).query(&[("key", api_key)]).json(&payload).send().await {
                Ok(response) => response,
                Err(err) => {
                    tracing::error!(error = %err, "Gemini request failed");
                    return Vec::new();
                }
            };

        let status = response.status();
        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(error = %err, "Failed to read Gemini response body");
                return Vec::new();
            }
        };

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Gemini returned an error");
            return Vec::new();
        }

        let Some(text) = extract_text(&body) else {
            tracing::error!("Gemini response carried no text candidate");
            return Vec::new();
        };

        let exercises =
            parse_exercises(&text, &request.subject, &request.level, request.count);

        tracing::info!(
            subject = %request.subject,
            generated = exercises.len(),
            "Exercise generation completed"
        );

        exercises
    }
}

/// Credential lookup order: process environment first (the deployment
/// platform injects secrets there, and dotenv fills it from `.env` at
/// startup), then the local JSON config file. First match wins.
fn resolve_api_key(env_key: &str, config_file: &str) -> Option<String> {
    if !env_key.is_empty() {
        return Some(env_key.to_string());
    }

    let path = Path::new(config_file);
    if path.exists() {
        if let Ok(raw) = std::fs::read_to_string(path) {
            if let Ok(config) = serde_json::from_str::<Value>(&raw) {
                if let Some(key) = config.get("GEMINI_API_KEY").and_then(Value::as_str) {
                    if !key.is_empty() {
                        return Some(key.to_string());
                    }
                }
            }
        }
    }

    None
}

fn default_kinds(subject: &str) -> Vec<String> {
    let lowered = subject.to_lowercase();
    let kinds: &[&str] = if lowered.contains("statisti") || lowered.contains("probab") {
        &["multiple_choice", "calculation", "applied_problem", "true_false"]
    } else if lowered.contains("program") || lowered.contains("algorith") {
        &["code_completion", "debugging", "algorithm", "multiple_choice"]
    } else if lowered.contains("exploitation") || lowered.contains("donnée") || lowered.contains("data") {
        &["multiple_choice", "pandas", "case_analysis", "sql"]
    } else {
        &["multiple_choice", "practice", "problem"]
    };

    kinds.iter().map(|kind| kind.to_string()).collect()
}

fn build_prompt(request: &GenerateRequest, kinds: &[String], char_budget: usize) -> String {
    let content = truncate_chars(&request.course_content, char_budget);

    format!(
        r#"You are an expert data-science educator specialized in {subject}.

**COURSE MATERIAL:**
{content}

**TASK:**
Generate exactly {count} pedagogical exercises at level {level} for undergraduate data-science students.

**EXERCISE KINDS TO USE:**
{kinds}

**OUTPUT FORMAT (strict JSON):**
Return ONLY a valid JSON array, with no text before or after, using this structure:

```json
[
  {{
    "type": "multiple_choice",
    "question": "A clear, precise question",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correct_index": 0,
    "explanation": "Detailed explanation of the answer",
    "difficulty": "{level}",
    "concepts": ["concept1", "concept2"],
    "estimated_time": "5 min"
  }},
  {{
    "type": "calculation",
    "question": "Full problem statement with data",
    "solution": "Step-by-step solution",
    "explanation": "Method and reasoning",
    "difficulty": "{level}",
    "concepts": ["concept1"],
    "estimated_time": "10 min"
  }}
]
```

**QUALITY CRITERIA:**
1. Questions based ONLY on the course material above
2. Logical difficulty progression
3. Clear, pedagogical explanations
4. Verifiable, correct calculations
5. Avoid questions that are trivially easy or needlessly hard
6. Realistic, applicable context

**KIND DETAILS:**

- **multiple_choice**: 4 options, exactly 1 correct, pedagogical distractors
- **calculation**: numeric data, step-by-step resolution
- **code_completion**: code skeleton with missing parts
- **debugging**: code with errors to identify and fix
- **applied_problem**: realistic business case to solve
- **true_false**: statement with mandatory justification
- **algorithm**: pseudo-code or flowchart
- **sql**: query to write against a given schema
- **pandas**: DataFrame manipulation

Generate the exercises now as pure JSON:
"#,
        subject = request.subject,
        content = content,
        count = request.count,
        level = request.level,
        kinds = kinds.join(", "),
    )
}

/// Char-bounded prefix; the model is not assumed to accept arbitrary input.
fn truncate_chars(text: &str, budget: usize) -> &str {
    match text.char_indices().nth(budget) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

fn extract_text(body: &Value) -> Option<String> {
    let parts = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: String =
        parts.iter().filter_map(|part| part.get("text").and_then(Value::as_str)).collect();

    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Strip a surrounding fenced code block, if any, and keep its payload.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();

    if let Some(after) = trimmed.split_once("```json").map(|(_, rest)| rest) {
        return after.split("```").next().unwrap_or(after).trim();
    }
    if let Some(after) = trimmed.split_once("```").map(|(_, rest)| rest) {
        return after.split("```").next().unwrap_or(after).trim();
    }

    trimmed
}

/// Parse the model output as a strict JSON array and keep the first `count`
/// elements that are object-shaped with a non-empty question, enriched with
/// a generated code and the requested subject/level labels.
fn parse_exercises(
    text: &str,
    subject: &str,
    level: &str,
    count: usize,
) -> Vec<GeneratedExercise> {
    let payload = strip_code_fences(text);

    let parsed: Value = match serde_json::from_str(payload) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::error!(error = %err, "Failed to parse model output as JSON");
            return Vec::new();
        }
    };

    let Value::Array(items) = parsed else {
        tracing::error!("Model output is not a JSON array");
        return Vec::new();
    };

    let code_prefix = subject.replace(' ', "_");
    let mut exercises = Vec::new();

    for (index, item) in items.into_iter().take(count).enumerate() {
        let Value::Object(fields) = item else {
            continue;
        };

        let question = fields
            .get("question")
            .and_then(Value::as_str)
            .map(str::trim)
            .unwrap_or_default();
        if question.is_empty() {
            continue;
        }

        exercises.push(GeneratedExercise {
            code: format!("{}_{}", code_prefix, index + 1),
            kind: fields
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("exercise")
                .to_string(),
            question: question.to_string(),
            options: string_list(fields.get("options")),
            correct_index: fields.get("correct_index").and_then(Value::as_i64),
            solution: owned_string(fields.get("solution")),
            explanation: owned_string(fields.get("explanation")),
            concepts: string_list(fields.get("concepts")),
            estimated_time: owned_string(fields.get("estimated_time")),
            subject: subject.to_string(),
            level: level.to_string(),
            source: SOURCE_TAG.to_string(),
        });
    }

    exercises
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(|item| item.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn owned_string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(|item| item.to_string())
}
