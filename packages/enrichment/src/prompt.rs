use serde_json::json;
use userinsight_shared::InsightsRequest;

/// Prefix sent ahead of every prompt, regardless of backend.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON. No markdown. No backticks.";

/// Prepend the JSON-only instruction to a task prompt.
pub fn with_json_instruction(prompt: &str) -> String {
    format!("{JSON_ONLY_INSTRUCTION}\n{prompt}")
}

/// Build the prompt for scoring the sentiment of free text.
pub fn build_sentiment_prompt(text: &str) -> String {
    format!(
        "\nAnalyze sentiment of this text and return JSON only:\n\
         {{\"sentimentScore\": -1..1, \"label\":\"Positive|Neutral|Negative\"}}\n\
         Text: {text}\n"
    )
}

/// Build the prompt for extracting short themes from free text.
pub fn build_tags_prompt(text: &str) -> String {
    format!(
        "\nExtract 3-8 short themes/tags. Return JSON only:\n\
         {{\"tags\":[\"tag1\",\"tag2\",...]}}\n\
         Rules: tags are 1-3 words each.\n\
         Text: {text}\n"
    )
}

/// Build the prompt for narrative insights about a user profile.
///
/// The profile is embedded as compact JSON with every field present, so the
/// model sees `null` rather than a missing key for unknown values.
pub fn build_insights_prompt(profile: &InsightsRequest) -> String {
    let user = json!({
        "firstName": profile.first_name,
        "lastName": profile.last_name,
        "email": profile.email,
        "notes": profile.notes,
    });

    let mut prompt = String::new();
    prompt.push_str("\nGiven the user profile, generate JSON only:\n");
    prompt.push_str("{\n");
    prompt.push_str("  \"summary\": \"1-2 lines\",\n");
    prompt.push_str("  \"engagementLevel\": \"Low|Medium|High\",\n");
    prompt.push_str("  \"recommendedActions\": [\"action1\",\"action2\"]\n");
    prompt.push_str("}\n");
    prompt.push_str(&format!("User: {user}\n"));
    prompt
}
