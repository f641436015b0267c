//! Response schemas for structured JSON output.
//!
//! Gemini accepts an OpenAPI subset with uppercase type names. These shapes
//! mirror the wire structs in [`crate::gemini`]; a response that does not fit
//! them is rejected there.

use serde_json::{Value, json};

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn number() -> Value {
    json!({ "type": "NUMBER" })
}

/// Schema for an authenticity report.
#[must_use]
pub fn score_report() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "sourceCredibility": number(),
            "manipulationRisk": number(),
            "aiSyntheticProb": number(),
            "trustIndex": number(),
            "findings": { "type": "ARRAY", "items": string() },
            "explanation": string(),
            "metadata": {
                "type": "OBJECT",
                "properties": { "forensicDetails": string() }
            }
        },
        "required": [
            "sourceCredibility",
            "manipulationRisk",
            "aiSyntheticProb",
            "trustIndex",
            "findings",
            "explanation"
        ]
    })
}

fn challenge_option() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "content": string(),
            "isAi": { "type": "BOOLEAN" },
            "explanation": string()
        },
        "required": ["content", "isAi", "explanation"]
    })
}

/// Schema for a game challenge.
#[must_use]
pub fn challenge() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": string(),
            "narrative": string(),
            "optionA": challenge_option(),
            "optionB": challenge_option()
        },
        "required": ["id", "narrative", "optionA", "optionB"]
    })
}
