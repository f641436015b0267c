//! Prompt text sent to the model.

use authease_types::{Difficulty, MediaType};

/// Prompt for typed content (text or URL).
#[must_use]
pub fn typed_analysis(media: MediaType, content: &str) -> String {
    format!("Analyze this {media} for authenticity: {content}")
}

/// Prompt that accompanies an inline file.
#[must_use]
pub fn forensic_analysis(media: MediaType) -> String {
    format!(
        "Perform a forensic analysis of this {media} for AI generation artifacts, \
         metadata anomalies, and compression inconsistencies."
    )
}

#[must_use]
pub fn challenge(media: MediaType, difficulty: Difficulty) -> String {
    let guideline = difficulty.guideline();
    let mut prompt = format!(
        "Generate a forensic literacy challenge of type {media} at {difficulty} difficulty.\n\
         Guidelines: {guideline}\n\n\
         For {media}, provide two entries: one human-authored/real and one AI-generated.\n"
    );
    if media == MediaType::Image {
        prompt.push_str(
            "The 'content' field of each entry must be a high-quality visual description \
             (a PROMPT) for an image generator.\n\
             The AI prompt should include specific instructions to include subtle artifacts \
             or markers mentioned in the explanation.\n\
             The Human prompt should describe a natural, imperfect scene.\n",
        );
    }
    prompt.push_str("\nReturn valid JSON.");
    prompt
}
