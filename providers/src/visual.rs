//! Turn an image challenge's prompts into images.
//!
//! For image challenges the generator returns two image-generator prompts as
//! option content. Both renders run concurrently and the round only succeeds
//! when both do: the first failure drops the other future.

use authease_types::{Challenge, ChallengeOption, MediaType, OptionContent};

use crate::{ProviderError, VisualGenerator};

/// Replace both option prompts with rendered images.
///
/// Non-image challenges are returned unchanged.
pub async fn resolve_visual_pair<V>(
    generator: &V,
    challenge: Challenge,
) -> Result<Challenge, ProviderError>
where
    V: VisualGenerator,
{
    if challenge.media() != MediaType::Image {
        return Ok(challenge);
    }

    let id = challenge.id().clone();
    let difficulty = challenge.difficulty();
    let narrative = challenge.narrative().to_string();
    let (option_a, option_b) = challenge.into_options();

    let (image_a, image_b) = tokio::try_join!(
        generator.generate_visual(prompt_of(&option_a)),
        generator.generate_visual(prompt_of(&option_b)),
    )?;
    tracing::debug!(
        challenge = %id,
        a_bytes = image_a.approx_bytes(),
        b_bytes = image_b.approx_bytes(),
        "Rendered challenge visuals"
    );

    Ok(Challenge::new(
        id,
        MediaType::Image,
        difficulty,
        narrative,
        option_a.with_content(OptionContent::Image(image_a)),
        option_b.with_content(OptionContent::Image(image_b)),
    ))
}

fn prompt_of(option: &ChallengeOption) -> &str {
    option.content().as_text().unwrap_or_default()
}
