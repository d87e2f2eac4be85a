// Prompt template for promo generation.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Promo generation prompt template.
/// Replace: {song_name}, {description}, {emoji_instruction}, {json_only_instruction}
pub const PROMO_PROMPT_TEMPLATE: &str = r#"Generate a social media promotional post for a song with the following details:
Song Name: {song_name}
Description: {description}

Please provide a promotional post with the following structure ({emoji_instruction}):

1. Hook - A catchy text intro (1-2 emotional sentences with emojis)
2. Video Story - A detailed TikTok/Reel story concept (with emojis and text overlay instructions)
3. Caption - An engaging caption with emojis (2-3 sentences with call to action)
4. Hashtags - 8-10 trending and relevant hashtags (include music-specific and emotional tags)

{json_only_instruction}
{
  "hook": "Your emotional hook with emojis",
  "videoStory": "Your detailed video concept with emojis and instructions",
  "caption": "Your engaging caption with emojis and call to action",
  "hashtags": ["tag1", "tag2", "tag3", "tag4", "tag5", "tag6", "tag7", "tag8"]
}"#;
