// Cross-cutting prompt fragments shared by every prompt template.

/// Instruction appended to prompts whose reply must be a single JSON object.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Return ONLY a JSON object in this exact format (no additional text):";

/// Style instruction for social-media copy.
pub const EMOJI_INSTRUCTION: &str = "include emojis and keep the exact format";
