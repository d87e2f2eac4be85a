use serde::{Deserialize, Serialize};

/// One promotional post option. Field names on the wire and in the store are camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoContent {
    pub hook: String,
    pub video_story: String,
    pub caption: String,
    pub hashtags: Vec<String>,
}

impl PromoContent {
    /// Hashtags as shown on a card: each gets a leading `#` if it lacks one.
    pub fn display_hashtags(&self) -> Vec<String> {
        self.hashtags
            .iter()
            .map(|tag| {
                if tag.starts_with('#') {
                    tag.clone()
                } else {
                    format!("#{tag}")
                }
            })
            .collect()
    }
}

/// Form input for one submission. Never persisted.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub song_name: String,
    pub description: String,
}

impl GenerationRequest {
    pub fn is_complete(&self) -> bool {
        !self.song_name.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// Rendered view of one option, numbered from 1.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoCard {
    pub option_number: usize,
    pub hook: String,
    pub video_story: String,
    pub caption: String,
    pub hashtags: Vec<String>,
}

impl PromoCard {
    pub fn from_contents(contents: &[PromoContent]) -> Vec<PromoCard> {
        contents
            .iter()
            .enumerate()
            .map(|(index, content)| PromoCard {
                option_number: index + 1,
                hook: content.hook.clone(),
                video_story: content.video_story.clone(),
                caption: content.caption.clone(),
                hashtags: content.display_hashtags(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PromoContent {
        PromoContent {
            hook: "Feel the night 🌙".to_string(),
            video_story: "Dashboard lights, empty highway".to_string(),
            caption: "Stream it tonight 🚗".to_string(),
            hashtags: vec!["synthpop".to_string(), "#nightdrive".to_string()],
        }
    }

    #[test]
    fn test_promo_content_uses_camel_case_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        assert!(value.get("videoStory").is_some());
        assert!(value.get("video_story").is_none());
    }

    #[test]
    fn test_display_hashtags_adds_missing_hash() {
        assert_eq!(sample().display_hashtags(), vec!["#synthpop", "#nightdrive"]);
    }

    #[test]
    fn test_cards_are_numbered_from_one() {
        let cards = PromoCard::from_contents(&[sample(), sample()]);
        assert_eq!(cards[0].option_number, 1);
        assert_eq!(cards[1].option_number, 2);
        assert_eq!(cards[0].hashtags[0], "#synthpop");
    }

    #[test]
    fn test_generation_request_requires_both_fields() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"songName": "Midnight Drive", "description": "  "}"#)
                .unwrap();
        assert!(!request.is_complete());

        let request: GenerationRequest = serde_json::from_str(
            r#"{"songName": "Midnight Drive", "description": "synth-pop, nostalgic"}"#,
        )
        .unwrap();
        assert!(request.is_complete());
    }
}
