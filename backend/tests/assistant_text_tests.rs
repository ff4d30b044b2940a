//! Farming assistant canned text tests
//!
//! Covers keyword fallback selection, language handling and prompt building.

use proptest::prelude::*;
use shared::advice::{
    assistant_prompt, assistant_system_prompt, fallback_answer, image_analysis_failure_message,
    technical_difficulty_message, translation_prompt, FALLBACK_TOPICS,
};
use shared::Language;

/// Generate any supported language
fn language_strategy() -> impl Strategy<Value = Language> {
    proptest::sample::select(Language::ALL.to_vec())
}

/// Generate a question that mentions none of the topic keywords
fn off_topic_strategy() -> impl Strategy<Value = String> {
    "[bghjkmquvz ]{0,40}"
}

proptest! {
    /// Questions without a keyword always get the default answer
    #[test]
    fn test_off_topic_uses_default(query in off_topic_strategy()) {
        prop_assert_eq!(
            fallback_answer(Language::English, &query),
            fallback_answer(Language::English, "")
        );
    }

    /// Every language gets some non-empty answer
    #[test]
    fn test_every_language_answers(lang in language_strategy(), query in ".{0,60}") {
        prop_assert!(!fallback_answer(lang, &query).is_empty());
        prop_assert!(!technical_difficulty_message(lang).is_empty());
        prop_assert!(!image_analysis_failure_message(lang).is_empty());
    }

    /// Language codes round-trip through their parser
    #[test]
    fn test_language_code_roundtrip(lang in language_strategy()) {
        prop_assert_eq!(Language::from_code(lang.code()), lang);
    }
}

#[cfg(test)]
mod fallback_tests {
    use super::*;

    #[test]
    fn test_keyword_order_wins() {
        // "yellow" is checked before "rice"
        let both = fallback_answer(Language::English, "yellow spots on rice");
        assert_eq!(both, fallback_answer(Language::English, "yellow"));
        assert_ne!(both, fallback_answer(Language::English, "rice"));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(
            fallback_answer(Language::English, "PEST problem"),
            fallback_answer(Language::English, "pest")
        );
    }

    #[test]
    fn test_each_topic_has_distinct_answer() {
        let answers: std::collections::HashSet<_> = FALLBACK_TOPICS
            .iter()
            .map(|topic| fallback_answer(Language::English, topic))
            .collect();
        assert_eq!(answers.len(), FALLBACK_TOPICS.len());
    }

    #[test]
    fn test_languages_without_table_use_english() {
        assert_eq!(
            fallback_answer(Language::Tamil, "water"),
            fallback_answer(Language::English, "water")
        );
        assert_ne!(
            fallback_answer(Language::Hindi, "water"),
            fallback_answer(Language::English, "water")
        );
    }
}

#[cfg(test)]
mod prompt_tests {
    use super::*;

    #[test]
    fn test_assistant_prompt_appends_question() {
        let prompt = assistant_prompt(Language::English, "  When to sow wheat?  ");
        assert!(prompt.ends_with("\n\nUser Question: When to sow wheat?"));
    }

    #[test]
    fn test_each_language_has_its_own_prompt() {
        let prompt = assistant_prompt(Language::Kannada, "q");
        assert!(prompt.contains("ಕನ್ನಡ"));
        assert!(prompt.ends_with("User Question: q"));

        let mut seen = std::collections::HashSet::new();
        for lang in Language::ALL {
            assert!(seen.insert(assistant_system_prompt(lang)), "{lang:?}");
        }
    }

    #[test]
    fn test_translation_prompt() {
        let prompt = translation_prompt(Language::Punjabi, "Water the field twice a week");
        assert!(prompt.starts_with("Translate the following text to Punjabi."));
        assert!(prompt.ends_with("Text:\nWater the field twice a week"));
    }

    #[test]
    fn test_unknown_language_code() {
        assert_eq!(Language::from_code("xx"), Language::English);
    }
}
