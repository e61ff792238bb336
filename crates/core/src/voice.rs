//! Static language-to-voice mapping for the speech provider.

/// Voice used when a customer's preferred language has no mapping.
pub const DEFAULT_VOICE_ID: &str = "73c0b6a2e29d4d38aca41454bf58c955";

/// Known language tags and their provider voice IDs.
///
/// Tags are lowercase ISO 639-1. Anything not listed falls back to
/// [`DEFAULT_VOICE_ID`].
pub const LANGUAGE_VOICES: &[(&str, &str)] = &[
    ("en", DEFAULT_VOICE_ID),
    ("hi", "1bd001e7e50f421d891986aad5158bc8"),
    ("ta", "f8c69e517f424cafaecde32dde57096b"),
    ("te", "2d5b0e6cf36f460aa7fc47e3eee4ba54"),
    ("mr", "42d598350e7a4d339a1875d3e5a2d85f"),
];

/// Resolve the voice ID for a language tag.
///
/// Matching is case-insensitive. Unmapped tags resolve to the default
/// voice rather than an error.
pub fn voice_for_language(language: &str) -> &'static str {
    let tag = language.trim().to_ascii_lowercase();
    LANGUAGE_VOICES
        .iter()
        .find(|(lang, _)| *lang == tag)
        .map(|(_, voice)| *voice)
        .unwrap_or(DEFAULT_VOICE_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_maps_to_default_voice() {
        assert_eq!(voice_for_language("en"), DEFAULT_VOICE_ID);
    }

    #[test]
    fn hindi_has_its_own_voice() {
        assert_ne!(voice_for_language("hi"), DEFAULT_VOICE_ID);
    }

    #[test]
    fn unmapped_language_falls_back_to_default() {
        assert_eq!(voice_for_language("xx"), DEFAULT_VOICE_ID);
    }

    #[test]
    fn matching_ignores_case_and_whitespace() {
        assert_eq!(voice_for_language(" HI "), voice_for_language("hi"));
    }

    #[test]
    fn empty_language_falls_back_to_default() {
        assert_eq!(voice_for_language(""), DEFAULT_VOICE_ID);
    }
}
