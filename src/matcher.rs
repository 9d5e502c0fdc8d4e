//! Transcript-to-phrase matching

/// Return the first phrase in `phrases` that occurs in `transcript`.
///
/// The transcript is trimmed and lowercased before comparison, and phrases
/// are compared case-insensitively. When several phrases occur in the same
/// transcript, list order decides; callers that care should put longer or
/// more specific phrases first. At most one phrase is returned per
/// transcript, however many times it occurs.
pub fn match_phrase<'a>(transcript: &str, phrases: &'a [String]) -> Option<&'a str> {
    let normalized = transcript.trim().to_lowercase();

    phrases
        .iter()
        .find(|phrase| normalized.contains(&phrase.to_lowercase()))
        .map(String::as_str)
}
