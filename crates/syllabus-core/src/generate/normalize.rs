//! Normalization of free-form model replies into a JSON candidate.
//!
//! Models wrap JSON in markdown fences and prose ("Here is your plan: ...").
//! [`normalize_response`] strips fences, slices from the first `{` to the
//! last `}` and trims. It never fails; a reply with no usable object simply
//! yields a candidate that the parser will reject.
//!
//! Known gap: a reply holding several objects, or prose containing braces,
//! produces a slice spanning all of them, which is then not valid JSON.

const JSON_FENCE: &str = "```json";
const FENCE: &str = "```";

/// Remove every "```json" marker, then every remaining "```" marker.
pub fn strip_fences(text: &str) -> String {
    text.replace(JSON_FENCE, "").replace(FENCE, "")
}

/// Reduce a raw reply to its JSON object candidate.
pub fn normalize_response(raw: &str) -> String {
    let clean = strip_fences(raw);

    let sliced = match (clean.find('{'), clean.rfind('}')) {
        (Some(first), Some(last)) if first <= last => &clean[first..=last],
        _ => clean.as_str(),
    };

    sliced.trim().to_string()
}
