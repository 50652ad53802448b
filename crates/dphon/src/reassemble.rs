//! Joining resolved tokens back into one transcription.
//!
//! Entries are joined with single spaces, then whitespace is removed before
//! closing punctuation and after opening brackets or quotes. Nothing else
//! is normalized.

/// Terminal punctuation and closing brackets/quotes: whitespace before them
/// is removed.
pub const CLOSING: [char; 12] = ['.', ',', '!', '?', ';', ':', ']', ')', '}', '»', '”', '’'];

/// Opening brackets/quotes: whitespace after them is removed.
pub const OPENING: [char; 6] = ['[', '(', '{', '«', '“', '‘'];

/// Join per-token results into the final string.
///
/// Empty placeholders between other entries keep their join position, so
/// they leave a double space behind. Placeholders at either end are dropped
/// since they could only produce leading or trailing whitespace.
pub fn reassemble<S: AsRef<str>>(entries: &[S]) -> String {
    let first = entries.iter().position(|e| !e.as_ref().is_empty());
    let Some(first) = first else {
        return String::new();
    };
    let last = entries
        .iter()
        .rposition(|e| !e.as_ref().is_empty())
        .unwrap_or(first);

    let joined = entries[first..=last]
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join(" ");
    normalize_spacing(&joined)
}

/// Remove whitespace runs that precede a [`CLOSING`] char or follow an
/// [`OPENING`] char.
pub fn normalize_spacing(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = String::new();
    let mut prev: Option<char> = None;

    for c in text.chars() {
        if c.is_whitespace() {
            pending.push(c);
            continue;
        }
        let after_opening = prev.is_some_and(|p| OPENING.contains(&p));
        if !CLOSING.contains(&c) && !after_opening {
            out.push_str(&pending);
        }
        pending.clear();
        out.push(c);
        prev = Some(c);
    }
    if !prev.is_some_and(|p| OPENING.contains(&p)) {
        out.push_str(&pending);
    }

    out
}
