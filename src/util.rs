/// Flattens a commit message onto one line and caps it at `max_chars`
/// characters, marking the cut with "...".
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    let flat = message.trim().replace(['\r', '\n'], " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = flat.chars().take(keep).collect();
    out.push_str("...");
    out
}
