//! Small utility helpers used across modules.

const FENCE: &str = "```";

/// Language tags stripped even when glued to the content (e.g. "```json{").
const KNOWN_TAGS: [&str; 3] = ["json", "python", "py"];

/// Very small and safe string templating.
/// Replaces occurrences of `{key}` in the template with provided values.
pub fn fill_template(tpl: &str, pairs: &[(&str, &str)]) -> String {
  let mut out = tpl.to_string();
  for (k, v) in pairs {
    let needle = format!("{{{}}}", k);
    out = out.replace(&needle, v);
  }
  out
}

/// Strip markdown code-fence markers wrapping `text`.
///
/// Removes a trailing bare fence and a leading fence with an optional language
/// tag, trimming whitespace. Repeats until nothing changes, so the result is a
/// fixpoint: `clean_title(clean_title(s)) == clean_title(s)`. Text without
/// fences is returned trimmed.
pub fn clean_title(text: &str) -> String {
  let mut current = text.trim();
  loop {
    let next = strip_fence_once(current);
    if next.len() == current.len() {
      return current.to_string();
    }
    current = next;
  }
}

fn strip_fence_once(s: &str) -> &str {
  let mut out = s;
  if let Some(rest) = out.strip_suffix(FENCE) {
    out = rest.trim_end();
  }
  if let Some(rest) = out.strip_prefix(FENCE) {
    out = strip_language_tag(rest).trim();
  }
  out
}

/// Drop a language tag right after an opening fence.
///
/// Any tag counts when it sits alone on the fence line. The tags in
/// `KNOWN_TAGS` also count when glued straight onto a JSON payload or closing
/// the text. A word followed by more prose on the same line is content.
fn strip_language_tag(rest: &str) -> &str {
  let tag_len = rest
    .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '-')))
    .unwrap_or(rest.len());
  if tag_len == 0 {
    return rest;
  }
  let (tag, after) = rest.split_at(tag_len);
  let alone_on_line = after.trim_start_matches([' ', '\t', '\r']).starts_with('\n');
  let glued = after.is_empty() || after.starts_with(['{', '[']);
  if alone_on_line || (glued && KNOWN_TAGS.contains(&tag)) {
    after
  } else {
    rest
  }
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with whole model responses.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}
