//! Small utility helpers used across modules.

/// Join a base URL and an absolute path without doubling the slash.
pub fn join_url(base: &str, path: &str) -> String {
  format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with huge error bodies from the scoring service.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) { cut -= 1; }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn join_url_normalizes_slashes() {
    assert_eq!(join_url("http://localhost:8000", "/evaluate"), "http://localhost:8000/evaluate");
    assert_eq!(join_url("http://localhost:8000//", "health"), "http://localhost:8000/health");
  }

  #[test]
  fn trunc_respects_char_boundaries() {
    assert_eq!(trunc_for_log("short", 10), "short");
    let s = "ééééé"; // 2 bytes each
    let out = trunc_for_log(s, 3);
    assert!(out.starts_with("é…"));
    assert!(out.ends_with("(10 bytes total)"));
  }
}
