//! Diff rendering for fixture comparison.

/// Render a text diff between expected and actual output.
///
/// Outputs are usually one line, so a differing line count is reported
/// as a trailing hunk of the unmatched lines.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");
    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();
    for (i, (e, a)) in expected_lines.iter().zip(&actual_lines).enumerate() {
        if e != a {
            out.push_str(&format!("@@ line {} @@\n", i + 1));
            out.push_str(&format!("-{e}\n"));
            out.push_str(&format!("+{a}\n"));
        }
    }
    let common = expected_lines.len().min(actual_lines.len());
    if expected_lines.len() != actual_lines.len() {
        out.push_str(&format!("@@ line {} @@\n", common + 1));
        for e in &expected_lines[common..] {
            out.push_str(&format!("-{e}\n"));
        }
        for a in &actual_lines[common..] {
            out.push_str(&format!("+{a}\n"));
        }
    }
    out
}
