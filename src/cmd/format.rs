/*!
Formatting primitives for human output paths.

Zero non-std dependencies; ANSI styling degrades gracefully when `NO_COLOR`
is set. Width detection is best-effort via the `COLUMNS` env var, clamped to
a sane range. JSON output paths must not use these helpers so machine output
stays clean.
*/

/// Style decisions for one render pass.
#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub term_width: usize,
}

impl StyleOptions {
    pub fn detect() -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(100);
        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none(),
            term_width: width,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Dim,
    Bold,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Dim => "2",
        Role::Bold => "1",
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/// Boxed section header with an optional dim subtitle line.
pub fn box_header(title: impl AsRef<str>, subtitle: Option<String>, style: &StyleOptions) -> String {
    let title = title.as_ref();
    let inner = title.chars().count().max(
        subtitle
            .as_deref()
            .map(|s| s.chars().count())
            .unwrap_or(0),
    ) + 2;
    let bar: String = "─".repeat(inner);
    let mut out = format!("┌{bar}┐\n│ {} │\n", pad(title, inner - 2));
    if let Some(sub) = subtitle {
        out.push_str(&format!(
            "│ {} │\n",
            color(Role::Dim, pad(&sub, inner - 2), style)
        ));
    }
    out.push_str(&format!("└{bar}┘"));
    out
}

/// Two-column table: left column padded, right column truncated to fit the
/// terminal width.
pub fn two_column(rows: &[(String, String)], style: &StyleOptions) -> String {
    let left_width = rows
        .iter()
        .map(|(l, _)| l.chars().count())
        .max()
        .unwrap_or(0);
    let right_budget = style.term_width.saturating_sub(left_width + 4).max(10);

    let mut out = String::new();
    for (left, right) in rows {
        let line = format!(
            "  {}  {}",
            color(Role::Bold, pad(left, left_width), style),
            truncate_ellipsis(right, right_budget)
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.pop();
    out
}

pub fn truncate_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        return s.to_string();
    }
    format!("{s}{}", " ".repeat(width - len))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> StyleOptions {
        StyleOptions {
            use_color: false,
            term_width: 40,
        }
    }

    #[test]
    fn truncation_preserves_short_strings() {
        assert_eq!(truncate_ellipsis("short", 10), "short");
        assert_eq!(truncate_ellipsis("exactly-10", 10), "exactly-10");
    }

    #[test]
    fn truncation_adds_ellipsis() {
        let out = truncate_ellipsis("a description that keeps going", 12);
        assert_eq!(out.chars().count(), 12);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn two_column_aligns_left_column() {
        let rows = vec![
            ("hello".to_string(), "Say hello".to_string()),
            ("lint".to_string(), "Run the linter".to_string()),
        ];
        let out = two_column(&rows, &plain());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  hello  Say hello"));
        assert!(lines[1].starts_with("  lint "));
    }

    #[test]
    fn no_color_emits_no_escapes() {
        let out = color(Role::Dim, "plain text", &plain());
        assert_eq!(out, "plain text");
    }
}
