/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a message date for list views.
/// Mail headers use RFC 2822; the backend may also hand back RFC 3339.
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc2822(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else {
        date.to_string()
    }
}

/// Reduce an HTML body to readable text
pub fn strip_html(s: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    // Clean up HTML entities
    let result = result
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    // Keep paragraph breaks, collapse runs of blank lines
    result
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn presence(present: bool) -> &'static str {
    if present {
        "present"
    } else {
        "missing"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Grüße aus Köln", 8), "Grüße...");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("Tue, 14 Jan 2025 09:30:00 +0000"), "Jan 14, 2025");
        assert_eq!(format_date("2025-01-14T09:30:00Z"), "Jan 14, 2025");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Hi &amp; welcome</p>"), "Hi & welcome");
        assert_eq!(
            strip_html("<div>First</div>\n\n\n\n<div>Second&nbsp;line</div>"),
            "First\n\nSecond line"
        );
        assert_eq!(strip_html("a &lt;b&gt; c"), "a <b> c");
    }
}
