//! List item detection

use serde::{Deserialize, Serialize};

/// Marker that opens a list item line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListMarker {
    /// `- ` or `* `
    Bullet,
    /// `<number>. `; holds the digits as written
    Numbered(String),
}

impl ListMarker {
    /// Text drawn in place of the marker, `None` for a bullet dot
    pub fn label(&self) -> Option<String> {
        match self {
            ListMarker::Bullet => None,
            ListMarker::Numbered(n) => Some(format!("{n}.")),
        }
    }
}

/// Detect a list item prefix on a line.
///
/// Leading whitespace is ignored. Returns the marker and the remaining content
/// (with the marker and its following space removed), or `None` if the line is
/// not a list item.
pub fn split_list_item(line: &str) -> Option<(ListMarker, &str)> {
    let trimmed = line.trim();

    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return Some((ListMarker::Bullet, rest));
    }

    let digits_end = trimmed
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(trimmed.len(), |(i, _)| i);
    if digits_end == 0 {
        return None;
    }

    let after = &trimmed[digits_end..];
    let rest = after.strip_prefix('.')?;
    let mut chars = rest.chars();
    match chars.next() {
        Some(c) if c.is_whitespace() => Some((
            ListMarker::Numbered(trimmed[..digits_end].to_string()),
            chars.as_str(),
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bullets() {
        assert_eq!(split_list_item("- apples"), Some((ListMarker::Bullet, "apples")));
        assert_eq!(split_list_item("  * pears"), Some((ListMarker::Bullet, "pears")));
    }

    #[test]
    fn test_numbered() {
        assert_eq!(
            split_list_item("12. twelfth"),
            Some((ListMarker::Numbered("12".into()), "twelfth"))
        );
        assert_eq!(
            ListMarker::Numbered("3".into()).label().as_deref(),
            Some("3.")
        );
        assert_eq!(ListMarker::Bullet.label(), None);
    }

    #[test]
    fn test_not_list_items() {
        assert_eq!(split_list_item("-dash"), None);
        assert_eq!(split_list_item("*italic*"), None);
        assert_eq!(split_list_item("3.14 is pi"), None);
        assert_eq!(split_list_item("Step 1. Given"), None);
        assert_eq!(split_list_item(""), None);
        assert_eq!(split_list_item("42."), None);
    }
}
