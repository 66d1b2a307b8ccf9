use serde::{Deserialize, Serialize};

use super::SyntaxError;

/// Deepest parenthesis nesting accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Parenthesised groups may nest at most this deep.
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Rejects input nesting deeper than `max_depth`, pointing at the first `(` past it.
///
/// Counts raw characters, so it is exact only for leaf grammars without
/// parentheses, such as paths. The tree grammar enforces the same bound on
/// its own; this scan exists for the sharper error.
pub(crate) fn check_nesting(text: &str, max_depth: usize) -> Result<(), SyntaxError> {
    let mut depth = 0usize;
    for (offset, character) in text.char_indices() {
        match character {
            '(' => {
                depth += 1;
                if depth > max_depth {
                    log::debug!("rejecting input nested {depth} levels deep at offset {offset}");
                    return Err(SyntaxError::new(
                        text,
                        offset..offset + 1,
                        format!("parentheses nest deeper than the limit of {max_depth}"),
                    ));
                }
            }
            ')' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn within_limit() {
        assert!(check_nesting("((/a)) | (/b)", 2).is_ok());
    }

    #[test]
    fn beyond_limit_points_at_paren() {
        let error = check_nesting("(/a | ((/b)))", 2).unwrap_err();
        assert_eq!(error.span(), 7..8);
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ParseOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ParseOptions::default());
        let options: ParseOptions = serde_json::from_str(r#"{"max_depth": 3}"#).unwrap();
        assert_eq!(options.max_depth, 3);
    }
}
