//! Report line formatting and terminal styling.

use console::Style;

const PASS_GLYPH: &str = "\u{2714}";
const FAIL_GLYPH: &str = "\u{2718}";

/// Styling for report lines and diff blocks.
///
/// With `use_color` set, styling is forced so any sink receives the same
/// escape codes a terminal would; without it, output is plain text with
/// `PASS`/`FAIL` prefixes.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Whether to emit color escape codes
    pub use_color: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::color()
    }
}

impl Theme {
    /// Create a theme.
    #[must_use]
    pub const fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Colored theme.
    #[must_use]
    pub const fn color() -> Self {
        Self::new(true)
    }

    /// Plain-text theme.
    #[must_use]
    pub const fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.use_color {
            style.force_styling(true).apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn stamp(elapsed_ms: f64) -> String {
        format!("[{elapsed_ms:.4}ms]")
    }

    /// Report line for a passing test.
    #[must_use]
    pub fn pass_line(&self, description: &str, elapsed_ms: f64) -> String {
        let stamp = Self::stamp(elapsed_ms);
        if self.use_color {
            format!(
                "{} {} {}",
                self.paint(Style::new().green(), PASS_GLYPH),
                self.paint(Style::new().cyan(), &stamp),
                self.paint(Style::new().green(), &format!("{description} - Passed"))
            )
        } else {
            format!("PASS {stamp} {description}")
        }
    }

    /// Report line for a failing test.
    #[must_use]
    pub fn fail_line(&self, description: &str, elapsed_ms: f64) -> String {
        let stamp = Self::stamp(elapsed_ms);
        if self.use_color {
            format!(
                "{} {} {}",
                self.paint(Style::new().red(), FAIL_GLYPH),
                self.paint(Style::new().cyan(), &stamp),
                self.paint(Style::new().red(), &format!("{description} - Failed"))
            )
        } else {
            format!("FAIL {stamp} {description}")
        }
    }

    /// The expected half of a diff.
    #[must_use]
    pub fn expected_line(&self, rendered: &str) -> String {
        self.paint(Style::new().red(), &format!("- Expected: {rendered}"))
    }

    /// The actual half of a diff.
    #[must_use]
    pub fn actual_line(&self, rendered: &str) -> String {
        self.paint(Style::new().green(), &format!("+ Actual: {rendered}"))
    }

    /// De-emphasized trace text for unexpected failures.
    #[must_use]
    pub fn trace(&self, text: &str) -> String {
        self.paint(Style::new().black().bright(), text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod plain_tests {
        use super::*;

        #[test]
        fn test_pass_line() {
            let line = Theme::plain().pass_line("adds", 1.5);
            assert_eq!(line, "PASS [1.5000ms] adds");
        }

        #[test]
        fn test_fail_line() {
            let line = Theme::plain().fail_line("subtracts", 0.25);
            assert_eq!(line, "FAIL [0.2500ms] subtracts");
        }

        #[test]
        fn test_diff_lines_have_markers() {
            let theme = Theme::plain();
            assert_eq!(theme.expected_line("4"), "- Expected: 4");
            assert_eq!(theme.actual_line("-1"), "+ Actual: -1");
            assert_eq!(theme.trace("at adds"), "at adds");
        }
    }

    mod color_tests {
        use super::*;

        #[test]
        fn test_styling_is_forced() {
            let line = Theme::color().pass_line("adds", 1.0);
            assert!(line.contains("\u{1b}["));
            assert!(line.contains(PASS_GLYPH));
            assert!(line.contains("adds - Passed"));
        }

        #[test]
        fn test_fail_line_styled() {
            let line = Theme::color().fail_line("subtracts", 1.0);
            assert!(line.contains(FAIL_GLYPH));
            assert!(line.contains("subtracts - Failed"));
        }

        #[test]
        fn test_stamp_precision() {
            let line = Theme::color().pass_line("t", 12.34567);
            assert!(line.contains("[12.3457ms]"));
        }
    }
}
