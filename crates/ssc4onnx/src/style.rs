use std::io::{self, IsTerminal};

use colored::{Color, Colorize};

/// Decides how report text is decorated. Passed explicitly to whatever
/// renders output; `Style::plain()` produces no escape sequences at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    colored: bool,
}

impl Style {
    pub fn plain() -> Self {
        Self { colored: false }
    }

    /// Always colored, whatever the streams are attached to.
    pub fn colored() -> Self {
        // `colored` otherwise drops colors whenever stdout is not a tty.
        colored::control::set_override(true);
        Self { colored: true }
    }

    /// Colored when stdout is a terminal.
    pub fn for_stdout() -> Self {
        Self::when(io::stdout().is_terminal())
    }

    /// Colored when stderr is a terminal.
    pub fn for_stderr() -> Self {
        Self::when(io::stderr().is_terminal())
    }

    fn when(colored: bool) -> Self {
        if colored {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn info(&self) -> String {
        self.paint("INFO:", Color::Green)
    }

    pub fn warning(&self) -> String {
        self.paint("WARNING:", Color::Yellow)
    }

    pub fn error(&self) -> String {
        self.paint("ERROR:", Color::Red)
    }

    /// A field label such as `shape:`.
    pub fn key(&self, key: &str) -> String {
        self.paint(&format!("{key}:"), Color::Blue)
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.colored {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }
}

#[test]
fn plain_has_no_escapes() {
    let style = Style::plain();
    assert_eq!(style.info(), "INFO:");
    assert_eq!(style.key("dtype"), "dtype:");
    assert!(!style.error().contains('\x1b'));
}

#[test]
fn colored_wraps_labels() {
    let style = Style::colored();
    assert_eq!(style.info(), "\x1b[32mINFO:\x1b[0m");
    assert_eq!(style.key("shape"), "\x1b[34mshape:\x1b[0m");
    assert_eq!(style.warning(), "\x1b[33mWARNING:\x1b[0m");
    assert_eq!(style.error(), "\x1b[31mERROR:\x1b[0m");
}
