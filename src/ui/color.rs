//! Color and formatting utilities for terminal output

pub struct Colors;

impl Colors {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const DIM: &'static str = "\x1b[2m";

    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const BLUE: &'static str = "\x1b[34m";
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Apply color to text if terminal supports it
pub fn colorize(text: &str, color: &str) -> String {
    if supports_formatting() {
        format!("{}{}{}", color, text, Colors::RESET)
    } else {
        text.to_string()
    }
}

/// Color for a churn rate (0..=1) compared with the alert threshold in percent
pub fn churn_color(rate: f64, alert_percent: f64) -> &'static str {
    let percent = rate * 100.0;
    if percent > alert_percent {
        Colors::RED
    } else if percent > alert_percent / 2.0 {
        Colors::YELLOW
    } else {
        Colors::GREEN
    }
}

/// Terminal capability detection
pub fn supports_formatting() -> bool {
    use std::env;
    use std::io::IsTerminal;

    if env::var("NO_COLOR").is_ok() || env::var("FORCE_COLOR").as_deref() == Ok("0") {
        return false;
    }

    if env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    // Disable formatting when running tests
    if cfg!(test) || env::var("RUST_TEST_TIME_UNIT").is_ok() {
        return false;
    }

    if !std::io::stdout().is_terminal() {
        return false;
    }

    match env::var("TERM") {
        Ok(term) if term == "dumb" || term.is_empty() => false,
        Ok(term) => {
            term.contains("color")
                || term.contains("256")
                || term.starts_with("xterm")
                || term.starts_with("screen")
                || term.starts_with("tmux")
                || term == "linux"
        }
        Err(_) => matches!(
            env::var("TERM_PROGRAM").as_deref(),
            Ok("Apple_Terminal" | "iTerm.app" | "vscode" | "Alacritty" | "kitty" | "WezTerm")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_is_plain_under_test() {
        // cfg!(test) disables formatting
        assert_eq!(colorize("Churn Rate", Colors::RED), "Churn Rate");
        assert_eq!(colorize("", Colors::GREEN), "");
    }

    #[test]
    fn test_churn_color_thresholds() {
        assert_eq!(churn_color(0.5, 20.0), Colors::RED);
        assert_eq!(churn_color(0.15, 20.0), Colors::YELLOW);
        assert_eq!(churn_color(0.05, 20.0), Colors::GREEN);
        assert_eq!(churn_color(0.0, 0.0), Colors::GREEN);
    }

    #[test]
    fn test_color_constants() {
        assert_eq!(Colors::RESET, "\x1b[0m");
        assert_eq!(Colors::BOLD, "\x1b[1m");
        assert_eq!(Colors::RED, "\x1b[31m");
        assert_eq!(Colors::CYAN, "\x1b[36m");
    }
}
