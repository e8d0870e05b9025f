//! Colored terminal output for formatted outcomes.

use owo_colors::OwoColorize;

use crate::outcome::InvocationOutcome;

pub struct TextPrinter {
    pub color: Option<&'static str>,
}

impl TextPrinter {
    /// Transport failures are red, script failures yellow; `success_color` applies to successful runs.
    pub fn for_outcome(outcome: &InvocationOutcome, success_color: &str) -> Self {
        let color = match outcome {
            InvocationOutcome::TransportFailure { .. } => "red",
            InvocationOutcome::ScriptFailure { .. } => "yellow",
            InvocationOutcome::Success { .. } => match success_color {
                "cyan" => "cyan",
                "magenta" => "magenta",
                "yellow" => "yellow",
                _ => "green",
            },
        };
        Self { color: Some(color) }
    }

    pub fn plain() -> Self {
        Self { color: None }
    }

    // Text is expected to end with its own newline.
    pub fn print(&self, text: &str) {
        if let Some(c) = self.color {
            match c {
                "green" => print!("{}", text.green()),
                "cyan" => print!("{}", text.cyan()),
                "magenta" => print!("{}", text.magenta()),
                "yellow" => print!("{}", text.yellow()),
                "red" => print!("{}", text.red()),
                _ => print!("{}", text),
            }
        } else {
            print!("{}", text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn failures_ignore_configured_color() {
        let outcome = InvocationOutcome::TransportFailure { message: "offline".into() };
        assert_eq!(TextPrinter::for_outcome(&outcome, "cyan").color, Some("red"));

        let outcome = InvocationOutcome::ScriptFailure {
            message: "boom".into(),
            error_type: None,
            stack_frames: Vec::new(),
        };
        assert_eq!(TextPrinter::for_outcome(&outcome, "cyan").color, Some("yellow"));
    }

    #[test]
    fn unknown_success_color_falls_back_to_green() {
        let outcome = InvocationOutcome::Success { entries: HashMap::new() };
        assert_eq!(TextPrinter::for_outcome(&outcome, "chartreuse").color, Some("green"));
        assert_eq!(TextPrinter::for_outcome(&outcome, "magenta").color, Some("magenta"));
    }
}
