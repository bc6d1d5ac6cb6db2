use crate::egui_app::ui::style;
use egui::Color32;

/// Entries kept in the rolling footer log.
pub const STATUS_LOG_CAP: usize = 8;

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    /// Main status message text.
    pub text: String,
    /// Badge label shown next to the status.
    pub badge_label: String,
    /// Badge color.
    pub badge_color: Color32,
    /// Rolling status log entries, newest last.
    pub log: Vec<String>,
}

impl StatusBarState {
    /// Default status shown before sign-in.
    pub fn idle() -> Self {
        Self {
            text: "Sign in to get started".into(),
            badge_label: "Idle".into(),
            badge_color: style::status_badge_color(style::StatusTone::Idle),
            log: Vec::new(),
        }
    }

    /// Append to the rolling log, dropping the oldest entry past the cap.
    pub fn push_log(&mut self, line: String) {
        self.log.push(line);
        if self.log.len() > STATUS_LOG_CAP {
            let overflow = self.log.len() - STATUS_LOG_CAP;
            self.log.drain(..overflow);
        }
    }

    /// Concatenate log entries into a single displayable string.
    pub fn log_text(&self) -> String {
        if self.log.is_empty() {
            return String::new();
        }
        self.log.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_capped_at_the_newest_entries() {
        let mut status = StatusBarState::idle();
        for i in 0..STATUS_LOG_CAP + 3 {
            status.push_log(format!("line {i}"));
        }
        assert_eq!(status.log.len(), STATUS_LOG_CAP);
        assert_eq!(status.log.first().unwrap(), "line 3");
        assert_eq!(status.log.last().unwrap(), "line 10");
    }

    #[test]
    fn log_text_joins_lines() {
        let mut status = StatusBarState::idle();
        assert_eq!(status.log_text(), "");
        status.push_log("a".into());
        status.push_log("b".into());
        assert_eq!(status.log_text(), "a\nb");
    }
}
