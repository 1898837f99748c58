//! Terminal rendering of the converter panel

use super::ui::{self, StyleType};
use crate::core::controller::{Theme, WidgetView};
use console::Term;
use indicatif::ProgressBar;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default, Clone)]
struct Panel {
    currency_count: usize,
    from: String,
    to: String,
    result: String,
    rate_info: String,
    last_update: String,
    error: String,
    theme: Theme,
    /// Lines of the panel currently on screen, for in-place redraws.
    drawn_lines: usize,
}

impl Panel {
    fn lines(&self) -> Vec<String> {
        let theme = self.theme;
        let mut lines = vec![
            ui::style_text(
                &format!("{} -> {}", self.from, self.to),
                StyleType::Title,
                theme,
            ),
            format!(
                "Result: {} {}",
                ui::style_text(&self.result, StyleType::Value, theme),
                self.to
            ),
        ];
        if !self.rate_info.is_empty() {
            lines.push(ui::style_text(&self.rate_info, StyleType::Subtle, theme));
        }
        if !self.last_update.is_empty() {
            lines.push(ui::style_text(&self.last_update, StyleType::Subtle, theme));
        }
        if !self.error.is_empty() {
            lines.push(ui::style_text(&self.error, StyleType::Error, theme));
        }
        lines
    }
}

/// Renders the widget on a terminal.
///
/// On an interactive terminal the panel redraws in place on every update. On
/// anything else the panel is only written by [`TerminalView::present`].
pub struct TerminalView {
    term: Term,
    live: bool,
    panel: Mutex<Panel>,
    loading: Mutex<Option<ProgressBar>>,
}

impl TerminalView {
    pub fn new(term: Term) -> Self {
        let live = term.is_term();
        Self {
            term,
            live,
            panel: Mutex::new(Panel::default()),
            loading: Mutex::new(None),
        }
    }

    pub fn stdout() -> Self {
        Self::new(Term::stdout())
    }

    fn panel(&self) -> MutexGuard<'_, Panel> {
        self.panel.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Shows a spinner until the currency list arrives or an error is shown.
    pub fn begin_loading(&self, message: &str) {
        if self.live {
            *self.loading.lock().unwrap_or_else(PoisonError::into_inner) =
                Some(ui::new_spinner(message));
        }
    }

    fn end_loading(&self) {
        if let Some(pb) = self
            .loading
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pb.finish_and_clear();
        }
    }

    fn update(&self, apply: impl FnOnce(&mut Panel)) {
        let mut panel = self.panel();
        apply(&mut panel);
        if !self.live {
            return;
        }
        if panel.drawn_lines > 0 {
            let _ = self.term.clear_last_lines(panel.drawn_lines);
        }
        let lines = panel.lines();
        for line in &lines {
            let _ = self.term.write_line(line);
        }
        panel.drawn_lines = lines.len();
    }

    /// Completes the current panel. The next update starts a fresh panel below.
    pub fn present(&self) {
        let mut panel = self.panel();
        if !self.live {
            for line in panel.lines() {
                let _ = self.term.write_line(&line);
            }
        }
        panel.drawn_lines = 0;
    }

    pub fn write_line(&self, line: &str) {
        let _ = self.term.write_line(line);
    }

    pub fn result_text(&self) -> String {
        self.panel().result.clone()
    }

    pub fn error_text(&self) -> String {
        self.panel().error.clone()
    }

    pub fn theme(&self) -> Theme {
        self.panel().theme
    }
}

impl WidgetView for TerminalView {
    fn show_currencies(&self, codes: &[String]) {
        self.end_loading();
        self.panel().currency_count = codes.len();
    }

    fn show_selection(&self, from: &str, to: &str) {
        self.update(|panel| {
            panel.from = from.to_string();
            panel.to = to.to_string();
        });
    }

    fn show_result(&self, text: &str) {
        self.update(|panel| panel.result = text.to_string());
    }

    fn show_rate_info(&self, text: &str) {
        self.update(|panel| panel.rate_info = text.to_string());
    }

    fn show_last_update(&self, text: &str) {
        self.update(|panel| panel.last_update = text.to_string());
    }

    fn show_error(&self, text: &str) {
        if !text.is_empty() {
            self.end_loading();
        }
        self.update(|panel| panel.error = text.to_string());
    }

    fn show_theme(&self, theme: Theme) {
        self.update(|panel| panel.theme = theme);
    }
}
