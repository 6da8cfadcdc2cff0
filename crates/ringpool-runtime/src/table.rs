//! Text table renderer for pool diagnostics
//!
//! ```text
//! +------------------------------------------------------------------------------+
//! | ringpool: net-rx                                                             |
//! | Ver: 0.1.0                                                                   |
//! +------------------------------------------------------------------------------+
//! | max threads               4                                                  |
//! ...
//! ```

use std::fmt;
use std::io::Write;

use ringpool_core::{PoolStats, StatsSink, VERSION};

const DEFAULT_WIDTH: usize = 80;
const MAX_WIDTH: usize = 255;
/// Room for `| ` and ` |` plus one character of content
const MIN_WIDTH: usize = 5;
const LABEL_WIDTH: usize = 26;

type Output = Box<dyn FnMut(&str) + Send>;

/// Bordered, fixed-width table writer.
///
/// Lines go to stdout unless `set_output` installs another destination.
pub struct TablePrinter {
    width: usize,
    out: Output,
}

impl Default for TablePrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl TablePrinter {
    pub fn new() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            out: Box::new(|line| {
                let mut stdout = std::io::stdout().lock();
                let _ = writeln!(stdout, "{}", line);
            }),
        }
    }

    /// Total line width including borders, clamped to `5..=255`.
    pub fn set_width(&mut self, width: usize) -> &mut Self {
        self.width = width.clamp(MIN_WIDTH, MAX_WIDTH);
        self
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Send every rendered line to `out` instead of stdout.
    pub fn set_output<F>(&mut self, out: F) -> &mut Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.out = Box::new(out);
        self
    }

    #[inline]
    fn inner_width(&self) -> usize {
        self.width - 4
    }

    pub fn border(&mut self) {
        let line = format!("+{}+", "-".repeat(self.width - 2));
        (self.out)(&line);
    }

    /// One left-aligned line of text between the borders.
    pub fn title(&mut self, text: &str) {
        let w = self.inner_width();
        let line = format!("| {:<w$} |", clip(text, w), w = w);
        (self.out)(&line);
    }

    /// A `label value` line.
    pub fn row(&mut self, label: &str, value: impl fmt::Display) {
        let w = self.inner_width();
        let text = format!("{:<lw$}{}", label, value, lw = LABEL_WIDTH);
        let line = format!("| {:<w$} |", clip(&text, w), w = w);
        (self.out)(&line);
    }
}

impl StatsSink for TablePrinter {
    fn render(&mut self, stats: &PoolStats) {
        self.border();
        self.title(&format!("ringpool: {}", stats.name));
        self.title(&format!("Ver: {}", VERSION));
        self.border();
        self.row("state", stats.state);
        self.row("max threads", stats.max_threads);
        self.row("live threads", stats.live_threads);
        self.row("busy threads", stats.busy_threads);
        self.row("idle threads", stats.idle_threads());
        self.row("max queue", stats.max_queue);
        self.row("used queue", stats.used_queue);
        self.row("bytes published", stats.bytes_published);
        self.row("bytes consumed", stats.bytes_consumed);
        self.row("items published", stats.items_published());
        self.row("items consumed", stats.items_consumed());
        self.row("panicked callbacks", stats.panicked);
        self.border();
    }
}

impl fmt::Debug for TablePrinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TablePrinter").field("width", &self.width).finish_non_exhaustive()
    }
}

/// Longest prefix of `s` that fits `max` characters.
fn clip(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringpool_core::{PoolState, RECORD_SIZE};
    use std::sync::{Arc, Mutex};

    fn capture(printer: &mut TablePrinter) -> Arc<Mutex<Vec<String>>> {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        printer.set_output(move |l| sink.lock().unwrap().push(l.to_string()));
        lines
    }

    fn sample() -> PoolStats {
        PoolStats {
            name: "net-rx".into(),
            state: PoolState::Running,
            max_threads: 4,
            live_threads: 4,
            busy_threads: 1,
            max_queue: 64,
            used_queue: 3,
            bytes_published: 160,
            bytes_consumed: 112,
            panicked: 0,
        }
    }

    #[test]
    fn test_lines_have_fixed_width() {
        let mut printer = TablePrinter::new();
        let lines = capture(&mut printer);
        printer.render(&sample());

        let lines = lines.lock().unwrap();
        assert!(lines.len() > 5);
        assert!(lines.iter().all(|l| l.chars().count() == DEFAULT_WIDTH));
        assert!(lines[0].starts_with("+-") && lines[0].ends_with("-+"));
        assert!(lines[1].starts_with("| ringpool: net-rx"));
        assert!(lines[2].contains(VERSION));
    }

    #[test]
    fn test_rows_carry_values() {
        let mut printer = TablePrinter::new();
        let lines = capture(&mut printer);
        printer.render(&sample());

        let lines = lines.lock().unwrap();
        let used = lines.iter().find(|l| l.contains("used queue")).unwrap();
        assert!(used.contains(" 3 "));
        let state = lines.iter().find(|l| l.contains("state")).unwrap();
        assert!(state.contains("running"));
        let idle = lines.iter().find(|l| l.contains("idle threads")).unwrap();
        assert!(idle.contains(" 3 "));
        let items = lines.iter().find(|l| l.contains("items published")).unwrap();
        assert!(items.contains(&format!(" {} ", 160 / RECORD_SIZE)));
    }

    #[test]
    fn test_width_clamped_and_long_text_clipped() {
        let mut printer = TablePrinter::new();
        printer.set_width(1000);
        assert_eq!(printer.width(), MAX_WIDTH);
        printer.set_width(0);
        assert_eq!(printer.width(), MIN_WIDTH);

        printer.set_width(20);
        let lines = capture(&mut printer);
        printer.title("a title far longer than twenty characters");
        assert_eq!(lines.lock().unwrap()[0].chars().count(), 20);
    }
}
