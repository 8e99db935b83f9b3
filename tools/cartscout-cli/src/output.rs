//! Output formatting for the CLI.

use cartscout_commerce::ranking::PriceClass;
use cartscout_commerce::routing::DistanceStatus;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            let body = serde_json::json!({ "error": msg });
            eprintln!("{}", body);
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a highlighted line, e.g. a recommendation.
    pub fn highlight(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{}", style(msg).bold());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    ///
    /// Widths count characters, so Cyrillic names line up too.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| console::pad_str(col, *width, console::Alignment::Left, None).into_owned())
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Coloured badge for a store's price class.
pub fn price_badge(class: PriceClass) -> String {
    let label = match class {
        PriceClass::Cheapest => "cheapest",
        PriceClass::MostExpensive => "priciest",
        PriceClass::Average => "average",
    };
    match class {
        PriceClass::Cheapest => style(label).green().bold().to_string(),
        PriceClass::MostExpensive => style(label).red().to_string(),
        PriceClass::Average => style(label).yellow().to_string(),
    }
}

/// Distance column text: road distance when a route was planned, otherwise the
/// straight-line estimate.
pub fn format_distance(road: Option<&DistanceStatus>, straight_line_km: f64) -> String {
    match road {
        Some(status) => status.to_string(),
        None => format!("~{:.2} km", straight_line_km),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_distance() {
        let known = DistanceStatus::Known { meters: 2500.0 };
        assert_eq!(format_distance(Some(&known), 1.9), "2.50 km");

        let failed = DistanceStatus::Unavailable {
            reason: "timeout".into(),
        };
        assert_eq!(format_distance(Some(&failed), 1.9), "distance unavailable");
        assert_eq!(format_distance(None, 1.234), "~1.23 km");
    }

    #[test]
    fn test_price_badge_text() {
        let badge = price_badge(PriceClass::Cheapest);
        assert_eq!(console::strip_ansi_codes(&badge), "cheapest");
    }
}
