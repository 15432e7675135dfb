//! Progress reporting for the loader
//!
//! Provides a spinner while the load runs and a styled summary afterwards.

use console::style;
use humansize::{format_size, BINARY};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Spinner shown while a load is running
#[derive(Clone)]
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();

        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .expect("Invalid progress template")
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Set a status message
    pub fn set_status(&self, status: &str) {
        self.bar.set_message(status.to_string());
    }

    /// Finish the progress display with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Finish and clear the progress display
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a count with comma thousands separators
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Print a header at the start of the load
pub fn print_header(source: &str, db_path: &str) {
    println!();
    println!(
        "{} {}",
        style("investor-commitments").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Source:").bold(), source);
    println!("  {} {}", style("Output:").bold(), db_path);
    println!();
}

/// Print a summary of a completed load
pub fn print_summary(
    source_rows: u64,
    investors: u64,
    commitments: u64,
    duration: Duration,
    db_path: &str,
    db_size: Option<u64>,
) {
    let duration_secs = duration.as_secs_f64();
    let rate = if duration_secs > 0.0 {
        source_rows as f64 / duration_secs
    } else {
        0.0
    };

    println!();
    println!("{}", style("Load Complete").green().bold());
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Source rows:").bold(), format_number(source_rows));
    println!("  {} {}", style("Investors:").bold(), format_number(investors));
    println!("  {} {}", style("Commitments:").bold(), format_number(commitments));
    println!(
        "  {} {:.2}s ({:.0} rows/sec)",
        style("Duration:").bold(),
        duration_secs,
        rate
    );
    if let Some(size) = db_size {
        println!(
            "  {} {} ({})",
            style("Database:").bold(),
            db_path,
            format_size(size, BINARY)
        );
    } else {
        println!("  {} {}", style("Database:").bold(), db_path);
    }
    println!();
}
