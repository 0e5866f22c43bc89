//! Console output for the operator.
//! Prompts, plan summaries and outcomes go through here; diagnostics go
//! through `tracing`. Tags are colored only when stdout is a TTY.

use owo_colors::{OwoColorize, Style};

const INDENT: &str = "      ";

fn color_enabled() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn tag(label: &str, style: Style) -> String {
    if color_enabled() {
        format!("{}", label.style(style))
    } else {
        label.to_string()
    }
}

pub fn print_info(msg: &str) {
    println!("{} {msg}", tag("info:", Style::new().cyan().bold()));
}

pub fn print_success(msg: &str) {
    println!("{} {msg}", tag("ok:", Style::new().green().bold()));
}

pub fn print_warn(msg: &str) {
    eprintln!("{} {msg}", tag("warn:", Style::new().yellow().bold()));
}

pub fn print_error(msg: &str) {
    eprintln!("{} {msg}", tag("error:", Style::new().red().bold()));
}

/// Section heading, e.g. "Ready to execute the file transfer:".
pub fn print_heading(msg: &str) {
    println!("\n  {}", tag(msg, Style::new().bold()));
}

/// Indented detail line under a heading.
pub fn print_detail(msg: &str) {
    println!("{INDENT}{msg}");
}

/// Unprefixed line for primary results such as "Ncyc = 40".
pub fn print_user(msg: &str) {
    println!("{msg}");
}
