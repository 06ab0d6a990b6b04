use crate::core::{ProcessState, Snapshot, render};
use colored::Colorize;

pub fn display_success(message: &str) {
    println!("{}", message.green().bold());
}

pub fn display_error(message: &str) {
    eprintln!("{}", message.red());
}

pub fn display_info(message: &str) {
    println!("{}", message.dimmed());
}

/// Print the status line for a snapshot, styled by phase
pub fn display_snapshot(snapshot: &Snapshot) {
    let Some(line) = render(snapshot) else {
        return;
    };

    match snapshot.state {
        ProcessState::Success => display_success(&line),
        ProcessState::Error => display_error(&line),
        _ => display_info(&line),
    }
}
