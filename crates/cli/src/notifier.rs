//! Terminal rendering of license notices

use colored::Colorize;
use licman_core::{Notice, NoticeKind, Notifier};

/// Prints notices to stderr as they are raised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}", format_notice(&notice));
    }
}

pub fn format_notice(notice: &Notice) -> String {
    match notice.kind {
        NoticeKind::Success => format!("  {} {}", "\u{2713}".green(), notice.message),
        NoticeKind::Error => format!("  {} {}", "Error:".red().bold(), notice.message),
    }
}
