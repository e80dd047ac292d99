// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::io::IsTerminal;

/// Section headers: steel blue
const HEADER: u8 = 74;
/// Secondary text: darker grey
const MUTED: u8 = 240;

const RESET: &str = "\x1b[0m";

/// Determine if color output should be enabled.
///
/// Priority: `NO_COLOR=1` disables → `COLOR=1` forces → TTY check.
pub fn should_colorize() -> bool {
    if crate::env::no_color() {
        return false;
    }
    if crate::env::force_color() {
        return true;
    }
    std::io::stdout().is_terminal()
}

fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

pub fn header(text: &str) -> String {
    if should_colorize() {
        apply_header(text)
    } else {
        text.to_string()
    }
}

pub(crate) fn apply_header(text: &str) -> String {
    format!("{}{}{}", fg256(HEADER), text, RESET)
}

pub fn muted(text: &str) -> String {
    if should_colorize() {
        format!("{}{}{}", fg256(MUTED), text, RESET)
    } else {
        text.to_string()
    }
}

/// Green for healthy, red otherwise.
pub fn health(text: &str, healthy: bool) -> String {
    if !should_colorize() {
        return text.to_string();
    }
    apply_health(text, healthy)
}

pub(crate) fn apply_health(text: &str, healthy: bool) -> String {
    let code = if healthy { "\x1b[32m" } else { "\x1b[31m" };
    format!("{code}{text}{RESET}")
}

#[cfg(test)]
#[path = "color_tests.rs"]
mod tests;
