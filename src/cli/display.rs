// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display utilities for the ferret CLI.
//!
//! OneDark for dark terminals, One Light for light ones. Detection tries
//! `FERRET_THEME` first, then `COLORFGBG`, then defaults to dark. Highlight
//! tags in snippets become bold color on a TTY and stay as `[...]` brackets
//! everywhere else. Respects `NO_COLOR` and non-TTY detection for pipelines.

use std::sync::OnceLock;

// Box drawing constants - width between │ and │ (excluding border chars)
pub const BOX_WIDTH: usize = 80;

// ═══════════════════════════════════════════════════════════════════════════
// THEME DETECTION
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

static THEME: OnceLock<Theme> = OnceLock::new();

fn detect_theme() -> Theme {
    if let Ok(theme) = std::env::var("FERRET_THEME") {
        match theme.to_lowercase().as_str() {
            "light" | "l" => return Theme::Light,
            "dark" | "d" => return Theme::Dark,
            _ => {}
        }
    }

    // COLORFGBG is "fg;bg"; backgrounds 7 and 9-15 are light
    if let Ok(colorfgbg) = std::env::var("COLORFGBG") {
        if let Some(bg) = colorfgbg.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                if bg_num >= 7 && bg_num != 8 {
                    return Theme::Light;
                }
            }
        }
    }

    Theme::Dark
}

pub fn theme() -> Theme {
    *THEME.get_or_init(detect_theme)
}

// ═══════════════════════════════════════════════════════════════════════════
// PALETTES
// ═══════════════════════════════════════════════════════════════════════════

fn rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{};{};{}m", r, g, b)
}

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

mod onedark {
    pub const GREEN: (u8, u8, u8) = (152, 195, 121); // #98c379
    pub const YELLOW: (u8, u8, u8) = (229, 192, 123); // #e5c07b
    pub const CYAN: (u8, u8, u8) = (86, 182, 194); // #56b6c2
    pub const GRAY: (u8, u8, u8) = (92, 99, 112); // #5c6370
    pub const MAGENTA: (u8, u8, u8) = (198, 120, 221); // #c678dd
}

mod onelight {
    pub const GREEN: (u8, u8, u8) = (80, 161, 79); // #50a14f
    pub const YELLOW: (u8, u8, u8) = (193, 132, 1); // #c18401
    pub const CYAN: (u8, u8, u8) = (1, 132, 188); // #0184bc
    pub const GRAY: (u8, u8, u8) = (160, 161, 167); // #a0a1a7
    pub const MAGENTA: (u8, u8, u8) = (166, 38, 164); // #a626a4
}

macro_rules! theme_color {
    ($name:ident) => {
        #[allow(non_snake_case)]
        pub fn $name() -> String {
            let (r, g, b) = match theme() {
                Theme::Dark => onedark::$name,
                Theme::Light => onelight::$name,
            };
            rgb(r, g, b)
        }
    };
}

theme_color!(GREEN);
theme_color!(YELLOW);
theme_color!(CYAN);
theme_color!(GRAY);
theme_color!(MAGENTA);

// ═══════════════════════════════════════════════════════════════════════════
// CORE UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// TTY and `NO_COLOR` aware.
pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Apply theme color with optional modifiers
pub fn themed(color_fn: fn() -> String, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color_fn(), text, RESET)
    } else {
        text.to_string()
    }
}

/// Visible length (excluding ANSI codes)
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

/// Cut to at most `max` visible chars, ellipsis included.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{}…", kept)
}

pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visible))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BOX DRAWING
// ═══════════════════════════════════════════════════════════════════════════

/// │ content          │
pub fn row(content: &str) {
    let border = GRAY();
    let len = visible_len(content);
    let pad = BOX_WIDTH.saturating_sub(len);
    println!(
        "{}│{}{}{}{}│{}",
        border,
        RESET,
        content,
        " ".repeat(pad),
        border,
        RESET
    );
}

/// ┌─ LABEL ──────────┐
pub fn section_top(label: &str) {
    let border = GRAY();
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}┌{}{}{}{}┐{}",
        border,
        RESET,
        label_part,
        border,
        "─".repeat(remaining),
        RESET
    );
}

/// ├─ LABEL ──────────┤
pub fn section_mid(label: &str) {
    let border = GRAY();
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!(
        "{}├{}{}{}{}┤{}",
        border,
        RESET,
        label_part,
        border,
        "─".repeat(remaining),
        RESET
    );
}

/// └──────────────────┘
pub fn section_bot() {
    let border = GRAY();
    println!("{}└{}┘{}", border, "─".repeat(BOX_WIDTH), RESET);
}

// ═══════════════════════════════════════════════════════════════════════════
// SEMANTIC FORMATTERS
// ═══════════════════════════════════════════════════════════════════════════

/// Replace highlight tags with terminal emphasis.
pub fn render_snippet(snippet: &str, start_tag: &str, end_tag: &str) -> String {
    let (open, close) = if use_colors() {
        (format!("{}{}", BOLD, YELLOW()), RESET.to_string())
    } else {
        ("[".to_string(), "]".to_string())
    };
    replace_tags(snippet, start_tag, end_tag, &open, &close)
}

fn replace_tags(snippet: &str, start_tag: &str, end_tag: &str, open: &str, close: &str) -> String {
    if start_tag.is_empty() || end_tag.is_empty() {
        return snippet.to_string();
    }
    snippet.replace(start_tag, open).replace(end_tag, close)
}

/// Text-match score, brighter when higher.
pub fn score_value(score: u64) -> String {
    if !use_colors() {
        return format!("{:>8}", score);
    }
    let color = if score >= 10_000 {
        GREEN()
    } else if score > 0 {
        YELLOW()
    } else {
        GRAY()
    };
    format!("{}{:>8}{}", color, score, RESET)
}
