//! SVG text layer drawn over the template and art.

use std::fmt::Write as _;

use crate::manifest::model::CardSpec;

/// Output card width in pixels.
pub const CARD_WIDTH: u32 = 750;
/// Output card height in pixels.
pub const CARD_HEIGHT: u32 = 1050;
/// Top-left corner of the art window.
pub const ART_ORIGIN: (i64, i64) = (125, 200);

const TITLE_Y: u32 = CARD_HEIGHT * 12 / 100;
const TITLE_SIZE: u32 = 80;

const CAPTION_X: u32 = 100;
const CAPTION_Y: u32 = 750;
const CAPTION_W: u32 = 550;
const CAPTION_H: u32 = 200;
const CAPTION_PAD: u32 = 20;

const FLAVOR_SIZE: u32 = 28;
const FLAVOR_LINE_HEIGHT: u32 = 34;
// Rough average advance of the body face, as a fraction of the font size.
const FLAVOR_ADVANCE: f32 = 0.55;

/// Build the overlay markup for `spec`.
///
/// The caption backdrop is always drawn, even for empty flavor text.
pub fn overlay_svg(spec: &CardSpec, display_family: &str, body_family: &str) -> String {
    let mut svg = String::with_capacity(1024);
    let center_x = CARD_WIDTH / 2;

    let _ = write!(
        svg,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{CARD_WIDTH}" height="{CARD_HEIGHT}" viewBox="0 0 {CARD_WIDTH} {CARD_HEIGHT}">"##
    );
    let _ = write!(
        svg,
        r##"<text x="{center_x}" y="{TITLE_Y}" text-anchor="middle" font-family="'{}'" font-size="{TITLE_SIZE}" font-weight="bold" fill="#FFFFFF">{}</text>"##,
        escape_xml(display_family),
        escape_xml(&spec.name.to_uppercase())
    );
    let _ = write!(
        svg,
        r##"<rect x="{CAPTION_X}" y="{CAPTION_Y}" width="{CAPTION_W}" height="{CAPTION_H}" rx="20" fill="#FFFFFF" fill-opacity="0.8"/>"##
    );

    let lines = wrap_flavor(&spec.flavor_text);
    if !lines.is_empty() {
        let block_h = (lines.len() as u32 - 1) * FLAVOR_LINE_HEIGHT;
        let first_baseline = CAPTION_Y + CAPTION_H / 2 - block_h / 2 + FLAVOR_SIZE * 35 / 100;
        let _ = write!(
            svg,
            r##"<text text-anchor="middle" font-family="'{}', sans-serif" font-size="{FLAVOR_SIZE}" font-weight="bold" fill="#000000">"##,
            escape_xml(body_family)
        );
        for (i, line) in lines.iter().enumerate() {
            let y = first_baseline + i as u32 * FLAVOR_LINE_HEIGHT;
            let _ = write!(
                svg,
                r##"<tspan x="{center_x}" y="{y}">{}</tspan>"##,
                escape_xml(line)
            );
        }
        svg.push_str("</text>");
    }

    svg.push_str("</svg>");
    svg
}

/// Greedy word wrap of flavor text into the caption backdrop.
///
/// Lines beyond the backdrop height are dropped and the last kept line ends with an
/// ellipsis. Words longer than a line are hard-split.
pub fn wrap_flavor(text: &str) -> Vec<String> {
    let inner_w = (CAPTION_W - 2 * CAPTION_PAD) as f32;
    let max_chars = (inner_w / (FLAVOR_SIZE as f32 * FLAVOR_ADVANCE)).floor() as usize;
    let max_lines = ((CAPTION_H - 2 * CAPTION_PAD) / FLAVOR_LINE_HEIGHT) as usize;

    let mut lines = Vec::<String>::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            lines.push(word.drain(..max_chars).collect());
        }
        let word: String = word.into_iter().collect();
        if word.is_empty() {
            continue;
        }

        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let mut chars: Vec<char> = last.chars().collect();
            chars.truncate(max_chars.saturating_sub(1));
            *last = chars.into_iter().collect::<String>() + "\u{2026}";
        }
    }
    lines
}

/// Escape text for use in SVG character data and attribute values.
///
/// Characters XML 1.0 cannot carry (C0 controls other than tab, LF and CR, plus U+FFFE and
/// U+FFFF) are dropped.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\t' | '\n' | '\r' => out.push(c),
            '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => {}
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
