/// Text measurement and greedy word wrapping for the bitmap fonts

use super::fonts::FontId;
use super::glyph;

/// Advance width of a single character.
pub fn advance_width(ch: char, font: FontId) -> i32 {
    glyph::advance_of(font, ch) as i32
}

/// Width of a string: advances plus the inter-character gap between neighbours.
pub fn measure(text: &str, font: FontId, spacing: i32) -> i32 {
    let gap = font.gap(spacing);
    let mut width = 0;
    let mut count = 0;
    for ch in text.chars() {
        width += advance_width(ch, font);
        count += 1;
    }
    if count > 1 {
        width += gap * (count - 1);
    }
    width
}

/// Greedy word wrap on single spaces.
///
/// Words are never split: a word wider than `max_width` sits alone on its line.
/// The width of a joined line always equals `measure(line)`, so re-wrapping the
/// output at the same width reproduces the same boundaries.
pub fn wrap(text: &str, font: FontId, spacing: i32, max_width: i32) -> Vec<String> {
    let gap = font.gap(spacing);
    let space_width = advance_width(' ', font) + 2 * gap;

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let word_width = measure(word, font, spacing);
        if current.is_empty() {
            current.push_str(word);
            current_width = word_width;
        } else if current_width + space_width + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space_width + word_width;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_width = word_width;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Distance a scrolling string travels before the cycle repeats.
pub fn scroll_travel(text: &str, font: FontId, spacing: i32, canvas_width: i32) -> i32 {
    canvas_width + measure(text, font, spacing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn measure_adds_spacing_between_characters() {
        assert_eq!(measure("12", FontId::Medium5x7, 1), 11);
        assert_eq!(measure("1", FontId::Medium5x7, 1), 5);
        assert_eq!(measure("", FontId::Medium5x7, 1), 0);
        assert_eq!(measure("ABC", FontId::Small3x5, 2), 3 * 3 + 2 * 2);
    }

    #[test]
    fn measure_compensates_atlas_side_bearing() {
        // '1' and '2' are 3 wide with advance 4; spacing 1 adds no extra gap
        assert_eq!(measure("12", FontId::Awtrix, 1), 8);
        assert_eq!(measure("12", FontId::Awtrix, 2), 9);
    }

    #[test]
    fn wrap_fills_lines_greedily() {
        // "AB CD EF" in 3x5 spacing 1: word = 7, space = 3 + 2 = 5
        let lines = wrap("AB CD EF", FontId::Small3x5, 1, 19);
        assert_eq!(lines, vec!["AB CD", "EF"]);
        let lines = wrap("AB CD EF", FontId::Small3x5, 1, 31);
        assert_eq!(lines, vec!["AB CD EF"]);
    }

    #[test]
    fn wrap_places_long_word_alone() {
        let lines = wrap("HI SUPERCALIFRAGILISTIC OK", FontId::Medium5x7, 1, 32);
        assert_eq!(lines, vec!["HI", "SUPERCALIFRAGILISTIC", "OK"]);
    }

    #[test]
    fn wrap_ignores_repeated_spaces() {
        assert_eq!(wrap("  A   B ", FontId::Small3x5, 1, 100), vec!["A B"]);
        assert!(wrap("", FontId::Small3x5, 1, 100).is_empty());
    }

    #[test]
    fn scroll_travel_includes_canvas() {
        assert_eq!(scroll_travel("12", FontId::Medium5x7, 1, 32), 43);
    }
}
