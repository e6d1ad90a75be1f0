// Text layout unit tests: greedy wrapping and block placement

use crate::common::require_font;
use imprint::layout::*;
use rstest::rstest;

/// Synthetic metrics: every character is 10px wide, lines are 20px tall.
struct TenPixelFont;

impl TextMeasure for TenPixelFont {
    fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * 10
    }

    fn text_bottom(&self, _text: &str) -> u32 {
        20
    }
}

#[rstest]
#[case::empty("")]
#[case::spaces("   ")]
#[case::mixed_whitespace(" \t\n ")]
fn test_blank_text_wraps_to_one_empty_line(#[case] text: &str) {
    assert_eq!(wrap(text, &TenPixelFont, 100), vec![String::new()]);
}

#[rstest]
#[case::fits("Hello World", 110, vec!["Hello World"])]
#[case::splits("Hello World", 100, vec!["Hello", "World"])]
#[case::greedy("aa bb cc dd", 50, vec!["aa bb", "cc dd"])]
#[case::long_word_alone("a verylongword b", 60, vec!["a", "verylongword", "b"])]
#[case::collapses_spaces("  one   two  ", 200, vec!["one two"])]
fn test_wrap_with_synthetic_metrics(
    #[case] text: &str,
    #[case] max_width: u32,
    #[case] expected: Vec<&str>,
) {
    assert_eq!(wrap(text, &TenPixelFont, max_width), expected);
}

#[test]
fn test_layout_text_block_measures_lines() {
    let block = layout_text_block("Hello World", &TenPixelFont, 100);

    assert_eq!(block.line_count(), 2);
    assert_eq!(
        block.lines[0],
        TextLine {
            text: "Hello".to_string(),
            width: 50,
        }
    );
    assert_eq!(block.line_height, 20);
    assert_eq!(block.height(), 40);
    assert_eq!(block.max_width, 100);
}

#[rstest]
#[case::short("Hello World")]
#[case::sentence("The quick brown fox jumps over the lazy dog near the riverbank at dawn")]
#[case::long_words("Supercalifragilisticexpialidocious antidisestablishmentarianism ok")]
#[ignore] // Requires an outline font - run with: cargo test -- --ignored
fn test_real_font_lines_respect_max_width(#[case] text: &str) {
    let font = require_font(56.0);
    let max_width = 918;

    let lines = wrap(text, &font, max_width);
    assert!(!lines.is_empty());
    for line in &lines {
        let single_word = !line.contains(' ');
        assert!(
            single_word || font.text_width(line) <= max_width,
            "line {line:?} is {}px wide",
            font.text_width(line)
        );
    }

    let rejoined = lines.join(" ");
    let normalized: Vec<&str> = text.split_whitespace().collect();
    assert_eq!(rejoined, normalized.join(" "));
}

#[test]
#[ignore] // Requires an outline font - run with: cargo test -- --ignored
fn test_real_font_line_height_and_widths() {
    let font = require_font(56.0);

    let line_height = measure_line_height(&font);
    assert!(line_height > 28 && line_height < 112, "line height {line_height}");

    assert_eq!(font.text_width(""), 0);
    assert!(font.text_width("WWW") > font.text_width("iii"));
}

#[test]
#[ignore] // Requires an outline font - run with: cargo test -- --ignored
fn test_wrap_is_deterministic() {
    let font = require_font(56.0);
    let text = "Identical inputs always produce identical line breaks in every run";

    assert_eq!(wrap(text, &font, 500), wrap(text, &font, 500));
}

#[test]
fn test_default_geometry_placement() {
    let canvas = ImageDimensions::new(1080, 1080);
    let logo = ImageDimensions::new(252, 44);

    let logo_pos = logo_position(&canvas, &logo, 50);
    assert_eq!(logo_pos, PlacementPosition::new(414, 986));

    let placement = compute_block_placement(2, 60, logo_pos.y, 42);
    assert_eq!(placement.bottom_y, 986 - 42 - 60);
    assert_eq!(placement.top_y, placement.bottom_y - 60);
}
