// Bitmap text drawn straight into a PixelField: outlined labels and the
// area/error result panel.

use crate::area::AreaEstimate;
use crate::palette::Rgb;
use crate::render::PixelField;

const GLYPH_WIDTH: usize = 3;
const GLYPH_HEIGHT: usize = 5;

// Simple 3x5 pixel font
fn glyph(ch: char) -> &'static [u8; GLYPH_HEIGHT] {
    match ch.to_ascii_lowercase() {
        '0' => &[0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => &[0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => &[0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => &[0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => &[0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => &[0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => &[0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => &[0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => &[0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => &[0b111, 0b101, 0b111, 0b001, 0b111],
        '.' => &[0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => &[0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => &[0b000, 0b010, 0b000, 0b010, 0b000],
        'a' => &[0b111, 0b101, 0b111, 0b101, 0b101],
        'd' => &[0b110, 0b101, 0b101, 0b101, 0b110],
        'e' => &[0b111, 0b100, 0b111, 0b100, 0b111],
        'g' => &[0b111, 0b100, 0b101, 0b101, 0b111],
        'i' => &[0b111, 0b010, 0b010, 0b010, 0b111],
        'l' => &[0b100, 0b100, 0b100, 0b100, 0b111],
        'n' => &[0b101, 0b111, 0b111, 0b111, 0b101],
        'o' => &[0b111, 0b101, 0b101, 0b101, 0b111],
        'r' => &[0b110, 0b101, 0b110, 0b101, 0b101],
        _ => &[0b000, 0b000, 0b000, 0b000, 0b000],
    }
}

/// Pixel size of one glyph cell, so text stays readable on large rasters.
pub fn text_scale(field: &PixelField) -> usize {
    (field.height() / 120).max(1)
}

/// Width in pixels of `text` at `scale`, including one column of spacing
/// per glyph.
pub fn text_width(text: &str, scale: usize) -> usize {
    text.chars().count() * (GLYPH_WIDTH + 1) * scale
}

fn draw_glyph(field: &mut PixelField, x: usize, y: usize, ch: char, scale: usize, color: Rgb) {
    for (dy, &row) in glyph(ch).iter().enumerate() {
        for dx in 0..GLYPH_WIDTH {
            if row & (1 << (GLYPH_WIDTH - 1 - dx)) == 0 {
                continue;
            }
            for sy in 0..scale {
                for sx in 0..scale {
                    field.set(x + dx * scale + sx, y + dy * scale + sy, color);
                }
            }
        }
    }
}

pub fn draw_text(field: &mut PixelField, x: usize, y: usize, text: &str, scale: usize, color: Rgb) {
    let mut offset_x = x;
    for ch in text.chars() {
        if offset_x >= field.width() {
            break;
        }
        draw_glyph(field, offset_x, y, ch, scale, color);
        offset_x += (GLYPH_WIDTH + 1) * scale;
    }
}

/// White text with a black outline, legible on both the bright escape
/// bands and the black interior. `baseline` is the bottom edge of the text.
pub fn draw_outlined_text(field: &mut PixelField, x: usize, baseline: usize, text: &str) {
    let scale = text_scale(field);
    let top = baseline.saturating_sub(GLYPH_HEIGHT * scale);
    for (ox, oy) in [(0, 1), (2, 1), (1, 0), (1, 2)] {
        let px = (x + ox * scale).saturating_sub(scale);
        let py = (top + oy * scale).saturating_sub(scale);
        draw_text(field, px, py, text, scale, Rgb::BLACK);
    }
    draw_text(field, x, top, text, scale, Rgb::WHITE);
}

pub fn draw_loading(field: &mut PixelField) {
    let text = "loading";
    let x = (field.width() / 2).saturating_sub(text_width(text, text_scale(field)) / 2);
    let y = field.height() / 2;
    draw_outlined_text(field, x, y, text);
}

pub fn format_area(estimate: &AreaEstimate) -> String {
    format!("area: {:.5}", estimate.area)
}

pub fn format_error(estimate: &AreaEstimate) -> String {
    format!("error: {:.5}", estimate.standard_error)
}

/// Area and error lines in the bottom-left corner.
pub fn draw_panel(field: &mut PixelField, estimate: &AreaEstimate) {
    let horizontal_padding = field.width() / 20;
    let vertical_padding = field.height() / 10;

    let x = horizontal_padding;
    let area_y = field.height() - vertical_padding;
    let error_y = area_y + vertical_padding / 2;

    draw_outlined_text(field, x, area_y, &format_area(estimate));
    draw_outlined_text(field, x, error_y, &format_error(estimate));
}
