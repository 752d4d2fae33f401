//! Minimal 5×7 bitmap font for panel labels.
//!
//! Each glyph is 8 rows of 5 bits (MSB = leftmost column). Rows 0-6 hold the
//! body, row 7 the descender of `g` and `y`. Only the characters needed by the
//! montage labels are defined; anything else renders as blank space.

use ndarray::Array3;

pub const GLYPH_WIDTH: usize = 5;
pub const GLYPH_HEIGHT: usize = 8;
/// Blank columns between glyphs, before scaling.
const GLYPH_SPACING: usize = 1;

fn glyph(ch: char) -> [u8; GLYPH_HEIGHT] {
    match ch {
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F, 0x00],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F, 0x00],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E, 0x00],
        'a' => [0x00, 0x00, 0x0E, 0x01, 0x0F, 0x11, 0x0F, 0x00],
        'c' => [0x00, 0x00, 0x0E, 0x10, 0x10, 0x11, 0x0E, 0x00],
        'd' => [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F, 0x00],
        'e' => [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E, 0x00],
        'g' => [0x00, 0x00, 0x0F, 0x11, 0x11, 0x0F, 0x01, 0x0E],
        'i' => [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x0E, 0x00],
        'l' => [0x0C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E, 0x00],
        'n' => [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11, 0x00],
        'r' => [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10, 0x00],
        's' => [0x00, 0x00, 0x0F, 0x10, 0x0E, 0x01, 0x1E, 0x00],
        'v' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x0A, 0x04, 0x00],
        'y' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x0F, 0x01, 0x0E],
        _ => [0x00; GLYPH_HEIGHT],
    }
}

/// Width in pixels of `text` rendered at `scale`.
pub fn text_width(text: &str, scale: usize) -> usize {
    let n = text.chars().count();
    if n == 0 {
        return 0;
    }
    (n * (GLYPH_WIDTH + GLYPH_SPACING) - GLYPH_SPACING) * scale
}

/// Draw `text` into an (H, W, C) image with its top-left corner at
/// (`left`, `top`). Pixels outside `clip` = (x0, y0, x1, y1), exclusive end,
/// are left untouched.
pub fn draw_text(
    image: &mut Array3<u8>,
    text: &str,
    left: usize,
    top: usize,
    scale: usize,
    color: [u8; 3],
    clip: (usize, usize, usize, usize),
) {
    let (height, width, channels) = image.dim();
    let (x0, y0, x1, y1) = (clip.0, clip.1, clip.2.min(width), clip.3.min(height));

    for (i, ch) in text.chars().enumerate() {
        let origin_x = left + i * (GLYPH_WIDTH + GLYPH_SPACING) * scale;
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                for sy in 0..scale {
                    let y = top + row * scale + sy;
                    if y < y0 || y >= y1 {
                        continue;
                    }
                    for sx in 0..scale {
                        let x = origin_x + col * scale + sx;
                        if x < x0 || x >= x1 {
                            continue;
                        }
                        for c in 0..channels.min(3) {
                            image[[y, x, c]] = color[c];
                        }
                    }
                }
            }
        }
    }
}
