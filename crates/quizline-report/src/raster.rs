//! PNG fallback: text lines rendered with an 8x8 bitmap font.
//!
//! The canvas starts at a fixed height, grows whenever drawing gets close to
//! the bottom edge, and is cropped to the used height at the end.

use font8x8::{UnicodeFonts, BASIC_FONTS, LATIN_FONTS};
use image::{imageops, Rgb, RgbImage};

pub const WIDTH: u32 = 1000;
const INITIAL_HEIGHT: u32 = 2000;
const GROW_BY: u32 = 2000;
const GROW_MARGIN: u32 = 200;
const MIN_HEIGHT: u32 = 300;
const BOTTOM_PADDING: u32 = 40;

const SCALE: u32 = 2;
const GLYPH: u32 = 8 * SCALE;
const LINE_HEIGHT: u32 = GLYPH + 4;
const MARGIN: u32 = 10;
const TOP: u32 = 20;

/// Characters that fit on one line.
pub const COLUMNS: usize = ((WIDTH - 2 * MARGIN) / GLYPH) as usize;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

struct Canvas {
    image: RgbImage,
    y: u32,
}

impl Canvas {
    fn new() -> Self {
        Self {
            image: RgbImage::from_pixel(WIDTH, INITIAL_HEIGHT, WHITE),
            y: TOP,
        }
    }

    fn line(&mut self, text: &str) {
        if self.y > self.image.height() - GROW_MARGIN {
            self.grow();
        }
        draw_text(&mut self.image, MARGIN, self.y, text);
        self.y += LINE_HEIGHT;
    }

    fn grow(&mut self) {
        let height = self.image.height() + GROW_BY;
        let mut bigger = RgbImage::from_pixel(WIDTH, height, WHITE);
        imageops::replace(&mut bigger, &self.image, 0, 0);
        self.image = bigger;
        tracing::debug!(height, "grew fallback canvas");
    }

    fn finish(self) -> RgbImage {
        let used = (self.y + BOTTOM_PADDING).max(MIN_HEIGHT);
        let height = used.min(self.image.height());
        imageops::crop_imm(&self.image, 0, 0, WIDTH, height).to_image()
    }
}

fn glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_text(image: &mut RgbImage, x: u32, y: u32, text: &str) {
    for (i, ch) in text.chars().enumerate() {
        let x0 = x + i as u32 * GLYPH;
        if x0 + GLYPH > image.width() {
            break;
        }
        for (row, bits) in glyph(ch).iter().enumerate() {
            for col in 0..8u32 {
                if bits & (1 << col) == 0 {
                    continue;
                }
                let px = x0 + col * SCALE;
                let py = y + row as u32 * SCALE;
                for dy in 0..SCALE {
                    for dx in 0..SCALE {
                        if py + dy < image.height() {
                            image.put_pixel(px + dx, py + dy, BLACK);
                        }
                    }
                }
            }
        }
    }
}

/// Render `lines` top to bottom onto a white canvas.
pub fn render_lines(lines: &[String]) -> RgbImage {
    let mut canvas = Canvas::new();
    for line in lines {
        canvas.line(line);
    }
    canvas.finish()
}
