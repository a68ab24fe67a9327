// ── 3x5 bitmap glyphs ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

#[rustfmt::skip]
const LETTERS: [(char, [u8; 15]); 14] = [
    ('A', [0,1,0, 1,0,1, 1,1,1, 1,0,1, 1,0,1]),
    ('D', [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,1,0]),
    ('E', [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,1,1]),
    ('G', [0,1,1, 1,0,0, 1,0,1, 1,0,1, 0,1,1]),
    ('I', [1,1,1, 0,1,0, 0,1,0, 0,1,0, 1,1,1]),
    ('L', [1,0,0, 1,0,0, 1,0,0, 1,0,0, 1,1,1]),
    ('M', [1,0,1, 1,1,1, 1,1,1, 1,0,1, 1,0,1]),
    ('N', [1,1,0, 1,0,1, 1,0,1, 1,0,1, 1,0,1]),
    ('O', [0,1,0, 1,0,1, 1,0,1, 1,0,1, 0,1,0]),
    ('R', [1,1,0, 1,0,1, 1,1,0, 1,0,1, 1,0,1]),
    ('T', [1,1,1, 0,1,0, 0,1,0, 0,1,0, 0,1,0]),
    ('V', [1,0,1, 1,0,1, 1,0,1, 1,0,1, 0,1,0]),
    ('Y', [1,0,1, 1,0,1, 0,1,0, 0,1,0, 0,1,0]),
    ('F', [1,1,1, 1,0,0, 1,1,0, 1,0,0, 1,0,0]),
];

pub const GLYPH_W: i32 = 3;
pub const GLYPH_H: i32 = 5;

fn glyph(ch: char) -> Option<&'static [u8; 15]> {
    if let Some(d) = ch.to_digit(10) {
        return Some(&DIGITS[d as usize]);
    }
    let upper = ch.to_ascii_uppercase();
    LETTERS.iter().find(|(c, _)| *c == upper).map(|(_, g)| g)
}

/// Width in cells of `text` at `scale`, with one blank column between glyphs.
pub fn text_width(text: &str, scale: i32) -> i32 {
    let n = text.chars().count() as i32;
    if n == 0 {
        return 0;
    }
    (n * (GLYPH_W + 1) - 1) * scale
}

/// Calls `plot(x, y)` for every lit cell of `text`. Unknown characters
/// (including spaces) advance without drawing.
pub fn draw_text(text: &str, x: i32, y: i32, scale: i32, mut plot: impl FnMut(i32, i32)) {
    for (i, ch) in text.chars().enumerate() {
        let Some(g) = glyph(ch) else { continue };
        let gx = x + i as i32 * (GLYPH_W + 1) * scale;
        for row in 0..GLYPH_H {
            for col in 0..GLYPH_W {
                if g[(row * GLYPH_W + col) as usize] == 1 {
                    for sy in 0..scale {
                        for sx in 0..scale {
                            plot(gx + col * scale + sx, y + row * scale + sy);
                        }
                    }
                }
            }
        }
    }
}
