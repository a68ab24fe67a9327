//! Images painted in code, so the game ships without an asset directory.

use super::{AssetKey, FRAMES_PER_SET, Image, ImageSource};
use crate::color::*;
use crate::error::LoadError;
use crate::font;
use crate::theme::Theme;

const BACKGROUND_W: u32 = 288;
const BACKGROUND_H: u32 = 512;
const OBSTACLE_W: u32 = 52;
const OBSTACLE_H: u32 = 320;
const GROUND_W: u32 = 336;
const GROUND_H: u32 = 112;
const ACTOR_W: u32 = 34;
const ACTOR_H: u32 = 24;

struct Palette {
    sky_top: Rgb,
    sky_bot: Rgb,
    hill_far: Rgb,
    hill_near: Rgb,
}

fn palette(theme: Theme) -> Palette {
    let (sky_top, sky_bot, hill_far, hill_near) = match theme {
        Theme::Day => (Rgb(70, 180, 200), Rgb(190, 232, 245), Rgb(120, 195, 75), Rgb(95, 175, 55)),
        Theme::Map1 => (Rgb(240, 140, 70), Rgb(255, 215, 150), Rgb(170, 120, 70), Rgb(140, 95, 55)),
        Theme::Map2 => (Rgb(20, 30, 70), Rgb(70, 90, 150), Rgb(40, 70, 60), Rgb(30, 55, 45)),
        Theme::Windowex => (Rgb(0, 80, 160), Rgb(60, 140, 220), Rgb(0, 128, 128), Rgb(0, 100, 100)),
        Theme::Error => (Rgb(120, 0, 0), Rgb(200, 40, 40), Rgb(60, 60, 60), Rgb(30, 30, 30)),
        Theme::Map3 => (Rgb(200, 225, 240), Rgb(245, 250, 255), Rgb(210, 220, 230), Rgb(180, 195, 210)),
        Theme::Map4 => (Rgb(110, 60, 150), Rgb(230, 140, 190), Rgb(90, 60, 120), Rgb(70, 45, 100)),
        Theme::Map5 => (Rgb(40, 120, 90), Rgb(150, 210, 170), Rgb(50, 110, 60), Rgb(30, 90, 45)),
        Theme::Map6 => (Rgb(230, 190, 100), Rgb(250, 235, 180), Rgb(200, 160, 90), Rgb(180, 135, 70)),
        Theme::Impossible => (Rgb(5, 5, 10), Rgb(30, 10, 40), Rgb(60, 0, 20), Rgb(90, 0, 30)),
    };
    Palette {
        sky_top,
        sky_bot,
        hill_far,
        hill_near,
    }
}

/// Body colours of the selectable actor frame sets.
const ACTOR_BODIES: [(Rgb, Rgb, Rgb); 3] = [
    (Rgb(245, 200, 66), Rgb(255, 225, 100), Rgb(215, 165, 35)),
    (Rgb(70, 150, 230), Rgb(120, 190, 250), Rgb(40, 110, 190)),
    (Rgb(220, 70, 60), Rgb(245, 120, 100), Rgb(180, 40, 35)),
];

/// Wing offset per frame: mid, down, mid, up.
const WING_OFFSETS: [i32; FRAMES_PER_SET] = [0, 2, 0, -2];

#[derive(Clone, Debug)]
pub struct ProceduralSource {
    frame_sets: usize,
}

impl Default for ProceduralSource {
    fn default() -> Self {
        Self {
            frame_sets: ACTOR_BODIES.len(),
        }
    }
}

impl ProceduralSource {
    /// Offer only the first `frame_sets` colour variants.
    pub fn with_frame_sets(frame_sets: usize) -> Self {
        Self {
            frame_sets: frame_sets.min(ACTOR_BODIES.len()),
        }
    }
}

impl ImageSource for ProceduralSource {
    fn fetch(&self, key: &AssetKey) -> Result<Image, LoadError> {
        match *key {
            AssetKey::Background(theme) => Ok(background(theme)),
            AssetKey::Obstacle => Ok(obstacle()),
            AssetKey::Ground => Ok(ground()),
            AssetKey::ActorFrame { set, frame } if set < self.frame_sets && frame < FRAMES_PER_SET => {
                Ok(actor_frame(set, frame))
            }
            AssetKey::ActorFrame { .. } => Err(LoadError::NotFound(*key)),
            AssetKey::GameOver => Ok(game_over()),
            AssetKey::RestartButton => Ok(restart_button()),
        }
    }

    fn frame_sets(&self) -> Option<usize> {
        Some(self.frame_sets)
    }
}

fn background(theme: Theme) -> Image {
    let pal = palette(theme);
    let (w, h) = (BACKGROUND_W as i32, BACKGROUND_H as i32);
    let mut img = Image::new(BACKGROUND_W, BACKGROUND_H);

    for y in 0..h {
        let t = (y * 256 / h.max(1)) as u16;
        let c = Rgb::lerp(pal.sky_top, pal.sky_bot, t);
        for x in 0..w {
            img.set(x, y, c);
        }
    }

    match theme {
        Theme::Map2 | Theme::Impossible => {
            for i in 0..60u32 {
                let x = (i.wrapping_mul(2654435761) % BACKGROUND_W) as i32;
                let y = (i.wrapping_mul(40503) % (BACKGROUND_H / 2)) as i32;
                img.set(x, y, WHITE);
            }
        }
        Theme::Windowex => {
            // Tiled panes
            for y in (40..h / 2).step_by(48) {
                for x in (16..w - 40).step_by(64) {
                    img.fill_rect(x, y, 40, 30, Rgb(190, 190, 190));
                    img.fill_rect(x, y, 40, 6, Rgb(0, 0, 130));
                    img.fill_rect(x + 2, y + 8, 36, 20, WHITE);
                }
            }
        }
        Theme::Error => {
            for y in (0..h).step_by(16) {
                img.fill_rect(0, y, w, 2, Rgb(255, 80, 80));
            }
        }
        _ => {}
    }

    // Far hills
    let base = h;
    for x in 0..w {
        let fx = x as f64 * 0.04;
        let hh = fx.sin() * 24.0 + (fx * 1.7).sin() * 12.0;
        let top = base - hh as i32 - 90;
        for y in top..base {
            img.set(x, y, pal.hill_far);
        }
    }
    // Near hills
    for x in 0..w {
        let fx = x as f64 * 0.06;
        let hh = fx.sin() * 16.0 + (fx * 2.3).sin() * 8.0;
        let top = base - hh as i32 - 45;
        for y in top..base {
            img.set(x, y, pal.hill_near);
        }
    }
    img
}

fn pipe_shade(x: i32, total_w: i32) -> Rgb {
    if total_w <= 1 {
        return PIPE_M;
    }
    let t = (x as f64 / (total_w - 1) as f64 * 256.0) as u16;
    if t < 64 {
        Rgb::lerp(PIPE_L, PIPE_M, (t * 4).min(256))
    } else if t < 100 {
        Rgb::lerp(PIPE_M, PIPE_HI, ((t - 64) * 7).min(256))
    } else if t < 160 {
        Rgb::lerp(PIPE_HI, PIPE_R, ((t - 100) * 4).min(256))
    } else {
        Rgb::lerp(PIPE_R, PIPE_L, ((t - 160) * 3).min(256))
    }
}

/// Upright pipe with its cap at the top edge.
fn obstacle() -> Image {
    let (w, h) = (OBSTACLE_W as i32, OBSTACLE_H as i32);
    let cap_h = 24;
    let inset = 2;
    let mut img = Image::new(OBSTACLE_W, OBSTACLE_H);

    let body_w = w - inset * 2;
    for x in 0..body_w {
        let c = pipe_shade(x, body_w);
        for y in cap_h..h {
            img.set(inset + x, y, c);
        }
    }
    for x in 0..w {
        let c = pipe_shade(x, w);
        for y in 0..cap_h {
            img.set(x, y, c);
        }
        img.set(x, 0, CAP_DARK);
        img.set(x, cap_h - 1, CAP_DARK);
    }
    img
}

fn ground() -> Image {
    let (w, h) = (GROUND_W as i32, GROUND_H as i32);
    let mut img = Image::new(GROUND_W, GROUND_H);
    for x in 0..w {
        let alt = (x / 6) % 2 == 0;
        for y in 0..8 {
            img.set(x, y, if alt { GRASS } else { GRASS_LIGHT });
        }
        img.set(x, 8, GRASS);
    }
    for y in 9..h {
        for x in 0..w {
            let stripe = (x + y * 2) % 24 < 12;
            img.set(x, y, if stripe { DIRT } else { DIRT_DARK });
        }
    }
    img
}

fn actor_frame(set: usize, frame: usize) -> Image {
    let (body, hi, wing) = ACTOR_BODIES[set];
    let mut img = Image::new(ACTOR_W, ACTOR_H);

    // Body: ellipse filling most of the frame
    let (cx, cy) = (15.0, 12.0);
    let (rx, ry) = (13.0, 10.0);
    for y in 0..ACTOR_H as i32 {
        for x in 0..ACTOR_W as i32 {
            let dx = (x as f64 + 0.5 - cx) / rx;
            let dy = (y as f64 + 0.5 - cy) / ry;
            if dx * dx + dy * dy <= 1.0 {
                img.set(x, y, if dy < -0.5 { hi } else { body });
            }
        }
    }

    // Wing
    let wing_y = 11 + WING_OFFSETS[frame % FRAMES_PER_SET];
    img.fill_rect(4, wing_y, 10, 5, wing);
    img.fill_rect(5, wing_y + 1, 8, 3, hi);

    // Eye
    img.fill_rect(19, 4, 7, 7, BIRD_EYE);
    img.fill_rect(23, 6, 2, 3, BIRD_PUPIL);

    // Beak
    img.fill_rect(24, 13, 10, 3, BIRD_BEAK_HI);
    img.fill_rect(23, 16, 10, 3, BIRD_BEAK);
    img
}

fn panel(w: u32, h: u32, face: Rgb) -> Image {
    let mut img = Image::new(w, h);
    let (w, h) = (w as i32, h as i32);
    img.fill_rect(0, 0, w, h, SHADOW);
    img.fill_rect(1, 1, w - 2, h - 2, DIRT);
    img.fill_rect(3, 3, w - 6, h - 6, face);
    img
}

fn game_over() -> Image {
    let text = "GAME OVER";
    let scale = 4;
    let w = font::text_width(text, scale) + 16;
    let h = font::GLYPH_H * scale + 16;
    let mut img = panel(w as u32, h as u32, PANEL);
    font::draw_text(text, 9, 9, scale, |x, y| img.set(x, y, SHADOW));
    font::draw_text(text, 8, 8, scale, |x, y| img.set(x, y, BIRD_BEAK));
    img
}

fn restart_button() -> Image {
    let text = "TRY AGAIN";
    let scale = 2;
    let w = font::text_width(text, scale) + 20;
    let h = font::GLYPH_H * scale + 16;
    let mut img = panel(w as u32, h as u32, PIPE_M);
    font::draw_text(text, 10, 8, scale, |x, y| img.set(x, y, WHITE));
    img
}
