//! Composes a frame of the game into a [`PixelBuf`].

mod pixels;

pub use pixels::PixelBuf;

use crate::assets::{AssetKey, Image};
use crate::color::{FAILURE, LETTERBOX, Rgb, SHADOW, WHITE};
use crate::font;
use crate::geom::Rect;
use crate::obstacle::{lower_rect, upper_rect};
use crate::session::{Session, Status};
use crate::state::GameState;

/// Fits the world canvas into the pixel buffer, centred, keeping its aspect ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub ox: f64,
    pub oy: f64,
    pub canvas_w: f64,
    pub canvas_h: f64,
}

impl Viewport {
    pub fn fit(pw: usize, ph: usize, canvas_w: f64, canvas_h: f64) -> Self {
        let scale = (pw as f64 / canvas_w).min(ph as f64 / canvas_h);
        Self {
            scale,
            ox: ((pw as f64 - canvas_w * scale) / 2.0).floor(),
            oy: ((ph as f64 - canvas_h * scale) / 2.0).floor(),
            canvas_w,
            canvas_h,
        }
    }

    pub fn to_px(&self, x: f64, y: f64) -> (f64, f64) {
        (self.ox + x * self.scale, self.oy + y * self.scale)
    }

    pub fn to_world(&self, px: f64, py: f64) -> (f64, f64) {
        ((px - self.ox) / self.scale, (py - self.oy) / self.scale)
    }

    /// World position under a terminal cell (sampled at the cell centre).
    pub fn cell_to_world(&self, column: u16, row: u16) -> (f64, f64) {
        self.to_world(column as f64 + 0.5, row as f64 * 2.0 + 1.0)
    }

    /// Pixel bounds of the canvas.
    fn canvas_px(&self) -> (i32, i32, i32, i32) {
        let (x0, y0) = self.to_px(0.0, 0.0);
        let (x1, y1) = self.to_px(self.canvas_w, self.canvas_h);
        (x0 as i32, y0 as i32, x1.ceil() as i32, y1.ceil() as i32)
    }

    /// Nearest-neighbour blit of `img` with its top-left at world `(x, y)`,
    /// clipped to the canvas. `flip` mirrors the image vertically.
    pub fn blit(&self, buf: &mut PixelBuf, img: &Image, x: f64, y: f64, flip: bool) {
        let (w, h) = (img.width() as f64, img.height() as f64);
        let (cx0, cy0, cx1, cy1) = self.canvas_px();
        let (px0, py0) = self.to_px(x, y);
        let (px1, py1) = self.to_px(x + w, y + h);
        let (px0, py0) = ((px0.floor() as i32).max(cx0), (py0.floor() as i32).max(cy0));
        let (px1, py1) = ((px1.ceil() as i32).min(cx1), (py1.ceil() as i32).min(cy1));

        for py in py0..py1 {
            for px in px0..px1 {
                let (wx, wy) = self.to_world(px as f64 + 0.5, py as f64 + 0.5);
                let (sx, sy) = ((wx - x).floor(), (wy - y).floor());
                if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
                    continue;
                }
                let sy = if flip { h - 1.0 - sy } else { sy };
                if let Some(c) = img.get(sx as u32, sy as u32) {
                    buf.set(px, py, c);
                }
            }
        }
    }

    /// Like [`Viewport::blit`], but turned by `angle` radians (clockwise on
    /// screen) about the image centre.
    pub fn blit_rotated(&self, buf: &mut PixelBuf, img: &Image, x: f64, y: f64, angle: f64) {
        if angle == 0.0 {
            self.blit(buf, img, x, y, false);
            return;
        }
        let (w, h) = (img.width() as f64, img.height() as f64);
        let (cx, cy) = (x + w / 2.0, y + h / 2.0);
        let r = w.hypot(h) / 2.0;
        let (sin, cos) = angle.sin_cos();

        let (cx0, cy0, cx1, cy1) = self.canvas_px();
        let (px0, py0) = self.to_px(cx - r, cy - r);
        let (px1, py1) = self.to_px(cx + r, cy + r);
        let (px0, py0) = ((px0.floor() as i32).max(cx0), (py0.floor() as i32).max(cy0));
        let (px1, py1) = ((px1.ceil() as i32).min(cx1), (py1.ceil() as i32).min(cy1));

        for py in py0..py1 {
            for px in px0..px1 {
                let (wx, wy) = self.to_world(px as f64 + 0.5, py as f64 + 0.5);
                let (dx, dy) = (wx - cx, wy - cy);
                let sx = (dx * cos + dy * sin + w / 2.0).floor();
                let sy = (dy * cos - dx * sin + h / 2.0).floor();
                if sx < 0.0 || sy < 0.0 || sx >= w || sy >= h {
                    continue;
                }
                if let Some(c) = img.get(sx as u32, sy as u32) {
                    buf.set(px, py, c);
                }
            }
        }
    }

    fn text_scale(&self) -> i32 {
        ((self.scale * 6.0).round() as i32).max(1)
    }
}

pub fn draw_number(buf: &mut PixelBuf, cx: i32, y: i32, n: u32, scale: i32, fg: Rgb) {
    draw_label(buf, cx, y, &n.to_string(), scale, fg);
}

/// Centred text with a one-pixel drop shadow.
pub fn draw_label(buf: &mut PixelBuf, cx: i32, y: i32, text: &str, scale: i32, fg: Rgb) {
    let x = cx - font::text_width(text, scale) / 2;
    font::draw_text(text, x + 1, y + 1, scale, |px, py| buf.set(px, py, SHADOW));
    font::draw_text(text, x, y, scale, |px, py| buf.set(px, py, fg));
}

/// Draw whatever the session currently has to show.
pub fn draw_frame(buf: &mut PixelBuf, view: &Viewport, session: &Session) {
    buf.clear(LETTERBOX);
    let cx = buf.width() as i32 / 2;
    let cy = buf.height() as i32 / 2;

    if let Status::Failed(e) = session.status() {
        buf.clear(FAILURE);
        draw_label(buf, cx, cy - 8, "LOAD FAILED", 1, WHITE);
        log::trace!("Showing failure screen: {e}");
        return;
    }

    match session.game() {
        Some(game) if game.actor.frame().is_some() => draw_scene(buf, view, session, game),
        _ => draw_label(buf, cx, cy - 2, "LOADING", 1, WHITE),
    }
}

fn draw_scene(buf: &mut PixelBuf, view: &Viewport, session: &Session, game: &GameState) {
    let assets = session.assets();
    let settings = game.settings();

    if let Some(bg) = assets.background() {
        view.blit(buf, bg, 0.0, 0.0, false);
    }

    if let Some(pipe) = assets.get(AssetKey::Obstacle) {
        let size = game.obstacle_size();
        for pair in game.obstacles.iter() {
            let upper = upper_rect(pair, size, settings.obstacle_offset);
            let lower = lower_rect(pair, size, settings.obstacle_offset);
            view.blit(buf, pipe, upper.x, upper.y, false);
            view.blit(buf, pipe, lower.x, lower.y, true);
        }
    }

    if let Some(ground) = assets.get(AssetKey::Ground) {
        let x = game.ground_offset();
        let y = settings.playfield_height;
        view.blit(buf, ground, x, y, false);
        view.blit(buf, ground, x + ground.width() as f64, y, false);
    }

    if let Some(frame) = game.actor.frame() {
        let r = game.actor.rect();
        view.blit_rotated(buf, frame, r.x, r.y, game.actor.tilt());
    }

    let (score_x, score_y) = view.to_px(settings.canvas_width / 2.0, 12.0);
    draw_number(buf, score_x as i32, score_y as i32, game.score(), view.text_scale(), WHITE);

    if game.end_screen_showing() {
        draw_end_screen(buf, view, session, game);
    }
}

fn draw_end_screen(buf: &mut PixelBuf, view: &Viewport, session: &Session, game: &GameState) {
    let assets = session.assets();
    let settings = game.settings();
    buf.dim();

    if let Some(panel) = assets.get(AssetKey::GameOver) {
        let x = settings.canvas_width / 2.0 - panel.width() as f64 / 2.0;
        let y = settings.canvas_height() / 2.0 - panel.height() as f64 / 2.0;
        view.blit(buf, panel, x, y, false);
    }
    if let Some(button) = assets.get(AssetKey::RestartButton) {
        let Rect { x, y, .. } = game.restart_button_rect(button.size());
        view.blit(buf, button, x, y, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letterboxes_a_wide_terminal() {
        // 200x62 pixels for a 288x624 canvas: height limits the scale.
        let view = Viewport::fit(200, 62, 288.0, 624.0);
        assert!((view.scale - 62.0 / 624.0).abs() < 1e-12);
        assert!(view.ox > 0.0);
        assert_eq!(view.oy, 0.0);
    }

    #[test]
    fn world_and_pixels_round_trip() {
        let view = Viewport::fit(120, 80, 288.0, 624.0);
        let (px, py) = view.to_px(144.0, 300.0);
        let (wx, wy) = view.to_world(px, py);
        assert!((wx - 144.0).abs() < 1e-9);
        assert!((wy - 300.0).abs() < 1e-9);
    }

    #[test]
    fn blit_clips_to_canvas() {
        let view = Viewport::fit(40, 20, 20.0, 20.0);
        let mut img = Image::new(10, 10);
        img.fill_rect(0, 0, 10, 10, WHITE);
        let mut buf = PixelBuf::new(40, 20);
        // Hangs off the left edge of the canvas.
        view.blit(&mut buf, &img, -5.0, 0.0, false);
        assert_eq!(buf.get(9, 0), LETTERBOX);
        assert_eq!(buf.get(10, 0), WHITE);
        assert_eq!(buf.get(14, 9), WHITE);
        assert_eq!(buf.get(15, 0), LETTERBOX);
    }

    #[test]
    fn rotation_turns_a_bar_upright() {
        let view = Viewport::fit(20, 20, 20.0, 20.0);
        let mut bar = Image::new(9, 1);
        bar.fill_rect(0, 0, 9, 1, WHITE);

        let mut flat = PixelBuf::new(20, 20);
        view.blit_rotated(&mut flat, &bar, 5.0, 10.0, 0.0);
        assert_eq!(flat.get(5, 10), WHITE);
        assert_eq!(flat.get(9, 6), LETTERBOX);

        let mut turned = PixelBuf::new(20, 20);
        view.blit_rotated(&mut turned, &bar, 5.0, 10.0, std::f64::consts::FRAC_PI_2);
        assert_eq!(turned.get(9, 6), WHITE);
        assert_eq!(turned.get(9, 14), WHITE);
        assert_eq!(turned.get(5, 10), LETTERBOX);
    }

    #[test]
    fn blit_flips_vertically() {
        let view = Viewport::fit(4, 4, 4.0, 4.0);
        let mut img = Image::new(1, 2);
        img.set(0, 0, WHITE);
        let mut buf = PixelBuf::new(4, 4);
        view.blit(&mut buf, &img, 0.0, 0.0, true);
        assert_eq!(buf.get(0, 1), WHITE);
        assert_eq!(buf.get(0, 0), LETTERBOX);
    }
}
