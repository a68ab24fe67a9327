//! Images and the background resource loader.
//!
//! The simulation only needs an image's width and height. Everything else
//! here exists to get pixels onto the screen: an [`ImageSource`] produces
//! images by key, a [`Loader`] runs those fetches off the frame loop and an
//! [`AssetStore`] tracks which static images have arrived.

mod procedural;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::task::Poll;
use std::thread;

use crate::color::Rgb;
use crate::error::LoadError;
use crate::geom::Size;
use crate::theme::Theme;

pub use procedural::ProceduralSource;

/// Frames in every actor frame set.
pub const FRAMES_PER_SET: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKey {
    Background(Theme),
    Obstacle,
    Ground,
    ActorFrame { set: usize, frame: usize },
    GameOver,
    RestartButton,
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Background(theme) => write!(f, "background/{theme}"),
            Self::Obstacle => f.write_str("obstacle"),
            Self::Ground => f.write_str("ground"),
            Self::ActorFrame { set, frame } => write!(f, "actor/{}-{}", set + 1, frame + 1),
            Self::GameOver => f.write_str("gameover"),
            Self::RestartButton => f.write_str("restart-button"),
        }
    }
}

/// Row-major pixel grid; `None` pixels are transparent.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    px: Vec<Option<Rgb>>,
}

impl Image {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            px: vec![None; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        if x < self.width && y < self.height {
            self.px[y as usize * self.width as usize + x as usize]
        } else {
            None
        }
    }

    pub fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            self.px[y as usize * self.width as usize + x as usize] = Some(c);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgb) {
        for dy in 0..h {
            for dx in 0..w {
                self.set(x + dx, y + dy, c);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One actor animation: a fixed-length sequence of same-sized frames.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSet {
    index: usize,
    frames: Vec<Image>,
}

impl FrameSet {
    pub fn new(index: usize, frames: Vec<Image>) -> Result<Self, LoadError> {
        let key = AssetKey::ActorFrame { set: index, frame: 0 };
        let Some(first) = frames.first() else {
            return Err(LoadError::Invalid {
                key,
                reason: "frame set has no frames".to_string(),
            });
        };
        if frames.len() != FRAMES_PER_SET {
            return Err(LoadError::Invalid {
                key,
                reason: format!("expected {FRAMES_PER_SET} frames, got {}", frames.len()),
            });
        }
        let size = (first.width(), first.height());
        if let Some(bad) = frames.iter().position(|f| (f.width(), f.height()) != size) {
            return Err(LoadError::Invalid {
                key: AssetKey::ActorFrame {
                    set: index,
                    frame: bad,
                },
                reason: "frame size differs from the first frame".to_string(),
            });
        }
        Ok(Self { index, frames })
    }

    /// Which of the configured sets this is.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, i: usize) -> &Image {
        &self.frames[i.min(self.frames.len() - 1)]
    }
}

/// Produces images by key. Implementations run on loader threads.
pub trait ImageSource: Send + Sync + 'static {
    fn fetch(&self, key: &AssetKey) -> Result<Image, LoadError>;

    /// How many actor frame sets this source can produce, if it knows.
    fn frame_sets(&self) -> Option<usize> {
        None
    }
}

/// A load in flight. Poll it from the frame loop until it is ready, then drop it.
pub struct Pending<T> {
    key: AssetKey,
    rx: Receiver<Result<T, LoadError>>,
}

impl<T> Pending<T> {
    pub fn key(&self) -> AssetKey {
        self.key
    }

    pub fn poll(&self) -> Poll<Result<T, LoadError>> {
        match self.rx.try_recv() {
            Ok(result) => Poll::Ready(result),
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => Poll::Ready(Err(LoadError::Disconnected(self.key))),
        }
    }

    /// Block until the load finishes.
    pub fn wait(self) -> Result<T, LoadError> {
        self.rx
            .recv()
            .unwrap_or(Err(LoadError::Disconnected(self.key)))
    }
}

/// Runs [`ImageSource`] fetches on background threads.
#[derive(Clone)]
pub struct Loader {
    source: Arc<dyn ImageSource>,
}

impl Loader {
    pub fn new(source: impl ImageSource) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn image(&self, key: AssetKey) -> Pending<Image> {
        let source = Arc::clone(&self.source);
        self.spawn(key, move || source.fetch(&key))
    }

    /// Load every frame of a set; the result is all frames or the first failure.
    pub fn frame_set(&self, set: usize) -> Pending<FrameSet> {
        let source = Arc::clone(&self.source);
        self.spawn(AssetKey::ActorFrame { set, frame: 0 }, move || {
            let frames = (0..FRAMES_PER_SET)
                .map(|frame| source.fetch(&AssetKey::ActorFrame { set, frame }))
                .collect::<Result<Vec<_>, _>>()?;
            FrameSet::new(set, frames)
        })
    }

    fn spawn<T, F>(&self, key: AssetKey, job: F) -> Pending<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T, LoadError> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // Receiver may already be gone if the load was superseded.
            let _ = tx.send(job());
        });
        log::debug!("Requested {key}");
        Pending { key, rx }
    }
}

/// Static images the renderer needs, plus lazily loaded backgrounds.
pub struct AssetStore {
    loader: Loader,
    images: HashMap<AssetKey, Image>,
    pending: Vec<Pending<Image>>,
    shown_background: Option<Theme>,
    failure: Option<LoadError>,
}

impl AssetStore {
    const STATIC: [AssetKey; 5] = [
        AssetKey::Background(Theme::Day),
        AssetKey::Obstacle,
        AssetKey::Ground,
        AssetKey::GameOver,
        AssetKey::RestartButton,
    ];

    /// Start loading every image needed for the first frame.
    pub fn new(loader: Loader) -> Self {
        let pending = Self::STATIC.iter().map(|&key| loader.image(key)).collect();
        Self {
            loader,
            images: HashMap::new(),
            pending,
            shown_background: None,
            failure: None,
        }
    }

    pub fn loader(&self) -> &Loader {
        &self.loader
    }

    /// Collect finished loads. Returns the first failure seen, if any.
    pub fn poll(&mut self) -> Option<&LoadError> {
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for pending in self.pending.drain(..) {
            match pending.poll() {
                Poll::Pending => still_pending.push(pending),
                Poll::Ready(Ok(image)) => {
                    log::debug!("Loaded {} ({}x{})", pending.key(), image.width(), image.height());
                    self.images.insert(pending.key(), image);
                }
                Poll::Ready(Err(e)) => {
                    log::error!("Asset load failed: {e}");
                    if self.failure.is_none() {
                        self.failure = Some(e);
                    }
                }
            }
        }
        self.pending = still_pending;
        self.failure.as_ref()
    }

    /// All images for the first frame have arrived.
    pub fn is_ready(&self) -> bool {
        Self::STATIC.iter().all(|k| self.images.contains_key(k))
    }

    pub fn get(&self, key: AssetKey) -> Option<&Image> {
        self.images.get(&key)
    }

    pub fn obstacle_size(&self) -> Option<Size> {
        self.get(AssetKey::Obstacle).map(Image::size)
    }

    /// Ask for the background of `wanted`. Until it has loaded the
    /// previously shown background stays on screen.
    pub fn want_background(&mut self, wanted: Theme) {
        let key = AssetKey::Background(wanted);
        if self.images.contains_key(&key) {
            self.shown_background = Some(wanted);
        } else if !self.pending.iter().any(|p| p.key() == key) && self.failure.is_none() {
            self.pending.push(self.loader.image(key));
        }
    }

    pub fn background(&self) -> Option<&Image> {
        let shown = self.shown_background?;
        self.images.get(&AssetKey::Background(shown))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Missing;

    impl ImageSource for Missing {
        fn fetch(&self, key: &AssetKey) -> Result<Image, LoadError> {
            match key {
                AssetKey::ActorFrame { frame: 2, .. } => Err(LoadError::NotFound(*key)),
                _ => Ok(Image::new(2, 2)),
            }
        }
    }

    #[test]
    fn frame_set_fails_as_a_whole() {
        let loader = Loader::new(Missing);
        let err = loader.frame_set(1).wait().unwrap_err();
        assert_eq!(err, LoadError::NotFound(AssetKey::ActorFrame { set: 1, frame: 2 }));
    }

    #[test]
    fn frame_set_rejects_mixed_sizes() {
        let mut frames = vec![Image::new(3, 3); FRAMES_PER_SET];
        frames[2] = Image::new(4, 3);
        let err = FrameSet::new(0, frames).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Invalid {
                key: AssetKey::ActorFrame { set: 0, frame: 2 },
                ..
            }
        ));
    }

    #[test]
    fn frame_set_needs_exactly_four_frames() {
        for n in [0, 1, 3, 5] {
            let err = FrameSet::new(1, vec![Image::new(3, 3); n]).unwrap_err();
            assert!(matches!(err, LoadError::Invalid { .. }), "{n} frames");
        }
        assert!(FrameSet::new(1, vec![Image::new(3, 3); FRAMES_PER_SET]).is_ok());
    }

    #[test]
    fn store_becomes_ready() {
        let mut store = AssetStore::new(Loader::new(ProceduralSource::default()));
        while !store.is_ready() {
            assert!(store.poll().is_none());
            thread::yield_now();
        }
        assert_eq!(store.obstacle_size(), Some(Size::new(52.0, 320.0)));
        assert!(store.background().is_none());
        store.want_background(Theme::Day);
        assert!(store.background().is_some());
    }

    #[test]
    fn background_falls_back_until_loaded() {
        let mut store = AssetStore::new(Loader::new(ProceduralSource::default()));
        while !store.is_ready() {
            store.poll();
            thread::yield_now();
        }
        store.want_background(Theme::Day);
        let day = store.background().cloned();
        // Map1 is requested now and the day background stays up meanwhile.
        store.want_background(Theme::Map1);
        assert_eq!(store.background().cloned(), day);
        while store.get(AssetKey::Background(Theme::Map1)).is_none() {
            store.poll();
            thread::yield_now();
        }
        store.want_background(Theme::Map1);
        assert_eq!(store.shown_background, Some(Theme::Map1));
        assert_ne!(store.background().cloned(), day);
    }

    #[test]
    fn image_set_is_clipped() {
        let mut img = Image::new(2, 2);
        img.set(-1, 0, Rgb(1, 2, 3));
        img.set(5, 5, Rgb(1, 2, 3));
        img.set(1, 1, Rgb(1, 2, 3));
        assert_eq!(img.get(1, 1), Some(Rgb(1, 2, 3)));
        assert_eq!(img.get(0, 0), None);
        assert_eq!(img.get(9, 9), None);
    }
}
