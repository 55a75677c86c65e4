//! Sprite frame images.
//!
//! A [`SpriteFrame`] is a shared RGBA image plus a process-unique id the GPU
//! side uses as its texture cache key. Frames are cheap to clone, so several
//! animations (and several entities built from the same character) can share
//! the same pixels.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::{imageops, Rgba, RgbaImage};

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
pub struct SpriteFrame {
    id: u64,
    image: Arc<RgbaImage>,
}

impl SpriteFrame {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            id: NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed),
            image: Arc::new(image),
        }
    }

    /// Single-color frame, used for placeholder geometry such as the ground.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self::new(RgbaImage::from_pixel(
            width.max(1),
            height.max(1),
            Rgba(rgba),
        ))
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

impl PartialEq for SpriteFrame {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SpriteFrame {}

/// The frame an animation currently shows, with its mirroring flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRef {
    pub frame: SpriteFrame,
    pub flipped: bool,
}

impl SpriteRef {
    pub fn size(&self) -> (u32, u32) {
        self.frame.size()
    }

    /// Materialise the pixels as they appear on screen.
    pub fn to_image(&self) -> RgbaImage {
        if self.flipped {
            imageops::flip_horizontal(self.frame.image())
        } else {
            self.frame.image().clone()
        }
    }
}

pub fn max_frame_size(frames: &[SpriteFrame]) -> (u32, u32) {
    frames.iter().fold((0, 0), |(mw, mh), frame| {
        let (w, h) = frame.size();
        (mw.max(w), mh.max(h))
    })
}

/// Pad every frame onto a transparent canvas of the largest frame's size,
/// centered horizontally and aligned to the bottom edge, so switching frames
/// never moves the silhouette's feet.
pub fn normalize_frames(frames: Vec<SpriteFrame>) -> Vec<SpriteFrame> {
    let (max_w, max_h) = max_frame_size(&frames);
    frames
        .into_iter()
        .map(|frame| {
            let (w, h) = frame.size();
            if (w, h) == (max_w, max_h) {
                return frame;
            }
            let mut canvas = RgbaImage::new(max_w, max_h);
            let x_offset = (max_w - w) / 2;
            let y_offset = max_h - h;
            imageops::replace(
                &mut canvas,
                frame.image(),
                i64::from(x_offset),
                i64::from(y_offset),
            );
            SpriteFrame::new(canvas)
        })
        .collect()
}
