//! Sprite sheet slicing.
//!
//! Sheets are PNG images with a JSON sidecar listing the frame rectangles:
//!
//! ```json
//! [ { "name": "idle_0", "x": 0, "y": 0, "width": 32, "height": 48 } ]
//! ```
//!
//! Cutting the sheets is an offline job; this module only reads the result.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::{imageops, RgbaImage};
use serde::Deserialize;

use crate::error::{Result, RuntimeError};
use crate::sprite::SpriteFrame;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FrameRect {
    #[serde(default)]
    pub name: Option<String>,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FrameRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            name: None,
            x,
            y,
            width,
            height,
        }
    }

    fn fits_within(&self, sheet_w: u32, sheet_h: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|r| r <= sheet_w)
            && self.y.checked_add(self.height).is_some_and(|b| b <= sheet_h)
    }
}

pub trait SpriteLoader {
    fn load_sheet(&self, sheet: &Path) -> Result<Arc<RgbaImage>>;

    fn load_rects(&self, metadata: &Path) -> Result<Vec<FrameRect>>;

    /// Cut `rects` out of `sheet`, in order.
    fn load_frames(&self, sheet: &Path, rects: &[FrameRect]) -> Result<Vec<SpriteFrame>> {
        let image = self.load_sheet(sheet)?;
        let (sheet_w, sheet_h) = image.dimensions();
        rects
            .iter()
            .enumerate()
            .map(|(index, rect)| {
                if !rect.fits_within(sheet_w, sheet_h) {
                    return Err(RuntimeError::FrameOutOfBounds {
                        path: sheet.to_path_buf(),
                        index,
                    });
                }
                let cut = imageops::crop_imm(image.as_ref(), rect.x, rect.y, rect.width, rect.height)
                    .to_image();
                Ok(SpriteFrame::new(cut))
            })
            .collect()
    }

    /// Sheet plus its rectangle sidecar in one call.
    fn load_strip(&self, sheet: &Path, metadata: &Path) -> Result<Vec<SpriteFrame>> {
        let rects = self.load_rects(metadata)?;
        self.load_frames(sheet, &rects)
    }
}

/// Loads sheets from a directory on disk. Paths are resolved against `root`
/// and decoded sheets are cached, so characters sharing a sheet decode it
/// once.
pub struct FsSpriteLoader {
    root: PathBuf,
    sheets: RefCell<HashMap<PathBuf, Arc<RgbaImage>>>,
}

impl FsSpriteLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sheets: RefCell::new(HashMap::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub fn cached_sheet_count(&self) -> usize {
        self.sheets.borrow().len()
    }
}

impl SpriteLoader for FsSpriteLoader {
    fn load_sheet(&self, sheet: &Path) -> Result<Arc<RgbaImage>> {
        let path = self.resolve(sheet);
        if let Some(cached) = self.sheets.borrow().get(&path) {
            return Ok(Arc::clone(cached));
        }

        let bytes = fs::read(&path).map_err(|source| RuntimeError::AssetRead {
            path: path.clone(),
            source,
        })?;
        let image = image::load_from_memory(&bytes)
            .map_err(|source| RuntimeError::ImageDecode {
                path: path.clone(),
                source,
            })?
            .to_rgba8();
        log::debug!(
            "Loaded sprite sheet {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        let image = Arc::new(image);
        self.sheets.borrow_mut().insert(path, Arc::clone(&image));
        Ok(image)
    }

    fn load_rects(&self, metadata: &Path) -> Result<Vec<FrameRect>> {
        let path = self.resolve(metadata);
        let raw = fs::read_to_string(&path).map_err(|source| RuntimeError::AssetRead {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| RuntimeError::FrameMetadata { path, source })
    }
}
