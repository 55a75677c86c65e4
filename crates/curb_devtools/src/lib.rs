pub mod overlay;

pub use overlay::{DebugOverlay, OverlayStats};
