//! Runtime core of the Curbside street game.
//!
//! Nothing in here touches a window or the GPU. The binary feeds
//! [`FrameInput`](frame::FrameInput) snapshots into a
//! [`Director`](director::Director) and hands the resulting
//! [`DrawList`](canvas::DrawList) to the renderer.

pub mod animation;
pub mod animation_handler;
pub mod assets;
pub mod canvas;
pub mod character;
pub mod collision;
pub mod director;
pub mod entity;
pub mod error;
pub mod frame;
pub mod gravity;
pub mod input;
pub mod locale;
pub mod registry;
pub mod scene;
pub mod scheduler;
pub mod settings;
pub mod sprite;
pub mod time;
pub mod transition;
pub mod vehicle;

#[cfg(test)]
mod replay;

pub use error::{Result, RuntimeError};
