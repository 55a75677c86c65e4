use std::path::PathBuf;

use clap::Parser;
use curb_core::transition::DEFAULT_FADE_STEP;

/// Side-scrolling street game.
#[derive(Debug, Clone, Parser)]
#[command(name = "curbside", version, about)]
pub struct Cli {
    /// Directory holding sprites, locales and the stage file.
    #[arg(long, default_value = "assets")]
    pub assets: PathBuf,

    /// Persisted player settings.
    #[arg(long, default_value = "config/settings.json")]
    pub settings: PathBuf,

    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Opacity change per tick while fading between screens.
    #[arg(long, default_value_t = DEFAULT_FADE_STEP)]
    pub fade_step: u8,
}

impl Cli {
    pub fn locales_dir(&self) -> PathBuf {
        self.assets.join("locales")
    }

    pub fn stage_path(&self) -> PathBuf {
        self.assets.join("stage.json")
    }
}
