//! Spritestack headless simulation.
//!
//! Soak-tests the compound sprite's compositing cache without a window:
//! builds a stack of frame-based layers, churns equipment sets for a number
//! of simulated frames against a software screen, and reports the cache
//! statistics at the end.
//!
//! # Running
//!
//! ```sh
//! cargo run --release -- --layers 6 --frames 600 --toggle-every 40
//! ```

use clap::Parser;
use spritestack::render::image::Image;
use spritestack::render::surface::SoftwareSurface;
use spritestack::resources::renderconfig::RenderConfig;
use spritestack::resources::tilegrid::TileGrid;
use spritestack::sprite::api::Sprite;
use spritestack::sprite::compound::CompoundSprite;
use spritestack::sprite::imagesprite::ImageSprite;
use std::path::PathBuf;

/// Spritestack compositing soak
#[derive(Parser)]
#[command(version, about = "Headless soak test for the layered-sprite compositing cache")]
struct Cli {
    /// Number of layers in the stack.
    #[arg(long, default_value_t = 6)]
    layers: usize,

    /// Simulated frames to run.
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Swap the equipment layer every this many frames.
    #[arg(long, default_value_t = 40)]
    toggle_every: u64,

    /// Seed for the layer colors.
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a render.ini to load policy flags from.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Simulated frame delta, one 60 Hz tick.
const FRAME_DT: f32 = 1.0 / 60.0;

fn random_layer() -> ImageSprite {
    let rgba = [
        fastrand::u8(..),
        fastrand::u8(..),
        fastrand::u8(..),
        255,
    ];
    ImageSprite::still(Image::solid(32, 32, rgba))
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Some(seed) = cli.seed {
        fastrand::seed(seed);
    }

    let mut config = match &cli.config {
        Some(path) => RenderConfig::with_path(path.clone()),
        None => RenderConfig::new(),
    };
    if cli.config.is_some() {
        config.load_from_file().ok(); // ignore errors, use defaults
    }

    log::info!(
        "Simulating {} frames of a {}-layer stack (toggle every {} frames)",
        cli.frames,
        cli.layers,
        cli.toggle_every
    );

    let mut being = CompoundSprite::new(config.policy);
    being.set_tile_grid(Some(TileGrid::default()));
    for _ in 0..cli.layers {
        being.add_sprite(Box::new(random_layer()));
    }

    // Two equipment sets for the top slot; toggling between them is the
    // recurring combination the pool is built for.
    let set_a = Image::solid(32, 48, [200, 200, 40, 255]);
    let set_b = Image::solid(32, 48, [40, 200, 200, 255]);
    let top_slot = cli.layers.saturating_sub(1);

    let Some(mut screen) = SoftwareSurface::new(200, 200) else {
        log::error!("Failed to allocate the screen surface");
        std::process::exit(1);
    };

    for frame in 0..cli.frames {
        being.update(FRAME_DT);

        if cli.toggle_every > 0 && frame % cli.toggle_every == 0 && cli.layers > 0 {
            let image = if (frame / cli.toggle_every) % 2 == 0 {
                set_a.clone()
            } else {
                set_b.clone()
            };
            being.set_sprite(top_slot, Some(Box::new(ImageSprite::still(image))));
        }

        screen.clear();
        being.draw(&mut screen, 100, 100);
    }

    let stats = being.stats();
    log::info!(
        "Done: {} composes, {} hits, {} misses, {} evictions, {} pooled",
        stats.composes,
        stats.hits,
        stats.misses,
        stats.evictions,
        being.pooled_count()
    );
}
