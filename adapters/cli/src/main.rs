#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Castaway experience.

mod movement;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use castaway_core::GAME_TITLE;
use castaway_rendering::{treasure_map, Color, Presentation, RenderingBackend, Scene};
use castaway_rendering_macroquad::MacroquadBackend;
use castaway_system_bootstrap::{bootstrap, BootstrapConfig};
use castaway_world::TileGrid;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Sea color shown past the edge of the world.
const CLEAR_COLOR: Color = Color::new(0.106, 0.231, 0.31, 1.0);

#[derive(Debug, Parser)]
#[command(name = "castaway", author, version, about = "Explore a procedurally generated island")]
struct CliArgs {
    /// TOML file with world generation settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the world seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the edge length of the square world, in tiles.
    #[arg(long)]
    size: Option<u32>,
    /// Edge length of one tile on screen, in pixels.
    #[arg(long, default_value_t = 64.0)]
    tile_size: f32,
    /// Initial window width in pixels.
    #[arg(long, default_value_t = 1024)]
    width: u32,
    /// Initial window height in pixels.
    #[arg(long, default_value_t = 768)]
    height: u32,
    /// Player speed in tiles per second.
    #[arg(long, default_value_t = 4.0)]
    speed: f32,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, value_name = "BOOL")]
    vsync: Option<bool>,
    /// Log frame statistics once per second.
    #[arg(long)]
    show_fps: bool,
    /// Sprite manifest; flat colors are drawn when omitted.
    #[arg(long, value_name = "MANIFEST")]
    sprites: Option<PathBuf>,
    /// Writes the treasure map as a PNG and exits without opening a window.
    #[arg(long, value_name = "PATH")]
    export_treasure_map: Option<PathBuf>,
}

/// Entry point for the Castaway command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    info!(
        seed = config.seed,
        size = config.generation.size,
        "generating world"
    );

    let world = bootstrap(&config).context("failed to generate a world")?;
    info!(
        attempts = world.attempts(),
        treasure_x = world.treasure_anchor().x(),
        treasure_y = world.treasure_anchor().y(),
        "world generated"
    );

    if let Some(path) = &args.export_treasure_map {
        export_treasure_map(world.grid(), path)?;
        info!(path = %path.display(), "treasure map written");
        return Ok(());
    }

    let player = world.player_start();
    let scene = Scene::new(world.into_grid(), player);
    let presentation = Presentation::new(GAME_TITLE, CLEAR_COLOR, args.tile_size, scene);

    let mut backend = MacroquadBackend::new()
        .with_show_fps(args.show_fps)
        .with_window_size(args.width, args.height)
        .with_sprite_manifest(args.sprites.clone());
    if let Some(vsync) = args.vsync {
        backend = backend.with_vsync(vsync);
    }

    let speed = args.speed;
    backend.run(presentation, move |frame, input, scene| {
        let _ = movement::advance_player(scene, input, frame, speed);
    })
}

fn load_config(args: &CliArgs) -> Result<BootstrapConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            parse_config(&contents)
                .with_context(|| format!("failed to parse config at {}", path.display()))?
        }
        None => BootstrapConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(size) = args.size {
        config.generation.size = size;
    }
    Ok(config)
}

fn parse_config(contents: &str) -> Result<BootstrapConfig> {
    Ok(toml::from_str(contents)?)
}

fn export_treasure_map(grid: &TileGrid, path: &Path) -> Result<()> {
    let map = treasure_map(grid);
    let (width, height) = (map.width(), map.height());
    let image = image::RgbaImage::from_raw(width, height, map.into_pixels())
        .context("treasure map buffer does not match its dimensions")?;
    image
        .save(path)
        .with_context(|| format!("failed to write treasure map to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_defaults() {
        let args = CliArgs::try_parse_from(["castaway", "--seed", "7", "--size", "32"])
            .expect("valid arguments");
        let config = load_config(&args).expect("defaults load");
        assert_eq!(config.seed, 7);
        assert_eq!(config.generation.size, 32);
        assert_eq!(config.max_regenerations, BootstrapConfig::default().max_regenerations);
    }

    #[test]
    fn vsync_takes_an_explicit_value() {
        let args = CliArgs::try_parse_from(["castaway", "--vsync", "false", "--show-fps"])
            .expect("valid arguments");
        assert_eq!(args.vsync, Some(false));
        assert!(args.show_fps);
        assert_eq!(args.tile_size, 64.0);
    }

    #[test]
    fn config_file_contents_are_parsed() {
        let config = parse_config(
            r#"
                seed = 11
                [generation]
                size = 48
            "#,
        )
        .expect("valid config");
        assert_eq!(config.seed, 11);
        assert_eq!(config.generation.size, 48);
    }

    #[test]
    fn unknown_types_are_reported() {
        assert!(parse_config("seed = \"eleven\"").is_err());
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let args = CliArgs::try_parse_from(["castaway", "--config", "/nonexistent/castaway.toml"])
            .expect("valid arguments");
        let error = load_config(&args).expect_err("file is missing");
        assert!(format!("{error:#}").contains("/nonexistent/castaway.toml"));
    }
}
