use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use castaway_core::SpriteKey;
use glam::Vec2;
use macroquad::{
    color::WHITE,
    math::Vec2 as MacroquadVec2,
    texture::{self, DrawTextureParams, Texture2D},
};

const SUPPORTED_MANIFEST_VERSION: u32 = 1;

/// Parameters describing how a sprite should be drawn on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DrawParams {
    /// Top-left corner in screen-space pixels.
    pub(crate) position: Vec2,
    /// Destination size in screen-space pixels.
    pub(crate) size: Vec2,
    /// Clockwise rotation around the sprite centre, in radians.
    pub(crate) rotation_radians: f32,
}

/// Cache of textures loaded from the sprite manifest.
#[derive(Debug)]
pub(crate) struct SpriteAtlas {
    textures: HashMap<SpriteKey, Texture2D>,
}

impl SpriteAtlas {
    /// Loads sprites from the manifest located at the provided path.
    pub(crate) fn from_manifest_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_manifest_with_loader(path, default_loader)
    }

    /// Draws the requested sprite using the supplied parameters.
    pub(crate) fn draw(&self, key: SpriteKey, params: DrawParams) -> Result<()> {
        let texture = *self
            .textures
            .get(&key)
            .with_context(|| format!("sprite {key:?} missing from atlas"))?;

        let dest_size = MacroquadVec2::new(params.size.x, params.size.y);
        let pivot = MacroquadVec2::new(
            params.position.x + dest_size.x * 0.5,
            params.position.y + dest_size.y * 0.5,
        );

        let draw_params = DrawTextureParams {
            dest_size: Some(dest_size),
            rotation: params.rotation_radians,
            pivot: Some(pivot),
            ..DrawTextureParams::default()
        };

        texture::draw_texture_ex(
            texture,
            params.position.x,
            params.position.y,
            WHITE,
            draw_params,
        );

        Ok(())
    }

    /// Returns the number of textures stored in the atlas.
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.textures.len()
    }

    #[cfg(test)]
    fn contains(&self, key: SpriteKey) -> bool {
        self.textures.contains_key(&key)
    }

    fn from_manifest_with_loader(
        path: impl AsRef<Path>,
        mut loader: impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let manifest_path = path.as_ref();
        let contents = fs::read_to_string(manifest_path).with_context(|| {
            format!(
                "failed to read sprite manifest at {}",
                manifest_path.display()
            )
        })?;
        let base = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let entries = parse_manifest(&contents, &base)?;
        Self::from_entries(entries, &mut loader)
    }

    fn from_entries(
        entries: Vec<(SpriteKey, PathBuf)>,
        loader: &mut impl FnMut(SpriteKey, &Path) -> Result<Texture2D>,
    ) -> Result<Self> {
        let mut textures = HashMap::with_capacity(entries.len());
        for (key, path) in entries {
            let texture = loader(key, &path).with_context(|| {
                format!("failed to load sprite {key:?} from {}", path.display())
            })?;
            if textures.insert(key, texture).is_some() {
                bail!("duplicate sprite entry for {key:?}");
            }
        }
        Ok(Self { textures })
    }
}

fn default_loader(_key: SpriteKey, path: &Path) -> Result<Texture2D> {
    let bytes = fs::read(path)
        .with_context(|| format!("failed to read sprite asset at {}", path.display()))?;
    Ok(Texture2D::from_file_with_format(&bytes, None))
}

#[derive(Debug, serde::Deserialize)]
struct Manifest {
    version: u32,
    sprites: HashMap<String, String>,
}

fn parse_manifest(contents: &str, base_path: &Path) -> Result<Vec<(SpriteKey, PathBuf)>> {
    let manifest: Manifest =
        toml::from_str(contents).context("failed to parse sprite manifest toml contents")?;
    if manifest.version != SUPPORTED_MANIFEST_VERSION {
        bail!(
            "unsupported sprite manifest version {}; expected {}",
            manifest.version,
            SUPPORTED_MANIFEST_VERSION
        );
    }

    let mut resolved = HashMap::new();
    for (name, relative_path) in manifest.sprites {
        let key = SpriteKey::from_name(&name)
            .with_context(|| format!("unknown sprite key `{name}` in manifest"))?;
        let path = base_path.join(relative_path);
        if resolved.insert(key, path).is_some() {
            bail!("sprite manifest contains duplicate entry for {key:?}");
        }
    }

    let mut ordered = Vec::with_capacity(SpriteKey::ALL.len());
    for key in SpriteKey::ALL {
        let Some(path) = resolved.remove(&key) else {
            bail!("sprite manifest missing entry for {key:?}");
        };
        ordered.push((key, path));
    }

    Ok(ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::RefCell, fmt::Write as _, path::Path};

    fn full_manifest() -> String {
        let mut manifest = String::from("version = 1\n\n[sprites]\n");
        for key in SpriteKey::ALL.iter().rev() {
            let _ = writeln!(manifest, "{} = \"tiles/{}.png\"", key.name(), key.name());
        }
        manifest
    }

    #[test]
    fn parse_manifest_requires_all_known_keys() {
        let manifest = r#"
            version = 1

            [sprites]
            WaterTile = "tiles/water.png"
            LandTile = "tiles/land.png"
        "#;

        let result = parse_manifest(manifest, Path::new("assets"));
        assert!(result.is_err(), "manifest missing most sprites should fail");
    }

    #[test]
    fn manifest_rejects_unknown_keys() {
        let manifest = format!("{}Palm = \"palm.png\"\n", full_manifest());
        let result = parse_manifest(&manifest, Path::new("assets"));
        assert!(result.is_err(), "unknown keys must be rejected");
    }

    #[test]
    fn manifest_rejects_other_versions() {
        let manifest = full_manifest().replace("version = 1", "version = 2");
        assert!(parse_manifest(&manifest, Path::new("assets")).is_err());
    }

    #[test]
    fn manifest_resolves_paths_relative_to_base_directory() {
        let parsed =
            parse_manifest(&full_manifest(), Path::new("root")).expect("manifest should parse");
        assert_eq!(parsed.len(), SpriteKey::ALL.len());
        assert_eq!(
            parsed[0],
            (
                SpriteKey::WaterTile,
                PathBuf::from("root/tiles/WaterTile.png")
            )
        );
        assert_eq!(
            parsed[12],
            (SpriteKey::Player, PathBuf::from("root/tiles/Player.png"))
        );
    }

    #[test]
    fn atlas_loads_textures_using_deterministic_order() {
        let entries = parse_manifest(&full_manifest(), Path::new("assets"))
            .expect("manifest should parse into canonical order");
        let load_order = RefCell::new(Vec::new());
        let atlas = SpriteAtlas::from_entries(entries, &mut |key, _| {
            load_order.borrow_mut().push(key);
            Ok(Texture2D::empty())
        })
        .expect("atlas should load using provided loader");

        assert_eq!(load_order.borrow().as_slice(), &SpriteKey::ALL);
        assert_eq!(atlas.len(), SpriteKey::ALL.len());
        assert!(SpriteKey::ALL.into_iter().all(|key| atlas.contains(key)));
    }

    #[test]
    fn loader_failures_name_the_sprite() {
        let entries = vec![(SpriteKey::Axe, PathBuf::from("axe.png"))];
        let error = SpriteAtlas::from_entries(entries, &mut |_, _| bail!("corrupt"))
            .expect_err("loader failure must propagate");
        assert!(format!("{error:#}").contains("Axe"));
    }
}
