//! Placeholder artwork for the captcha tiles.
//!
//! Each catalog entry is drawn once at startup as a small SVG with some
//! noise, then served as a data URI. Whether a tile is a hydrant never
//! leaves the server.

use base64::{Engine, engine::general_purpose::STANDARD};
use rand::Rng;
use redtape_common::CaptchaImage;
use serde::Serialize;

use super::catalog::CATALOG;

const TILE_SIZE: u32 = 120;

/// One rendered tile as sent to the page
#[derive(Debug, Clone, Serialize)]
pub struct Tile {
    pub id: u8,
    /// `data:image/svg+xml;base64,...`
    pub src: String,
}

/// All rendered tiles, in catalog order
#[derive(Debug, Clone)]
pub struct TileSet {
    tiles: Vec<Tile>,
}

impl TileSet {
    pub fn render() -> Self {
        let mut rng = rand::rng();
        let tiles = CATALOG
            .iter()
            .map(|image| Tile {
                id: image.id,
                src: render_tile(image, &mut rng),
            })
            .collect();

        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

fn render_tile(image: &CaptchaImage, rng: &mut impl Rng) -> String {
    let size = TILE_SIZE;

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        size, size
    );

    let background = match image.asset_ref {
        "hydrant-snow" => "#eef3f8",
        "hydrant-night" => "#1a1a2e",
        _ => "#b9c7a5",
    };
    svg.push_str(&format!(
        r#"<rect width="100%" height="100%" fill="{}"/>"#,
        background
    ));

    svg.push_str(subject(image.asset_ref));

    // Grain, so no two deployments look alike
    for _ in 0..12 {
        let x1 = rng.random_range(0..size);
        let y1 = rng.random_range(0..size);
        let x2 = rng.random_range(0..size);
        let y2 = rng.random_range(0..size);
        let opacity = rng.random_range(10..40);
        svg.push_str(&format!(
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="rgba(0,0,0,0.{})" stroke-width="1"/>"#,
            x1, y1, x2, y2, opacity
        ));
    }

    svg.push_str("</svg>");

    format!("data:image/svg+xml;base64,{}", STANDARD.encode(&svg))
}

fn subject(asset_ref: &str) -> &'static str {
    match asset_ref {
        "hydrant-red" | "hydrant-snow" | "hydrant-night" => {
            r##"<rect x="45" y="40" width="30" height="55" rx="4" fill="#c0392b"/><rect x="38" y="55" width="44" height="10" fill="#922b21"/><circle cx="60" cy="38" r="14" fill="#c0392b"/>"##
        }
        "hydrant-yellow" => {
            r##"<rect x="45" y="40" width="30" height="55" rx="4" fill="#f1c40f"/><rect x="38" y="55" width="44" height="10" fill="#b7950b"/><circle cx="60" cy="38" r="14" fill="#f1c40f"/>"##
        }
        "hydrant-rusty" => {
            r##"<rect x="45" y="40" width="30" height="55" rx="4" fill="#8e5b3a"/><rect x="38" y="55" width="44" height="10" fill="#6e4028"/><circle cx="60" cy="38" r="14" fill="#8e5b3a"/>"##
        }
        "crosswalk" => {
            r##"<rect x="10" y="20" width="100" height="12" fill="#fdfefe"/><rect x="10" y="50" width="100" height="12" fill="#fdfefe"/><rect x="10" y="80" width="100" height="12" fill="#fdfefe"/>"##
        }
        "bicycle" => {
            r##"<circle cx="35" cy="75" r="20" fill="none" stroke="#2c3e50" stroke-width="4"/><circle cx="85" cy="75" r="20" fill="none" stroke="#2c3e50" stroke-width="4"/><path d="M35 75 L60 45 L85 75 M60 45 L50 75" stroke="#2c3e50" stroke-width="4" fill="none"/>"##
        }
        "traffic-cone" => {
            r##"<polygon points="60,20 85,95 35,95" fill="#e67e22"/><rect x="30" y="95" width="60" height="8" fill="#d35400"/><rect x="46" y="55" width="28" height="8" fill="#fdfefe"/>"##
        }
        "mailbox" => {
            r##"<rect x="35" y="35" width="50" height="40" rx="18" fill="#2e86c1"/><rect x="56" y="75" width="8" height="30" fill="#5d6d7e"/>"##
        }
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_every_catalog_entry() {
        let set = TileSet::render();
        assert_eq!(set.tiles().len(), CATALOG.len());

        for (tile, image) in set.tiles().iter().zip(CATALOG.iter()) {
            assert_eq!(tile.id, image.id);
            assert!(tile.src.starts_with("data:image/svg+xml;base64,"));
        }
    }

    #[test]
    fn test_tile_json_hides_answer() {
        let set = TileSet::render();
        let json = serde_json::to_string(set.tiles()).unwrap();
        assert!(!json.contains("hydrant"));
        assert!(!json.contains("is_hydrant"));
    }
}
