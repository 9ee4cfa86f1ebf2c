//! JSON semantic page loading and validation.
//!
//! # File Format
//!
//! ```json
//! {
//!   "title": "News",
//!   "landmarks": [
//!     {
//!       "role": "header",
//!       "bounds": { "x": 0.0, "y": 0.0, "width": 1.0, "height": 0.15 },
//!       "tier": "level1",
//!       "texture": "fine_ridges",
//!       "id": "top",
//!       "blocks": [
//!         { "role": "heading", "bounds": { "x": 0.05, "y": 0.03, "width": 0.6, "height": 0.09 },
//!           "tier": "level3", "text": "Breaking news" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Nested primitives may be listed under either `children` or `blocks`.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::models::{Primitive, SemanticPage};

/// Parses and validates a page from a JSON string.
pub fn parse_page_str(json: &str) -> Result<SemanticPage> {
    let page: SemanticPage =
        serde_json::from_str(json).context("Failed to parse semantic page JSON")?;
    validate_page(&page)?;
    Ok(page)
}

/// Parses and validates a page from a JSON file.
pub fn parse_page_file(path: &Path) -> Result<SemanticPage> {
    if !path.exists() {
        anyhow::bail!("Page file not found: {}", path.display());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read page file: {}", path.display()))?;

    parse_page_str(&content).with_context(|| format!("Invalid page file: {}", path.display()))
}

/// Checks bounds and id uniqueness over the whole tree.
///
/// # Errors
///
/// - a rectangle extends outside the unit square or has negative size
/// - a coordinate is not finite
/// - two primitives share an id
pub fn validate_page(page: &SemanticPage) -> Result<()> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    page.walk(&mut |p: &Primitive| {
        let b = &p.bounds;
        let finite = [b.x, b.y, b.width, b.height].iter().all(|v| v.is_finite());
        if !finite || !b.is_normalized() {
            errors.push(format!(
                "{} has bounds outside the unit square: x={} y={} w={} h={}",
                p.describe(),
                b.x,
                b.y,
                b.width,
                b.height
            ));
        }

        if let Some(id) = &p.id {
            if !seen.insert(id.clone()) {
                errors.push(format!("duplicate id '{id}'"));
            }
        }
    });

    if !errors.is_empty() {
        anyhow::bail!("Page validation failed:\n  - {}", errors.join("\n  - "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HeightTier, Role, TextureKind};

    const SAMPLE: &str = r#"{
        "title": "Sample",
        "landmarks": [
            {
                "role": "header",
                "bounds": { "x": 0.0, "y": 0.0, "width": 1.0, "height": 0.2 },
                "tier": "level1",
                "texture": "fine_ridges",
                "id": "top",
                "blocks": [
                    { "role": "heading", "bounds": { "x": 0.1, "y": 0.05, "width": 0.5, "height": 0.1 },
                      "tier": "level3", "text": "Hello" }
                ]
            },
            {
                "role": "main",
                "bounds": { "x": 0.0, "y": 0.2, "width": 1.0, "height": 0.8 },
                "children": [
                    { "role": "media", "bounds": { "x": 0.1, "y": 0.3, "width": 0.4, "height": 0.4 },
                      "tier": "level2", "texture": "pebbled", "image": "cat.gif", "interactive": true }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let page = parse_page_str(SAMPLE).unwrap();
        assert_eq!(page.title.as_deref(), Some("Sample"));
        assert_eq!(page.landmarks.len(), 2);
        let header = &page.landmarks[0];
        assert_eq!(header.texture, TextureKind::FineRidges);
        assert_eq!(header.children[0].tier, HeightTier::Level3);
        let main = &page.landmarks[1];
        // Tier defaults to Level0 when omitted
        assert_eq!(main.tier, HeightTier::Level0);
        assert_eq!(main.children[0].role, Role::Media);
        assert!(main.children[0].interactive);
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let json = r#"{ "landmarks": [ { "role": "main",
            "bounds": { "x": 0.5, "y": 0.0, "width": 0.7, "height": 1.0 } } ] }"#;
        let err = parse_page_str(json).unwrap_err();
        assert!(format!("{err:#}").contains("outside the unit square"));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let json = r#"{ "landmarks": [
            { "role": "main", "id": "x", "bounds": { "x": 0, "y": 0, "width": 1, "height": 1 } },
            { "role": "footer", "id": "x", "bounds": { "x": 0, "y": 0, "width": 1, "height": 1 } }
        ] }"#;
        let err = parse_page_str(json).unwrap_err();
        assert!(format!("{err:#}").contains("duplicate id 'x'"));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_page_file(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }
}
