//! Semantic page description: landmarks, content blocks and their bounds.
//!
//! A page is a tree of [`Primitive`]s. Top-level primitives are landmarks;
//! their children are content blocks, which may nest further. Every node
//! carries its own normalized rectangle, tier and texture, so all walks over
//! the tree go through the single [`Primitive::walk`] visitor.

use serde::{Deserialize, Serialize};

use crate::models::HeightTier;

/// Normalized rectangle on the page (`x, y, width, height ∈ [0, 1]`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole page.
    #[must_use]
    pub const fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Inclusive containment test on both axes.
    #[must_use]
    pub fn contains(&self, nx: f32, ny: f32) -> bool {
        self.x <= nx && nx <= self.right() && self.y <= ny && ny <= self.bottom()
    }

    /// Whether `(nx, ny)` lies within `band` of one of the four edges.
    ///
    /// Each edge is a segment; points are only tested against the span of
    /// that segment, widened by `band` so the ring closes at the corners.
    #[must_use]
    pub fn on_ring(&self, nx: f32, ny: f32, band: f32) -> bool {
        let in_x_span = nx >= self.x - band && nx <= self.right() + band;
        let in_y_span = ny >= self.y - band && ny <= self.bottom() + band;

        let top = (ny - self.y).abs() <= band && in_x_span;
        let bottom = (ny - self.bottom()).abs() <= band && in_x_span;
        let left = (nx - self.x).abs() <= band && in_y_span;
        let right = (nx - self.right()).abs() <= band && in_y_span;

        top || bottom || left || right
    }

    /// Whether the rectangle lies inside the unit square (with a small tolerance).
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        const TOL: f32 = 1e-6;
        self.x >= -TOL
            && self.y >= -TOL
            && self.width >= 0.0
            && self.height >= 0.0
            && self.right() <= 1.0 + TOL
            && self.bottom() <= 1.0 + TOL
    }
}

/// Periodic height perturbation layered on top of a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TextureKind {
    /// No perturbation
    #[default]
    Smooth,
    /// Coarse ridges along x
    FineRidges,
    /// Dense ridges along x
    UltraFineRidges,
    /// Checkerboard of raised dots
    Dots,
    /// Pebbled noise with a travelling wave (live image regions)
    Pebbled,
}

/// Semantic role of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    // Landmarks
    /// Page header
    Header,
    /// Navigation region
    Nav,
    /// Main content
    Main,
    /// Sidebar / complementary content
    Sidebar,
    /// Page footer
    Footer,

    // Content blocks
    /// Heading
    Heading,
    /// Paragraph of text
    Paragraph,
    /// List
    List,
    /// Image or video
    Media,
    /// Button
    Button,
    /// Hyperlink
    Link,
    /// Table
    Table,
    /// Form input
    FormField,
    /// Alert / notification
    Alert,
}

impl Role {
    /// Whether this role denotes a top-level landmark region.
    #[must_use]
    pub const fn is_landmark(self) -> bool {
        matches!(
            self,
            Self::Header | Self::Nav | Self::Main | Self::Sidebar | Self::Footer
        )
    }

    /// Human-readable role name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Nav => "navigation",
            Self::Main => "main",
            Self::Sidebar => "sidebar",
            Self::Footer => "footer",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::List => "list",
            Self::Media => "media",
            Self::Button => "button",
            Self::Link => "link",
            Self::Table => "table",
            Self::FormField => "form field",
            Self::Alert => "alert",
        }
    }
}

/// A landmark or content block; the single node type of the page tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    /// Semantic role
    pub role: Role,
    /// Normalized bounds on the page
    pub bounds: Rect,
    /// Emphasis tier
    #[serde(default)]
    pub tier: HeightTier,
    /// Surface texture
    #[serde(default)]
    pub texture: TextureKind,
    /// Whether the primitive can be activated
    #[serde(default)]
    pub interactive: bool,
    /// Stable identifier for focus addressing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Text payload (read out in Braille on activation)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Image payload URL (media blocks)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Nested blocks, in declaration order
    #[serde(default, alias = "blocks", skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Primitive>,
}

impl Primitive {
    /// Creates a primitive with the given role, bounds and tier.
    #[must_use]
    pub const fn new(role: Role, bounds: Rect, tier: HeightTier) -> Self {
        Self {
            role,
            bounds,
            tier,
            texture: TextureKind::Smooth,
            interactive: false,
            id: None,
            text: None,
            image: None,
            children: Vec::new(),
        }
    }

    /// Sets the texture.
    #[must_use]
    pub fn with_texture(mut self, texture: TextureKind) -> Self {
        self.texture = texture;
        self
    }

    /// Marks the primitive as interactive.
    #[must_use]
    pub fn interactive(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Sets the stable id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the text payload.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the image payload.
    #[must_use]
    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image = Some(url.into());
        self
    }

    /// Appends a nested block.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Pre-order walk over this primitive and all descendants, in declaration order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Self)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Short description used by status lines and logs.
    #[must_use]
    pub fn describe(&self) -> String {
        match (&self.id, &self.text) {
            (Some(id), _) => format!("{} #{}", self.role.label(), id),
            (None, Some(text)) => {
                let snippet: String = text.chars().take(24).collect();
                format!("{} \"{}\"", self.role.label(), snippet)
            }
            (None, None) => self.role.label().to_string(),
        }
    }
}

/// A page as an ordered sequence of landmark regions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SemanticPage {
    /// Optional page title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Top-level regions, in declaration order
    #[serde(default)]
    pub landmarks: Vec<Primitive>,
}

impl SemanticPage {
    /// Creates a page from its landmarks.
    #[must_use]
    pub fn new(landmarks: Vec<Primitive>) -> Self {
        Self {
            title: None,
            landmarks,
        }
    }

    /// Pre-order walk over every primitive on the page, in declaration order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Primitive)) {
        for landmark in &self.landmarks {
            landmark.walk(visit);
        }
    }

    /// Finds a primitive by its stable id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Primitive> {
        let mut found = None;
        self.walk(&mut |p| {
            if found.is_none() && p.id.as_deref() == Some(id) {
                found = Some(p);
            }
        });
        found
    }

    /// Total number of primitives on the page.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}
