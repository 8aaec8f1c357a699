//! Canvas elements - the building blocks of a widget design.

use serde::{Deserialize, Serialize};

use crate::geometry::Rect;

/// Unique identifier for an element.
///
/// Ids are opaque strings minted by an [`IdProvider`](crate::id::IdProvider);
/// the engine never reuses one within a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Create an element ID from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an image fills its frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    /// Scale to cover the frame, cropping overflow.
    #[default]
    Cover,
    /// Scale to fit inside the frame.
    Contain,
    /// Stretch to the frame, ignoring aspect ratio.
    Fill,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Align to the left edge.
    #[default]
    Left,
    /// Center within the frame.
    Center,
    /// Align to the right edge.
    Right,
}

/// Typography of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Numeric font weight (400 regular, 700 bold).
    pub font_weight: u16,
    /// Text color as hex.
    pub color: String,
    /// Horizontal alignment.
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "system-ui".to_string(),
            font_size: 16.0,
            font_weight: 400,
            color: "#000000".to_string(),
            align: TextAlign::Left,
        }
    }
}

/// The type of content an element contains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ElementKind {
    /// A rectangle, optionally with rounded corners.
    Rectangle {
        /// Corner radius in pixels.
        corner_radius: f32,
    },

    /// An ellipse inscribed in the element frame.
    Ellipse,

    /// A polyline in element-local coordinates.
    Line {
        /// Polyline vertices.
        points: Vec<(f32, f32)>,
    },

    /// A text label.
    Text {
        /// Text content.
        content: String,
        /// Typography.
        text_style: TextStyle,
    },

    /// A bitmap or vector image.
    Image {
        /// Image source URI or base64 data.
        src: String,
        /// How the image fills its frame.
        fit: ImageFit,
    },

    /// A clock complication.
    Clock {
        /// Time format pattern, e.g. `HH:mm`.
        format: String,
        /// Whether seconds are displayed.
        show_seconds: bool,
    },

    /// A container group for other elements.
    Group {
        /// Child element IDs, back-to-front.
        children: Vec<ElementId>,
    },
}

impl ElementKind {
    /// Default display name for a freshly created element of this kind.
    #[must_use]
    pub fn default_name(&self) -> &'static str {
        match self {
            Self::Rectangle { .. } => "Rectangle",
            Self::Ellipse => "Ellipse",
            Self::Line { .. } => "Line",
            Self::Text { .. } => "Text",
            Self::Image { .. } => "Image",
            Self::Clock { .. } => "Clock",
            Self::Group { .. } => "Group",
        }
    }
}

/// Transform for positioning and sizing elements.
///
/// Coordinates are relative to the parent group, or absolute for
/// top-level elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// X position (pixels from the parent's left edge).
    pub x: f32,
    /// Y position (pixels from the parent's top edge).
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Horizontal scale factor.
    pub scale_x: f32,
    /// Vertical scale factor.
    pub scale_y: f32,
}

impl Transform {
    /// Create an unrotated, unscaled transform.
    #[must_use]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Self::default()
        }
    }

    /// The axis-aligned frame of this transform in its parent's space.
    #[must_use]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// Fill and stroke shared by every element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    /// Fill color as hex, or `transparent`.
    pub fill: String,
    /// Stroke color as hex, or `transparent`.
    pub stroke: String,
    /// Stroke width in pixels.
    pub stroke_width: f32,
    /// Opacity from 0.0 to 1.0.
    pub opacity: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: "#FFFFFF".to_string(),
            stroke: "transparent".to_string(),
            stroke_width: 0.0,
            opacity: 1.0,
        }
    }
}

/// A canvas element with content and transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Human-readable name shown in the layer list.
    pub name: String,
    /// Element content type.
    pub kind: ElementKind,
    /// Position and size relative to the parent.
    pub transform: Transform,
    /// Fill and stroke.
    #[serde(default)]
    pub style: Style,
    /// Enclosing group, if any. A back-reference, not ownership.
    #[serde(default)]
    pub parent: Option<ElementId>,
    /// Whether the element is drawn.
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Whether direct manipulation is disabled.
    #[serde(default)]
    pub locked: bool,
}

fn default_true() -> bool {
    true
}

impl Element {
    /// Create a new element with the given id and kind.
    #[must_use]
    pub fn new(id: ElementId, kind: ElementKind) -> Self {
        Self {
            id,
            name: kind.default_name().to_string(),
            kind,
            transform: Transform::default(),
            style: Style::default(),
            parent: None,
            visible: true,
            locked: false,
        }
    }

    /// Set the name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Set the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Set whether the element is locked.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Whether this element is a group.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self.kind, ElementKind::Group { .. })
    }

    /// Children of a group; `None` for every other kind.
    #[must_use]
    pub fn children(&self) -> Option<&[ElementId]> {
        match &self.kind {
            ElementKind::Group { children } => Some(children),
            _ => None,
        }
    }

    /// Mutable children of a group.
    pub fn children_mut(&mut self) -> Option<&mut Vec<ElementId>> {
        match &mut self.kind {
            ElementKind::Group { children } => Some(children),
            _ => None,
        }
    }

    /// Check if a point in the parent's coordinates is within this element.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.transform.rect().contains(x, y)
    }
}

/// Blueprint for an element added through the reducer.
///
/// The id is assigned by the engine; groups are created with the group
/// action instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDraft {
    /// Display name; defaults to the kind's name.
    #[serde(default)]
    pub name: Option<String>,
    /// Element content type.
    pub kind: ElementKind,
    /// Initial absolute transform.
    #[serde(default)]
    pub transform: Transform,
    /// Initial style.
    #[serde(default)]
    pub style: Style,
    /// Whether the element starts locked.
    #[serde(default)]
    pub locked: bool,
}

impl ElementDraft {
    /// Create a draft of the given kind with default transform and style.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        Self {
            name: None,
            kind,
            transform: Transform::default(),
            style: Style::default(),
            locked: false,
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the initial transform.
    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Materialize the draft under the given id.
    #[must_use]
    pub fn into_element(self, id: ElementId) -> Element {
        let name = self
            .name
            .unwrap_or_else(|| self.kind.default_name().to_string());
        Element {
            id,
            name,
            kind: self.kind,
            transform: self.transform,
            style: self.style,
            parent: None,
            visible: true,
            locked: self.locked,
        }
    }
}

/// Field-by-field patch for a [`Transform`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformPatch {
    /// New x position.
    pub x: Option<f32>,
    /// New y position.
    pub y: Option<f32>,
    /// New width.
    pub width: Option<f32>,
    /// New height.
    pub height: Option<f32>,
    /// New rotation.
    pub rotation: Option<f32>,
    /// New horizontal scale.
    pub scale_x: Option<f32>,
    /// New vertical scale.
    pub scale_y: Option<f32>,
}

impl TransformPatch {
    /// Merge this patch over `base`.
    #[must_use]
    pub fn apply(&self, base: &Transform) -> Transform {
        Transform {
            x: self.x.unwrap_or(base.x),
            y: self.y.unwrap_or(base.y),
            width: self.width.unwrap_or(base.width),
            height: self.height.unwrap_or(base.height),
            rotation: self.rotation.unwrap_or(base.rotation),
            scale_x: self.scale_x.unwrap_or(base.scale_x),
            scale_y: self.scale_y.unwrap_or(base.scale_y),
        }
    }
}

/// Field-by-field patch for a [`Style`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePatch {
    /// New fill color.
    pub fill: Option<String>,
    /// New stroke color.
    pub stroke: Option<String>,
    /// New stroke width.
    pub stroke_width: Option<f32>,
    /// New opacity.
    pub opacity: Option<f32>,
}

impl StylePatch {
    /// Merge this patch into `style`.
    pub fn apply(&self, style: &mut Style) {
        if let Some(fill) = &self.fill {
            style.fill.clone_from(fill);
        }
        if let Some(stroke) = &self.stroke {
            style.stroke.clone_from(stroke);
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width;
        }
        if let Some(opacity) = self.opacity {
            style.opacity = opacity.clamp(0.0, 1.0);
        }
    }
}

/// Field-by-field patch for a [`TextStyle`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStylePatch {
    /// New font family.
    pub font_family: Option<String>,
    /// New font size.
    pub font_size: Option<f32>,
    /// New font weight.
    pub font_weight: Option<u16>,
    /// New text color.
    pub color: Option<String>,
    /// New alignment.
    pub align: Option<TextAlign>,
}

impl TextStylePatch {
    /// Merge this patch into `text_style`.
    pub fn apply(&self, text_style: &mut TextStyle) {
        if let Some(family) = &self.font_family {
            text_style.font_family.clone_from(family);
        }
        if let Some(size) = self.font_size {
            text_style.font_size = size;
        }
        if let Some(weight) = self.font_weight {
            text_style.font_weight = weight;
        }
        if let Some(color) = &self.color {
            text_style.color.clone_from(color);
        }
        if let Some(align) = self.align {
            text_style.align = align;
        }
    }
}

/// Partial update of an element.
///
/// Text-only fields are ignored on non-text elements. The transform part is
/// applied by the reducer so group geometry stays consistent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementPatch {
    /// New display name.
    pub name: Option<String>,
    /// Transform fields to change.
    pub transform: Option<TransformPatch>,
    /// Style fields to change.
    pub style: Option<StylePatch>,
    /// Text style fields to change.
    pub text_style: Option<TextStylePatch>,
    /// New text content.
    pub content: Option<String>,
    /// New visibility.
    pub visible: Option<bool>,
    /// New lock state.
    pub locked: Option<bool>,
}

impl ElementPatch {
    /// Apply every non-geometric field of this patch to `element`.
    pub fn apply_attributes(&self, element: &mut Element) {
        if let Some(name) = &self.name {
            element.name.clone_from(name);
        }
        if let Some(style) = &self.style {
            style.apply(&mut element.style);
        }
        if let ElementKind::Text {
            content,
            text_style,
        } = &mut element.kind
        {
            if let Some(patch) = &self.text_style {
                patch.apply(text_style);
            }
            if let Some(new_content) = &self.content {
                content.clone_from(new_content);
            }
        }
        if let Some(visible) = self.visible {
            element.visible = visible;
        }
        if let Some(locked) = self.locked {
            element.locked = locked;
        }
    }
}
