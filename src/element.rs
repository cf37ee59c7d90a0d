//! Element model: the shapes, text blocks, and images placed on the canvas.
//!
//! Every element carries the same positional fields (`x`, `y`, `width`,
//! `height`) plus a body tagged by `type`. The serialized form is the flat
//! JSON object the design files use, e.g.
//! `{"id": "...", "type": "rectangle", "x": 50, ..., "backgroundColor": "#FF6B6B"}`.
//!
//! `ElementPatch` is the sparse update applied by `DocStore::update_element`.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Rect};

/// Unique identifier for an element.
pub type ElementId = Uuid;

/// The geometric primitive drawn for a shape element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle,
    Circle,
    Ellipse,
    Triangle,
    Line,
    Star,
}

impl ShapeKind {
    /// Size of a shape created by tapping the canvas with this tool.
    ///
    /// Lines are drawn as a thin box; their height is raised to `min_size`
    /// so they obey the same size floor as every other element.
    #[must_use]
    pub fn default_size(self, min_size: f64) -> (f64, f64) {
        match self {
            Self::Rectangle => (100.0, 50.0),
            Self::Circle => (50.0, 50.0),
            Self::Ellipse => (80.0, 40.0),
            Self::Triangle | Self::Star => (80.0, 70.0),
            Self::Line => (80.0, min_size),
        }
    }

    /// Fill color of a freshly created shape.
    #[must_use]
    pub fn default_fill(self) -> &'static str {
        match self {
            Self::Rectangle => "#FF6B6B",
            Self::Circle => "#4ECDC4",
            Self::Ellipse => "#FFD166",
            Self::Triangle => "#118AB2",
            Self::Star => "#EF476F",
            Self::Line => "#073B4C",
        }
    }

    /// Whether an image can be placed inside this shape.
    #[must_use]
    pub fn accepts_image(self) -> bool {
        !matches!(self, Self::Line)
    }
}

/// Paint for a shape element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    /// CSS color string.
    #[serde(rename = "backgroundColor")]
    pub fill_color: String,
    /// Image URI painted inside the shape, if one was inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

/// Content and typography of a text element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(rename = "text")]
    pub content: String,
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            content: "Text".to_owned(),
            font_size: 16.0,
            font_family: "System".to_owned(),
            color: "#23235B".to_owned(),
        }
    }
}

/// Reference to the picture shown by an image element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    /// URI handed back by the platform image picker.
    #[serde(rename = "uri")]
    pub source_ref: String,
}

/// Type-specific part of an element, tagged by `type` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementBody {
    Rectangle(ShapeStyle),
    Circle(ShapeStyle),
    Ellipse(ShapeStyle),
    Triangle(ShapeStyle),
    Line(ShapeStyle),
    Star(ShapeStyle),
    Text(TextStyle),
    Image(ImageSource),
}

impl ElementBody {
    /// Build a shape body of the given kind.
    #[must_use]
    pub fn shape(kind: ShapeKind, style: ShapeStyle) -> Self {
        match kind {
            ShapeKind::Rectangle => Self::Rectangle(style),
            ShapeKind::Circle => Self::Circle(style),
            ShapeKind::Ellipse => Self::Ellipse(style),
            ShapeKind::Triangle => Self::Triangle(style),
            ShapeKind::Line => Self::Line(style),
            ShapeKind::Star => Self::Star(style),
        }
    }

    /// The shape kind, or `None` for text and images.
    #[must_use]
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        match self {
            Self::Rectangle(_) => Some(ShapeKind::Rectangle),
            Self::Circle(_) => Some(ShapeKind::Circle),
            Self::Ellipse(_) => Some(ShapeKind::Ellipse),
            Self::Triangle(_) => Some(ShapeKind::Triangle),
            Self::Line(_) => Some(ShapeKind::Line),
            Self::Star(_) => Some(ShapeKind::Star),
            Self::Text(_) | Self::Image(_) => None,
        }
    }

    #[must_use]
    pub fn shape_style(&self) -> Option<&ShapeStyle> {
        match self {
            Self::Rectangle(s) | Self::Circle(s) | Self::Ellipse(s) | Self::Triangle(s) | Self::Line(s) | Self::Star(s) => {
                Some(s)
            }
            Self::Text(_) | Self::Image(_) => None,
        }
    }

    pub fn shape_style_mut(&mut self) -> Option<&mut ShapeStyle> {
        match self {
            Self::Rectangle(s) | Self::Circle(s) | Self::Ellipse(s) | Self::Triangle(s) | Self::Line(s) | Self::Star(s) => {
                Some(s)
            }
            Self::Text(_) | Self::Image(_) => None,
        }
    }

    /// The `type` discriminator as written on the wire.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Rectangle(_) => "rectangle",
            Self::Circle(_) => "circle",
            Self::Ellipse(_) => "ellipse",
            Self::Triangle(_) => "triangle",
            Self::Line(_) => "line",
            Self::Star(_) => "star",
            Self::Text(_) => "text",
            Self::Image(_) => "image",
        }
    }
}

/// One object on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Left edge in canvas coordinates.
    pub x: f64,
    /// Top edge in canvas coordinates.
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Mirrors membership in the document selection.
    #[serde(default)]
    pub selected: bool,
    #[serde(flatten)]
    pub body: ElementBody,
}

impl Element {
    /// Create an element with a fresh id. New elements start selected.
    #[must_use]
    pub fn new(body: ElementBody, bounds: Rect) -> Self {
        Self {
            id: Uuid::new_v4(),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            selected: true,
            body,
        }
    }

    /// A shape of `kind` with the given fill.
    #[must_use]
    pub fn shape(kind: ShapeKind, bounds: Rect, fill_color: impl Into<String>) -> Self {
        let style = ShapeStyle { fill_color: fill_color.into(), background_image: None };
        Self::new(ElementBody::shape(kind, style), bounds)
    }

    /// A text block with the given content and default typography.
    #[must_use]
    pub fn text(bounds: Rect, content: impl Into<String>) -> Self {
        let style = TextStyle { content: content.into(), ..TextStyle::default() };
        Self::new(ElementBody::Text(style), bounds)
    }

    /// An image showing `source_ref`.
    #[must_use]
    pub fn image(bounds: Rect, source_ref: impl Into<String>) -> Self {
        Self::new(ElementBody::Image(ImageSource { source_ref: source_ref.into() }), bounds)
    }

    /// The shape a tap with a shape tool creates, centred on `at`.
    ///
    /// Lines start at the tap point instead of being centred on it.
    #[must_use]
    pub fn default_shape(kind: ShapeKind, at: Point, min_size: f64) -> Self {
        let (width, height) = kind.default_size(min_size);
        let bounds = match kind {
            ShapeKind::Line => Rect::new(at.x, at.y, width, height),
            _ => Rect::centered_at(at, width, height),
        };
        Self::shape(kind, bounds, kind.default_fill())
    }

    /// The text block a tap with the text tool creates, centred on `at`.
    #[must_use]
    pub fn default_text(at: Point) -> Self {
        Self::new(ElementBody::Text(TextStyle::default()), Rect::centered_at(at, 100.0, 30.0))
    }

    /// An image at the default insertion spot.
    #[must_use]
    pub fn default_image(source_ref: impl Into<String>) -> Self {
        Self::image(Rect::new(100.0, 100.0, 200.0, 150.0), source_ref)
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_bounds(&mut self, bounds: Rect) {
        self.x = bounds.x;
        self.y = bounds.y;
        self.width = bounds.width;
        self.height = bounds.height;
    }

    #[must_use]
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        self.body.shape_kind()
    }

    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.body, ElementBody::Text(_))
    }
}

/// Sparse update for an element. Only present fields are applied; style
/// fields that do not exist on the element's body are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Shape fill.
    #[serde(rename = "backgroundColor", skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    /// Image painted inside a shape.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    /// Text content.
    #[serde(rename = "text", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    /// Text color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Image URI.
    #[serde(rename = "uri", skip_serializing_if = "Option::is_none")]
    pub source_ref: Option<String>,
}

impl ElementPatch {
    /// A patch that sets position and size.
    #[must_use]
    pub fn geometry(bounds: Rect) -> Self {
        Self {
            x: Some(bounds.x),
            y: Some(bounds.y),
            width: Some(bounds.width),
            height: Some(bounds.height),
            ..Self::default()
        }
    }

    /// A patch that sets only the position.
    #[must_use]
    pub fn position(x: f64, y: f64) -> Self {
        Self { x: Some(x), y: Some(y), ..Self::default() }
    }

    /// Merge the present fields into `element`.
    pub fn apply_to(&self, element: &mut Element) {
        if let Some(x) = self.x {
            element.x = x;
        }
        if let Some(y) = self.y {
            element.y = y;
        }
        if let Some(w) = self.width {
            element.width = w;
        }
        if let Some(h) = self.height {
            element.height = h;
        }
        match &mut element.body {
            ElementBody::Text(text) => {
                if let Some(ref content) = self.content {
                    text.content.clone_from(content);
                }
                if let Some(size) = self.font_size {
                    text.font_size = size;
                }
                if let Some(ref family) = self.font_family {
                    text.font_family.clone_from(family);
                }
                if let Some(ref color) = self.color {
                    text.color.clone_from(color);
                }
            }
            ElementBody::Image(image) => {
                if let Some(ref uri) = self.source_ref {
                    image.source_ref.clone_from(uri);
                }
            }
            body => {
                if let Some(style) = body.shape_style_mut() {
                    if let Some(ref fill) = self.fill_color {
                        style.fill_color.clone_from(fill);
                    }
                    if let Some(ref uri) = self.background_image {
                        style.background_image = Some(uri.clone());
                    }
                }
            }
        }
    }
}
