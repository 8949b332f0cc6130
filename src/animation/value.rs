use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::core::Vec2;
use crate::foundation::error::{TimeweaveError, TimeweaveResult};

/// Animatable property name.
///
/// Well-known properties have dedicated variants; anything else is carried as
/// [`Property::Custom`]. In JSON a property is always a plain string (`"position"`,
/// `"stroke_width"`, `"glow"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Property {
    /// 2-D or 3-D position.
    Position,
    /// Uniform (scalar) or per-axis (2-D) scale.
    Scale,
    /// Rotation in radians.
    Rotation,
    /// Whole-object opacity.
    Opacity,
    /// Fill paint (solid color or gradient).
    FillColor,
    /// Fill opacity.
    FillOpacity,
    /// Stroke paint (solid color or gradient).
    StrokeColor,
    /// Stroke width.
    StrokeWidth,
    /// Stroke opacity.
    StrokeOpacity,
    /// Portion of the outline drawn so far, `0..=1` (write/create effects).
    DrawProgress,
    /// Text content.
    Text,
    /// Application-defined property.
    Custom(String),
}

impl Property {
    /// Stable string name of this property.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Position => "position",
            Self::Scale => "scale",
            Self::Rotation => "rotation",
            Self::Opacity => "opacity",
            Self::FillColor => "fill_color",
            Self::FillOpacity => "fill_opacity",
            Self::StrokeColor => "stroke_color",
            Self::StrokeWidth => "stroke_width",
            Self::StrokeOpacity => "stroke_opacity",
            Self::DrawProgress => "draw_progress",
            Self::Text => "text",
            Self::Custom(name) => name,
        }
    }

    /// Parse a property name; unknown names become [`Property::Custom`].
    pub fn from_name(name: &str) -> Self {
        match name {
            "position" => Self::Position,
            "scale" => Self::Scale,
            "rotation" => Self::Rotation,
            "opacity" => Self::Opacity,
            "fill_color" => Self::FillColor,
            "fill_opacity" => Self::FillOpacity,
            "stroke_color" => Self::StrokeColor,
            "stroke_width" => Self::StrokeWidth,
            "stroke_opacity" => Self::StrokeOpacity,
            "draw_progress" => Self::DrawProgress,
            "text" => Self::Text,
            other => Self::Custom(other.to_owned()),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Property {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Property {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        if name.trim().is_empty() {
            return Err(serde::de::Error::custom("property name must be non-empty"));
        }
        Ok(Self::from_name(&name))
    }
}

/// Straight-alpha RGBA color with normalized `0..=1` components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha.
    pub a: f64,
}

impl Rgba {
    /// Build a color from components.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive, `#` optional).
    pub fn from_hex(s: &str) -> TimeweaveResult<Self> {
        parse_hex(s).map_err(TimeweaveError::validation)
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Obj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map_err(serde::de::Error::custom),
            Repr::Obj { r, g, b, a } => Ok(Self::new(r, g, b, a)),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self::new(*r, *g, *b, 1.0)),
                [r, g, b, a] => Ok(Self::new(*r, *g, *b, *a)),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

fn parse_hex(s: &str) -> Result<Rgba, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }
    let (r, g, b, a) = match s.len() {
        6 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            255,
        ),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };

    Ok(Rgba::new(
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
        f64::from(a) / 255.0,
    ))
}

/// 3-D vector used for 3-D positions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Build a vector from components.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl<'de> Deserialize<'de> for Vec3 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 3]),
            Obj { x: f64, y: f64, z: f64 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y, z]) | Repr::Obj { x, y, z } => Ok(Self { x, y, z }),
        }
    }
}

mod vec2_repr {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::foundation::core::Vec2;

    pub(super) fn serialize<S: Serializer>(v: &Vec2, s: S) -> Result<S::Ok, S::Error> {
        [v.x, v.y].serialize(s)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec2, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([f64; 2]),
            Obj { x: f64, y: f64 },
        }

        match Repr::deserialize(d)? {
            Repr::Arr([x, y]) | Repr::Obj { x, y } => Ok(Vec2::new(x, y)),
        }
    }
}

/// A property value.
///
/// In JSON a value is tagged by kind: `{"scalar": 1.0}`, `{"vec2": [0, 1]}`,
/// `{"vec3": [0, 1, 2]}`, `{"color": "#ff0000"}`, `{"gradient": ["#ff0000", "#00ff00"]}`,
/// `{"text": "hello"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Plain number.
    Scalar(f64),
    /// 2-D vector.
    Vec2(#[serde(with = "vec2_repr")] Vec2),
    /// 3-D vector.
    Vec3(Vec3),
    /// Solid color.
    Color(Rgba),
    /// Multi-stop color gradient, stops evenly spaced from first to last.
    Gradient(Vec<Rgba>),
    /// Text content; not interpolated, switches at the end of its window.
    Text(String),
}

/// Kind of a [`Value`]; writes to a property must keep its declared kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// [`Value::Scalar`].
    Scalar,
    /// [`Value::Vec2`].
    Vec2,
    /// [`Value::Vec3`].
    Vec3,
    /// [`Value::Color`] or [`Value::Gradient`].
    Paint,
    /// [`Value::Text`].
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Scalar => "scalar",
            Self::Vec2 => "vec2",
            Self::Vec3 => "vec3",
            Self::Paint => "paint",
            Self::Text => "text",
        };
        f.write_str(s)
    }
}

impl Value {
    /// Kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Scalar(_) => ValueKind::Scalar,
            Self::Vec2(_) => ValueKind::Vec2,
            Self::Vec3(_) => ValueKind::Vec3,
            Self::Color(_) | Self::Gradient(_) => ValueKind::Paint,
            Self::Text(_) => ValueKind::Text,
        }
    }

    /// Shorthand for [`Value::Vec2`].
    pub fn vec2(x: f64, y: f64) -> Self {
        Self::Vec2(Vec2::new(x, y))
    }

    /// Shorthand for [`Value::Vec3`].
    pub fn vec3(x: f64, y: f64, z: f64) -> Self {
        Self::Vec3(Vec3::new(x, y, z))
    }

    /// Return the scalar payload, if any.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Multiply every numeric component by `k`.
    pub fn scaled(&self, k: f64) -> TimeweaveResult<Self> {
        match self {
            Self::Scalar(v) => Ok(Self::Scalar(v * k)),
            Self::Vec2(v) => Ok(Self::Vec2(*v * k)),
            Self::Vec3(v) => Ok(Self::vec3(v.x * k, v.y * k, v.z * k)),
            other => Err(TimeweaveError::type_mismatch(format!(
                "cannot scale a {} value",
                other.kind()
            ))),
        }
    }

    /// Add `delta` component-wise. Both values must be the same numeric kind.
    pub fn shifted(&self, delta: &Value) -> TimeweaveResult<Self> {
        match (self, delta) {
            (Self::Scalar(a), Self::Scalar(b)) => Ok(Self::Scalar(a + b)),
            (Self::Vec2(a), Self::Vec2(b)) => Ok(Self::Vec2(*a + *b)),
            (Self::Vec3(a), Self::Vec3(b)) => Ok(Self::vec3(a.x + b.x, a.y + b.y, a.z + b.z)),
            (a, b) => Err(TimeweaveError::type_mismatch(format!(
                "cannot shift a {} value by a {} value",
                a.kind(),
                b.kind()
            ))),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Self::Vec3(v)
    }
}

impl From<Rgba> for Value {
    fn from(v: Rgba) -> Self {
        Self::Color(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_owned())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;
