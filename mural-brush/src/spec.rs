//! Brush tags and the `(type, color, size)` configuration tuple.

use std::fmt;
use std::str::FromStr;

use mural_core::Rgb;
use serde::{Deserialize, Serialize};

use crate::BrushError;

/// Every stroke style the engine knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BrushType {
    // Continuous line
    Pencil,
    Smooth,
    Marker,
    Neon,
    Oil,
    Thick,
    Sliced,
    Charcoal,
    Chalk,
    Watercolor,
    Glow,
    Shadow,
    // Particle / spray
    Spray,
    Aerosol,
    #[serde(alias = "puntos")]
    Dots,
    Confetti,
    Bubble,
    Fire,
    Particles,
    HeartSpray,
    // Procedural shape
    Lightning,
    Glitch,
    Ribbon,
    Wiggle,
    Beads,
    Fur,
    Sketchy,
    // Pattern stamp
    StampCircle,
    StampStar,
    PatternLines,
    PatternRainbow,
    PatternImage,
    Eraser,
}

/// The four rendering families plus the eraser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrushFamily {
    ContinuousLine,
    Particle,
    ProceduralShape,
    PatternStamp,
    Eraser,
}

impl BrushType {
    pub const ALL: [BrushType; 33] = [
        BrushType::Pencil,
        BrushType::Smooth,
        BrushType::Marker,
        BrushType::Neon,
        BrushType::Oil,
        BrushType::Thick,
        BrushType::Sliced,
        BrushType::Charcoal,
        BrushType::Chalk,
        BrushType::Watercolor,
        BrushType::Glow,
        BrushType::Shadow,
        BrushType::Spray,
        BrushType::Aerosol,
        BrushType::Dots,
        BrushType::Confetti,
        BrushType::Bubble,
        BrushType::Fire,
        BrushType::Particles,
        BrushType::HeartSpray,
        BrushType::Lightning,
        BrushType::Glitch,
        BrushType::Ribbon,
        BrushType::Wiggle,
        BrushType::Beads,
        BrushType::Fur,
        BrushType::Sketchy,
        BrushType::StampCircle,
        BrushType::StampStar,
        BrushType::PatternLines,
        BrushType::PatternRainbow,
        BrushType::PatternImage,
        BrushType::Eraser,
    ];

    /// The kebab-case tag UI layers use.
    pub fn as_str(self) -> &'static str {
        match self {
            BrushType::Pencil => "pencil",
            BrushType::Smooth => "smooth",
            BrushType::Marker => "marker",
            BrushType::Neon => "neon",
            BrushType::Oil => "oil",
            BrushType::Thick => "thick",
            BrushType::Sliced => "sliced",
            BrushType::Charcoal => "charcoal",
            BrushType::Chalk => "chalk",
            BrushType::Watercolor => "watercolor",
            BrushType::Glow => "glow",
            BrushType::Shadow => "shadow",
            BrushType::Spray => "spray",
            BrushType::Aerosol => "aerosol",
            BrushType::Dots => "dots",
            BrushType::Confetti => "confetti",
            BrushType::Bubble => "bubble",
            BrushType::Fire => "fire",
            BrushType::Particles => "particles",
            BrushType::HeartSpray => "heart-spray",
            BrushType::Lightning => "lightning",
            BrushType::Glitch => "glitch",
            BrushType::Ribbon => "ribbon",
            BrushType::Wiggle => "wiggle",
            BrushType::Beads => "beads",
            BrushType::Fur => "fur",
            BrushType::Sketchy => "sketchy",
            BrushType::StampCircle => "stamp-circle",
            BrushType::StampStar => "stamp-star",
            BrushType::PatternLines => "pattern-lines",
            BrushType::PatternRainbow => "pattern-rainbow",
            BrushType::PatternImage => "pattern-image",
            BrushType::Eraser => "eraser",
        }
    }

    pub fn family(self) -> BrushFamily {
        use BrushType::*;
        match self {
            Pencil | Smooth | Marker | Neon | Oil | Thick | Sliced | Charcoal | Chalk
            | Watercolor | Glow | Shadow => BrushFamily::ContinuousLine,
            Spray | Aerosol | Dots | Confetti | Bubble | Fire | Particles | HeartSpray => {
                BrushFamily::Particle
            }
            Lightning | Glitch | Ribbon | Wiggle | Beads | Fur | Sketchy => {
                BrushFamily::ProceduralShape
            }
            StampCircle | StampStar | PatternLines | PatternRainbow | PatternImage => {
                BrushFamily::PatternStamp
            }
            Eraser => BrushFamily::Eraser,
        }
    }

    /// Brushes that keep emitting on a fixed interval while the pointer is held still.
    pub fn emits_continuously(self) -> bool {
        matches!(self, BrushType::Spray | BrushType::Aerosol)
    }
}

impl fmt::Display for BrushType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrushType {
    type Err = BrushError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        if tag == "puntos" {
            return Ok(BrushType::Dots);
        }
        BrushType::ALL
            .iter()
            .copied()
            .find(|b| b.as_str() == tag)
            .ok_or(BrushError::UnknownBrush { tag: s.to_string() })
    }
}

/// Active brush configuration. No identity beyond its fields.
///
/// Deserialized specs go through [`BrushSpec::new`], so `size` is always in
/// `MIN_SIZE..=MAX_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBrushSpec")]
pub struct BrushSpec {
    #[serde(rename = "type")]
    pub brush: BrushType,
    pub color: Rgb,
    pub size: f32,
}

#[derive(Deserialize)]
struct RawBrushSpec {
    #[serde(rename = "type")]
    brush: BrushType,
    color: Rgb,
    size: f32,
}

impl From<RawBrushSpec> for BrushSpec {
    fn from(raw: RawBrushSpec) -> Self {
        Self::new(raw.brush, raw.color, raw.size)
    }
}

impl BrushSpec {
    pub const MIN_SIZE: f32 = 1.0;
    pub const MAX_SIZE: f32 = 512.0;

    /// Non-finite or non-positive sizes become `MIN_SIZE`; larger ones are
    /// capped at `MAX_SIZE`.
    pub fn new(brush: BrushType, color: Rgb, size: f32) -> Self {
        Self {
            brush,
            color,
            size: clamp_size(size),
        }
    }

    /// The same spec with `size` forced back into range. Needed because the
    /// fields are public.
    pub fn clamped(self) -> Self {
        Self::new(self.brush, self.color, self.size)
    }
}

fn clamp_size(size: f32) -> f32 {
    if size.is_finite() && size > 0.0 {
        size.clamp(BrushSpec::MIN_SIZE, BrushSpec::MAX_SIZE)
    } else {
        BrushSpec::MIN_SIZE
    }
}

impl Default for BrushSpec {
    fn default() -> Self {
        Self::new(BrushType::Pencil, Rgb::BLACK, 5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_roundtrip_through_from_str() {
        for brush in BrushType::ALL {
            assert_eq!(brush.as_str().parse::<BrushType>(), Ok(brush));
        }
    }

    #[test]
    fn test_tags_match_serde_names() {
        for brush in BrushType::ALL {
            let json = serde_json::to_string(&brush).unwrap();
            assert_eq!(json, format!("\"{}\"", brush.as_str()));
        }
    }

    #[test]
    fn test_aliases_and_unknown_tags() {
        assert_eq!("puntos".parse::<BrushType>(), Ok(BrushType::Dots));
        assert_eq!(" Neon ".parse::<BrushType>(), Ok(BrushType::Neon));
        assert_eq!(
            "crayon".parse::<BrushType>(),
            Err(BrushError::UnknownBrush {
                tag: "crayon".into()
            })
        );
    }

    #[test]
    fn test_size_is_clamped() {
        assert_eq!(BrushSpec::new(BrushType::Pencil, Rgb::BLACK, -3.0).size, 1.0);
        assert_eq!(BrushSpec::new(BrushType::Pencil, Rgb::BLACK, f32::NAN).size, 1.0);
        assert_eq!(BrushSpec::new(BrushType::Pencil, Rgb::BLACK, 12.5).size, 12.5);
        assert_eq!(BrushSpec::new(BrushType::Pencil, Rgb::BLACK, 0.25).size, 1.0);
        assert_eq!(BrushSpec::new(BrushType::Pencil, Rgb::BLACK, f32::MAX).size, 512.0);
        assert_eq!(BrushSpec::new(BrushType::Pencil, Rgb::BLACK, f32::INFINITY).size, 1.0);
    }

    #[test]
    fn test_deserialized_size_is_clamped() {
        let tiny: BrushSpec =
            serde_json::from_str(r##"{"type":"pencil","color":"#000","size":0}"##).unwrap();
        assert_eq!(tiny.size, 1.0);
        let huge: BrushSpec =
            serde_json::from_str(r##"{"type":"confetti","color":"#000","size":1e30}"##).unwrap();
        assert_eq!(huge.size, 512.0);
    }

    #[test]
    fn test_spec_json_shape() {
        let spec: BrushSpec =
            serde_json::from_str(r##"{"type":"heart-spray","color":"#ff0000","size":8}"##).unwrap();
        assert_eq!(spec.brush, BrushType::HeartSpray);
        assert_eq!(spec.color, Rgb::new(255, 0, 0));
        assert_eq!(spec.brush.family(), BrushFamily::Particle);
    }
}
