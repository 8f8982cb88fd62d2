//! Common types used across bridge messages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One media source bound to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSource {
    /// Source URI (file, http(s), rtsp, ...).
    pub uri: String,

    /// How the engine instance is constructed for this source.
    pub init_type: InitType,

    /// Engine startup flags, honored only for [`InitType::WithOptions`].
    pub init_options: Vec<String>,
}

impl MediaSource {
    /// Source with a plain engine instance and no startup flags.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            init_type: InitType::Simple,
            init_options: Vec::new(),
        }
    }
}

/// How the underlying engine instance is constructed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitType {
    /// Plain engine instance, startup flags ignored.
    #[default]
    Simple,

    /// Engine instance constructed with the source's init options.
    WithOptions,
}

impl InitType {
    /// Numeric code used by the host UI surface (1 or 2).
    pub fn code(self) -> u8 {
        match self {
            Self::Simple => 1,
            Self::WithOptions => 2,
        }
    }

    /// Parse the host UI surface code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Simple),
            2 => Some(Self::WithOptions),
            _ => None,
        }
    }
}

/// A seek destination, either proportional or absolute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SeekTarget {
    /// Fraction of the media duration, 0.0 - 1.0.
    Fraction(f64),

    /// Absolute position in milliseconds.
    Time(u64),
}

/// Pixel dimensions of the decoded video.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSize {
    pub width: u32,
    pub height: u32,
}

/// One selectable elementary stream (audio or text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Engine-assigned track id.
    pub id: i32,

    /// Whether the engine marked this track as the default selection.
    pub is_default: bool,
}

/// Which kind of elementary stream a track selection targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    Audio,
    Text,
}

/// Fixed display aspect ratios the engine accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    Ratio16x9,
    Ratio4x3,
    Ratio1x1,
    Ratio16x10,
    Ratio21x9,
    Ratio235x100,
}

impl AspectRatio {
    /// The ratio string the host UI surface uses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ratio16x9 => "16:9",
            Self::Ratio4x3 => "4:3",
            Self::Ratio1x1 => "1:1",
            Self::Ratio16x10 => "16:10",
            Self::Ratio21x9 => "21:9",
            Self::Ratio235x100 => "2.35:1",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an aspect ratio string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown aspect ratio: {0}")]
pub struct ParseAspectRatioError(pub String);

impl FromStr for AspectRatio {
    type Err = ParseAspectRatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "16:9" => Ok(Self::Ratio16x9),
            "4:3" => Ok(Self::Ratio4x3),
            "1:1" => Ok(Self::Ratio1x1),
            "16:10" => Ok(Self::Ratio16x10),
            "21:9" => Ok(Self::Ratio21x9),
            "2.35:1" => Ok(Self::Ratio235x100),
            other => Err(ParseAspectRatioError(other.to_string())),
        }
    }
}

/// How the video surface fits its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeMode {
    /// Letterbox/pillarbox to keep the whole frame visible.
    Contain,

    /// Fill the container, cropping overflow.
    Cover,
}
