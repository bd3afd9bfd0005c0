// src/control/gesture.rs
//! Gesture presets for the device-control panel

use crate::config::constants::hand::{CLOSED_ANGLE as C, OPEN_ANGLE as O};
use crate::error::TelemetryError;
use crate::simulation::FingerAngles;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named hand poses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gesture {
    OpenHand,
    ClosedFist,
    Point,
    PeaceSign,
    ThumbsUp,
    /// Keep whatever angles are currently set
    Custom,
}

impl Gesture {
    /// Presets with a fixed pose
    pub const PRESETS: [Gesture; 5] = [
        Gesture::OpenHand,
        Gesture::ClosedFist,
        Gesture::Point,
        Gesture::PeaceSign,
        Gesture::ThumbsUp,
    ];

    /// Fixed angles for this gesture; `None` for `Custom`
    pub fn angles(self) -> Option<FingerAngles> {
        match self {
            Gesture::OpenHand => Some([O, O, O, O, O]),
            Gesture::ClosedFist => Some([C, C, C, C, C]),
            Gesture::Point => Some([90.0, O, C, C, C]),
            Gesture::PeaceSign => Some([90.0, O, O, C, C]),
            Gesture::ThumbsUp => Some([O, C, C, C, C]),
            Gesture::Custom => None,
        }
    }

    /// Angles after applying this gesture to `current`
    pub fn resolve(self, current: FingerAngles) -> FingerAngles {
        self.angles().unwrap_or(current)
    }

    pub fn name(self) -> &'static str {
        match self {
            Gesture::OpenHand => "Open Hand",
            Gesture::ClosedFist => "Closed Fist",
            Gesture::Point => "Point",
            Gesture::PeaceSign => "Peace Sign",
            Gesture::ThumbsUp => "Thumbs Up",
            Gesture::Custom => "Custom",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gesture {
    type Err = TelemetryError;

    /// Accepts display names, case and separator insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        match key.as_str() {
            "openhand" => Ok(Gesture::OpenHand),
            "closedfist" => Ok(Gesture::ClosedFist),
            "point" => Ok(Gesture::Point),
            "peacesign" => Ok(Gesture::PeaceSign),
            "thumbsup" => Ok(Gesture::ThumbsUp),
            "custom" => Ok(Gesture::Custom),
            _ => Err(TelemetryError::UnknownGesture { name: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_angles() {
        assert_eq!(Gesture::OpenHand.angles(), Some([180.0; 5]));
        assert_eq!(Gesture::ClosedFist.angles(), Some([0.0; 5]));
        assert_eq!(Gesture::Point.angles(), Some([90.0, 180.0, 0.0, 0.0, 0.0]));
        assert_eq!(Gesture::PeaceSign.angles(), Some([90.0, 180.0, 180.0, 0.0, 0.0]));
        assert_eq!(Gesture::ThumbsUp.angles(), Some([180.0, 0.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_custom_keeps_current() {
        let current = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(Gesture::Custom.resolve(current), current);
        assert_eq!(Gesture::ClosedFist.resolve(current), [0.0; 5]);
    }

    #[test]
    fn test_parse_names() {
        for gesture in Gesture::PRESETS {
            assert_eq!(gesture.name().parse::<Gesture>().unwrap(), gesture);
        }
        assert_eq!("thumbs-up".parse::<Gesture>().unwrap(), Gesture::ThumbsUp);
        assert!(matches!(
            "Wave".parse::<Gesture>(),
            Err(TelemetryError::UnknownGesture { .. })
        ));
    }
}
