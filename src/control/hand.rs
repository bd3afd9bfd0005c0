// src/control/hand.rs
//! Device-control panel state: manual angles, calibration and recording

use super::gesture::Gesture;
use crate::config::constants::{hand::DEFAULT_FINGER_ANGLE, ranges};
use crate::error::TelemetryResult;
use crate::error_context;
use crate::simulation::{Finger, FingerAngles};
use crate::utils::bounds::check_numeric_range;
use tracing::{debug, info};

/// Progress of the per-finger calibration walk-through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationState {
    Idle,
    /// Calibrating the given finger
    InProgress(Finger),
}

/// Hand controller driven by the control panel
#[derive(Debug, Clone)]
pub struct HandController {
    angles: FingerAngles,
    calibration: CalibrationState,
    recording: bool,
    recorded: Vec<Gesture>,
}

impl HandController {
    pub fn new() -> Self {
        Self {
            angles: [DEFAULT_FINGER_ANGLE; 5],
            calibration: CalibrationState::Idle,
            recording: false,
            recorded: Vec::new(),
        }
    }

    pub fn angles(&self) -> FingerAngles {
        self.angles
    }

    pub fn angle(&self, finger: Finger) -> f64 {
        self.angles[finger.index()]
    }

    /// Set one finger; angles outside [0, 180] are rejected
    pub fn set_finger(&mut self, finger: Finger, angle: f64) -> TelemetryResult<()> {
        check_numeric_range(
            "finger_angle",
            angle,
            ranges::FINGER_ANGLE,
            error_context!("hand", "set_finger").add_info("finger", finger.name()),
        )?;
        self.angles[finger.index()] = angle;
        debug!(%finger, angle, "finger angle set");
        Ok(())
    }

    /// Move to a gesture pose, recording it if a recording is active
    pub fn apply_gesture(&mut self, gesture: Gesture) -> FingerAngles {
        self.angles = gesture.resolve(self.angles);
        if self.recording {
            self.recorded.push(gesture);
        }
        debug!(%gesture, recording = self.recording, "gesture applied");
        self.angles
    }

    /// All fingers back to 90°
    pub fn reset_to_default(&mut self) {
        self.angles = [DEFAULT_FINGER_ANGLE; 5];
    }

    pub fn calibration(&self) -> CalibrationState {
        self.calibration
    }

    pub fn is_calibrating(&self) -> bool {
        matches!(self.calibration, CalibrationState::InProgress(_))
    }

    /// Restart calibration at the thumb
    pub fn start_calibration(&mut self) {
        self.calibration = CalibrationState::InProgress(Finger::Thumb);
        info!("calibration started");
    }

    /// Advance to the next finger; completes after the pinky
    pub fn next_calibration_step(&mut self) -> CalibrationState {
        self.calibration = match self.calibration {
            CalibrationState::InProgress(finger) => match Finger::from_index(finger.index() + 1) {
                Some(next) => CalibrationState::InProgress(next),
                None => {
                    info!("calibration complete");
                    CalibrationState::Idle
                }
            },
            CalibrationState::Idle => CalibrationState::Idle,
        };
        self.calibration
    }

    /// Fraction of calibration done, counting the current step
    pub fn calibration_progress(&self) -> f64 {
        match self.calibration {
            CalibrationState::InProgress(finger) => (finger.index() + 1) as f64 / Finger::ALL.len() as f64,
            CalibrationState::Idle => 0.0,
        }
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Flip recording; starting a recording clears the previous one
    pub fn toggle_recording(&mut self) -> bool {
        if !self.recording {
            self.recorded.clear();
        }
        self.recording = !self.recording;
        info!(recording = self.recording, "gesture recording toggled");
        self.recording
    }

    pub fn recorded_gestures(&self) -> &[Gesture] {
        &self.recorded
    }
}

impl Default for HandController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TelemetryError;

    #[test]
    fn test_defaults() {
        let hand = HandController::new();
        assert_eq!(hand.angles(), [90.0; 5]);
        assert!(!hand.is_calibrating());
        assert!(!hand.is_recording());
    }

    #[test]
    fn test_set_finger_validates() {
        let mut hand = HandController::new();
        hand.set_finger(Finger::Ring, 135.0).unwrap();
        assert_eq!(hand.angle(Finger::Ring), 135.0);

        let err = hand.set_finger(Finger::Ring, 200.0).unwrap_err();
        assert!(matches!(err, TelemetryError::InvalidConfiguration { .. }));
        assert_eq!(hand.angle(Finger::Ring), 135.0);
    }

    #[test]
    fn test_gesture_and_reset() {
        let mut hand = HandController::new();
        assert_eq!(hand.apply_gesture(Gesture::Point), [90.0, 180.0, 0.0, 0.0, 0.0]);
        hand.reset_to_default();
        assert_eq!(hand.angles(), [90.0; 5]);
    }

    #[test]
    fn test_calibration_walks_all_fingers() {
        let mut hand = HandController::new();
        hand.start_calibration();
        assert_eq!(hand.calibration(), CalibrationState::InProgress(Finger::Thumb));
        assert_eq!(hand.calibration_progress(), 0.2);

        for expected in &Finger::ALL[1..] {
            assert_eq!(hand.next_calibration_step(), CalibrationState::InProgress(*expected));
        }
        assert_eq!(hand.calibration_progress(), 1.0);
        assert_eq!(hand.next_calibration_step(), CalibrationState::Idle);
        assert_eq!(hand.next_calibration_step(), CalibrationState::Idle);
    }

    #[test]
    fn test_recording_only_while_active() {
        let mut hand = HandController::new();
        hand.apply_gesture(Gesture::OpenHand);
        assert!(hand.recorded_gestures().is_empty());

        assert!(hand.toggle_recording());
        hand.apply_gesture(Gesture::ClosedFist);
        hand.apply_gesture(Gesture::ThumbsUp);
        assert!(!hand.toggle_recording());
        hand.apply_gesture(Gesture::Point);
        assert_eq!(hand.recorded_gestures(), &[Gesture::ClosedFist, Gesture::ThumbsUp]);

        hand.toggle_recording();
        assert!(hand.recorded_gestures().is_empty());
    }
}
