//! Dashboard readouts derived from a snapshot

use crate::config::constants::readout as thresholds;
use crate::simulation::{Finger, TelemetrySnapshot};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Link state shown on the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Connected,
    Connecting,
    Disconnected,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionStatus::Connected => write!(f, "connected"),
            ConnectionStatus::Connecting => write!(f, "connecting"),
            ConnectionStatus::Disconnected => write!(f, "disconnected"),
        }
    }
}

/// Battery bar colour band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatteryHealth {
    Good,
    Fair,
    Low,
}

impl BatteryHealth {
    pub fn classify(battery_level: f64) -> Self {
        if battery_level > thresholds::BATTERY_GOOD_ABOVE_PCT {
            BatteryHealth::Good
        } else if battery_level > thresholds::BATTERY_FAIR_ABOVE_PCT {
            BatteryHealth::Fair
        } else {
            BatteryHealth::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatencyGrade {
    Nominal,
    Elevated,
}

impl LatencyGrade {
    pub fn classify(latency_ms: f64) -> Self {
        if latency_ms < thresholds::LATENCY_NOMINAL_BELOW_MS {
            LatencyGrade::Nominal
        } else {
            LatencyGrade::Elevated
        }
    }
}

/// Text rendering of a snapshot at the dashboard's display precision
pub struct Readout<'a> {
    snapshot: &'a TelemetrySnapshot,
    connection: ConnectionStatus,
}

impl<'a> Readout<'a> {
    pub fn new(snapshot: &'a TelemetrySnapshot, connection: ConnectionStatus) -> Self {
        Self { snapshot, connection }
    }

    pub fn battery_health(&self) -> BatteryHealth {
        BatteryHealth::classify(self.snapshot.battery_level)
    }

    pub fn latency_grade(&self) -> LatencyGrade {
        LatencyGrade::classify(self.snapshot.latency_ms)
    }
}

impl fmt::Display for Readout<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.snapshot;
        writeln!(f, "status      {}  uptime {}", self.connection, s.uptime)?;
        writeln!(
            f,
            "emg         {:.0}%  peak {:.0}%  avg {:.0}%",
            s.emg_signal, s.emg_peak, s.emg_average
        )?;
        writeln!(
            f,
            "battery     {:.0}% ({:?})  {:.1}V  {:.1}°C",
            s.battery_level,
            self.battery_health(),
            s.voltage,
            s.temperature
        )?;
        write!(f, "fingers    ")?;
        for finger in Finger::ALL {
            write!(f, " {} {:.0}°", finger, s.finger_angle(finger))?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "response    {:.1}ms  accuracy {:.1}%  fps {:.0}  latency {:.1}ms ({:?})",
            s.response_time_ms,
            s.accuracy_pct,
            s.fps,
            s.latency_ms,
            self.latency_grade()
        )?;
        write!(f, "system      cpu {:.0}%  mem {:.0}%", s.cpu_usage_pct, s.memory_usage_pct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::model;

    #[test]
    fn test_battery_bands() {
        assert_eq!(BatteryHealth::classify(87.0), BatteryHealth::Good);
        assert_eq!(BatteryHealth::classify(50.0), BatteryHealth::Fair);
        assert_eq!(BatteryHealth::classify(20.0), BatteryHealth::Low);
    }

    #[test]
    fn test_latency_grade() {
        assert_eq!(LatencyGrade::classify(12.0), LatencyGrade::Nominal);
        assert_eq!(LatencyGrade::classify(15.0), LatencyGrade::Elevated);
    }

    #[test]
    fn test_readout_formatting() {
        let snapshot = model::initialize();
        let text = Readout::new(&snapshot, ConnectionStatus::Connected).to_string();
        assert!(text.contains("status      connected  uptime 2h 34m"));
        assert!(text.contains("emg         75%  peak 90%  avg 60%"));
        assert!(text.contains("87% (Good)  3.7V  23.5°C"));
        assert!(text.contains("Thumb 90°"));
        assert!(text.contains("accuracy 94.2%"));
        assert!(text.contains("(Nominal)"));
    }
}
