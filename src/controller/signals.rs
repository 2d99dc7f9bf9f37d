//! Raw hardware signal sets delivered by joystick controllers
//! Location: src/controller/signals.rs

use serde::{Deserialize, Serialize};

use crate::config::constants::controller::ANALOG_5V_CENTER;
use crate::config::constants::controller::ANALOG_5V_MAX;

/// Analog joystick lines as voltages plus discrete button lines
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalogSignals {
    /// X axis voltage (turn)
    pub axis_x_voltage: f64,
    /// Y axis voltage (forward/back)
    pub axis_y_voltage: f64,
    /// Enable line, held while the user is in control
    pub enable_line: bool,
    pub mode_button: bool,
    pub emergency_stop: bool,
    /// Speed-limit potentiometer wiper voltage
    pub speed_pot_voltage: f64,
}

impl AnalogSignals {
    /// Both axes at `center`, buttons released, speed pot at `max`
    pub fn centered(center: f64, max: f64) -> Self {
        Self {
            axis_x_voltage: center,
            axis_y_voltage: center,
            enable_line: false,
            mode_button: false,
            emergency_stop: false,
            speed_pot_voltage: max,
        }
    }

    pub fn with_axes(mut self, x: f64, y: f64) -> Self {
        self.axis_x_voltage = x;
        self.axis_y_voltage = y;
        self
    }

    pub fn with_enable(mut self, enable: bool) -> Self {
        self.enable_line = enable;
        self
    }

    pub fn with_speed_pot(mut self, voltage: f64) -> Self {
        self.speed_pot_voltage = voltage;
        self
    }
}

impl Default for AnalogSignals {
    fn default() -> Self {
        Self::centered(ANALOG_5V_CENTER, ANALOG_5V_MAX)
    }
}

/// Pre-decoded digital bus frame
///
/// Every field is optional; real buses drop fields and the translator treats a
/// missing axis as centered and a missing flag as released.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BusPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linear_axis: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angular_axis: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_stop: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode_button: Option<bool>,
    /// Discrete speed profile, 0 (no motion) to 3 (full scale)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drive_profile: Option<i32>,
}

impl BusPayload {
    /// Frame carrying only the two axes
    pub fn axes(linear: f64, angular: f64) -> Self {
        Self {
            linear_axis: Some(linear),
            angular_axis: Some(angular),
            ..Self::default()
        }
    }

    pub fn with_enable(mut self, enable: bool) -> Self {
        self.enable = Some(enable);
        self
    }

    pub fn with_profile(mut self, profile: i32) -> Self {
        self.drive_profile = Some(profile);
        self
    }

    pub fn with_emergency_stop(mut self, pressed: bool) -> Self {
        self.emergency_stop = Some(pressed);
        self
    }
}

/// Raw signal set in one of the two hardware forms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "form", content = "signals", rename_all = "snake_case")]
pub enum RawSignals {
    /// Tier 1 analog lines
    Analog(AnalogSignals),
    /// Tier 2 bus frame; `None` models a silent bus
    Digital(Option<BusPayload>),
}

impl RawSignals {
    pub fn is_analog(&self) -> bool {
        matches!(self, RawSignals::Analog(_))
    }
}

impl From<AnalogSignals> for RawSignals {
    fn from(signals: AnalogSignals) -> Self {
        RawSignals::Analog(signals)
    }
}

impl From<BusPayload> for RawSignals {
    fn from(payload: BusPayload) -> Self {
        RawSignals::Digital(Some(payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_analog_is_centered() {
        let signals = AnalogSignals::default();
        assert_eq!(signals.axis_x_voltage, 2.5);
        assert_eq!(signals.axis_y_voltage, 2.5);
        assert_eq!(signals.speed_pot_voltage, 5.0);
        assert!(!signals.enable_line);
    }

    #[test]
    fn test_bus_payload_builders() {
        let payload = BusPayload::axes(0.8, -0.5).with_enable(true).with_profile(2);
        assert_eq!(payload.linear_axis, Some(0.8));
        assert_eq!(payload.enable, Some(true));
        assert_eq!(payload.drive_profile, Some(2));
        assert_eq!(payload.mode_button, None);
    }

    #[test]
    fn test_partial_bus_frame_deserializes() {
        let payload: BusPayload = serde_json::from_str(r#"{"linear_axis": 0.4}"#).unwrap();
        assert_eq!(payload.linear_axis, Some(0.4));
        assert_eq!(payload.angular_axis, None);
        assert_eq!(payload.drive_profile, None);
    }

    #[test]
    fn test_conversions() {
        assert!(RawSignals::from(AnalogSignals::default()).is_analog());
        assert!(!RawSignals::from(BusPayload::default()).is_analog());
    }
}
