//! Controller family descriptors and signal translation
//! Location: src/controller/families.rs
//!
//! Each supported joystick family is one entry in a static descriptor table.
//! The deadzone, voltage range and scaling feature of an entry are a fixed
//! hardware contract for that family, not tunables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::signals::{AnalogSignals, BusPayload, RawSignals};
use crate::config::constants::controller::*;
use crate::error::EmuError;
use crate::state::{clamp_axis, NormalizedCommand};

/// Supported wheelchair controller families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerFamily {
    /// PG Drives R-Net, DB9 analog proportional
    #[serde(rename = "rnet")]
    RNet,
    /// Dynamic Controls Shark/DX, 3.3 V Hall-effect
    SharkDx,
    /// PG Drives VR2/Pilot+/VSI with speed potentiometer
    Vr2Pilot,
    /// Dynamic Controls LiNX on the DX bus
    LinxDx,
    /// Quantum Q-Logic 3/NE with drive profiles
    #[serde(rename = "qlogic")]
    QLogic,
    /// Unknown analog hardware
    Generic,
}

impl ControllerFamily {
    pub const ALL: [ControllerFamily; 6] = [
        ControllerFamily::RNet,
        ControllerFamily::SharkDx,
        ControllerFamily::Vr2Pilot,
        ControllerFamily::LinxDx,
        ControllerFamily::QLogic,
        ControllerFamily::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ControllerFamily::RNet => "rnet",
            ControllerFamily::SharkDx => "shark_dx",
            ControllerFamily::Vr2Pilot => "vr2_pilot",
            ControllerFamily::LinxDx => "linx_dx",
            ControllerFamily::QLogic => "qlogic",
            ControllerFamily::Generic => "generic",
        }
    }

    /// Immutable descriptor for this family
    pub fn descriptor(&self) -> &'static FamilyDescriptor {
        let index = match self {
            ControllerFamily::RNet => 0,
            ControllerFamily::SharkDx => 1,
            ControllerFamily::Vr2Pilot => 2,
            ControllerFamily::LinxDx => 3,
            ControllerFamily::QLogic => 4,
            ControllerFamily::Generic => 5,
        };
        &DESCRIPTORS[index]
    }

    pub fn tier(&self) -> SignalTier {
        self.descriptor().tier
    }

    /// Raw signals that must translate to the neutral command
    pub fn neutral_signals(&self) -> RawSignals {
        let descriptor = self.descriptor();
        match descriptor.tier {
            SignalTier::Analog => RawSignals::Analog(AnalogSignals::centered(
                descriptor.center_voltage,
                descriptor.max_voltage,
            )),
            SignalTier::Digital => RawSignals::Digital(Some(BusPayload::axes(0.0, 0.0))),
        }
    }

    fn valid_names() -> Vec<String> {
        Self::ALL.iter().map(|f| f.as_str().to_string()).collect()
    }
}

impl fmt::Display for ControllerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControllerFamily {
    type Err = EmuError;

    /// Accepts the canonical key plus common trade names (`"R-Net"`, `"vr2"`, ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let family = match key.as_str() {
            "rnet" => ControllerFamily::RNet,
            "sharkdx" | "shark" | "dx" => ControllerFamily::SharkDx,
            "vr2pilot" | "vr2" | "pilot" | "pilotplus" | "vsi" => ControllerFamily::Vr2Pilot,
            "linxdx" | "linx" => ControllerFamily::LinxDx,
            "qlogic" | "qlogic3" | "qlogicne" => ControllerFamily::QLogic,
            "generic" => ControllerFamily::Generic,
            _ => {
                return Err(EmuError::UnknownControllerFamily {
                    name: s.to_string(),
                    valid: Self::valid_names(),
                })
            }
        };
        Ok(family)
    }
}

/// Signalling tier of a family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalTier {
    /// Tier 1: analog voltages
    Analog,
    /// Tier 2: digital bus frames
    Digital,
}

impl SignalTier {
    pub fn number(&self) -> u8 {
        match self {
            SignalTier::Analog => 1,
            SignalTier::Digital => 2,
        }
    }
}

/// Post-deadzone speed scaling a family applies to both axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScaling {
    None,
    /// `speed_pot_voltage / max_voltage`
    SpeedPotentiometer,
    /// `min(1, drive_profile / 3)`
    DriveProfile,
}

/// Human-readable hardware characteristics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyCharacteristics {
    pub family: &'static str,
    pub connector: &'static str,
    pub protocol: &'static str,
    /// Nominal voltage range, analog families only
    pub voltage_range: Option<&'static str>,
    pub features: &'static [&'static str],
    pub common_models: &'static [&'static str],
    /// False for the generic fallback
    pub supported_hardware: bool,
}

/// Immutable per-family constants
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilyDescriptor {
    pub family: ControllerFamily,
    pub tier: SignalTier,
    /// Axis voltage at rest (analog only)
    pub center_voltage: f64,
    /// Axis voltage at full deflection (analog only)
    pub max_voltage: f64,
    /// Fraction of travel ignored around center
    pub deadzone: f64,
    pub scaling: AxisScaling,
    pub characteristics: FamilyCharacteristics,
}

static DESCRIPTORS: [FamilyDescriptor; 6] = [
    FamilyDescriptor {
        family: ControllerFamily::RNet,
        tier: SignalTier::Analog,
        center_voltage: ANALOG_5V_CENTER,
        max_voltage: ANALOG_5V_MAX,
        deadzone: 0.15,
        scaling: AxisScaling::None,
        characteristics: FamilyCharacteristics {
            family: "PG Drives R-Net",
            connector: "DB9",
            protocol: "Analog Proportional",
            voltage_range: Some("0-5V"),
            features: &["Enable line", "Mode selection"],
            common_models: &[
                "Permobil M3 Corpus",
                "Permobil M5 Corpus",
                "Quickie Q500 M",
                "Quickie Q300/Q400/Q700",
                "Magic Mobility Extreme X8",
            ],
            supported_hardware: true,
        },
    },
    FamilyDescriptor {
        family: ControllerFamily::SharkDx,
        tier: SignalTier::Analog,
        center_voltage: ANALOG_3V3_CENTER,
        max_voltage: ANALOG_3V3_MAX,
        deadzone: 0.12,
        scaling: AxisScaling::None,
        characteristics: FamilyCharacteristics {
            family: "Dynamic Controls Shark/DX",
            connector: "4-pin DCI",
            protocol: "Analog Hall Effect",
            voltage_range: Some("0-3.3V"),
            features: &[],
            common_models: &["Merits Vision Super HD (P327)", "Shoprider 6Runner 10"],
            supported_hardware: true,
        },
    },
    FamilyDescriptor {
        family: ControllerFamily::Vr2Pilot,
        tier: SignalTier::Analog,
        center_voltage: ANALOG_5V_CENTER,
        max_voltage: ANALOG_5V_MAX,
        deadzone: 0.10,
        scaling: AxisScaling::SpeedPotentiometer,
        characteristics: FamilyCharacteristics {
            family: "PG Drives VR2/Pilot+/VSI",
            connector: "4-pin analog",
            protocol: "Analog Proportional",
            voltage_range: Some("0-5V"),
            features: &["Speed potentiometer", "Mode switching"],
            common_models: &[
                "Pride Jazzy Carbon",
                "Pride Jazzy Ultra Light",
                "Pride Jazzy Select 6",
                "Pride Jazzy 600 ES",
                "Golden LiteRider Envy GP162",
                "Golden Compass Sport",
                "Hoveround LX-5",
            ],
            supported_hardware: true,
        },
    },
    FamilyDescriptor {
        family: ControllerFamily::LinxDx,
        tier: SignalTier::Digital,
        center_voltage: 0.0,
        max_voltage: 0.0,
        deadzone: 0.08,
        scaling: AxisScaling::None,
        characteristics: FamilyCharacteristics {
            family: "Dynamic Controls LiNX",
            connector: "4-pin micro DX Bus",
            protocol: "Digital CAN-like (proprietary)",
            voltage_range: None,
            features: &[
                "Telemetry support",
                "Configuration via bus",
                "Error reporting",
                "Battery monitoring",
            ],
            common_models: &[
                "Invacare TDX SP2",
                "Invacare Aviva RX",
                "Golden LiteRider Envy (variants)",
                "Drive Titan AXS",
            ],
            supported_hardware: true,
        },
    },
    FamilyDescriptor {
        family: ControllerFamily::QLogic,
        tier: SignalTier::Digital,
        center_voltage: 0.0,
        max_voltage: 0.0,
        deadzone: 0.08,
        scaling: AxisScaling::DriveProfile,
        characteristics: FamilyCharacteristics {
            family: "Quantum Q-Logic 3/NE Series",
            connector: "Digital bus",
            protocol: "CAN/RS485 hybrid",
            voltage_range: None,
            features: &[
                "Drive profiles",
                "Specialty controls",
                "Seating integration",
                "Advanced diagnostics",
                "USB connectivity",
            ],
            common_models: &["Quantum Edge 3", "Quantum Edge 3 Stretto", "Quantum 4 Front 2"],
            supported_hardware: true,
        },
    },
    FamilyDescriptor {
        family: ControllerFamily::Generic,
        tier: SignalTier::Analog,
        center_voltage: ANALOG_5V_CENTER,
        max_voltage: ANALOG_5V_MAX,
        deadzone: GENERIC_DEADZONE,
        scaling: AxisScaling::None,
        characteristics: FamilyCharacteristics {
            family: "Generic Analog",
            connector: "Various",
            protocol: "Generic Analog",
            voltage_range: Some("0-5V"),
            features: &[],
            common_models: &[],
            supported_hardware: false,
        },
    },
];

/// Translate raw hardware signals into a normalized command
pub trait SignalTranslator {
    fn family(&self) -> ControllerFamily;

    /// Never fails; malformed or mismatched input yields the neutral command
    fn translate(&self, raw: &RawSignals) -> NormalizedCommand;

    fn describe(&self) -> &FamilyCharacteristics;
}

impl SignalTranslator for FamilyDescriptor {
    fn family(&self) -> ControllerFamily {
        self.family
    }

    fn translate(&self, raw: &RawSignals) -> NormalizedCommand {
        match (self.tier, raw) {
            (SignalTier::Analog, RawSignals::Analog(signals)) => self.translate_analog(signals),
            (SignalTier::Digital, RawSignals::Digital(Some(payload))) => {
                self.translate_digital(payload)
            }
            (SignalTier::Digital, RawSignals::Digital(None)) => NormalizedCommand::NEUTRAL,
            _ => {
                trace!(family = %self.family, "signal form does not match family tier");
                NormalizedCommand::NEUTRAL
            }
        }
    }

    fn describe(&self) -> &FamilyCharacteristics {
        &self.characteristics
    }
}

impl SignalTranslator for ControllerFamily {
    fn family(&self) -> ControllerFamily {
        *self
    }

    fn translate(&self, raw: &RawSignals) -> NormalizedCommand {
        self.descriptor().translate(raw)
    }

    fn describe(&self) -> &FamilyCharacteristics {
        &self.descriptor().characteristics
    }
}

impl FamilyDescriptor {
    fn translate_analog(&self, signals: &AnalogSignals) -> NormalizedCommand {
        if !(signals.axis_x_voltage.is_finite() && signals.axis_y_voltage.is_finite()) {
            return NormalizedCommand::NEUTRAL;
        }

        let mut linear = apply_deadzone(
            voltage_to_axis(signals.axis_y_voltage, self.center_voltage, self.max_voltage),
            self.deadzone,
        );
        let mut angular = apply_deadzone(
            voltage_to_axis(signals.axis_x_voltage, self.center_voltage, self.max_voltage),
            self.deadzone,
        );

        if self.scaling == AxisScaling::SpeedPotentiometer {
            if !signals.speed_pot_voltage.is_finite() {
                return NormalizedCommand::NEUTRAL;
            }
            let scale = speed_pot_scale(signals.speed_pot_voltage, self.max_voltage);
            linear *= scale;
            angular *= scale;
        }

        NormalizedCommand {
            linear,
            angular,
            emergency_stop: signals.emergency_stop,
            deadman_pressed: signals.enable_line,
            mode_switch: signals.mode_button,
        }
    }

    fn translate_digital(&self, payload: &BusPayload) -> NormalizedCommand {
        let mut linear = apply_deadzone(bus_axis(payload.linear_axis), self.deadzone);
        let mut angular = apply_deadzone(bus_axis(payload.angular_axis), self.deadzone);

        if self.scaling == AxisScaling::DriveProfile {
            let scale = drive_profile_scale(payload.drive_profile.unwrap_or(DEFAULT_DRIVE_PROFILE));
            linear *= scale;
            angular *= scale;
        }

        NormalizedCommand {
            linear,
            angular,
            emergency_stop: payload.emergency_stop.unwrap_or(false),
            deadman_pressed: payload.enable.unwrap_or(false),
            mode_switch: payload.mode_button.unwrap_or(false),
        }
    }
}

/// Map a voltage to `[-1, 1]` around `center`
pub fn voltage_to_axis(voltage: f64, center: f64, max: f64) -> f64 {
    let span = max - center;
    if span <= 0.0 || !voltage.is_finite() {
        return 0.0;
    }
    ((voltage - center) / span).clamp(-1.0, 1.0)
}

/// Zero inside the dead band, rescaled so full deflection still reaches ±1
///
/// The band edge itself maps to zero; a band of 1 or more swallows all input.
pub fn apply_deadzone(value: f64, deadzone: f64) -> f64 {
    let magnitude = value.abs();
    if magnitude <= deadzone {
        return 0.0;
    }
    value.signum() * (magnitude - deadzone) / (1.0 - deadzone)
}

fn bus_axis(value: Option<f64>) -> f64 {
    value.map(clamp_axis).unwrap_or(0.0)
}

/// Speed potentiometer factor in `[0, 1]`
pub fn speed_pot_scale(voltage: f64, max_voltage: f64) -> f64 {
    (voltage / max_voltage).clamp(0.0, 1.0)
}

/// Drive profile factor in `[0, 1]`; out-of-range profiles are clamped
pub fn drive_profile_scale(profile: i32) -> f64 {
    (profile.clamp(0, MAX_DRIVE_PROFILE) as f64 / MAX_DRIVE_PROFILE as f64).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_descriptor_table_matches_family() {
        for family in ControllerFamily::ALL {
            assert_eq!(family.descriptor().family, family);
        }
    }

    #[test]
    fn test_deadzone_contract() {
        assert_eq!(ControllerFamily::RNet.descriptor().deadzone, 0.15);
        assert_eq!(ControllerFamily::SharkDx.descriptor().deadzone, 0.12);
        assert_eq!(ControllerFamily::Vr2Pilot.descriptor().deadzone, 0.10);
        assert_eq!(ControllerFamily::LinxDx.descriptor().deadzone, 0.08);
        assert_eq!(ControllerFamily::QLogic.descriptor().deadzone, 0.08);
        assert_eq!(ControllerFamily::Generic.descriptor().deadzone, 0.10);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(ControllerFamily::RNet.tier().number(), 1);
        assert_eq!(ControllerFamily::QLogic.tier().number(), 2);
        assert_eq!(ControllerFamily::LinxDx.tier(), SignalTier::Digital);
    }

    #[test]
    fn test_apply_deadzone() {
        assert_eq!(apply_deadzone(0.1, 0.15), 0.0);
        assert_eq!(apply_deadzone(0.15, 0.15), 0.0);
        assert_relative_eq!(apply_deadzone(1.0, 0.15), 1.0);
        assert_relative_eq!(apply_deadzone(-1.0, 0.15), -1.0);
        assert!(apply_deadzone(0.151, 0.15) > 0.0);
    }

    #[test]
    fn test_apply_deadzone_band_limits() {
        // No band: input passes through, a centered axis stays a positive zero
        assert_relative_eq!(apply_deadzone(0.4, 0.0), 0.4);
        assert_relative_eq!(apply_deadzone(-0.4, 0.0), -0.4);
        assert!(apply_deadzone(-0.0, 0.0).is_sign_positive());
        assert!(apply_deadzone(0.0, 0.0).is_sign_positive());

        // Full band never divides by zero
        assert_eq!(apply_deadzone(1.0, 1.0), 0.0);
        assert_eq!(apply_deadzone(-1.0, 1.0), 0.0);
    }

    #[test]
    fn test_voltage_to_axis() {
        assert_eq!(voltage_to_axis(2.5, 2.5, 5.0), 0.0);
        assert_eq!(voltage_to_axis(5.0, 2.5, 5.0), 1.0);
        assert_eq!(voltage_to_axis(0.0, 2.5, 5.0), -1.0);
        assert_eq!(voltage_to_axis(7.0, 2.5, 5.0), 1.0);
        assert_eq!(voltage_to_axis(f64::NAN, 2.5, 5.0), 0.0);
    }

    #[test]
    fn test_shark_uses_3v3_range() {
        let signals = AnalogSignals::centered(1.65, 3.3).with_axes(1.65, 3.3);
        let cmd = ControllerFamily::SharkDx.translate(&signals.into());
        assert_relative_eq!(cmd.linear, 1.0, epsilon = 1e-12);
        assert_eq!(cmd.angular, 0.0);
    }

    #[test]
    fn test_speed_pot_scaling() {
        let half_pot = AnalogSignals::default().with_axes(2.5, 5.0).with_speed_pot(2.5);
        let cmd = ControllerFamily::Vr2Pilot.translate(&half_pot.into());
        assert_relative_eq!(cmd.linear, 0.5, epsilon = 1e-12);

        let no_pot = AnalogSignals::default().with_axes(2.5, 5.0).with_speed_pot(0.0);
        assert_eq!(ControllerFamily::Vr2Pilot.translate(&no_pot.into()).linear, 0.0);

        // R-Net ignores the pot line entirely
        assert_relative_eq!(ControllerFamily::RNet.translate(&half_pot.into()).linear, 1.0);
    }

    #[test]
    fn test_drive_profile_scaling() {
        assert_eq!(drive_profile_scale(0), 0.0);
        assert_relative_eq!(drive_profile_scale(1), 1.0 / 3.0);
        assert_eq!(drive_profile_scale(3), 1.0);
        assert_eq!(drive_profile_scale(9), 1.0);
        assert_eq!(drive_profile_scale(-2), 0.0);

        let frame = BusPayload::axes(1.0, 0.0);
        let cmd = ControllerFamily::QLogic.translate(&frame.into());
        assert_relative_eq!(cmd.linear, 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_mismatched_form_is_neutral() {
        let analog = AnalogSignals::default().with_axes(5.0, 5.0).with_enable(true);
        assert!(ControllerFamily::LinxDx.translate(&analog.into()).is_neutral());

        let bus = BusPayload::axes(1.0, 1.0).with_enable(true);
        assert!(ControllerFamily::RNet.translate(&bus.into()).is_neutral());
    }

    #[test]
    fn test_silent_bus_is_neutral() {
        let cmd = ControllerFamily::LinxDx.translate(&RawSignals::Digital(None));
        assert!(cmd.is_neutral());
    }

    #[test]
    fn test_non_finite_bus_axis_is_centered() {
        let frame = BusPayload {
            linear_axis: Some(f64::NAN),
            angular_axis: Some(0.5),
            ..BusPayload::default()
        };
        let cmd = ControllerFamily::LinxDx.translate(&frame.into());
        assert_eq!(cmd.linear, 0.0);
        assert!(cmd.angular > 0.0);
    }

    #[test]
    fn test_parse_family_names() {
        assert_eq!("rnet".parse::<ControllerFamily>().unwrap(), ControllerFamily::RNet);
        assert_eq!("R-Net".parse::<ControllerFamily>().unwrap(), ControllerFamily::RNet);
        assert_eq!("VR2".parse::<ControllerFamily>().unwrap(), ControllerFamily::Vr2Pilot);
        assert_eq!("Q-Logic".parse::<ControllerFamily>().unwrap(), ControllerFamily::QLogic);
        assert!(matches!(
            "joystick".parse::<ControllerFamily>(),
            Err(EmuError::UnknownControllerFamily { .. })
        ));

        for family in ControllerFamily::ALL {
            assert_eq!(family.as_str().parse::<ControllerFamily>().unwrap(), family);
        }
    }

    #[test]
    fn test_characteristics() {
        let linx = ControllerFamily::LinxDx.describe();
        assert_eq!(linx.connector, "4-pin micro DX Bus");
        assert!(linx.features.contains(&"Telemetry support"));
        assert!(linx.voltage_range.is_none());
        assert!(!ControllerFamily::Generic.describe().supported_hardware);

        let json = serde_json::to_string(ControllerFamily::Vr2Pilot.describe()).unwrap();
        assert!(json.contains("Speed potentiometer"));
    }
}
