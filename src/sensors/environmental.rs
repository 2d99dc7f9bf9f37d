//! Ambient, electrical and system-health sensors
//! Location: src/sensors/environmental.rs

use super::types::{ElectricalReadings, EnvironmentReadings, SystemHealth};
use crate::config::constants::sensors::*;
use crate::state::VehicleState;
use crate::utils::noise::NoiseGenerator;

/// Slowly drifting weather station plus speed-driven load proxies
///
/// Battery figures here model what an onboard sense resistor would report and
/// are derived from vehicle speed, not read from the pack model.
#[derive(Debug, Clone)]
pub struct EnvironmentSensors {
    environment: EnvironmentReadings,
    noise: NoiseGenerator,
}

impl EnvironmentSensors {
    pub fn new(noise: NoiseGenerator) -> Self {
        Self {
            environment: EnvironmentReadings::default(),
            noise,
        }
    }

    pub fn set_ambient_temperature(&mut self, temperature: f64) {
        if temperature.is_finite() {
            self.environment.ambient_temperature = temperature;
        }
    }

    pub fn readings(&self) -> EnvironmentReadings {
        self.environment
    }

    pub fn drift(&mut self, dt: f64) -> EnvironmentReadings {
        let env = &mut self.environment;
        env.ambient_temperature += self.noise.gaussian(AMBIENT_DRIFT_STDDEV) * dt;
        env.humidity = (env.humidity + self.noise.gaussian(HUMIDITY_DRIFT_STDDEV) * dt).clamp(0.0, 1.0);
        env.pressure += self.noise.gaussian(PRESSURE_DRIFT_STDDEV) * dt;
        *env
    }

    pub fn system_health(&mut self, state: &VehicleState) -> SystemHealth {
        let load = load_factor(state);
        SystemHealth {
            cpu_temperature: CPU_BASE_TEMPERATURE_C
                + self.environment.ambient_temperature
                + load * CPU_LOAD_TEMPERATURE_C
                + self.noise.gaussian(CPU_TEMPERATURE_NOISE_C),
            system_load: (SYSTEM_LOAD_IDLE + load * SYSTEM_LOAD_PER_LOAD + self.noise.gaussian(SYSTEM_LOAD_NOISE))
                .clamp(MIN_HEALTH_FRACTION, 1.0),
            available_memory: (MEMORY_AVAILABLE_IDLE - load * MEMORY_USED_PER_LOAD
                + self.noise.gaussian(MEMORY_NOISE))
            .clamp(MIN_HEALTH_FRACTION, 1.0),
        }
    }

    pub fn electrical(&mut self, state: &VehicleState, motor_temperatures: (f64, f64)) -> ElectricalReadings {
        let load = load_factor(state);
        let battery_current =
            load * BATTERY_CURRENT_AT_FULL_LOAD_A + self.noise.gaussian(BATTERY_CURRENT_NOISE_A);
        ElectricalReadings {
            battery_voltage: NOMINAL_BATTERY_VOLTAGE - load * BATTERY_SAG_AT_FULL_LOAD_V
                + self.noise.gaussian(BATTERY_VOLTAGE_NOISE_V),
            battery_current,
            battery_temperature: self.environment.ambient_temperature
                + battery_current * BATTERY_HEATING_PER_AMP
                + self.noise.gaussian(BATTERY_TEMPERATURE_NOISE_C),
            motor_temperatures,
        }
    }
}

fn load_factor(state: &VehicleState) -> f64 {
    state.linear_velocity.abs() / SENSOR_LOAD_REFERENCE_MPS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drift_stays_plausible() {
        let mut sensors = EnvironmentSensors::new(NoiseGenerator::new(Some(6)));
        let mut readings = sensors.readings();
        for _ in 0..1000 {
            readings = sensors.drift(0.02);
        }
        assert!((readings.ambient_temperature - 20.0).abs() < 1.0);
        assert!((0.0..=1.0).contains(&readings.humidity));
        assert!((readings.pressure - 1013.25).abs() < 1.0);
    }

    #[test]
    fn test_load_raises_cpu_and_current() {
        let mut sensors = EnvironmentSensors::new(NoiseGenerator::new(Some(6)));
        let idle = VehicleState::default();
        let busy = VehicleState {
            linear_velocity: 2.0,
            ..VehicleState::default()
        };

        let mut idle_cpu = 0.0;
        let mut busy_cpu = 0.0;
        let mut idle_current = 0.0;
        let mut busy_current = 0.0;
        for _ in 0..100 {
            idle_cpu += sensors.system_health(&idle).cpu_temperature;
            busy_cpu += sensors.system_health(&busy).cpu_temperature;
            idle_current += sensors.electrical(&idle, (25.0, 25.0)).battery_current;
            busy_current += sensors.electrical(&busy, (25.0, 25.0)).battery_current;
        }
        assert!(busy_cpu > idle_cpu);
        assert!(busy_current > idle_current + 500.0);
    }

    #[test]
    fn test_health_fractions_bounded() {
        let mut sensors = EnvironmentSensors::new(NoiseGenerator::new(Some(6)));
        let flat_out = VehicleState {
            linear_velocity: 20.0,
            ..VehicleState::default()
        };
        for _ in 0..100 {
            let health = sensors.system_health(&flat_out);
            assert!((MIN_HEALTH_FRACTION..=1.0).contains(&health.system_load));
            assert!((MIN_HEALTH_FRACTION..=1.0).contains(&health.available_memory));
        }
    }

    #[test]
    fn test_motor_temperatures_pass_through() {
        let mut sensors = EnvironmentSensors::new(NoiseGenerator::new(Some(6)));
        let readings = sensors.electrical(&VehicleState::default(), (41.0, 43.5));
        assert_eq!(readings.motor_temperatures, (41.0, 43.5));
    }
}
