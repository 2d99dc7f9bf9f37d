//! Single lithium-ion cell model
//! Location: src/power/cell.rs

use serde::{Deserialize, Serialize};

use crate::config::constants::power::*;

/// One cell in the series x parallel grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryCell {
    /// Terminal voltage under the last load (V)
    pub voltage: f64,
    /// Rated capacity when new (Ah)
    pub capacity: f64,
    pub internal_resistance: f64,
    pub temperature: f64,
    /// Equivalent full discharge cycles
    pub cycle_count: f64,
    /// 1.0 new, floored at 0.1
    pub health: f64,
    /// State of charge (0-1)
    pub charge_level: f64,
}

impl BatteryCell {
    /// A full cell at rest, reading no more than `max_voltage`
    pub fn new(capacity: f64, internal_resistance: f64, temperature: f64, max_voltage: f64) -> Self {
        let mut cell = Self {
            voltage: 0.0,
            capacity,
            internal_resistance,
            temperature,
            cycle_count: 0.0,
            health: 1.0,
            charge_level: 1.0,
        };
        cell.voltage = cell.open_circuit_voltage().min(max_voltage);
        cell
    }

    /// Capacity left after aging (Ah)
    pub fn effective_capacity(&self) -> f64 {
        self.capacity * self.health
    }

    /// Rest voltage from the three-segment SOC curve plus temperature drift
    pub fn open_circuit_voltage(&self) -> f64 {
        soc_to_voltage(self.charge_level)
            + (self.temperature - CELL_REFERENCE_TEMP_C) * CELL_TEMP_COEFF
    }

    /// Terminal voltage under `current`, held within `[min_voltage, max_voltage]`
    ///
    /// A cold full cell would otherwise read above its rated maximum.
    pub fn update_voltage(&mut self, current: f64, min_voltage: f64, max_voltage: f64) {
        let voltage = self.open_circuit_voltage() - current * self.internal_resistance;
        self.voltage = voltage.clamp(min_voltage, max_voltage);
    }

    /// Coulomb counting; positive current discharges
    pub fn update_charge(&mut self, current: f64, dt: f64) {
        let capacity = self.effective_capacity();
        if capacity <= 0.0 {
            return;
        }
        let delta = -current * dt / 3600.0 / capacity;
        self.charge_level = (self.charge_level + delta).clamp(0.0, 1.0);
        if current > 0.0 {
            self.cycle_count += current * dt / (3600.0 * self.capacity * 2.0);
        }
    }

    /// I²R heating with relaxation toward the pack temperature
    pub fn update_temperature(&mut self, current: f64, dt: f64, pack_temperature: f64) {
        let heating = current * current * self.internal_resistance * CELL_HEATING_COEFF;
        let cooling = CELL_COOLING_COEFF * (self.temperature - pack_temperature);
        self.temperature += (heating - cooling) * dt;
        self.temperature = self.temperature.min(MAX_CELL_TEMPERATURE_C);
    }

    /// Calendar aging amplified by C-rate, heat and depth of discharge
    pub fn age(&mut self, current: f64, dt: f64) {
        let capacity = self.effective_capacity().max(f64::EPSILON);
        let current_stress = current.abs() / capacity;
        let temperature_stress =
            ((self.temperature - CELL_REFERENCE_TEMP_C) / TEMPERATURE_STRESS_SPAN_C).max(0.0);
        let depth_stress = (self.charge_level - 0.5).abs() * 2.0;

        let rate = CALENDAR_AGING_PER_SECOND
            * (1.0 + current_stress * CURRENT_STRESS_WEIGHT)
            * (1.0 + temperature_stress * TEMPERATURE_STRESS_WEIGHT)
            * (1.0 + depth_stress * DEPTH_STRESS_WEIGHT);
        self.health = (self.health - rate * dt).clamp(MIN_CELL_HEALTH, 1.0);
    }
}

/// Three-segment open-circuit voltage curve at 25 °C
pub fn soc_to_voltage(soc: f64) -> f64 {
    let soc = soc.clamp(0.0, 1.0);
    if soc > SOC_UPPER_KNEE {
        VOLTAGE_AT_UPPER_KNEE + (soc - SOC_UPPER_KNEE) * UPPER_SEGMENT_SLOPE
    } else if soc > SOC_LOWER_KNEE {
        VOLTAGE_AT_LOWER_KNEE + (soc - SOC_LOWER_KNEE) * MIDDLE_SEGMENT_SLOPE
    } else {
        VOLTAGE_AT_EMPTY + soc * LOWER_SEGMENT_SLOPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_soc_curve_segments() {
        assert_relative_eq!(soc_to_voltage(1.0), 4.2, epsilon = 1e-12);
        assert_relative_eq!(soc_to_voltage(0.9), 4.0, epsilon = 1e-12);
        assert_relative_eq!(soc_to_voltage(0.5), 3.65, epsilon = 1e-12);
        assert_relative_eq!(soc_to_voltage(0.1), 3.3, epsilon = 1e-12);
        assert_relative_eq!(soc_to_voltage(0.0), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_soc_curve_monotonic() {
        let mut previous = soc_to_voltage(0.0);
        for i in 1..=1000 {
            let v = soc_to_voltage(i as f64 / 1000.0);
            assert!(v >= previous);
            previous = v;
        }
    }

    #[test]
    fn test_new_cell_is_full() {
        let cell = BatteryCell::new(3.0, 0.1, 25.0, 4.2);
        assert_relative_eq!(cell.voltage, 4.2, epsilon = 1e-12);
        assert_eq!(cell.charge_level, 1.0);
        assert_eq!(cell.health, 1.0);
    }

    #[test]
    fn test_ir_drop_and_floor() {
        let mut cell = BatteryCell::new(3.0, 0.1, 25.0, 4.2);
        cell.update_voltage(10.0, 2.5, 4.2);
        assert_relative_eq!(cell.voltage, 3.2, epsilon = 1e-12);

        cell.update_voltage(100.0, 2.5, 4.2);
        assert_eq!(cell.voltage, 2.5);
    }

    #[test]
    fn test_cold_cell_capped_at_max_voltage() {
        let mut cold = BatteryCell::new(3.0, 0.1, 0.0, 4.2);
        assert_relative_eq!(cold.open_circuit_voltage(), 4.2 + 0.075, epsilon = 1e-12);
        assert_eq!(cold.voltage, 4.2);

        cold.update_voltage(0.0, 2.5, 4.2);
        assert_eq!(cold.voltage, 4.2);

        // Half charge still reads higher when cold, below the cap
        cold.charge_level = 0.5;
        cold.update_voltage(0.0, 2.5, 4.2);
        assert_relative_eq!(cold.voltage, 3.65 + 0.075, epsilon = 1e-12);
    }

    #[test]
    fn test_coulomb_counting() {
        let mut cell = BatteryCell::new(3.0, 0.1, 25.0, 4.2);
        cell.update_charge(3.0, 1800.0);
        assert_relative_eq!(cell.charge_level, 0.5, epsilon = 1e-12);
        assert_relative_eq!(cell.cycle_count, 0.25, epsilon = 1e-12);

        cell.update_charge(30.0, 3600.0);
        assert_eq!(cell.charge_level, 0.0);
    }

    #[test]
    fn test_aging_monotonic() {
        let mut cell = BatteryCell::new(3.0, 0.1, 45.0, 4.2);
        let mut previous = cell.health;
        for _ in 0..100 {
            cell.age(6.0, 3600.0 * 24.0);
            assert!(cell.health <= previous);
            previous = cell.health;
        }
        assert!(cell.health < 1.0);
        assert!(cell.health >= MIN_CELL_HEALTH);
    }

    #[test]
    fn test_heating() {
        let mut cell = BatteryCell::new(3.0, 0.1, 25.0, 4.2);
        cell.update_temperature(10.0, 1.0, 25.0);
        assert!(cell.temperature > 25.0);

        let mut hot = BatteryCell::new(3.0, 0.1, 50.0, 4.2);
        hot.update_temperature(0.0, 1.0, 25.0);
        assert!(hot.temperature < 50.0);
    }
}
