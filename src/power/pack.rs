//! Battery pack, BMS and power distribution model
//! Location: src/power/pack.rs

use std::collections::VecDeque;

use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::cell::BatteryCell;
use super::consumers::{cooling_demand, default_consumers, ConsumerKind, PowerConsumer};
use crate::config::constants::power::*;
use crate::config::PowerConfig;
use crate::error::{EmuError, EmuResult};
use crate::state::VehicleState;

/// Simplified battery management flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct BmsStatus {
    pub balancing_active: bool,
    pub over_temperature: bool,
    pub under_voltage: bool,
}

/// Cumulative energy bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PowerStatistics {
    pub total_energy_consumed_wh: f64,
    pub peak_power_draw_w: f64,
    pub regenerative_energy_wh: f64,
    /// Fractional full cycles from net discharge
    pub charge_cycles: f64,
}

/// Rolling window of pack samples, one per update
#[derive(Debug, Clone, Default)]
pub struct PowerHistory {
    pub voltage: VecDeque<f64>,
    pub current: VecDeque<f64>,
    pub temperature: VecDeque<f64>,
}

impl PowerHistory {
    fn push(&mut self, voltage: f64, current: f64, temperature: f64) {
        for (series, value) in [
            (&mut self.voltage, voltage),
            (&mut self.current, current),
            (&mut self.temperature, temperature),
        ] {
            if series.len() == HISTORY_LENGTH {
                series.pop_front();
            }
            series.push_back(value);
        }
    }

    pub fn len(&self) -> usize {
        self.voltage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voltage.is_empty()
    }
}

/// Multi-cell battery pack with consumer loads and a lumped thermal model
///
/// Cells are stored as `cells[series_group][parallel_index]`. Pack voltage,
/// current, charge and runtime are derived from the cell array on every call.
#[derive(Debug, Clone)]
pub struct PowerModel {
    config: PowerConfig,
    cells: Vec<Vec<BatteryCell>>,
    consumers: Vec<PowerConsumer>,
    /// Speed-derived load multiplier for load-dependent consumers
    load_factor: f64,
    ambient_temperature: f64,
    pack_temperature: f64,
    bms: BmsStatus,
    stats: PowerStatistics,
    last_charge_level: f64,
    history: PowerHistory,
}

impl PowerModel {
    pub fn new(config: &PowerConfig) -> EmuResult<Self> {
        config.validate()?;

        let total = config.cell_count() as f64;
        let cells = (0..config.series_cells)
            .map(|s| {
                (0..config.parallel_cells)
                    .map(|p| {
                        let position = (s * config.parallel_cells + p) as f64 / total;
                        BatteryCell::new(
                            config.cell_capacity_ah * (1.0 - CAPACITY_SPREAD / 2.0 + CAPACITY_SPREAD * position),
                            config.cell_internal_resistance
                                * (1.0 - RESISTANCE_SPREAD / 2.0 + RESISTANCE_SPREAD * position),
                            config.ambient_temperature,
                            config.max_cell_voltage,
                        )
                    })
                    .collect()
            })
            .collect();

        debug!(
            series = config.series_cells,
            parallel = config.parallel_cells,
            capacity_ah = config.cell_capacity_ah,
            "battery pack created"
        );

        Ok(Self {
            config: config.clone(),
            cells,
            consumers: default_consumers(),
            load_factor: 0.0,
            ambient_temperature: config.ambient_temperature,
            pack_temperature: config.ambient_temperature,
            bms: BmsStatus::default(),
            stats: PowerStatistics::default(),
            last_charge_level: 1.0,
            history: PowerHistory::default(),
        })
    }

    /// Advance the pack by `dt` seconds under `motor_power` watts of drive load
    ///
    /// Writes `battery_voltage` and `battery_percent` into `state`.
    pub fn update(&mut self, dt: f64, motor_power: f64, state: &mut VehicleState) {
        if !(dt.is_finite() && dt > 0.0) {
            trace!(dt, "ignoring non-positive power step");
            return;
        }
        let motor_power = if motor_power.is_finite() { motor_power.max(0.0) } else { 0.0 };

        self.set_consumer_base(ConsumerKind::Motors, motor_power);
        self.set_consumer_base(
            ConsumerKind::Cooling,
            cooling_demand(self.pack_temperature, motor_power),
        );
        self.load_factor = state.linear_velocity.abs() / LOAD_REFERENCE_SPEED_MPS;

        let total_power = self.total_power_draw();
        let pack_current = self.current_for(total_power);

        self.update_cells(pack_current, dt);
        self.update_pack_thermal(total_power, dt);
        self.update_bms(dt);
        self.update_statistics(total_power, dt);

        state.battery_voltage = self.pack_voltage();
        state.battery_percent = self.percent();
        self.history
            .push(state.battery_voltage, self.pack_current(), self.pack_temperature);

        trace!(
            voltage = state.battery_voltage,
            current = pack_current,
            charge = self.charge_level(),
            "power tick"
        );
    }

    fn set_consumer_base(&mut self, kind: ConsumerKind, base_power: f64) {
        if let Some(consumer) = self.consumers.iter_mut().find(|c| c.kind == kind) {
            consumer.base_power = base_power;
        }
    }

    fn current_for(&self, power: f64) -> f64 {
        let voltage = self.pack_voltage();
        if voltage > 0.0 {
            power / voltage
        } else {
            0.0
        }
    }

    /// Share the pack current inside each series group by conductance
    fn update_cells(&mut self, pack_current: f64, dt: f64) {
        let min_voltage = self.config.min_cell_voltage;
        let max_voltage = self.config.max_cell_voltage;
        let pack_temperature = self.pack_temperature;
        for group in &mut self.cells {
            let conductance: f64 = group.iter().map(|c| 1.0 / c.internal_resistance).sum();
            for cell in group.iter_mut() {
                let share = (1.0 / cell.internal_resistance) / conductance;
                let current = pack_current * share;

                cell.update_voltage(current, min_voltage, max_voltage);
                cell.update_charge(current, dt);
                cell.update_temperature(current, dt, pack_temperature);
                cell.age(current, dt);
            }
        }
    }

    fn update_pack_thermal(&mut self, total_power: f64, dt: f64) {
        let heat_generated = total_power * (1.0 - PACK_EFFICIENCY);
        let heat_dissipated = PACK_HEAT_TRANSFER_W_PER_K * (self.pack_temperature - self.ambient_temperature);
        self.pack_temperature +=
            (heat_generated - heat_dissipated) * dt / (PACK_THERMAL_MASS_KG * PACK_SPECIFIC_HEAT);
        let floor = self.ambient_temperature.min(MAX_PACK_TEMPERATURE_C);
        self.pack_temperature = self.pack_temperature.clamp(floor, MAX_PACK_TEMPERATURE_C);
    }

    fn update_bms(&mut self, dt: f64) {
        let over_temperature = self.cells().any(|c| c.temperature > BMS_OVER_TEMPERATURE_C);
        let under_voltage = self.cells().any(|c| c.voltage < BMS_UNDER_VOLTAGE);

        if over_temperature != self.bms.over_temperature {
            if over_temperature {
                warn!("BMS over-temperature protection active");
            } else {
                info!("BMS over-temperature cleared");
            }
        }
        if under_voltage != self.bms.under_voltage {
            if under_voltage {
                warn!("BMS under-voltage protection active");
            } else {
                info!("BMS under-voltage cleared");
            }
        }
        self.bms.over_temperature = over_temperature;
        self.bms.under_voltage = under_voltage;

        let mut balancing = false;
        let step = BALANCING_RATE_PER_SECOND * dt;
        for group in &mut self.cells {
            let (min, max, sum) = group.iter().fold(
                (f64::INFINITY, f64::NEG_INFINITY, 0.0),
                |(min, max, sum), c| (min.min(c.charge_level), max.max(c.charge_level), sum + c.charge_level),
            );
            if max - min <= BALANCING_THRESHOLD {
                continue;
            }
            balancing = true;
            let average = sum / group.len() as f64;
            for cell in group.iter_mut() {
                let gap = average - cell.charge_level;
                cell.charge_level += gap.clamp(-step, step);
            }
        }

        if balancing != self.bms.balancing_active {
            debug!(active = balancing, "cell balancing state changed");
        }
        self.bms.balancing_active = balancing;
    }

    fn update_statistics(&mut self, total_power: f64, dt: f64) {
        self.stats.total_energy_consumed_wh += total_power * dt / 3600.0;
        self.stats.peak_power_draw_w = self.stats.peak_power_draw_w.max(total_power);

        let charge = self.charge_level();
        if charge < self.last_charge_level {
            self.stats.charge_cycles += (self.last_charge_level - charge) / 2.0;
        }
        self.last_charge_level = charge;
    }

    /// Feed recovered braking energy back into every cell
    ///
    /// No cell is pushed past full charge; only the accepted share is counted.
    pub fn regenerative_braking(&mut self, energy_wh: f64) {
        if !(energy_wh.is_finite() && energy_wh > 0.0) || self.charge_level() >= REGEN_CHARGE_CEILING {
            return;
        }
        let pack_energy_wh = self.pack_voltage() * self.usable_capacity();
        if pack_energy_wh <= 0.0 {
            return;
        }

        let increase = energy_wh / pack_energy_wh;
        let mut accepted = 0.0;
        for cell in self.cells.iter_mut().flatten() {
            let before = cell.charge_level;
            cell.charge_level = (cell.charge_level + increase).min(1.0);
            accepted += cell.charge_level - before;
        }
        let recovered = energy_wh * accepted / (increase * self.config.cell_count() as f64);
        self.stats.regenerative_energy_wh += recovered;
        self.last_charge_level = self.charge_level();
        debug!(offered_wh = energy_wh, recovered_wh = recovered, "regenerative braking");
    }

    /// Sum of parallel-averaged group voltages, within the pack floor and ceiling (V)
    pub fn pack_voltage(&self) -> f64 {
        let voltage: f64 = self
            .cells
            .iter()
            .map(|group| group.iter().map(|c| c.voltage).sum::<f64>() / group.len() as f64)
            .sum();
        voltage.clamp(self.pack_floor_voltage(), self.max_pack_voltage())
    }

    /// Highest voltage the pack may report (V)
    pub fn max_pack_voltage(&self) -> f64 {
        self.config.max_cell_voltage * self.config.series_cells as f64
    }

    /// Lowest voltage the pack may report (V)
    pub fn pack_floor_voltage(&self) -> f64 {
        self.config.min_cell_voltage * self.config.series_cells as f64
    }

    /// Current implied by the present consumer demand (A)
    pub fn pack_current(&self) -> f64 {
        self.current_for(self.total_power_draw())
    }

    /// Weakest cell bounds the pack state of charge
    pub fn charge_level(&self) -> f64 {
        self.cells().map(|c| c.charge_level).fold(1.0, f64::min)
    }

    pub fn percent(&self) -> f64 {
        self.charge_level() * 100.0
    }

    /// Capacity of the weakest series group after aging (Ah)
    pub fn usable_capacity(&self) -> f64 {
        self.cells
            .iter()
            .map(|group| group.iter().map(BatteryCell::effective_capacity).sum::<f64>())
            .fold(f64::INFINITY, f64::min)
    }

    /// Hours left at the present draw; `None` when nothing is drawn
    pub fn remaining_runtime_hours(&self) -> Option<f64> {
        let current = self.pack_current();
        if current <= 0.0 {
            return None;
        }
        Some(self.charge_level() * self.usable_capacity() / current)
    }

    /// Pack draw across enabled consumers (W)
    pub fn total_power_draw(&self) -> f64 {
        self.consumers.iter().map(|c| c.pack_draw(self.load_factor)).sum()
    }

    pub fn is_low_battery(&self) -> bool {
        self.charge_level() < LOW_BATTERY_CHARGE || self.pack_voltage() < self.config.min_voltage
    }

    pub fn is_critical_battery(&self) -> bool {
        self.charge_level() < CRITICAL_BATTERY_CHARGE
            || self.pack_voltage() < self.config.min_voltage * CRITICAL_VOLTAGE_FACTOR
    }

    pub fn set_consumer_enabled(&mut self, kind: ConsumerKind, enabled: bool) {
        if let Some(consumer) = self.consumers.iter_mut().find(|c| c.kind == kind) {
            if consumer.enabled != enabled {
                info!(consumer = %kind, enabled, "power consumer toggled");
            }
            consumer.enabled = enabled;
        }
    }

    pub fn set_consumer_enabled_by_name(&mut self, name: &str, enabled: bool) -> EmuResult<()> {
        let kind: ConsumerKind = name.parse()?;
        self.set_consumer_enabled(kind, enabled);
        Ok(())
    }

    pub fn consumers(&self) -> &[PowerConsumer] {
        &self.consumers
    }

    pub fn set_ambient_temperature(&mut self, temperature: f64) {
        if temperature.is_finite() {
            self.ambient_temperature = temperature.clamp(-40.0, 60.0);
        }
    }

    pub fn ambient_temperature(&self) -> f64 {
        self.ambient_temperature
    }

    pub fn pack_temperature(&self) -> f64 {
        self.pack_temperature
    }

    pub fn bms_status(&self) -> BmsStatus {
        self.bms
    }

    pub fn statistics(&self) -> PowerStatistics {
        self.stats
    }

    pub fn history(&self) -> &PowerHistory {
        &self.history
    }

    pub fn config(&self) -> &PowerConfig {
        &self.config
    }

    /// All cells, series group by series group
    pub fn cells(&self) -> impl Iterator<Item = &BatteryCell> {
        self.cells.iter().flatten()
    }

    pub fn cell(&self, series: usize, parallel: usize) -> Option<&BatteryCell> {
        self.cells.get(series).and_then(|group| group.get(parallel))
    }

    fn cell_mut(&mut self, series: usize, parallel: usize) -> EmuResult<&mut BatteryCell> {
        let (series_cells, parallel_cells) = (self.config.series_cells, self.config.parallel_cells);
        self.cells
            .get_mut(series)
            .and_then(|group| group.get_mut(parallel))
            .ok_or_else(|| {
                EmuError::invalid_config(
                    "PowerModel",
                    format!(
                        "cell ({}, {}) outside {}S{}P grid",
                        series, parallel, series_cells, parallel_cells
                    ),
                )
            })
    }

    /// Override one cell's health (test harness fault injection)
    pub fn set_cell_health(&mut self, series: usize, parallel: usize, health: f64) -> EmuResult<()> {
        let cell = self.cell_mut(series, parallel)?;
        cell.health = health.clamp(MIN_CELL_HEALTH, 1.0);
        warn!(series, parallel, health = cell.health, "cell health overridden");
        Ok(())
    }

    /// Multiply one cell's internal resistance (test harness fault injection)
    pub fn scale_cell_resistance(&mut self, series: usize, parallel: usize, factor: f64) -> EmuResult<()> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(EmuError::invalid_config(
                "PowerModel",
                format!("resistance factor {} must be positive", factor),
            ));
        }
        let cell = self.cell_mut(series, parallel)?;
        cell.internal_resistance *= factor;
        warn!(series, parallel, resistance = cell.internal_resistance, "cell resistance scaled");
        Ok(())
    }

    /// Fail the first `count` cells: minimum health and tenfold resistance
    pub fn fail_cells(&mut self, count: usize) {
        let count = count.min(self.config.cell_count());
        for cell in self.cells.iter_mut().flatten().take(count) {
            cell.health = MIN_CELL_HEALTH;
            cell.internal_resistance *= 10.0;
        }
        warn!(count, "battery cells failed");
    }

    /// Age every cell to `health` with a matching cycle count
    pub fn degrade_cells(&mut self, health: f64) {
        let health = health.clamp(MIN_CELL_HEALTH, 1.0);
        for cell in self.cells.iter_mut().flatten() {
            cell.health = cell.health.min(health);
            cell.cycle_count = cell.cycle_count.max(1000.0 * (1.0 - health));
        }
        info!(health, "battery cells degraded");
    }

    /// On-demand diagnostic view of the pack
    pub fn power_diagnostics(&self) -> PowerDiagnostics {
        let voltages: Vec<f64> = self.cells().map(|c| c.voltage).collect();
        let min_voltage = voltages.iter().copied().fold(f64::INFINITY, f64::min);
        let max_voltage = voltages.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        PowerDiagnostics {
            battery: BatterySummary {
                voltage: self.pack_voltage(),
                current: self.pack_current(),
                charge_level: self.charge_level(),
                percent: self.percent(),
                usable_capacity_ah: self.usable_capacity(),
                remaining_hours: self.remaining_runtime_hours(),
                is_low: self.is_low_battery(),
                is_critical: self.is_critical_battery(),
            },
            cells: CellSummary {
                temperatures: self.cells().map(|c| c.temperature).collect(),
                health: self.cells().map(|c| c.health).collect(),
                min_voltage,
                max_voltage,
                voltage_spread: max_voltage - min_voltage,
                voltages,
            },
            bms: self.bms,
            consumers: self
                .consumers
                .iter()
                .map(|c| ConsumerStatus {
                    kind: c.kind,
                    enabled: c.enabled,
                    power_w: c.pack_draw(self.load_factor),
                })
                .collect(),
            statistics: self.stats,
            thermal: ThermalSummary {
                pack_temperature: self.pack_temperature,
                ambient_temperature: self.ambient_temperature,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatterySummary {
    pub voltage: f64,
    pub current: f64,
    pub charge_level: f64,
    pub percent: f64,
    pub usable_capacity_ah: f64,
    pub remaining_hours: Option<f64>,
    pub is_low: bool,
    pub is_critical: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellSummary {
    pub voltages: Vec<f64>,
    pub temperatures: Vec<f64>,
    pub health: Vec<f64>,
    pub min_voltage: f64,
    pub max_voltage: f64,
    pub voltage_spread: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConsumerStatus {
    pub kind: ConsumerKind,
    pub enabled: bool,
    pub power_w: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThermalSummary {
    pub pack_temperature: f64,
    pub ambient_temperature: f64,
}

/// Pack diagnostics for observers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerDiagnostics {
    pub battery: BatterySummary,
    pub cells: CellSummary,
    pub bms: BmsStatus,
    pub consumers: Vec<ConsumerStatus>,
    pub statistics: PowerStatistics,
    pub thermal: ThermalSummary,
}
