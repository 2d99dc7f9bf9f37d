// src/config/constants.rs
//! System-wide emulation constants
//!
//! Physical constants that model real hardware behaviour live here so the
//! subsystem models stay free of magic numbers. Per-family controller
//! constants (deadzones, voltage ranges) are part of the family descriptors
//! in `controller::families` because they are a fixed hardware contract.

/// Controller signal constants
pub mod controller {
    /// Deadzone used by the generic analog fallback family
    pub const GENERIC_DEADZONE: f64 = 0.10;
    /// Nominal 5 V analog joystick center
    pub const ANALOG_5V_CENTER: f64 = 2.5;
    pub const ANALOG_5V_MAX: f64 = 5.0;
    /// Hall-effect 3.3 V joystick center
    pub const ANALOG_3V3_CENTER: f64 = 1.65;
    pub const ANALOG_3V3_MAX: f64 = 3.3;
    /// Highest discrete drive profile on profile-scaled bus families
    pub const MAX_DRIVE_PROFILE: i32 = 3;
    /// Profile assumed when a bus frame carries no profile field
    pub const DEFAULT_DRIVE_PROFILE: i32 = 1;
}

/// Drive and motor constants
pub mod drive {
    pub const DEFAULT_WHEELBASE_M: f64 = 0.6;
    pub const DEFAULT_WHEEL_RADIUS_M: f64 = 0.15;
    pub const DEFAULT_MAX_VELOCITY_MPS: f64 = 2.0;
    pub const DEFAULT_MAX_ACCELERATION_MPS2: f64 = 1.0;
    pub const DEFAULT_MASS_KG: f64 = 100.0;

    /// Shaft torque at full command (N·m)
    pub const MOTOR_MAX_TORQUE_NM: f64 = 2.0;
    pub const MOTOR_MAX_RPM: f64 = 3000.0;
    pub const GEAR_RATIO: f64 = 20.0;
    /// Fixed electronics draw added to the motor total (W)
    pub const DRIVE_BASE_POWER_W: f64 = 5.0;

    pub const BASE_MOTOR_EFFICIENCY: f64 = 0.85;
    pub const MIN_MOTOR_EFFICIENCY: f64 = 0.1;
    pub const EFFICIENCY_REFERENCE_TEMP_C: f64 = 25.0;
    pub const EFFICIENCY_LOSS_PER_DEGREE: f64 = 0.01;
    pub const HUMIDITY_EFFICIENCY_LOSS: f64 = 0.05;

    pub const HEAT_GENERATION_COEFF: f64 = 0.1;
    pub const MOTOR_COOLING_COEFF: f64 = 0.1;
    pub const MOTOR_THERMAL_MASS: f64 = 5.0;
    pub const MOTOR_MAX_TEMPERATURE_C: f64 = 120.0;

    pub const DERATING_ONSET_C: f64 = 60.0;
    pub const DERATING_SPAN_C: f64 = 60.0;
    pub const MIN_TEMPERATURE_DERATING: f64 = 0.3;

    pub const BASE_WEAR_RATE: f64 = 0.00001;
    pub const LOAD_WEAR_RATE: f64 = 0.00005;
    pub const OVERHEAT_WEAR_RATE: f64 = 0.00002;
    pub const WEAR_ONSET_TEMPERATURE_C: f64 = 40.0;
    pub const WEAR_TEMPERATURE_SPAN_C: f64 = 80.0;
    pub const MIN_WEAR_FACTOR: f64 = 0.1;

    /// Weight of the previous target in the command low-pass filter
    pub const COMMAND_FILTER_FACTOR: f64 = 0.9;
    /// Fraction of the way toward a reversed target covered per tick
    pub const BACKLASH_BLEND: f64 = 0.3;
    /// Targets below this magnitude never engage the backlash model
    pub const BACKLASH_MIN_TARGET: f64 = 0.1;

    pub const FRICTION_SLIP_COEFF: f64 = 0.2;
    pub const WETNESS_SLIP_COEFF: f64 = 0.15;
    pub const ROUGHNESS_SLIP_COEFF: f64 = 0.1;
    pub const TORQUE_SLIP_COEFF: f64 = 0.1;
    pub const MAX_WHEEL_SLIP: f64 = 0.8;

    pub const GRAVITY_MPS2: f64 = 9.81;
    pub const SLOPE_RESISTANCE_SCALE: f64 = 1000.0;
    pub const ROLLING_RESISTANCE_SCALE: f64 = 0.1;
    pub const WIND_EFFECT_COEFF: f64 = 0.01;

    /// Odometry noise injected per integration step while moving (m)
    pub const POSITION_NOISE_STDDEV_M: f64 = 0.001;

    /// Braking energy fraction converted to an immediate temperature bump
    pub const BRAKING_ENERGY_FACTOR: f64 = 0.5;
    pub const BRAKING_HEAT_COEFF: f64 = 10.0;
}

/// Battery and power distribution constants
pub mod power {
    pub const DEFAULT_SERIES_CELLS: usize = 6;
    pub const DEFAULT_PARALLEL_CELLS: usize = 2;
    pub const DEFAULT_CELL_CAPACITY_AH: f64 = 3.0;
    pub const DEFAULT_CELL_RESISTANCE_OHM: f64 = 0.1;
    pub const DEFAULT_MIN_CELL_VOLTAGE: f64 = 2.5;
    pub const DEFAULT_MAX_CELL_VOLTAGE: f64 = 4.2;
    pub const DEFAULT_MIN_PACK_VOLTAGE: f64 = 18.0;
    pub const DEFAULT_AMBIENT_TEMPERATURE_C: f64 = 25.0;

    /// Manufacturing spread applied across the cell grid
    pub const CAPACITY_SPREAD: f64 = 0.04;
    pub const RESISTANCE_SPREAD: f64 = 0.2;

    /// State-of-charge curve breakpoints
    pub const SOC_UPPER_KNEE: f64 = 0.9;
    pub const SOC_LOWER_KNEE: f64 = 0.1;
    pub const VOLTAGE_AT_UPPER_KNEE: f64 = 4.0;
    pub const VOLTAGE_AT_LOWER_KNEE: f64 = 3.3;
    pub const VOLTAGE_AT_EMPTY: f64 = 3.0;
    pub const UPPER_SEGMENT_SLOPE: f64 = 2.0;
    pub const MIDDLE_SEGMENT_SLOPE: f64 = 0.875;
    pub const LOWER_SEGMENT_SLOPE: f64 = 3.0;
    /// Open-circuit voltage temperature coefficient (V/°C)
    pub const CELL_TEMP_COEFF: f64 = -0.003;
    pub const CELL_REFERENCE_TEMP_C: f64 = 25.0;

    pub const CELL_HEATING_COEFF: f64 = 0.1;
    pub const CELL_COOLING_COEFF: f64 = 0.05;
    pub const MAX_CELL_TEMPERATURE_C: f64 = 80.0;

    pub const CALENDAR_AGING_PER_SECOND: f64 = 0.00001 / 3600.0;
    pub const CURRENT_STRESS_WEIGHT: f64 = 10.0;
    pub const TEMPERATURE_STRESS_WEIGHT: f64 = 5.0;
    pub const DEPTH_STRESS_WEIGHT: f64 = 2.0;
    pub const TEMPERATURE_STRESS_SPAN_C: f64 = 50.0;
    pub const MIN_CELL_HEALTH: f64 = 0.1;

    pub const PACK_EFFICIENCY: f64 = 0.95;
    pub const PACK_HEAT_TRANSFER_W_PER_K: f64 = 10.0;
    pub const PACK_THERMAL_MASS_KG: f64 = 5.0;
    pub const PACK_SPECIFIC_HEAT: f64 = 1000.0;
    pub const MAX_PACK_TEMPERATURE_C: f64 = 70.0;

    pub const BMS_OVER_TEMPERATURE_C: f64 = 60.0;
    pub const BMS_UNDER_VOLTAGE: f64 = 2.8;
    pub const BALANCING_THRESHOLD: f64 = 0.05;
    pub const BALANCING_RATE_PER_SECOND: f64 = 0.001;

    pub const LOW_BATTERY_CHARGE: f64 = 0.2;
    pub const CRITICAL_BATTERY_CHARGE: f64 = 0.05;
    pub const CRITICAL_VOLTAGE_FACTOR: f64 = 0.95;
    /// Regeneration is refused at or above this charge level
    pub const REGEN_CHARGE_CEILING: f64 = 0.95;

    /// Speed (m/s) at which load-dependent consumers double their draw
    pub const LOAD_REFERENCE_SPEED_MPS: f64 = 2.0;
    pub const COOLING_BASE_POWER_W: f64 = 2.0;
    pub const COOLING_ONSET_C: f64 = 35.0;
    pub const COOLING_SPAN_C: f64 = 20.0;
    pub const COOLING_THERMAL_POWER_W: f64 = 8.0;
    pub const COOLING_LOAD_POWER_W: f64 = 3.0;
    pub const MOTOR_POWER_REFERENCE_W: f64 = 500.0;

    pub const HISTORY_LENGTH: usize = 1000;
}

/// Sensor suite constants
pub mod sensors {
    pub const DEFAULT_PROXIMITY_UPDATE_RATE_HZ: f64 = 10.0;
    pub const DEFAULT_PROXIMITY_RANGE_M: f64 = 2.0;
    pub const DEFAULT_PROXIMITY_NOISE_STDDEV_M: f64 = 0.01;
    pub const DEFAULT_IMU_NOISE_STDDEV: f64 = 0.05;
    pub const DEFAULT_ENCODER_RESOLUTION: u32 = 1000;
    pub const DEFAULT_OBSTACLE_COUNT: usize = 10;
    pub const DEFAULT_WORLD_HALF_EXTENT_M: f64 = 25.0;

    pub const GPS_PERIOD_S: f64 = 0.1;
    pub const LIDAR_PERIOD_S: f64 = 0.05;
    pub const CAMERA_PERIOD_S: f64 = 1.0 / 30.0;
    /// Tolerance absorbing float drift in the cadence accumulators
    pub const CADENCE_EPSILON_S: f64 = 1e-9;

    pub const ACCEL_BIAS_DRIFT_BASE: f64 = 0.001;
    pub const ACCEL_BIAS_TEMP_COEFF: f64 = 0.0001;
    pub const GYRO_BIAS_DRIFT: f64 = 0.01;
    pub const GYRO_NOISE_STDDEV: f64 = 0.01;
    pub const VIBRATION_FREQUENCY_HZ: f64 = 30.0;
    pub const VIBRATION_PER_MPS: f64 = 0.1;
    pub const REFERENCE_TEMPERATURE_C: f64 = 25.0;

    pub const MAG_FIELD_STRENGTH_UT: f64 = 50.0;
    pub const MAG_VERTICAL_UT: f64 = 30.0;
    pub const MAG_DECLINATION_RAD: f64 = 0.2;
    pub const MAG_NOISE_STDDEV_UT: f64 = 0.5;
    pub const MAG_HARD_IRON: [f64; 3] = [0.1, -0.05, 0.02];
    pub const MAG_SOFT_IRON: [[f64; 3]; 3] = [
        [1.0, 0.01, 0.01],
        [0.01, 1.02, 0.01],
        [0.01, 0.01, 0.98],
    ];

    pub const GPS_ORIGIN_LAT: f64 = 37.7749;
    pub const GPS_ORIGIN_LON: f64 = -122.4194;
    pub const GPS_ORIGIN_ALT_M: f64 = 10.0;
    pub const METERS_PER_DEGREE: f64 = 111_320.0;
    pub const GPS_BASE_ACCURACY_M: f64 = 3.0;
    pub const GPS_ATMOSPHERIC_ERROR_M: (f64, f64) = (0.5, 2.0);
    pub const GPS_MULTIPATH_ERROR_M: (f64, f64) = (0.0, 1.5);
    pub const GPS_SATELLITES_MEAN: f64 = 8.0;
    pub const GPS_SATELLITES_STDDEV: f64 = 2.0;
    pub const GPS_MIN_SATELLITES: u8 = 4;
    pub const GPS_MAX_SATELLITES: u8 = 12;
    pub const GPS_HDOP_MEAN: f64 = 1.5;
    pub const GPS_HDOP_STDDEV: f64 = 0.5;
    pub const GPS_HDOP_RANGE: (f64, f64) = (0.8, 4.0);

    pub const LIDAR_RAYS: usize = 360;
    pub const LIDAR_MAX_RANGE_M: f64 = 30.0;
    pub const LIDAR_MIN_RANGE_M: f64 = 0.1;
    pub const LIDAR_STEP_M: f64 = 0.1;
    pub const LIDAR_BASE_NOISE_M: f64 = 0.02;
    pub const LIDAR_NOISE_PER_M: f64 = 0.001;
    pub const LIDAR_INTENSITY_RANGE: (f64, f64) = (0.3, 1.0);

    pub const CAMERA_FOV_DEG: f64 = 60.0;
    pub const CAMERA_RANGE_M: f64 = 10.0;

    /// Body-frame (x forward, y left) proximity sensor mounts
    pub const PROXIMITY_MOUNTS: [(f64, f64); 4] = [(0.3, 0.0), (-0.3, 0.0), (0.0, 0.3), (0.0, -0.3)];

    pub const ENCODER_NOISE_FRACTION: f64 = 0.01;

    pub const OBSTACLE_FIELD_HALF_EXTENT_M: f64 = 20.0;
    pub const OBSTACLE_RADIUS_RANGE_M: (f64, f64) = (0.5, 2.0);
    /// Obstacles never spawn overlapping this radius around the origin
    pub const SPAWN_CLEARANCE_M: f64 = 1.5;
    pub const OBSTACLE_PLACEMENT_ATTEMPTS: usize = 32;

    pub const DEFAULT_AMBIENT_TEMPERATURE_C: f64 = 20.0;
    pub const DEFAULT_HUMIDITY: f64 = 0.5;
    pub const DEFAULT_PRESSURE_HPA: f64 = 1013.25;
    pub const AMBIENT_DRIFT_STDDEV: f64 = 0.1;
    pub const HUMIDITY_DRIFT_STDDEV: f64 = 0.01;
    pub const PRESSURE_DRIFT_STDDEV: f64 = 0.1;

    pub const CPU_BASE_TEMPERATURE_C: f64 = 35.0;
    pub const CPU_LOAD_TEMPERATURE_C: f64 = 20.0;
    pub const SENSOR_LOAD_REFERENCE_MPS: f64 = 2.0;
    pub const NOMINAL_BATTERY_VOLTAGE: f64 = 24.0;
    pub const BATTERY_SAG_AT_FULL_LOAD_V: f64 = 1.5;
    pub const BATTERY_CURRENT_AT_FULL_LOAD_A: f64 = 10.0;
    /// Battery temperature rise per amp of measured current (°C/A)
    pub const BATTERY_HEATING_PER_AMP: f64 = 0.1;
    pub const CPU_TEMPERATURE_NOISE_C: f64 = 1.0;
    pub const BATTERY_VOLTAGE_NOISE_V: f64 = 0.1;
    pub const BATTERY_CURRENT_NOISE_A: f64 = 0.5;
    pub const BATTERY_TEMPERATURE_NOISE_C: f64 = 0.5;

    pub const SYSTEM_LOAD_IDLE: f64 = 0.3;
    pub const SYSTEM_LOAD_PER_LOAD: f64 = 0.4;
    pub const SYSTEM_LOAD_NOISE: f64 = 0.1;
    pub const MEMORY_AVAILABLE_IDLE: f64 = 0.7;
    pub const MEMORY_USED_PER_LOAD: f64 = 0.2;
    pub const MEMORY_NOISE: f64 = 0.05;
    /// Floor for the load and memory fractions
    pub const MIN_HEALTH_FRACTION: f64 = 0.1;

    /// Radius of obstacles placed relative to the chair
    pub const PLACED_OBSTACLE_RADIUS_M: f64 = 0.5;
    pub const DEFAULT_MOTOR_TEMPERATURE_C: f64 = 25.0;
}

/// Simulation pacing constants
pub mod simulation {
    /// Tick rate suggested to the external scheduler (Hz)
    pub const DEFAULT_UPDATE_RATE_HZ: f64 = 50.0;
    pub const MIN_UPDATE_RATE_HZ: f64 = 1.0;
    pub const MAX_UPDATE_RATE_HZ: f64 = 1000.0;
}
