// tests/sensor_suite.rs
//! Sensor suite against a controlled obstacle world
//!
//! Uses an empty generated world plus injected obstacles so every reading
//! has a known ground truth.

use approx::assert_abs_diff_eq;

use wheelchair_emu::config::{SensorConfig, WheelchairConfig};
use wheelchair_emu::sensors::{GpsErrorKind, Obstacle, ProximityPosition};
use wheelchair_emu::{SensorSuite, VehicleState};

const DT: f64 = 0.02;

fn empty_world_suite(seed: u64) -> SensorSuite {
    let config = SensorConfig {
        obstacle_count: 0,
        ..SensorConfig::default()
    };
    SensorSuite::new(&config, &WheelchairConfig::default(), Some(seed)).unwrap()
}

#[test]
fn test_same_seed_same_readings() {
    let mut a = SensorSuite::new(&SensorConfig::default(), &WheelchairConfig::default(), Some(9)).unwrap();
    let mut b = SensorSuite::new(&SensorConfig::default(), &WheelchairConfig::default(), Some(9)).unwrap();
    assert_eq!(a.world().obstacles(), b.world().obstacles());

    let mut state = VehicleState::default();
    for step in 0..100 {
        state.x = step as f64 * 0.01;
        state.linear_velocity = 0.5;
        state.left_motor_speed = 0.25;
        state.right_motor_speed = 0.25;
        a.update(DT, &state);
        b.update(DT, &state);
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_different_seeds_differ() {
    let mut a = empty_world_suite(1);
    let mut b = empty_world_suite(2);
    a.update(DT, &VehicleState::default());
    b.update(DT, &VehicleState::default());
    assert_ne!(a.snapshot().imu, b.snapshot().imu);
}

#[test]
fn test_gps_refreshes_at_ten_hertz() {
    let mut suite = empty_world_suite(3);
    let state = VehicleState::default();
    let mut previous = None;
    let mut refreshes = 0;
    for _ in 0..50 {
        suite.update(DT, &state);
        let fix = suite.snapshot().gps;
        if previous != Some(fix) {
            refreshes += 1;
        }
        previous = Some(fix);
    }
    // One second of updates
    assert!((9..=11).contains(&refreshes), "gps refreshed {refreshes} times");
}

#[test]
fn test_imu_and_encoders_refresh_every_update() {
    let mut suite = empty_world_suite(4);
    let state = VehicleState {
        linear_velocity: 1.0,
        left_motor_speed: 0.5,
        right_motor_speed: 0.5,
        ..VehicleState::default()
    };
    let mut last_imu = None;
    let mut last_ticks = 0;
    for _ in 0..20 {
        suite.update(DT, &state);
        let snapshot = suite.snapshot();
        assert_ne!(Some(snapshot.imu), last_imu);
        assert!(snapshot.encoders.left_ticks >= last_ticks);
        last_imu = Some(snapshot.imu);
        last_ticks = snapshot.encoders.left_ticks;
    }
    assert!(last_ticks > 0);
}

#[test]
fn test_injected_obstacle_seen_by_every_forward_sensor() {
    let mut suite = empty_world_suite(5);
    let state = VehicleState::default();
    let obstacle = suite.inject_obstacle(&state, ProximityPosition::Front, 1.5).unwrap();
    assert!(obstacle.x > 2.0);
    suite.update(DT, &state);
    let snapshot = suite.snapshot();

    let front = snapshot.proximity.front.unwrap();
    assert_abs_diff_eq!(front, 1.5, epsilon = 0.1);
    assert!(snapshot.proximity.rear.is_none());

    let (closest, _) = snapshot.lidar.closest().unwrap();
    assert!(closest > 1.6 && closest < 2.0, "closest lidar return {closest}");
    assert_eq!(snapshot.lidar.len(), 360);

    assert_eq!(snapshot.camera.detections.len(), 1);
    let detection = snapshot.camera.detections[0];
    assert_abs_diff_eq!(detection.angle, 0.0, epsilon = 1e-9);
    assert_abs_diff_eq!(detection.size, 1.0);
}

#[test]
fn test_visibility_scales_camera_confidence() {
    let mut clear = empty_world_suite(6);
    let mut foggy = empty_world_suite(6);
    let state = VehicleState::default();
    for suite in [&mut clear, &mut foggy] {
        suite.add_obstacle(Obstacle::new(5.0, 0.0, 0.5)).unwrap();
    }
    foggy.set_visibility(0.5);
    clear.update(DT, &state);
    foggy.update(DT, &state);

    let clear_confidence = clear.snapshot().camera.detections[0].confidence;
    let foggy_confidence = foggy.snapshot().camera.detections[0].confidence;
    assert_abs_diff_eq!(foggy_confidence, clear_confidence * 0.5, epsilon = 1e-12);
}

#[test]
fn test_proximity_reports_nothing_in_open_space() {
    let mut suite = empty_world_suite(7);
    suite.update(DT, &VehicleState::default());
    assert!(suite.snapshot().proximity.nearest().is_none());
}

#[test]
fn test_gps_fault_injection_by_name() {
    let mut suite = empty_world_suite(8);
    suite.inject_gps_error("multipath", 10.0).unwrap();
    suite.update(DT, &VehicleState::default());
    assert!(suite.snapshot().gps.accuracy >= 13.5);
    assert_eq!(suite.sensor_diagnostics().gps.faults.accuracy_inflation_m, 10.0);

    assert!(suite.inject_gps_error("solar_flare", 1.0).is_err());

    suite.clear_gps_errors();
    suite.inject_gps_fault(GpsErrorKind::Atmospheric, 3.0);
    let faults = suite.sensor_diagnostics().gps.faults;
    assert_eq!(faults.accuracy_inflation_m, 0.0);
    assert_eq!(faults.bias_m, 3.0);
}

#[test]
fn test_encoders_count_up_in_reverse() {
    let mut suite = empty_world_suite(9);
    let state = VehicleState {
        linear_velocity: -1.0,
        left_motor_speed: -0.5,
        right_motor_speed: -0.5,
        ..VehicleState::default()
    };
    for _ in 0..50 {
        suite.update(DT, &state);
    }
    let encoders = suite.snapshot().encoders;
    assert!(encoders.left_ticks > 0 && encoders.right_ticks > 0);
    let diagnostics = suite.sensor_diagnostics().encoders;
    assert_eq!(diagnostics.left_count, encoders.left_ticks);
    assert_eq!(diagnostics.resolution, 1000);
}

#[test]
fn test_electrical_readings_follow_recorded_motor_temperatures() {
    let mut suite = empty_world_suite(10);
    suite.record_motor_temperatures(55.0, 48.0);
    suite.update(DT, &VehicleState::default());
    assert_eq!(suite.snapshot().electrical.motor_temperatures, (55.0, 48.0));
}

#[test]
fn test_tilt_shows_in_accelerometer() {
    let config = SensorConfig {
        obstacle_count: 0,
        imu_noise_stddev: 0.0,
        ..SensorConfig::default()
    };
    let mut suite = SensorSuite::new(&config, &WheelchairConfig::default(), Some(11)).unwrap();
    suite.set_tilt(0.2);
    suite.update(DT, &VehicleState::default());
    assert!(suite.snapshot().imu.accel[0] < -1.5);
}

#[test]
fn test_timestamp_and_invalid_steps() {
    let mut suite = empty_world_suite(12);
    let state = VehicleState::default();
    for _ in 0..10 {
        suite.update(DT, &state);
    }
    suite.update(-1.0, &state);
    suite.update(f64::INFINITY, &state);
    assert_abs_diff_eq!(suite.snapshot().timestamp, 0.2, epsilon = 1e-9);
}

#[test]
fn test_invalid_configuration_rejected() {
    let config = SensorConfig {
        proximity_update_rate: 0.0,
        ..SensorConfig::default()
    };
    assert!(SensorSuite::new(&config, &WheelchairConfig::default(), None).is_err());

    let mut suite = empty_world_suite(13);
    assert!(suite.add_obstacle(Obstacle::new(1.0, 1.0, -0.5)).is_err());
    assert!(suite
        .inject_obstacle(&VehicleState::default(), ProximityPosition::Left, f64::NAN)
        .is_err());
}

#[test]
fn test_snapshot_serializes_to_json() {
    let mut suite = empty_world_suite(14);
    suite.update(DT, &VehicleState::default());
    let json = serde_json::to_value(suite.snapshot()).unwrap();
    assert_eq!(json["lidar"]["distances"].as_array().unwrap().len(), 360);
    assert!(json["proximity"]["front"].is_null());
}
