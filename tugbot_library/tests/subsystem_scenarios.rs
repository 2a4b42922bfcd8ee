// Bench scenarios for the three subsystems driven together, without the governor
use approx::assert_abs_diff_eq;
use tugbot_library::algorithms::steering_curve::SteeringCurve;
use tugbot_library::{
    CommandShaper, EnergyClass, EnergyClassifier, EnergyReading, EngineerReading,
    ThermalIngressGuard, TugbotConfig,
};

/// Battery that discharges linearly with every read
struct DrainingPack {
    v_prop: f64,
    step: f64,
}

impl tugbot_library::EnergySensors for DrainingPack {
    fn read_energy(&mut self) -> EnergyReading {
        let reading = EnergyReading {
            v_prop: self.v_prop,
            v_sys: 14.0,
            i_prop: 1.5,
        };
        self.v_prop -= self.step;
        reading
    }
}

#[test]
fn test_ramp_twenty_percent_per_second() {
    let config = TugbotConfig::default();
    let mut shaper = CommandShaper::from_config(&config);
    shaper.begin(0);

    let mut now = 0;
    while now < 500 {
        now += 50;
        shaper.update(1.0, 0.0, now, 1.0);
    }
    assert_abs_diff_eq!(shaper.throttle_actual(), 0.10, epsilon = 0.02);
}

#[test]
fn test_low_prop_voltage_limps() {
    let config = TugbotConfig::default();
    let mut energy = EnergyClassifier::new(config.energy.clone());
    energy.begin(
        0,
        &mut EnergyReading {
            v_prop: 6.5,
            v_sys: 14.0,
            i_prop: 0.0,
        },
    );

    let state = energy.state();
    assert_eq!(state.class, EnergyClass::Crit);
    assert_eq!(state.throttle_limit_factor, 0.3);
    assert_eq!(state.throttle_limit_pct, 30);
    assert!(!state.effects_allowed);
}

#[test]
fn test_discharge_walks_through_classes_in_order() {
    let config = TugbotConfig::default();
    let mut energy = EnergyClassifier::new(config.energy.clone());
    let mut pack = DrainingPack {
        v_prop: 7.6,
        step: 0.02,
    };
    energy.begin(0, &mut pack);

    let mut seen = vec![energy.class()];
    let mut now = 0;
    for _ in 0..400 {
        now += 50;
        energy.update(now, &mut pack);
        if seen.last() != Some(&energy.class()) {
            seen.push(energy.class());
        }
    }

    assert_eq!(
        seen,
        vec![
            EnergyClass::Ok,
            EnergyClass::Warn,
            EnergyClass::Crit,
            EnergyClass::Dead
        ]
    );
}

#[test]
fn test_energy_limit_shrinks_target_not_rate() {
    let config = TugbotConfig::default();
    let mut shaper = CommandShaper::from_config(&config);
    shaper.begin(0);

    // Already moving at 0.6, then the pack drops to CRIT
    let mut now = 0;
    while shaper.throttle_actual() < 0.6 - 1e-9 {
        now += 50;
        shaper.update(0.6, 0.0, now, 1.0);
    }

    now += 100;
    let state = shaper.update(1.0, 0.0, now, EnergyClass::Crit.throttle_limit_factor());
    assert_abs_diff_eq!(state.throttle_target, 0.3, epsilon = 1e-9);
    // Ramp-down still bounded at 20%/s
    assert_abs_diff_eq!(state.throttle_actual, 0.58, epsilon = 1e-9);
}

#[test]
fn test_bilge_holds_after_single_wet_sample() {
    let config = TugbotConfig::default();
    let mut guard = ThermalIngressGuard::new(config.engineer.clone());
    let mut sensors = EngineerReading {
        temp1_volts: 0.3,
        temp2_volts: 0.3,
        water_level: 0.1,
    };
    guard.begin(0, &mut sensors);

    sensors.water_level = 0.25;
    guard.update(50, &mut sensors);
    assert!(guard.state().bilge_pump_on);

    sensors.water_level = 0.1;
    let mut now = 100;
    let mut on_until = 50;
    while now <= 12_000 {
        guard.update(now, &mut sensors);
        if guard.state().bilge_pump_on {
            on_until = now;
        }
        now += 50;
    }
    // Last wet sample at 50 ms; pump runs the whole 10 s window after it
    assert_eq!(on_until, 10_000);
    assert_eq!(guard.state().bilge_trigger_count, 1);
}

#[test]
fn test_steering_curve_endpoints_for_every_profile() {
    let config = TugbotConfig::default();
    for profile in &config.steering.profiles {
        let curve = SteeringCurve::new(profile.deadband, profile.expo);
        assert_eq!(curve.shape(0.0), 0.0);
        assert_abs_diff_eq!(curve.shape(1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.shape(-1.0), -1.0, epsilon = 1e-12);
        assert_eq!(curve.shape(profile.deadband * 0.5), 0.0);
    }
}

#[test]
fn test_self_test_on_default_build() {
    assert!(CommandShaper::self_test().all_passed());
}
