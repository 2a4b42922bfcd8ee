// End-to-end governor behaviour over simulated sensors
use approx::assert_abs_diff_eq;
use tugbot::prelude::*;

fn governor(config: &TugbotConfig) -> Governor<SimEnergySensors, SimEngineerSensors> {
    Governor::new(
        config,
        SimEnergySensors::default(),
        SimEngineerSensors::new(&config.engineer),
        0,
    )
}

/// Submit `frame` and tick every 50 ms until `until_ms`
fn drive(
    gov: &mut Governor<SimEnergySensors, SimEngineerSensors>,
    frame: IntentFrame,
    from_ms: u64,
    until_ms: u64,
) -> ActuatorCommand {
    let mut now = from_ms;
    let mut last = *gov.last_command();
    while now < until_ms {
        now += 50;
        gov.submit_intent(frame, now);
        last = gov.tick(now);
    }
    last
}

#[test]
fn test_throttle_ramp_after_half_second() {
    let config = TugbotConfig::default();
    let mut gov = governor(&config);
    let cmd = drive(&mut gov, IntentFrame::new(100, 0, true), 0, 500);
    assert_abs_diff_eq!(cmd.throttle, 0.10, epsilon = 0.02);
    assert!(cmd.throttle_pwm > 128);
}

#[test]
fn test_crit_battery_caps_throttle_at_thirty_percent() {
    let config = TugbotConfig::default();
    let mut gov = governor(&config);
    gov.energy_sensors_mut().v_prop = 6.5;

    // Let the smoothed voltage settle below crit, then drive flat out
    let cmd = drive(&mut gov, IntentFrame::new(100, 0, true), 0, 10_000);
    assert_eq!(cmd.energy_class, EnergyClass::Crit);
    assert!(!cmd.effects_allowed);
    assert_eq!(gov.energy_state().throttle_limit_factor, 0.3);
    assert_abs_diff_eq!(cmd.throttle, 0.3, epsilon = 1e-9);
}

#[test]
fn test_reverse_request_coasts_through_neutral() {
    let config = TugbotConfig::default();
    let mut gov = governor(&config);
    let mut now = 0;
    drive(&mut gov, IntentFrame::new(50, 0, true), now, 3_000);
    now = 3_000;
    assert!(gov.last_command().throttle > 0.4);

    let mut saw_positive_target_after_flip = false;
    let mut went_negative_at = None;
    while now < 10_000 {
        now += 50;
        gov.submit_intent(IntentFrame::new(-50, 0, true), now);
        let cmd = gov.tick(now);
        if gov.motion_state().throttle_target > 0.0 {
            saw_positive_target_after_flip = true;
        }
        if cmd.throttle < 0.0 && went_negative_at.is_none() {
            went_negative_at = Some(now);
        }
    }

    assert!(!saw_positive_target_after_flip);
    // 0.5 down at 20%/s takes 2.5 s, then the 200 ms coast window must pass
    let went_negative_at = went_negative_at.expect("never reversed");
    assert!(went_negative_at >= 3_000 + 2_500 + 200);
    assert_abs_diff_eq!(gov.last_command().throttle, -0.5, epsilon = 1e-9);
}

#[test]
fn test_bilge_runs_full_window_after_blip() {
    let config = TugbotConfig::default();
    let mut gov = governor(&config);
    let idle = IntentFrame::new(0, 0, true);

    drive(&mut gov, idle, 0, 1_000);
    gov.engineer_sensors_mut().water_level = 0.25;
    let cmd = drive(&mut gov, idle, 1_000, 1_050);
    assert!(cmd.bilge_pump);

    gov.engineer_sensors_mut().water_level = 0.1;
    let mut now = 1_050;
    while now < 11_000 {
        let cmd = drive(&mut gov, idle, now, now + 50);
        now += 50;
        assert!(cmd.bilge_pump, "bilge stopped at {} ms", now);
    }
    let cmd = drive(&mut gov, idle, now, now + 50);
    assert!(!cmd.bilge_pump);
}

#[test]
fn test_cooling_follows_hysteresis_and_override() {
    let config = TugbotConfig::default();
    let mut gov = governor(&config);
    let idle = IntentFrame::new(0, 0, true);

    gov.engineer_sensors_mut().motor_c = 58.0;
    let cmd = drive(&mut gov, idle, 0, 100);
    assert!(cmd.cooling_pump);
    assert_eq!(cmd.thermal_class, ThermalClass::Normal);

    gov.engineer_sensors_mut().motor_c = 50.0;
    assert!(drive(&mut gov, idle, 100, 2_000).cooling_pump);

    gov.set_cooling_override(PumpControl::Manual(false));
    assert!(!gov.last_command().cooling_pump);
    assert!(!drive(&mut gov, idle, 2_000, 3_000).cooling_pump);

    // Back to automatic: the switch was still on and 50 C is inside the band
    gov.set_cooling_override(PumpControl::Automatic);
    assert!(drive(&mut gov, idle, 3_000, 3_100).cooling_pump);

    gov.engineer_sensors_mut().motor_c = 44.0;
    assert!(!drive(&mut gov, idle, 3_100, 3_200).cooling_pump);
}

#[test]
fn test_link_loss_failsafe() {
    let config = TugbotConfig::default();
    let mut gov = governor(&config);
    let cmd = drive(&mut gov, IntentFrame::new(100, 50, true), 0, 3_000);
    assert!(cmd.link_ok);
    let cruising = cmd.throttle;

    // Frames stop arriving
    let mut now = 3_000;
    let mut lost_at = None;
    while now < 6_000 {
        now += 50;
        let cmd = gov.tick(now);
        if !cmd.link_ok && lost_at.is_none() {
            lost_at = Some(now);
        }
    }
    assert_eq!(lost_at, Some(3_550));
    let cmd = *gov.last_command();
    assert!(cmd.throttle < cruising);
    assert!(cmd.throttle >= 0.0);
    assert_eq!(cmd.rudder_deg, 0.0);
}

#[test]
fn test_demo_scenario_summary() {
    let config = TugbotConfig::default();
    let mut sim = Simulation::new(&config, Scenario::demo(), 20);
    let mut ticks = 0;
    let summary = sim.run_scenario(|_, cmd| {
        ticks += 1;
        assert!((-1.0..=1.0).contains(&cmd.throttle));
    });

    assert_eq!(summary.ticks, ticks);
    assert_eq!(summary.duration_ms, 40_000);
    assert_eq!(summary.worst_energy, EnergyClass::Crit);
    assert_eq!(summary.worst_thermal, ThermalClass::Crit);
    assert_eq!(summary.bilge_triggers, 1);
    assert!(summary.bilge_on_ms >= 10_000);
    assert!(summary.cooling_on_ms > 0);
    assert_eq!(summary.link_lost_ms, 2_500);
    assert!((0.8 - 1e-9..=1.0).contains(&summary.peak_throttle));
    assert_eq!(sim.governor().active_profile(), 2);
}

#[test]
fn test_config_record_feeds_governor() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tugbot.nv");

    let mut tuned = TugbotConfig::default();
    tuned.motion.ramp_up_percent_s = 40.0;
    save(&mut FileNvStore::new(&path), &tuned).unwrap();

    let report = load_or_defaults(&mut FileNvStore::new(&path)).unwrap();
    assert_eq!(report.outcome, LoadOutcome::Loaded);

    let mut gov = governor(&report.config);
    let cmd = drive(&mut gov, IntentFrame::new(100, 0, true), 0, 500);
    assert_abs_diff_eq!(cmd.throttle, 0.2, epsilon = 1e-9);
}
