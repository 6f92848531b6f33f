use aviation_figures::fuel::{EstimatorSettings, FuelError, FuelEstimator, FuelModel, Mission};

fn a320_mission() -> Mission {
    Mission::new(55_912.87, 177, 110.0, 6654.0).unwrap()
}

#[test]
fn trajectory_increases_and_settles() {
    let est = FuelEstimator::with_settings(EstimatorSettings::fixed(10))
        .estimate(&a320_mission())
        .unwrap();

    assert_eq!(est.trajectory.len(), 10);
    assert!(est.trajectory.windows(2).all(|w| w[1] > w[0]));

    let steps = est.increments();
    assert!(steps.windows(2).all(|w| w[1] < w[0]), "{steps:?}");
}

#[test]
fn converged_value_is_a_fixed_point() {
    let mission = a320_mission();
    let est = FuelEstimator::default().estimate(&mission).unwrap();
    assert!(est.converged);

    let again = FuelModel::default().fuel_mass(mission.total_mass(est.fuel_mass), mission.distance);
    assert!(((again - est.fuel_mass) / est.fuel_mass).abs() < 1e-8);
    assert!((est.breakdown.total() - again).abs() < 1e-6);
}

#[test]
fn tolerance_run_matches_long_fixed_run() {
    let mission = a320_mission();
    let tol = FuelEstimator::default().estimate(&mission).unwrap();
    let fixed = FuelEstimator::with_settings(EstimatorSettings::fixed(50))
        .estimate(&mission)
        .unwrap();
    assert!(tol.iterations < 50);
    assert!((tol.fuel_mass - fixed.fuel_mass).abs() < 1e-3);
    assert!(fixed.converged);
}

#[test]
fn zero_distance_leaves_ground_phases_only() {
    let model = FuelModel::default();
    let mass = 75_000.0;
    let b = model.breakdown(mass, 0.0);
    assert_eq!(b.cruise, 0.0);
    assert_eq!(b.reserve, 0.0);
    let expected = model.takeoff_landing_a * mass.powf(model.takeoff_landing_b)
        + model.climb_descent_a * mass.powf(model.climb_descent_b);
    assert!((model.fuel_mass(mass, 0.0) - expected).abs() < 1e-9);
}

#[test]
fn longer_missions_need_more_fuel() {
    let estimator = FuelEstimator::default();
    let fuel = |km: f64| {
        estimator
            .estimate(&Mission::new(55_912.87, 177, 110.0, km).unwrap())
            .unwrap()
            .fuel_mass
    };
    assert!(fuel(500.0) < fuel(2000.0));
    assert!(fuel(2000.0) < fuel(6654.0));
}

#[test]
fn invalid_missions_are_rejected() {
    let cases = [
        Mission::new(55_912.87, 0, 110.0, 6654.0),
        Mission::new(55_912.87, 177, 110.0, 0.0),
        Mission::new(55_912.87, 177, 110.0, -10.0),
        Mission::new(0.0, 177, 110.0, 6654.0),
        Mission::new(55_912.87, 177, -1.0, 6654.0),
        Mission::new(f64::NAN, 177, 110.0, 6654.0),
    ];
    for case in cases {
        assert!(matches!(case, Err(FuelError::InvalidInput { .. })), "{case:?}");
    }
}

#[test]
fn zero_iterations_rejected() {
    let err = FuelEstimator::with_settings(EstimatorSettings::fixed(0))
        .estimate(&a320_mission())
        .unwrap_err();
    assert!(err.to_string().contains("max_iterations"));
}

#[test]
fn json_report_carries_trajectory() {
    let est = FuelEstimator::with_settings(EstimatorSettings::fixed(3))
        .estimate(&a320_mission())
        .unwrap();
    let value = serde_json::to_value(&est).unwrap();
    assert_eq!(value["iterations"], 3);
    assert_eq!(value["trajectory"].as_array().unwrap().len(), 3);
    assert_eq!(value["mission"]["passengers"], 177);
}
