use dive_deco_engine::{DecoTable, Engine, EngineConfig, Phase, StepObserver, Units};

#[test]
fn test_table_matches_stop_steps() {
    let mut engine = Engine::new(EngineConfig::default()).unwrap();
    engine.add_gas(0, 21, 0).unwrap();
    engine.add_gas(21, 50, 0).unwrap();

    let mut table = engine.deco_table();
    let mut profile = engine.calculate(40.0, 35.0).unwrap().observe(&mut table);
    for step in profile.by_ref() {
        step.unwrap();
    }
    let steps = profile.history().to_vec();
    drop(profile);

    let stop_minutes: u32 = steps
        .iter()
        .filter(|s| s.phase == Phase::DecoStop)
        .map(|s| ((s.time - steps[s.prev.unwrap()].time) / 60.0).round() as u32)
        .sum();
    assert_eq!(table.total(), stop_minutes);

    let stops = table.stops();
    assert!(!stops.is_empty());
    assert!(stops.windows(2).all(|w| w[0].depth > w[1].depth));
    assert!(stops.iter().all(|s| s.depth % 3 == 0 && s.time > 0));
}

#[test]
fn test_table_ignores_other_phases() {
    let mut engine = Engine::default();
    engine.add_gas(0, 21, 0).unwrap();
    let mut table = DecoTable::new(Units::new(engine.units().surface_pressure));

    let steps: Vec<_> = engine.calculate(15.0, 20.0).unwrap().map(|s| s.unwrap()).collect();
    for (i, step) in steps.iter().enumerate() {
        table.observe(step, &steps[..i]).unwrap();
    }
    assert_eq!(table.total(), 0);
    assert_eq!(table.first(), None);
}
