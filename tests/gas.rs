use dive_deco_engine::{ConfigError, DecoError, Engine};

fn config_error(engine: &Engine, depth: f64) -> Option<ConfigError> {
    match engine.calculate(depth, 30.0) {
        Err(DecoError::Configuration(e)) => Some(e),
        Err(e) => panic!("unexpected error {:?}", e),
        Ok(_) => None,
    }
}

#[test]
fn test_no_gas() {
    let engine = Engine::default();
    assert_eq!(config_error(&engine, 30.0), Some(ConfigError::NoGas));
}

#[test]
fn test_travel_gas_only() {
    let mut engine = Engine::default();
    engine.add_travel_gas(0, 21, 0).unwrap();
    assert_eq!(config_error(&engine, 30.0), Some(ConfigError::NoBottomGas));
}

#[test]
fn test_bottom_gas_must_start_at_surface() {
    let mut engine = Engine::default();
    engine.add_gas(10, 21, 0).unwrap();
    assert_eq!(
        config_error(&engine, 30.0),
        Some(ConfigError::BottomGasNotAtSurface { depth: 10 })
    );

    engine.add_travel_gas(0, 32, 0).unwrap();
    assert_eq!(config_error(&engine, 30.0), None);
}

#[test]
fn test_duplicate_travel_gas_depth() {
    let mut engine = Engine::default();
    engine.add_travel_gas(0, 21, 0).unwrap();
    engine.add_travel_gas(0, 32, 0).unwrap();
    engine.add_gas(30, 18, 45).unwrap();
    assert_eq!(
        config_error(&engine, 60.0),
        Some(ConfigError::DuplicateTravelGasDepth { depth: 0 })
    );
}

#[test]
fn test_duplicate_deco_gas_depth() {
    let mut engine = Engine::default();
    engine.add_gas(0, 21, 0).unwrap();
    engine.add_gas(21, 50, 0).unwrap();
    engine.add_gas(21, 80, 0).unwrap();
    assert_eq!(
        config_error(&engine, 40.0),
        Some(ConfigError::DuplicateDecoGasDepth { depth: 21 })
    );
}

#[test]
fn test_deco_gas_at_surface() {
    let mut engine = Engine::default();
    engine.add_gas(0, 21, 0).unwrap();
    engine.add_gas(0, 50, 0).unwrap();
    assert_eq!(config_error(&engine, 40.0), Some(ConfigError::DecoGasAtSurface));
}

#[test]
fn test_gas_deeper_than_dive() {
    let mut engine = Engine::default();
    engine.add_gas(0, 21, 0).unwrap();
    engine.add_gas(40, 50, 0).unwrap();
    assert_eq!(
        config_error(&engine, 35.0),
        Some(ConfigError::GasDeeperThanDive {
            depth: 40,
            max_depth: 35.0
        })
    );

    let mut engine = Engine::default();
    engine.add_travel_gas(0, 21, 0).unwrap();
    engine.add_travel_gas(45, 18, 30).unwrap();
    engine.add_gas(30, 18, 45).unwrap();
    assert_eq!(
        config_error(&engine, 40.0),
        Some(ConfigError::GasDeeperThanDive {
            depth: 45,
            max_depth: 40.0
        })
    );
}

#[test]
fn test_invalid_mix() {
    let mut engine = Engine::default();
    assert_eq!(
        engine.add_gas(0, 0, 0),
        Err(DecoError::Configuration(ConfigError::InvalidGasMix { o2: 0, he: 0 }))
    );
    assert!(engine.gases().is_empty());
}

#[test]
fn test_clear_gases() {
    let mut engine = Engine::default();
    engine.add_gas(0, 21, 0).unwrap();
    engine.clear_gases();
    assert_eq!(config_error(&engine, 30.0), Some(ConfigError::NoGas));
}
