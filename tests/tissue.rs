use dive_deco_engine::tissue::{calculate_tissue, schreiner, Tissue};
use dive_deco_engine::units::{SURFACE_PRESSURE, WATER_VAPOUR_PRESSURE};
use dive_deco_engine::zhl16::ZHL16B;
use rand::Rng;

#[test]
fn test_schreiner_additivity() {
    let mut rng = rand::rng();
    for _ in 0..200 {
        let abs_p = rng.random_range(1.0..8.0);
        let rate = rng.random_range(-1.0..2.0);
        let p0 = rng.random_range(0.5..3.0);
        let half_life = ZHL16B.n2_half_life[rng.random_range(0..16)];
        let t1 = rng.random_range(1.0..600.0);
        let t2 = rng.random_range(1.0..600.0);

        let whole = schreiner(abs_p, t1 + t2, 0.79, rate, p0, half_life);
        let first = schreiner(abs_p, t1, 0.79, rate, p0, half_life);
        let abs_p_mid = abs_p + rate * t1 / 60.0;
        let split = schreiner(abs_p_mid, t2, 0.79, rate, first, half_life);

        assert!(
            (whole - split).abs() < 1e-6,
            "{} != {} at {} bar, {} bar/min, {}s + {}s",
            whole,
            split,
            abs_p,
            rate,
            t1,
            t2
        );
    }
}

#[test]
fn test_surface_tissue_at_equilibrium() {
    let palv = 0.7902 * (SURFACE_PRESSURE - WATER_VAPOUR_PRESSURE);
    let tissue = Tissue {
        load_n2: palv,
        load_he: 0.0,
    };
    let after = calculate_tissue(
        tissue,
        ZHL16B.n2_half_life[0],
        ZHL16B.he_half_life[0],
        SURFACE_PRESSURE,
        3600.0,
        0.7902,
        0.0,
        0.0,
    );
    assert!((after.load_n2 - palv).abs() < 1e-12);
    assert_eq!(after.load_he, 0.0);
}

#[test]
fn test_descent_loads_less_than_instant_descent() {
    // travelling to 30m loads less than sitting at 30m for the same time
    let tissue = Tissue {
        load_n2: 0.75,
        load_he: 0.0,
    };
    let bottom = SURFACE_PRESSURE + 30.0 * 0.09985;
    let hl = ZHL16B.n2_half_life[0];
    let travel = calculate_tissue(tissue, hl, 1.88, SURFACE_PRESSURE, 90.0, 0.79, 0.0, 2.0 * 0.9985);
    let instant = calculate_tissue(tissue, hl, 1.88, bottom, 90.0, 0.79, 0.0, 0.0);
    assert!(travel.load_n2 > tissue.load_n2);
    assert!(travel.load_n2 < instant.load_n2);
}

#[test]
fn test_helium_only_mix() {
    let tissue = Tissue {
        load_n2: 0.75,
        load_he: 0.0,
    };
    let after = calculate_tissue(tissue, 5.0, 1.88, 4.0, 600.0, 0.0, 0.8, 0.0);
    assert!(after.load_n2 < tissue.load_n2);
    assert!(after.load_he > 0.0);
}
