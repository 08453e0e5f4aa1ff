use crate::tissue::{Tissue, TissueState};
use crate::zhl16::{CoefficientTable, NUM_COMPARTMENTS};

/// Buhlmann tolerated ambient pressure of one compartment, scaled by a
/// gradient factor.
///
/// Nitrogen and helium coefficients are weighted by each gas' share of the
/// compartment inert gas pressure. The compartment must carry some inert gas.
#[inline(never)]
pub fn gf_limit(gf: f64, tissue: Tissue, an2: f64, bn2: f64, ahe: f64, bhe: f64) -> f64 {
    assert!(gf > 0.0 && gf <= 1.5, "gradient factor {} out of range", gf);
    let pn2 = tissue.load_n2;
    let phe = tissue.load_he;

    let p_total = pn2 + phe;
    let a = (an2 * pn2 + ahe * phe) / p_total;
    let b = (bn2 * pn2 + bhe * phe) / p_total;

    (p_total - a * gf) / (gf / b + 1.0 - gf)
}

/// Ceiling of the whole tissue state as absolute pressure, with the
/// leading compartment index.
#[inline(never)]
pub fn max_ceiling(table: &CoefficientTable, gf: f64, tissues: &TissueState) -> (f64, usize) {
    let mut max_ceiling = f64::MIN;
    let mut tissue_index = 0;
    for i in 0..NUM_COMPARTMENTS {
        let tentative_max_ceiling = gf_limit(
            gf,
            tissues[i],
            table.n2_a[i],
            table.n2_b[i],
            table.he_a[i],
            table.he_b[i],
        );
        if tentative_max_ceiling > max_ceiling {
            max_ceiling = tentative_max_ceiling;
            tissue_index = i;
        }
    }
    (max_ceiling, tissue_index)
}

#[test]
fn test_gf_limit_full_m_value() {
    // at gf 1 the limit is the pressure whose M-value equals the load
    let tissue = Tissue {
        load_n2: 3.11,
        load_he: 0.0,
    };
    let (a, b) = (1.0, 0.6514);
    let limit = gf_limit(1.0, tissue, a, b, 1.383, 0.5747);
    assert!(libm::fabs(limit / b + a - 3.11) < 1e-12);
}

#[test]
fn test_gf_limit_he_only_uses_he_coefficients() {
    let he = Tissue {
        load_n2: 0.0,
        load_he: 2.0,
    };
    let n2 = Tissue {
        load_n2: 2.0,
        load_he: 0.0,
    };
    let mixed = gf_limit(0.8, he, 1.1696, 0.5578, 1.6189, 0.4770);
    let pure = gf_limit(0.8, n2, 1.6189, 0.4770, 0.0, 1.0);
    assert!(libm::fabs(mixed - pure) < 1e-12);
}

#[test]
#[should_panic]
fn test_gf_limit_rejects_zero_gf() {
    let tissue = Tissue {
        load_n2: 3.0,
        load_he: 0.0,
    };
    gf_limit(0.0, tissue, 1.0, 0.6514, 1.383, 0.5747);
}
