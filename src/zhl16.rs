//! Bühlmann ZH-L16 coefficient tables.
//!
//! The B and C variants share half-lives and helium coefficients and differ
//! only in the nitrogen `a` coefficients of the middle compartments. C is the
//! more conservative table.

pub const NUM_COMPARTMENTS: usize = 16;

/// Half-lives and `a`/`b` coefficients of one ZH-L16 variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientTable {
    pub name: &'static str,
    /// minutes
    pub n2_half_life: [f64; NUM_COMPARTMENTS],
    /// minutes
    pub he_half_life: [f64; NUM_COMPARTMENTS],
    pub n2_a: [f64; NUM_COMPARTMENTS],
    pub n2_b: [f64; NUM_COMPARTMENTS],
    pub he_a: [f64; NUM_COMPARTMENTS],
    pub he_b: [f64; NUM_COMPARTMENTS],
}

const N2_HALF_LIFE: [f64; NUM_COMPARTMENTS] = [
    5.0, 8.0, 12.5, 18.5, 27.0, 38.3, 54.3, 77.0, 109.0, 146.0, 187.0, 239.0, 305.0, 390.0, 498.0,
    635.0,
];

const HE_HALF_LIFE: [f64; NUM_COMPARTMENTS] = [
    1.88, 3.02, 4.72, 6.99, 10.21, 14.48, 20.53, 29.11, 41.20, 55.19, 70.69, 90.34, 115.29, 147.42,
    188.24, 240.03,
];

const N2_B: [f64; NUM_COMPARTMENTS] = [
    0.5578, 0.6514, 0.7222, 0.7825, 0.8126, 0.8434, 0.8693, 0.8910, 0.9092, 0.9222, 0.9319, 0.9403,
    0.9477, 0.9544, 0.9602, 0.9653,
];

const HE_A: [f64; NUM_COMPARTMENTS] = [
    1.6189, 1.3830, 1.1919, 1.0458, 0.9220, 0.8205, 0.7305, 0.6502, 0.5950, 0.5545, 0.5333, 0.5189,
    0.5181, 0.5176, 0.5172, 0.5119,
];

const HE_B: [f64; NUM_COMPARTMENTS] = [
    0.4770, 0.5747, 0.6527, 0.7223, 0.7582, 0.7957, 0.8279, 0.8553, 0.8757, 0.8903, 0.8997, 0.9073,
    0.9122, 0.9171, 0.9217, 0.9267,
];

pub const ZHL16B: CoefficientTable = CoefficientTable {
    name: "ZH-L16B-GF",
    n2_half_life: N2_HALF_LIFE,
    he_half_life: HE_HALF_LIFE,
    n2_a: [
        1.1696, 1.0000, 0.8618, 0.7562, 0.6667, 0.5600, 0.4947, 0.4500, 0.4187, 0.3798, 0.3497,
        0.3223, 0.2850, 0.2737, 0.2523, 0.2327,
    ],
    n2_b: N2_B,
    he_a: HE_A,
    he_b: HE_B,
};

pub const ZHL16C: CoefficientTable = CoefficientTable {
    name: "ZH-L16C-GF",
    n2_half_life: N2_HALF_LIFE,
    he_half_life: HE_HALF_LIFE,
    n2_a: [
        1.1696, 1.0000, 0.8618, 0.7562, 0.6200, 0.5043, 0.4410, 0.4000, 0.3750, 0.3500, 0.3295,
        0.3065, 0.2835, 0.2610, 0.2480, 0.2327,
    ],
    n2_b: N2_B,
    he_a: HE_A,
    he_b: HE_B,
};

#[test]
fn test_tables_differ_only_in_n2_a() {
    assert_eq!(ZHL16B.n2_b, ZHL16C.n2_b);
    assert_eq!(ZHL16B.he_a, ZHL16C.he_a);
    assert_ne!(ZHL16B.n2_a, ZHL16C.n2_a);
    for i in 0..NUM_COMPARTMENTS {
        assert!(ZHL16C.n2_a[i] <= ZHL16B.n2_a[i]);
    }
}
