//! Unit tests for the approximate FP8 multiplier.

use fp8_mac::common::{Fp8Format, ZERO_WORD};
use fp8_mac::core::units::codec::FormatCodec;
use fp8_mac::core::units::multiplier::ApproxMultiplier;
use fp8_mac::core::units::reference::ReferenceMultiplier;

/// Tests 1.0 * 1.0 in every practical format.
#[test]
fn test_multiplier_unit_product() {
    assert_eq!(ApproxMultiplier::multiply(0x20, 0x20, Fp8Format::E2M5), 0x20);
    assert_eq!(ApproxMultiplier::multiply(0x30, 0x30, Fp8Format::E3M4), 0x30);
    assert_eq!(ApproxMultiplier::multiply(0x38, 0x38, Fp8Format::E4M3), 0x38);
    assert_eq!(ApproxMultiplier::multiply(0x3C, 0x3C, Fp8Format::E5M2), 0x3C);
}

/// Tests products of powers of two, which the field add gets exactly right.
#[test]
fn test_multiplier_powers_of_two_exact() {
    let fmt = Fp8Format::E3M4;
    let two = FormatCodec::from_f64(2.0, fmt);
    let half = FormatCodec::from_f64(0.5, fmt);
    let four = FormatCodec::from_f64(4.0, fmt);

    assert_eq!(ApproxMultiplier::multiply(two, two, fmt), four);
    assert_eq!(ApproxMultiplier::multiply(two, half, fmt), 0x30);
}

/// Tests that the mantissa cross term is dropped: 1.5 * 1.5 gives 2.0.
#[test]
fn test_multiplier_is_approximate() {
    let fmt = Fp8Format::E3M4;
    let product = ApproxMultiplier::multiply(0x38, 0x38, fmt);
    assert_eq!(product, 0x40);
    assert_eq!(FormatCodec::to_f64(product, fmt), 2.0);
}

/// Tests that the 7-bit add wraps and the bias subtraction wraps back.
#[test]
fn test_multiplier_field_add_wraps() {
    let fmt = Fp8Format::E3M4;
    // 0x40 + 0x48 = 0x88 -> 0x08; 0x08 - 0x30 -> 0x58 (6.0).
    assert_eq!(ApproxMultiplier::multiply(0x40, 0x48, fmt), 0x58);

    // Overflowing magnitudes wrap instead of saturating.
    assert_eq!(ApproxMultiplier::multiply(0x7F, 0x7F, fmt), 0x4E);

    // Tiny magnitudes wrap below zero.
    assert_eq!(ApproxMultiplier::multiply(0x01, 0x01, fmt), 0x52);
}

/// Tests that the product sign is the XOR of the operand signs.
#[test]
fn test_multiplier_sign_is_xor() {
    for fmt in Fp8Format::ALL {
        for x in 0..=255u8 {
            for y in 0..=255u8 {
                if FormatCodec::is_zero_operand(x, fmt) || FormatCodec::is_zero_operand(y, fmt) {
                    continue;
                }
                let p = ApproxMultiplier::multiply(x, y, fmt);
                assert_eq!(p >> 7, (x ^ y) >> 7, "{} {:#04x}*{:#04x}", fmt, x, y);
            }
        }
    }
}

/// Tests that any zero operand, of either sign, yields the canonical zero.
#[test]
fn test_multiplier_zero_operand() {
    for fmt in Fp8Format::ALL {
        for w in 0..=255u8 {
            assert_eq!(ApproxMultiplier::multiply(ZERO_WORD, w, fmt), ZERO_WORD);
            assert_eq!(ApproxMultiplier::multiply(w, ZERO_WORD, fmt), ZERO_WORD);
            assert_eq!(ApproxMultiplier::multiply(0x80, w, fmt), ZERO_WORD);
            assert_eq!(ApproxMultiplier::multiply(w, 0x80, fmt), ZERO_WORD);
        }
    }
}

/// Tests the stage-1 register contents.
#[test]
fn test_multiplier_stage1() {
    let fmt = Fp8Format::E3M4;
    let s1 = ApproxMultiplier::stage1(0xB8, 0x38, fmt);
    assert!(!s1.zero);
    assert!(s1.sign);
    assert_eq!(s1.sum7, 0x70);

    let s1 = ApproxMultiplier::stage1(0x00, 0x38, fmt);
    assert!(s1.zero);
    assert_eq!(ApproxMultiplier::stage2(s1, fmt), ZERO_WORD);
}

/// Tests that a clocked product appears after two edges.
#[test]
fn test_multiplier_two_cycle_latency() {
    let fmt = Fp8Format::E3M4;
    let mut mul = ApproxMultiplier::new(fmt);

    mul.clock(0x40, 0x48);
    assert_eq!(mul.product(), ZERO_WORD);

    mul.clock(0x00, 0x00);
    assert_eq!(mul.product(), 0x58);

    mul.clock(0x00, 0x00);
    assert_eq!(mul.product(), ZERO_WORD);
}

/// Tests that back-to-back operands stream through one per edge.
#[test]
fn test_multiplier_streams_operands() {
    let fmt = Fp8Format::E2M5;
    let mut mul = ApproxMultiplier::new(fmt);
    let pairs = [(0x20, 0x20), (0x40, 0x20), (0xA0, 0x40), (0x00, 0x3F)];

    let mut seen = Vec::new();
    for &(x, y) in pairs.iter().chain([(0, 0), (0, 0)].iter()) {
        mul.clock(x, y);
        seen.push(mul.product());
    }

    let expected: Vec<u8> = pairs
        .iter()
        .map(|&(x, y)| ApproxMultiplier::multiply(x, y, fmt))
        .collect();
    assert_eq!(&seen[1..5], expected.as_slice());
}

/// Tests that reset clears both stage registers.
#[test]
fn test_multiplier_reset() {
    let mut mul = ApproxMultiplier::new(Fp8Format::E3M4);
    mul.clock(0x30, 0x30);
    mul.clock(0x30, 0x30);
    assert_ne!(mul.product(), 0);

    mul.reset();
    assert_eq!(mul.product(), 0);
    assert_eq!(mul.stage1_latch().sum7, 0);
    mul.clock(0, 0);
    assert_eq!(mul.product(), 0);
}

/// Tests the exact reference multiplier, including rounding and saturation.
#[test]
fn test_reference_exact_multiplier() {
    let fmt = Fp8Format::E3M4;
    assert_eq!(ReferenceMultiplier::exact_value(0x38, 0x38, fmt), 2.25);
    assert_eq!(ReferenceMultiplier::exact(0x38, 0x38, fmt), 0x42);
    assert_eq!(ReferenceMultiplier::exact(0xB8, 0x38, fmt), 0xC2);
    assert_eq!(ReferenceMultiplier::exact(0x00, 0x38, fmt), ZERO_WORD);
    // 8.0 * 8.0 is past the largest magnitude, 15.5.
    assert_eq!(ReferenceMultiplier::exact(0x60, 0x60, fmt), 0x7F);
    // Subnormal 0.125 * 1.0.
    assert_eq!(ReferenceMultiplier::exact_value(0x08, 0x30, fmt), 0.125);
}

/// Tests the weight of the linear multiplier's constant term per format.
#[test]
fn test_reference_linear_offset_bits() {
    assert_eq!(ReferenceMultiplier::linear_offset_bits(Fp8Format::E1M6), 4);
    assert_eq!(ReferenceMultiplier::linear_offset_bits(Fp8Format::E2M5), 4);
    assert_eq!(ReferenceMultiplier::linear_offset_bits(Fp8Format::E3M4), 3);
    assert_eq!(ReferenceMultiplier::linear_offset_bits(Fp8Format::E4M3), 3);
    assert_eq!(ReferenceMultiplier::linear_offset_bits(Fp8Format::E5M2), 2);
}

/// Tests the linear multiplier: 1.0 * 1.0 picks up the constant term.
#[test]
fn test_reference_linear_multiplier() {
    assert_eq!(ReferenceMultiplier::linear(0x30, 0x30, Fp8Format::E3M4), 0x32);
    assert_eq!(ReferenceMultiplier::linear(0x20, 0x20, Fp8Format::E2M5), 0x22);
    assert_eq!(ReferenceMultiplier::linear(0x3C, 0x3C, Fp8Format::E5M2), 0x3D);

    let fmt = Fp8Format::E3M4;
    assert_eq!(ReferenceMultiplier::linear_value(0x38, 0xB8, fmt), -2.125);
    assert_eq!(ReferenceMultiplier::linear(0x38, 0x38, fmt), 0x41);
    assert_eq!(ReferenceMultiplier::linear(0x80, 0x38, fmt), ZERO_WORD);
    // Subnormal 0.125 reads as (1 - 0.5) * 2^-2.
    assert_eq!(ReferenceMultiplier::linear_value(0x08, 0x30, fmt), 0.15625);
}

/// Tests that the three multipliers order as expected on 1.5 * 1.5.
#[test]
fn test_reference_multipliers_bracket_approximate() {
    let fmt = Fp8Format::E3M4;
    let approx = FormatCodec::to_f64(ApproxMultiplier::multiply(0x38, 0x38, fmt), fmt);
    let linear = FormatCodec::to_f64(ReferenceMultiplier::linear(0x38, 0x38, fmt), fmt);
    let exact = FormatCodec::to_f64(ReferenceMultiplier::exact(0x38, 0x38, fmt), fmt);
    assert!(approx < linear && linear < exact);
}
