//! Damage pipeline. A pure function set: attack/defense clamping,
//! type-effectiveness chaining across a defender's type list, the crit
//! check and multiplier, the volatility band, and the accuracy gate.

use crate::capabilities::{MonType, TypeCalculator};
use crate::primitives::{CRIT_DENOM, CRIT_NUM};

/// Attack/defense are clamped to at least 1 before entering the formula —
/// a boosted-to-zero-or-negative stat must never divide/multiply damage to
/// zero or flip its sign.
fn clamp_stat(value: i32) -> u32 {
    value.max(1) as u32
}

/// Crit-rate stage door: each stage raises the chance until stage 3
/// guarantees a hit.
fn crit_probability(crit_rate_stage: u32) -> (u32, u32) {
    match crit_rate_stage {
        0 => (1, 24),
        1 => (1, 8),
        2 => (1, 2),
        _ => (1, 1),
    }
}

/// `rng_byte` is a single byte drawn from the battle's `Rng` capability;
/// the pipeline only ever needs 0..=255 of entropy per sub-decision.
pub fn check_critical(crit_rate_stage: u32, rng_byte: u8) -> bool {
    let (num, den) = crit_probability(crit_rate_stage);
    (u32::from(rng_byte) * den) < (num * 256)
}

/// Accuracy gate: `accuracy` is a percentage in 0..=100.
pub fn check_accuracy(accuracy: u8, rng_byte: u8) -> bool {
    u32::from(rng_byte) * 100 < u32::from(accuracy) * 256
}

/// Random volatility factor: a percentage in `[100 - volatility, 100 + volatility]`.
fn volatility_factor(volatility: u32, rng_byte: u8) -> u32 {
    let band = volatility.min(100);
    let modulus = 2 * band + 1;
    let offset = u32::from(rng_byte) % modulus;
    100 - band + offset
}

/// Chains type effectiveness across every one of the defender's types
/// (dual-type stacking, e.g. 2x * 0.5x = 1x).
pub fn chain_effectiveness(
    calc: &dyn TypeCalculator,
    move_type: MonType,
    defender_types: &[MonType],
    base_power: u32,
) -> u32 {
    defender_types
        .iter()
        .fold(base_power, |power, &defender_type| {
            calc.scale_power(move_type, defender_type, power)
        })
}

pub struct DamageInput {
    pub attack: i32,
    pub defense: i32,
    pub power: u32,
    pub crit_rate_stage: u32,
    pub volatility: u32,
    pub rng_byte: u8,
}

pub struct DamageOutput {
    pub amount: u32,
    pub critical: bool,
}

/// Computes final damage from a power value that already has type
/// effectiveness and STAB folded in (via `chain_effectiveness` upstream).
pub fn calculate_damage(input: DamageInput) -> DamageOutput {
    let attack = clamp_stat(input.attack);
    let defense = clamp_stat(input.defense);
    let critical = check_critical(input.crit_rate_stage, input.rng_byte);

    let base = (attack * input.power) / defense.max(1);
    let with_volatility = base * volatility_factor(input.volatility, input.rng_byte) / 100;
    let amount = if critical {
        with_volatility * CRIT_NUM / CRIT_DENOM
    } else {
        with_volatility
    };

    DamageOutput {
        amount: amount.max(1),
        critical,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedEffectiveness(u32);
    impl TypeCalculator for FixedEffectiveness {
        fn scale_power(&self, _move_type: MonType, _defender_type: MonType, base_power: u32) -> u32 {
            base_power * self.0 / 100
        }
    }

    #[test]
    fn clamp_stat_never_goes_below_one() {
        assert_eq!(clamp_stat(-5), 1);
        assert_eq!(clamp_stat(0), 1);
        assert_eq!(clamp_stat(40), 40);
    }

    #[test]
    fn dual_type_effectiveness_chains_multiplicatively() {
        let calc = FixedEffectiveness(200); // 2x per type
        let out = chain_effectiveness(&calc, MonType(0), &[MonType(1), MonType(2)], 100);
        assert_eq!(out, 400); // 100 * 2 * 2
    }

    #[test]
    fn crit_stage_three_is_guaranteed() {
        assert!(check_critical(3, 0));
        assert!(check_critical(3, 255));
    }

    #[test]
    fn damage_is_never_reported_as_zero() {
        let out = calculate_damage(DamageInput {
            attack: 1,
            defense: 1000,
            power: 1,
            crit_rate_stage: 0,
            volatility: 15,
            rng_byte: 0,
        });
        assert!(out.amount >= 1);
    }

    #[test]
    fn volatility_band_spans_plus_minus_volatility_percent() {
        for b in 0u8..=255 {
            let f = volatility_factor(15, b);
            assert!((85..=115).contains(&f));
        }
    }
}
