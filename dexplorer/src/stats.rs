//! Base stat arithmetic: in-battle stat scenarios, totals and weight tiers.

use serde::{Deserialize, Serialize};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 100;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSet {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub special_attack: u16,
    pub special_defense: u16,
    pub speed: u16,
}

impl StatSet {
    pub fn values(&self) -> [u16; 6] {
        [
            self.hp,
            self.attack,
            self.defense,
            self.special_attack,
            self.special_defense,
            self.speed,
        ]
    }

    pub fn total(&self) -> u32 {
        self.values().iter().map(|value| *value as u32).sum()
    }

    /// Product of the stats, skipping zeroes so a missing stat does not
    /// collapse the whole product.
    pub fn product(&self) -> u64 {
        self.values()
            .iter()
            .filter(|value| **value > 0)
            .fold(1u64, |acc, value| acc * *value as u64)
    }
}

/// The four fixed scenarios shown next to the base stats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedStats {
    pub min: StatSet,
    pub base: StatSet,
    pub max: StatSet,
    pub max_plus: StatSet,
}

#[derive(Clone, Copy, Debug)]
struct Scenario {
    iv: u32,
    ev: u32,
    nature: f64,
}

const MIN_SCENARIO: Scenario = Scenario {
    iv: 0,
    ev: 0,
    nature: 0.9,
};
const BASE_SCENARIO: Scenario = Scenario {
    iv: 31,
    ev: 0,
    nature: 1.0,
};
const MAX_SCENARIO: Scenario = Scenario {
    iv: 31,
    ev: 252,
    nature: 1.0,
};
const MAX_PLUS_SCENARIO: Scenario = Scenario {
    iv: 31,
    ev: 252,
    nature: 1.1,
};

pub fn calculate_stats(base: &StatSet, level: u8) -> CalculatedStats {
    CalculatedStats {
        min: scenario_stats(base, level, MIN_SCENARIO),
        base: scenario_stats(base, level, BASE_SCENARIO),
        max: scenario_stats(base, level, MAX_SCENARIO),
        max_plus: scenario_stats(base, level, MAX_PLUS_SCENARIO),
    }
}

fn scenario_stats(base: &StatSet, level: u8, scenario: Scenario) -> StatSet {
    let level = level as u32;
    let other = |value: u16| other_stat(value as u32, level, scenario);
    StatSet {
        hp: hp_stat(base.hp as u32, level, scenario),
        attack: other(base.attack),
        defense: other(base.defense),
        special_attack: other(base.special_attack),
        special_defense: other(base.special_defense),
        speed: other(base.speed),
    }
}

fn scaled(base: u32, level: u32, scenario: Scenario) -> u32 {
    ((2 * base + scenario.iv + scenario.ev / 4) * level) / 100
}

fn hp_stat(base: u32, level: u32, scenario: Scenario) -> u16 {
    // Single-HP species stay at 1 regardless of investment.
    if base == 1 {
        return 1;
    }
    (scaled(base, level, scenario) + level + 10) as u16
}

fn other_stat(base: u32, level: u32, scenario: Scenario) -> u16 {
    let raw = scaled(base, level, scenario) + 5;
    (raw as f64 * scenario.nature).floor() as u16
}

pub fn clamp_level(level: i32) -> u8 {
    level.clamp(MIN_LEVEL as i32, MAX_LEVEL as i32) as u8
}

/// Base power of Grass Knot against a target of the given weight.
pub fn grass_knot_power(weight_kg: f32) -> u8 {
    if weight_kg < 10.0 {
        20
    } else if weight_kg < 25.0 {
        40
    } else if weight_kg < 50.0 {
        60
    } else if weight_kg < 100.0 {
        80
    } else if weight_kg < 200.0 {
        100
    } else {
        120
    }
}

/// `ratio` is the female chance in eighths, or -1 for genderless species.
pub fn gender_ratio_label(ratio: i8) -> String {
    if ratio < 0 {
        return "Genderless".to_string();
    }
    let female = ratio as f32 / 8.0 * 100.0;
    let male = 100.0 - female;
    format!("♂ {male}% / ♀ {female}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn garchomp() -> StatSet {
        StatSet {
            hp: 108,
            attack: 130,
            defense: 95,
            special_attack: 80,
            special_defense: 85,
            speed: 102,
        }
    }

    #[test]
    fn level_100_scenarios_match_known_values() {
        let stats = calculate_stats(&garchomp(), 100);
        assert_eq!(stats.base.hp, 357);
        assert_eq!(stats.max.hp, 420);
        assert_eq!(stats.max.attack, 359);
        assert_eq!(stats.max_plus.attack, 394);
        assert_eq!(stats.min.attack, 238);
        assert_eq!(stats.min.hp, 326);
    }

    #[test]
    fn level_50_uses_floor_at_each_step() {
        let stats = calculate_stats(&garchomp(), 50);
        // ((216 + 31) * 50) / 100 = 123 (floored from 123.5), + 60
        assert_eq!(stats.base.hp, 183);
        // (((260 + 31 + 63) * 50) / 100 + 5) * 1.1 = 182 * 1.1 = 200.2
        assert_eq!(stats.max_plus.attack, 200);
    }

    #[test]
    fn single_hp_species_always_has_one_hp() {
        let shedinja = StatSet {
            hp: 1,
            attack: 90,
            defense: 45,
            special_attack: 30,
            special_defense: 30,
            speed: 40,
        };
        for level in MIN_LEVEL..=MAX_LEVEL {
            let stats = calculate_stats(&shedinja, level);
            for scenario in [stats.min, stats.base, stats.max, stats.max_plus] {
                assert_eq!(scenario.hp, 1, "level {level}");
            }
        }
    }

    #[test]
    fn calculation_is_deterministic() {
        let base = garchomp();
        assert_eq!(calculate_stats(&base, 37), calculate_stats(&base, 37));
    }

    #[test]
    fn stats_never_decrease_with_level() {
        let base = garchomp();
        let mut previous = calculate_stats(&base, MIN_LEVEL);
        for level in (MIN_LEVEL + 1)..=MAX_LEVEL {
            let current = calculate_stats(&base, level);
            let pairs = [
                (previous.min, current.min),
                (previous.base, current.base),
                (previous.max, current.max),
                (previous.max_plus, current.max_plus),
            ];
            for (before, after) in pairs {
                for (lower, higher) in before.values().iter().zip(after.values().iter()) {
                    assert!(lower <= higher, "level {level}: {lower} > {higher}");
                }
            }
            previous = current;
        }
    }

    #[test]
    fn total_and_product_skip_zero() {
        let stats = StatSet {
            hp: 45,
            attack: 49,
            defense: 49,
            special_attack: 65,
            special_defense: 65,
            speed: 45,
        };
        assert_eq!(stats.total(), 318);
        assert_eq!(stats.product(), 45u64 * 49 * 49 * 65 * 65 * 45);

        let with_zero = StatSet { speed: 0, ..stats };
        assert_eq!(with_zero.product(), 45u64 * 49 * 49 * 65 * 65);
    }

    #[test]
    fn grass_knot_tiers() {
        assert_eq!(grass_knot_power(9.9), 20);
        assert_eq!(grass_knot_power(10.0), 40);
        assert_eq!(grass_knot_power(24.9), 40);
        assert_eq!(grass_knot_power(25.0), 60);
        assert_eq!(grass_knot_power(99.9), 80);
        assert_eq!(grass_knot_power(199.9), 100);
        assert_eq!(grass_knot_power(200.0), 120);
    }

    #[test]
    fn level_is_clamped() {
        assert_eq!(clamp_level(0), 1);
        assert_eq!(clamp_level(-5), 1);
        assert_eq!(clamp_level(55), 55);
        assert_eq!(clamp_level(250), 100);
    }

    #[test]
    fn gender_labels() {
        assert_eq!(gender_ratio_label(-1), "Genderless");
        assert_eq!(gender_ratio_label(1), "♂ 87.5% / ♀ 12.5%");
        assert_eq!(gender_ratio_label(8), "♂ 0% / ♀ 100%");
    }
}
