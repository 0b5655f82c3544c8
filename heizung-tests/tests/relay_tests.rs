//! Integration Tests für das Relais-Muster
//!
//! Diese Tests laufen auf dem Host (x86_64) und prüfen alle
//! Kombinationen aus Heizstufe und PWM-Phase.

use heizung_core::{
    ControlRequest, HeaterLevel, NUM_HEATER_LEVELS, PWM_PERIOD, RelayMask, heater_pattern,
    relay_pattern,
};

fn all_levels() -> impl Iterator<Item = u8> {
    0..NUM_HEATER_LEVELS
}

fn all_phases() -> impl Iterator<Item = u8> {
    0..PWM_PERIOD
}

// ============================================================================
// Tests: heater_pattern()
// ============================================================================

#[test]
fn test_pattern_uses_only_heater_bits() {
    for level in all_levels() {
        for phase in all_phases() {
            let mask = heater_pattern(level, phase);
            assert!(
                RelayMask::HEATER.contains(mask),
                "level {level} phase {phase} -> {mask:?}"
            );
        }
    }
}

#[test]
fn test_active_relays_monotonic_in_level() {
    for phase in all_phases() {
        let mut previous = 0;
        for level in all_levels() {
            let count = heater_pattern(level, phase).count();
            assert!(
                count >= previous,
                "phase {phase}: level {level} has {count} relays, previous level {previous}"
            );
            previous = count;
        }
    }
}

#[test]
fn test_level_zero_all_off() {
    for phase in all_phases() {
        assert_eq!(heater_pattern(0, phase), RelayMask::NONE);
    }
}

#[test]
fn test_level_thirty_all_on() {
    for phase in all_phases() {
        assert_eq!(heater_pattern(30, phase), RelayMask::HEATER);
    }
}

#[test]
fn test_level_ten_saturates_first_relay_only() {
    for phase in all_phases() {
        let mask = heater_pattern(10, phase);
        assert!(mask.contains(RelayMask::HEATER_1));
        assert!(!mask.contains(RelayMask::HEATER_2));
        assert!(!mask.contains(RelayMask::HEATER_3));
    }
}

#[test]
fn test_pattern_is_pure() {
    for level in all_levels() {
        for phase in all_phases() {
            assert_eq!(heater_pattern(level, phase), heater_pattern(level, phase));
        }
    }
}

#[test]
fn test_on_ticks_per_cycle_equal_level() {
    // Über einen ganzen Zyklus summiert ergibt die Relais-Einschaltzeit genau die Stufe
    for level in all_levels() {
        let on_ticks: u32 = all_phases()
            .map(|phase| heater_pattern(level, phase).count())
            .sum();
        assert_eq!(on_ticks, u32::from(level), "level {level}");
    }
}

#[test]
fn test_next_relay_only_after_previous_saturated() {
    for level in all_levels() {
        for phase in all_phases() {
            let mask = heater_pattern(level, phase);
            if mask.contains(RelayMask::HEATER_2) {
                assert!(mask.contains(RelayMask::HEATER_1));
            }
            if mask.contains(RelayMask::HEATER_3) {
                assert!(mask.contains(RelayMask::HEATER_1 | RelayMask::HEATER_2));
            }
        }
    }
}

#[test]
fn test_second_stage_example() {
    // Stufe 13: Relais 1 dauerhaft, Relais 2 für 3 von 10 Ticks
    let relay_2_ticks = all_phases()
        .filter(|&phase| heater_pattern(13, phase).contains(RelayMask::HEATER_2))
        .count();
    assert_eq!(relay_2_ticks, 3);
    for phase in all_phases() {
        assert!(heater_pattern(13, phase).contains(RelayMask::HEATER_1));
    }
}

// ============================================================================
// Tests: relay_pattern()
// ============================================================================

#[test]
fn test_aux_relays_independent_of_phase() {
    let request = ControlRequest {
        level: HeaterLevel::new(5).unwrap(),
        aux_a: false,
        aux_b: true,
    };
    for phase in all_phases() {
        let mask = relay_pattern(request, phase);
        assert!(mask.contains(RelayMask::AUX_B));
        assert!(!mask.contains(RelayMask::AUX_A));
        assert_eq!(
            mask.intersection(RelayMask::HEATER),
            heater_pattern(5, phase)
        );
    }
}
