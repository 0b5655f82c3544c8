//! Pure Business Logic Functions
//!
//! Gestufte Software-PWM für die drei Heiz-Relais (testbar ohne Hardware!)

use crate::types::{ControlRequest, RelayMask};

// ============================================================================
// PWM Zeitbasis
// ============================================================================

/// Ticks pro Sekunde der PWM-Zeitbasis
pub const PWM_TICK_FREQUENCY_HZ: u8 = 1;

/// Länge eines PWM-Zyklus in Sekunden
pub const PWM_PERIOD_SECONDS: u8 = 10;

/// Länge eines PWM-Zyklus in Ticks (= Größe einer Heizstufe)
pub const PWM_PERIOD: u8 = PWM_TICK_FREQUENCY_HZ * PWM_PERIOD_SECONDS;

/// Heiz-Relais in Schaltreihenfolge
pub const HEATER_STAGES: [RelayMask; 3] =
    [RelayMask::HEATER_1, RelayMask::HEATER_2, RelayMask::HEATER_3];

/// Anzahl der Heizstufen: 0 bis einschließlich `3 * PWM_PERIOD`
pub const NUM_HEATER_LEVELS: u8 = PWM_PERIOD * HEATER_STAGES.len() as u8 + 1;

const _: () = assert!(PWM_PERIOD > 0);

/// Berechnet, welche Heiz-Relais in diesem PWM-Schritt an sind
///
/// Ein Relais wird erst eingeschaltet, wenn das vorherige dauerhaft an ist.
/// Bei 10 Ticks pro Zyklus:
/// - Stufe 6: Relais 1 für 6 Ticks an, 4 Ticks aus
/// - Stufe 13: Relais 1 dauerhaft an, Relais 2 für 3 Ticks an
/// - Stufe 30: alle drei Relais dauerhaft an
///
/// `level` muss `< NUM_HEATER_LEVELS` sein, `phase` muss `< PWM_PERIOD` sein.
/// Das Ergebnis enthält nur Heiz-Relais-Bits.
///
/// # Beispiele
///
/// ```
/// # use heizung_core::{heater_pattern, RelayMask};
/// assert_eq!(heater_pattern(13, 2), RelayMask::HEATER_1 | RelayMask::HEATER_2);
/// assert_eq!(heater_pattern(13, 3), RelayMask::HEATER_1);
/// ```
pub fn heater_pattern(level: u8, phase: u8) -> RelayMask {
    debug_assert!(level < NUM_HEATER_LEVELS);
    debug_assert!(phase < PWM_PERIOD);

    if level == 0 {
        return RelayMask::NONE;
    }

    // Stufe, in der das aktuell taktende Relais liegt.
    // Grenzwerte (10, 20, 30) gehören noch zur unteren Stufe.
    let stage = usize::from((level - 1) / PWM_PERIOD).min(HEATER_STAGES.len() - 1);
    let remainder = level - stage as u8 * PWM_PERIOD;

    let mut out = RelayMask::NONE;
    for relay in &HEATER_STAGES[..stage] {
        out |= *relay;
    }
    if phase < remainder {
        out |= HEATER_STAGES[stage];
    }

    out.intersection(RelayMask::HEATER)
}

/// Komplette Ausgangsmaske: Heiz-PWM plus die beiden Zusatz-Relais
///
/// Die Zusatz-Relais hängen nicht von der PWM-Phase ab.
pub fn relay_pattern(request: ControlRequest, phase: u8) -> RelayMask {
    let mut out = heater_pattern(request.level.get(), phase);
    if request.aux_a {
        out |= RelayMask::AUX_A;
    }
    if request.aux_b {
        out |= RelayMask::AUX_B;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HeaterLevel;

    #[test]
    fn test_level_count() {
        assert_eq!(PWM_PERIOD, 10);
        assert_eq!(NUM_HEATER_LEVELS, 31);
    }

    #[test]
    fn test_level_zero_is_off() {
        for phase in 0..PWM_PERIOD {
            assert_eq!(heater_pattern(0, phase), RelayMask::NONE);
        }
    }

    #[test]
    fn test_max_level_all_heaters_on() {
        for phase in 0..PWM_PERIOD {
            assert_eq!(heater_pattern(30, phase), RelayMask::HEATER);
        }
    }

    #[test]
    fn test_stage_one_duty_cycle() {
        // Stufe 6 => 6 Ticks an, 4 Ticks aus
        let on = (0..PWM_PERIOD)
            .filter(|&phase| heater_pattern(6, phase) == RelayMask::HEATER_1)
            .count();
        assert_eq!(on, 6);
        assert_eq!(heater_pattern(6, 5), RelayMask::HEATER_1);
        assert_eq!(heater_pattern(6, 6), RelayMask::NONE);
    }

    #[test]
    fn test_stage_boundaries() {
        for phase in 0..PWM_PERIOD {
            assert_eq!(heater_pattern(10, phase), RelayMask::HEATER_1);
            assert_eq!(
                heater_pattern(20, phase),
                RelayMask::HEATER_1 | RelayMask::HEATER_2
            );
        }
        // Erste Stufe über der Grenze: nächstes Relais taktet für einen Tick
        assert_eq!(
            heater_pattern(11, 0),
            RelayMask::HEATER_1 | RelayMask::HEATER_2
        );
        assert_eq!(heater_pattern(11, 1), RelayMask::HEATER_1);
        assert_eq!(heater_pattern(21, 0), RelayMask::HEATER);
        assert_eq!(
            heater_pattern(21, 1),
            RelayMask::HEATER_1 | RelayMask::HEATER_2
        );
    }

    #[test]
    fn test_relay_pattern_adds_aux_relays() {
        let request = ControlRequest {
            level: HeaterLevel::OFF,
            aux_a: true,
            aux_b: false,
        };
        assert_eq!(relay_pattern(request, 0), RelayMask::AUX_A);

        let request = ControlRequest {
            level: HeaterLevel::MAX,
            aux_a: true,
            aux_b: true,
        };
        assert_eq!(relay_pattern(request, 9), RelayMask::ALL);
    }
}
