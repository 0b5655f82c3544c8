//! Regelschleife: Register-Datei → Relais
//!
//! Eine Iteration:
//! 1. Watchdog füttern
//! 2. Steuer-Byte im kritischen Abschnitt prüfen
//!    (ungültig → letzten gültigen Zustand zurückschreiben)
//! 3. Lüftungs-Freigabe lesen, Status-Bit setzen
//! 4. Relais-Maske berechnen und in einem Schreibzugriff ausgeben

use crate::logic::relay_pattern;
use crate::registers::RegisterFile;
use crate::tick::TickCounter;
use crate::traits::{RelayError, RelayOutputs, VentilationInput, Watchdog};
use crate::types::{
    ControlRequest, HeaterLevel, RelayMask, ResetCause, STATUS_HEATER_DISABLED,
    STATUS_NO_WATCHDOG_RESET,
};

/// Watchdog-Frist: so lange darf eine Iteration höchstens ausbleiben
pub const WATCHDOG_TIMEOUT_MS: u64 = 2_000;

/// Pause zwischen zwei Iterationen
pub const LOOP_INTERVAL_MS: u64 = 10;

/// Ergebnis einer Iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterationReport {
    /// Ausgegebene Relais-Maske
    pub outputs: RelayMask,
    /// Gültiger Zustand nach der Prüfung
    pub request: ControlRequest,
    /// Abgelehnter Rohwert des Steuer-Bytes (Heizstufe zu groß)
    pub rejected: Option<u8>,
    /// Heizung durch Lüftungs-Verriegelung gesperrt
    pub heater_disabled: bool,
}

pub struct ControlLoop<'a> {
    registers: &'a RegisterFile,
    ticks: &'a TickCounter,
    state: ControlRequest,
}

impl<'a> ControlLoop<'a> {
    /// Start-Sequenz: Register löschen, Reset-Ursache ins Status-Byte
    ///
    /// Die Regelschleife schreibt das Watchdog-Bit danach nicht mehr; es bleibt
    /// bis zum nächsten Neustart oder bis der Bus-Controller das Status-Byte schreibt.
    pub fn startup(
        registers: &'a RegisterFile,
        ticks: &'a TickCounter,
        reset_cause: ResetCause,
    ) -> Self {
        let state = ControlRequest::OFF;

        registers.clear();
        if reset_cause != ResetCause::Watchdog {
            registers.set_status(STATUS_NO_WATCHDOG_RESET);
        }
        registers.set_control(state.encode());

        Self {
            registers,
            ticks,
            state,
        }
    }

    /// Letzter gültiger Zustand
    pub fn state(&self) -> ControlRequest {
        self.state
    }

    /// Alle Relais aus (vor der ersten Iteration)
    pub fn release_outputs<R: RelayOutputs>(outputs: &mut R) -> Result<(), RelayError> {
        outputs.write_mask(RelayMask::NONE)
    }

    /// Übernimmt das Steuer-Byte, falls gültig
    ///
    /// Snapshot, Prüfung und ggf. Zurückschreiben laufen in einem einzigen
    /// kritischen Abschnitt; der Bus-Interrupt kann das Byte dazwischen nicht ändern.
    /// Gibt den abgelehnten Rohwert zurück.
    pub fn sync_request(&mut self) -> Option<u8> {
        let last_good = self.state;
        let (state, rejected) = self.registers.with_control(|byte| {
            match ControlRequest::decode(*byte) {
                Ok(request) => (request, None),
                Err(_) => {
                    let raw = *byte;
                    *byte = last_good.encode();
                    (last_good, Some(raw))
                }
            }
        });
        self.state = state;
        rejected
    }

    /// Status-Bit setzen und Relais-Maske berechnen
    ///
    /// Ohne Lüftung: Heiz-Relais aus (Stufe 0, Phase 0), Zusatz-Relais bleiben wie angefordert.
    pub fn compute_outputs(&self, ventilation_active: bool) -> RelayMask {
        if ventilation_active {
            self.registers.update_status(|s| s & !STATUS_HEATER_DISABLED);
            relay_pattern(self.state, self.ticks.current_phase())
        } else {
            self.registers.update_status(|s| s | STATUS_HEATER_DISABLED);
            let interlocked = ControlRequest {
                level: HeaterLevel::OFF,
                ..self.state
            };
            relay_pattern(interlocked, 0)
        }
    }

    /// Eine komplette Iteration der Regelschleife
    pub fn iterate<W, V, R>(
        &mut self,
        watchdog: &mut W,
        ventilation: &mut V,
        outputs: &mut R,
    ) -> Result<IterationReport, RelayError>
    where
        W: Watchdog,
        V: VentilationInput,
        R: RelayOutputs,
    {
        watchdog.feed();

        let rejected = self.sync_request();

        let ventilation_active = ventilation.is_ventilation_active();
        let mask = self.compute_outputs(ventilation_active);

        outputs.write_mask(mask)?;

        Ok(IterationReport {
            outputs: mask,
            request: self.state,
            rejected,
            heater_disabled: !ventilation_active,
        })
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for IterationReport {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "IterationReport {{ outputs: {}, request: {}, rejected: {}, heater_disabled: {} }}",
            self.outputs,
            self.request,
            self.rejected,
            self.heater_disabled
        )
    }
}
