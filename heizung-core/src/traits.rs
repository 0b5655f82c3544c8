//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use crate::types::RelayMask;

/// Fehler-Typ für Relais-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelayError {
    WriteFailed,
}

/// Trait für die fünf Relais-Ausgänge
///
/// # Implementierungen
/// - **Production:** RelayPort (ESP32 GPIO, ein Register-Schreibzugriff)
/// - **Testing:** MockRelayOutputs (in-memory Mock)
pub trait RelayOutputs {
    /// Setzt alle Relais gleichzeitig auf die gegebene Maske
    ///
    /// Bits, die nicht in der Maske stehen, werden ausgeschaltet.
    /// Zwischenzustände dürfen nach außen nicht sichtbar sein.
    fn write_mask(&mut self, mask: RelayMask) -> Result<(), RelayError>;
}

/// Trait für die Lüftungs-Freigabe-Leitung vom zweiten Controller
pub trait VentilationInput {
    /// `true` wenn die Lüftung läuft und geheizt werden darf
    fn is_ventilation_active(&mut self) -> bool;
}

/// Trait für den Hardware-Watchdog
pub trait Watchdog {
    /// Setzt die Watchdog-Frist zurück
    fn feed(&mut self);
}
