//! Core Types für die Heizungs-Steuerung
//!
//! Datenstrukturen ohne Hardware-Dependencies: Heizstufe, Steuer-Byte,
//! Status-Byte und die Relais-Bitmaske.

use crate::logic::NUM_HEATER_LEVELS;

// ============================================================================
// Bit-Layout der Register
// ============================================================================

/// Steuer-Byte: untere sechs Bits = Heizstufe
pub const HEATER_LEVEL_MASK: u8 = 0x3F;

/// Steuer-Byte: Bit 6 = Zusatz-Relais A
pub const AUX_RELAY_A_MASK: u8 = 0x40;

/// Steuer-Byte: Bit 7 = Zusatz-Relais B
pub const AUX_RELAY_B_MASK: u8 = 0x80;

/// Status-Byte: Bit 0 = Heizung durch Lüftungs-Verriegelung gesperrt
pub const STATUS_HEATER_DISABLED: u8 = 0x01;

/// Status-Byte: Bit 1 = KEIN Watchdog-Reset seit dem letzten Start
///
/// Invertiert: 0 bedeutet, der letzte Neustart kam vom Watchdog.
pub const STATUS_NO_WATCHDOG_RESET: u8 = 0x02;

// Alle Heizstufen müssen in das 6-Bit-Feld passen
const _: () = assert!(NUM_HEATER_LEVELS as u16 <= HEATER_LEVEL_MASK as u16 + 1);

// ============================================================================
// Heizstufe
// ============================================================================

/// Validierte Heizstufe (immer `< NUM_HEATER_LEVELS`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u8", into = "u8")
)]
pub struct HeaterLevel(u8);

impl HeaterLevel {
    /// Heizung aus
    pub const OFF: Self = Self(0);

    /// Höchste Stufe (alle drei Heiz-Relais dauerhaft an)
    pub const MAX: Self = Self(NUM_HEATER_LEVELS - 1);

    /// Prüft einen Rohwert. `None` wenn außerhalb des gültigen Bereichs.
    pub const fn new(raw: u8) -> Option<Self> {
        if raw < NUM_HEATER_LEVELS {
            Some(Self(raw))
        } else {
            None
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeaterLevel {
    type Error = RequestError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::new(raw).ok_or(RequestError::LevelOutOfRange(raw))
    }
}

impl From<HeaterLevel> for u8 {
    fn from(level: HeaterLevel) -> Self {
        level.0
    }
}

// ============================================================================
// Steuer-Anfrage (Register 1)
// ============================================================================

/// Fehler beim Dekodieren des Steuer-Bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// Heizstufen-Feld `>= NUM_HEATER_LEVELS`
    LevelOutOfRange(u8),
}

impl core::fmt::Display for RequestError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RequestError::LevelOutOfRange(raw) => {
                write!(f, "heater level {} out of range (max {})", raw, NUM_HEATER_LEVELS - 1)
            }
        }
    }
}

/// Dekodierter Inhalt des Steuer-Bytes
///
/// Wird vom Bus-Controller geschrieben und von der Regelschleife
/// als letzter gültiger Zustand gehalten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlRequest {
    pub level: HeaterLevel,
    pub aux_a: bool,
    pub aux_b: bool,
}

impl ControlRequest {
    /// Alles aus
    pub const OFF: Self = Self {
        level: HeaterLevel::OFF,
        aux_a: false,
        aux_b: false,
    };

    /// Dekodiert ein Steuer-Byte
    ///
    /// # Beispiele
    ///
    /// ```
    /// # use heizung_core::ControlRequest;
    /// let request = ControlRequest::decode(0b0100_0101).unwrap();
    /// assert_eq!(request.level.get(), 5);
    /// assert!(request.aux_a);
    /// assert!(!request.aux_b);
    /// ```
    pub fn decode(byte: u8) -> Result<Self, RequestError> {
        let level = HeaterLevel::try_from(byte & HEATER_LEVEL_MASK)?;
        Ok(Self {
            level,
            aux_a: byte & AUX_RELAY_A_MASK != 0,
            aux_b: byte & AUX_RELAY_B_MASK != 0,
        })
    }

    /// Kodiert die Anfrage zurück in das Register-Format
    pub fn encode(self) -> u8 {
        let mut byte = self.level.get();
        if self.aux_a {
            byte |= AUX_RELAY_A_MASK;
        }
        if self.aux_b {
            byte |= AUX_RELAY_B_MASK;
        }
        byte
    }
}

// ============================================================================
// Status (Register 0)
// ============================================================================

/// Dekodierter Inhalt des Status-Bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusFlags {
    /// Heizung durch Lüftungs-Verriegelung abgeschaltet
    pub heater_disabled: bool,
    /// Letzter Neustart wurde vom Watchdog ausgelöst
    pub watchdog_reset: bool,
}

impl StatusFlags {
    pub fn from_byte(byte: u8) -> Self {
        Self {
            heater_disabled: byte & STATUS_HEATER_DISABLED != 0,
            watchdog_reset: byte & STATUS_NO_WATCHDOG_RESET == 0,
        }
    }

    /// Reservierte Bits (2-7) sind immer 0
    pub fn to_byte(self) -> u8 {
        let mut byte = 0;
        if self.heater_disabled {
            byte |= STATUS_HEATER_DISABLED;
        }
        if !self.watchdog_reset {
            byte |= STATUS_NO_WATCHDOG_RESET;
        }
        byte
    }
}

/// Ursache des letzten Neustarts (von der Plattform geliefert)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetCause {
    PowerOn,
    Watchdog,
    Other,
}

// ============================================================================
// Relais-Bitmaske
// ============================================================================

/// Abstrakte Ausgangs-Bitmaske der fünf Relais
///
/// Bit 0-2: Heiz-Relais Stufe 1-3, Bit 3: Zusatz-Relais A, Bit 4: Zusatz-Relais B.
/// Die Firmware bildet die Bits auf GPIOs ab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RelayMask(u8);

impl RelayMask {
    pub const NONE: Self = Self(0);
    pub const HEATER_1: Self = Self(1 << 0);
    pub const HEATER_2: Self = Self(1 << 1);
    pub const HEATER_3: Self = Self(1 << 2);
    pub const AUX_A: Self = Self(1 << 3);
    pub const AUX_B: Self = Self(1 << 4);

    /// Alle Heiz-Relais
    pub const HEATER: Self = Self(Self::HEATER_1.0 | Self::HEATER_2.0 | Self::HEATER_3.0);

    /// Beide Zusatz-Relais
    pub const AUX: Self = Self(Self::AUX_A.0 | Self::AUX_B.0);

    /// Alle fünf Relais
    pub const ALL: Self = Self(Self::HEATER.0 | Self::AUX.0);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Unbekannte Bits werden verworfen
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Anzahl aktiver Relais
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

impl core::ops::BitOr for RelayMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl core::ops::BitOrAssign for RelayMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for HeaterLevel {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}/{}", self.0, NUM_HEATER_LEVELS - 1)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ControlRequest {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "ControlRequest {{ level: {}, aux_a: {}, aux_b: {} }}",
            self.level,
            self.aux_a,
            self.aux_b
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for RelayMask {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "RelayMask({=u8:#b})", self.0)
    }
}
