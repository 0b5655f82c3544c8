// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
//
// GPIO-Zuordnung (ESP32-C6 DevKit):
//   GPIO18-20  Heiz-Relais Stufe 1-3
//   GPIO21     Zusatz-Relais A
//   GPIO22     Zusatz-Relais B
//   GPIO3      Lüftungs-Freigabe (Eingang, LOW = Lüftung läuft)
//   GPIO6/7    I²C SDA/SCL zum Lüftungs-Controller

use esp_hal::interrupt::Priority;

// ============================================================================
// Relais Konfiguration
// ============================================================================

/// Anzahl der Relais (3 Heiz-Stufen + 2 Zusatz-Relais)
/// Reihenfolge entspricht den Bits von `RelayMask`
pub const RELAY_COUNT: usize = 5;

// ============================================================================
// I²C Konfiguration
// ============================================================================

/// 7-Bit Target-Adresse auf dem I²C-Bus
/// Der Lüftungs-Controller spricht uns unter dieser Adresse an
pub const I2C_TARGET_ADDRESS: u8 = 0x23;

/// Bus-Takt in kHz
/// Im Target-Modus gibt der Controller den Takt vor; der Wert
/// bestimmt nur das Filter-/Timing-Setup des Peripherals
pub const I2C_FREQUENCY_KHZ: u32 = 100;

/// Interrupt-Priorität für den I²C-Handler
/// Höher als der Embassy-Timer, damit Bus-Transaktionen nicht warten
pub const I2C_INTERRUPT_PRIORITY: Priority = Priority::Priority2;

// ============================================================================
// Timing Konfiguration
// ============================================================================

/// Watchdog-Frist in Millisekunden
/// Läuft die Regelschleife so lange nicht, startet der Chip neu
pub const WATCHDOG_TIMEOUT_MS: u64 = heizung_core::WATCHDOG_TIMEOUT_MS;

/// Intervall der Regelschleife in Millisekunden
pub const LOOP_INTERVAL_MS: u64 = heizung_core::LOOP_INTERVAL_MS;

/// Ticks pro Sekunde der PWM-Zeitbasis
pub const TICK_FREQUENCY_HZ: u64 = heizung_core::logic::PWM_TICK_FREQUENCY_HZ as u64;
