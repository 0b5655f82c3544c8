// Relais-Ausgänge über den GPIO-Port
//
// Alle fünf Relais werden mit EINEM Schreibzugriff auf das GPIO_OUT-Register
// gesetzt. Einzelnes Setzen der Pins würde kurz Zwischenzustände zeigen.

use esp_hal::gpio::{AnyPin, Level, Output, OutputConfig, Pin};
use esp_hal::peripherals::GPIO;
use heizung_core::{RelayError, RelayMask, RelayOutputs};

use crate::config::RELAY_COUNT;

/// Real Hardware Relay Port
///
/// Die `Output`-Treiber konfigurieren die Pins als Ausgänge und bleiben
/// am Leben, damit die Pins nicht zurückgesetzt werden. Geschrieben wird
/// direkt ins Port-Register.
pub struct RelayPort<'a> {
    _outputs: [Output<'a>; RELAY_COUNT],
    /// Port-Bit pro Relais, Index = Bit in `RelayMask`
    port_bits: [u32; RELAY_COUNT],
    /// Alle Port-Bits der Relais
    port_mask: u32,
}

impl<'a> RelayPort<'a> {
    /// Erstellt einen neuen RelayPort, alle Relais aus
    ///
    /// # Parameter
    /// - `pins`: Heiz-Relais 1-3, Zusatz-Relais A, Zusatz-Relais B (in dieser Reihenfolge)
    pub fn new(pins: [AnyPin<'a>; RELAY_COUNT]) -> Self {
        let port_bits: [u32; RELAY_COUNT] = core::array::from_fn(|i| 1u32 << pins[i].number());
        let port_mask = port_bits.iter().fold(0, |acc, bit| acc | bit);
        let outputs = pins.map(|pin| Output::new(pin, Level::Low, OutputConfig::default()));

        Self {
            _outputs: outputs,
            port_bits,
            port_mask,
        }
    }

    /// Übersetzt die abstrakte Maske in GPIO-Port-Bits
    fn to_port_bits(&self, mask: RelayMask) -> u32 {
        self.port_bits
            .iter()
            .enumerate()
            .filter(|(relay, _)| mask.bits() & (1 << relay) != 0)
            .fold(0, |acc, (_, bit)| acc | bit)
    }
}

impl RelayOutputs for RelayPort<'_> {
    fn write_mask(&mut self, mask: RelayMask) -> Result<(), RelayError> {
        let bits = self.to_port_bits(mask);
        let port_mask = self.port_mask;

        // Read-Modify-Write im kritischen Abschnitt: andere Pins bleiben unberührt,
        // die Relais ändern sich mit einem einzigen Store.
        critical_section::with(|_| {
            GPIO::regs()
                .out()
                .modify(|r, w| unsafe { w.bits((r.bits() & !port_mask) | bits) });
        });

        Ok(())
    }
}
