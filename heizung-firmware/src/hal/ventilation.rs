// Lüftungs-Freigabe vom zweiten Controller
//
// Die Leitung ist HIGH wenn die Lüftung aus ist (auch im Ruhezustand, Pull-Up).
// Der Lüftungs-Controller zieht sie auf LOW, sobald die Zuluft läuft.

use esp_hal::gpio::{Input, InputConfig, InputPin, Pull};
use heizung_core::VentilationInput;

pub struct VentilationLine<'a> {
    pin: Input<'a>,
}

impl<'a> VentilationLine<'a> {
    pub fn new(pin: impl InputPin + 'a) -> Self {
        let pin = Input::new(pin, InputConfig::default().with_pull(Pull::Up));
        Self { pin }
    }
}

impl VentilationInput for VentilationLine<'_> {
    fn is_ventilation_active(&mut self) -> bool {
        self.pin.is_low()
    }
}
