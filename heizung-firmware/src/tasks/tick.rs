// Tick Task - PWM-Zeitbasis
//
// Läuft kooperativ auf dem Embassy-Executor statt in einem Timer-Interrupt.
// Die Phase kann dadurch um bis zu ein Schleifen-Intervall (LOOP_INTERVAL_MS)
// verspätet weiterschalten.
use embassy_time::{Duration, Ticker};
use heizung_core::TickCounter;

use crate::config::TICK_FREQUENCY_HZ;

/// Tick Task - schaltet den PWM-Zähler mit fester Frequenz weiter
///
/// Einziger Schreiber des Zählers. Die Regelschleife liest nur die Phase.
#[embassy_executor::task]
pub async fn tick_task(ticks: &'static TickCounter) {
    let mut ticker = Ticker::every(Duration::from_hz(TICK_FREQUENCY_HZ));
    loop {
        ticker.next().await;
        ticks.advance();
    }
}
