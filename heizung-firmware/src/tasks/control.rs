// Control Task - Regelschleife Register-Datei → Relais
use defmt::{error, info, warn};
use embassy_time::{Duration, Ticker};
use heizung_core::{
    ControlLoop, ControlRequest, IterationReport, RelayOutputs, VentilationInput, Watchdog,
};

use crate::config::LOOP_INTERVAL_MS;
use crate::hal::{RelayPort, VentilationLine, WatchdogTimer};

/// Regelschleife - Testbare Logik ohne konkrete Hardware-Typen
///
/// Läuft alle `LOOP_INTERVAL_MS`:
/// - füttert den Watchdog
/// - übernimmt gültige Anfragen aus dem Steuer-Byte
/// - setzt die Relais gemäß Heizstufe, PWM-Phase und Lüftungs-Freigabe
///
/// Geloggt werden nur Zustandswechsel, nicht jede Iteration.
///
/// # Parameter
/// - `control`: Regelschleife mit Register-Datei und Tick-Zähler
/// - `watchdog`: Hardware-Watchdog (oder Mock)
/// - `ventilation`: Lüftungs-Freigabe-Eingang (oder Mock)
/// - `relays`: Relais-Ausgänge (oder Mock)
pub async fn control_logic<W, V, R>(
    mut control: ControlLoop<'_>,
    mut watchdog: W,
    mut ventilation: V,
    mut relays: R,
) -> !
where
    W: Watchdog,
    V: VentilationInput,
    R: RelayOutputs,
{
    let mut ticker = Ticker::every(Duration::from_millis(LOOP_INTERVAL_MS));
    let mut last_request = control.state();
    let mut last_disabled: Option<bool> = None;

    loop {
        match control.iterate(&mut watchdog, &mut ventilation, &mut relays) {
            Ok(report) => {
                log_transitions(&report, &mut last_request, &mut last_disabled);
            }
            Err(e) => error!("Failed to write relay outputs: {}", e),
        }

        // Async Delay: gibt CPU an Tick-Task zurück
        ticker.next().await;
    }
}

fn log_transitions(
    report: &IterationReport,
    last_request: &mut ControlRequest,
    last_disabled: &mut Option<bool>,
) {
    if let Some(raw) = report.rejected {
        warn!(
            "Rejected control byte {=u8:#x}, restored {}",
            raw, report.request
        );
    }

    if report.request != *last_request {
        info!("New request: {}", report.request);
        *last_request = report.request;
    }

    if *last_disabled != Some(report.heater_disabled) {
        if report.heater_disabled {
            info!("Ventilation off - heater interlocked");
        } else {
            info!("Ventilation on - heater enabled");
        }
        *last_disabled = Some(report.heater_disabled);
    }
}

/// Control Task - Embassy Task für die Regelschleife
///
/// Embassy Tasks dürfen nicht generisch sein, daher die konkreten
/// Hardware-Typen hier und die Logik in `control_logic()`.
#[embassy_executor::task]
pub async fn control_task(
    control: ControlLoop<'static>,
    watchdog: WatchdogTimer,
    ventilation: VentilationLine<'static>,
    relays: RelayPort<'static>,
) {
    info!("Control loop started ({} ms interval)", LOOP_INTERVAL_MS);
    control_logic(control, watchdog, ventilation, relays).await
}
