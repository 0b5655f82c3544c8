// Hardware-Watchdog und Reset-Ursache
//
// Nutzt den MWDT von TIMG1 (TIMG0 treibt die Embassy-Zeitbasis).
// Stufe 0 löst nach der Frist einen System-Reset aus.

use esp_hal::peripherals::TIMG1;
use esp_hal::rtc_cntl::{SocResetReason, reset_reason};
use esp_hal::system::Cpu;
use esp_hal::time::Duration;
use esp_hal::timer::timg::{MwdtStage, MwdtStageAction, TimerGroup, Wdt};
use heizung_core::{ResetCause, Watchdog};

pub struct WatchdogTimer {
    wdt: Wdt<TIMG1<'static>>,
}

impl WatchdogTimer {
    /// Aktiviert den Watchdog mit der gegebenen Frist
    pub fn start(timg1: TIMG1<'static>, timeout_ms: u64) -> Self {
        let mut wdt = TimerGroup::new(timg1).wdt;
        wdt.set_timeout(MwdtStage::Stage0, Duration::from_millis(timeout_ms));
        wdt.set_stage_action(MwdtStage::Stage0, MwdtStageAction::ResetSystem);
        wdt.enable();
        wdt.feed();

        Self { wdt }
    }
}

impl Watchdog for WatchdogTimer {
    fn feed(&mut self) {
        self.wdt.feed();
    }
}

/// Ursache des letzten Neustarts
///
/// Der ROM-Bootloader hält den Grund pro Boot fest.
pub fn last_reset_cause() -> ResetCause {
    match reset_reason(Cpu::ProCpu) {
        Some(SocResetReason::ChipPowerOn) => ResetCause::PowerOn,
        Some(
            SocResetReason::CoreMwdt0
            | SocResetReason::CoreMwdt1
            | SocResetReason::CoreRtcWdt
            | SocResetReason::Cpu0Mwdt0
            | SocResetReason::Cpu0Mwdt1
            | SocResetReason::Cpu0RtcWdt
            | SocResetReason::SysRtcWdt
            | SocResetReason::SysSuperWdt,
        ) => ResetCause::Watchdog,
        _ => ResetCause::Other,
    }
}
