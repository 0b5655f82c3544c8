//! PWM-Zeitbasis
//!
//! Ein umlaufender Zähler, einmal pro Tick vom Timer weitergeschaltet.
//! Genau ein Schreiber (Tick-Task), beliebig viele Leser.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::logic::PWM_PERIOD;

pub struct TickCounter {
    ticks: AtomicU8,
    period: u8,
}

impl TickCounter {
    /// Zähler mit eigener Periode (in Ticks)
    pub const fn new(period: u8) -> Self {
        assert!(period > 0);
        Self {
            ticks: AtomicU8::new(0),
            period,
        }
    }

    /// Zähler mit der PWM-Periode der Heizung
    pub const fn pwm() -> Self {
        Self::new(PWM_PERIOD)
    }

    /// Nächster Tick, läuft bei `period` auf 0 um. Gibt die neue Phase zurück.
    pub fn advance(&self) -> u8 {
        let next = (self.ticks.load(Ordering::Relaxed) + 1) % self.period;
        self.ticks.store(next, Ordering::Relaxed);
        next
    }

    /// Aktuelle Phase in `[0, period)`
    pub fn current_phase(&self) -> u8 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn period(&self) -> u8 {
        self.period
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::pwm()
    }
}
