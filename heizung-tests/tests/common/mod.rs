//! Mock-Hardware für die Host-Tests
//!
//! Wird von mehreren Test-Dateien per `mod common;` eingebunden.

#![allow(dead_code)]

use heizung_core::{
    BusEvent, BusResponder, RelayError, RelayMask, RelayOutputs, VentilationInput, Watchdog,
    WATCHDOG_TIMEOUT_MS,
};

/// Adresse des Responders in den Tests
pub const ADDR: u8 = 0x23;

// ============================================================================
// Mock Relay Outputs
// ============================================================================

#[derive(Default)]
pub struct MockRelayOutputs {
    pub last_mask: Option<RelayMask>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockRelayOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zuletzt geschriebene Maske (NONE wenn noch nie geschrieben)
    pub fn mask(&self) -> RelayMask {
        self.last_mask.unwrap_or(RelayMask::NONE)
    }
}

impl RelayOutputs for MockRelayOutputs {
    fn write_mask(&mut self, mask: RelayMask) -> Result<(), RelayError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(RelayError::WriteFailed);
        }

        self.last_mask = Some(mask);
        self.write_count += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Ventilation Input
// ============================================================================

#[derive(Default)]
pub struct MockVentilation {
    pub active: bool,
    pub sample_count: usize,
}

impl MockVentilation {
    pub fn active() -> Self {
        Self {
            active: true,
            sample_count: 0,
        }
    }

    pub fn inactive() -> Self {
        Self::default()
    }
}

impl VentilationInput for MockVentilation {
    fn is_ventilation_active(&mut self) -> bool {
        self.sample_count += 1;
        self.active
    }
}

// ============================================================================
// Mock Watchdog mit simulierter Zeit
// ============================================================================

#[derive(Default)]
pub struct MockWatchdog {
    pub feed_count: usize,
    now_ms: u64,
    last_feed_ms: u64,
}

impl MockWatchdog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulierte Zeit vorrücken
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    /// Frist abgelaufen → echter Watchdog würde jetzt neu starten
    pub fn expired(&self) -> bool {
        self.now_ms - self.last_feed_ms >= WATCHDOG_TIMEOUT_MS
    }
}

impl Watchdog for MockWatchdog {
    fn feed(&mut self) {
        self.feed_count += 1;
        self.last_feed_ms = self.now_ms;
    }
}

// ============================================================================
// Bus-Controller Hilfsfunktionen
// ============================================================================

/// Schreib-Transaktion: Index-Byte gefolgt von Daten
pub fn bus_write(bus: &mut BusResponder<'_>, index: u8, data: &[u8]) {
    bus.handle(BusEvent::Start {
        address: ADDR,
        read: false,
    });
    bus.handle(BusEvent::ByteReceived(index));
    for &byte in data {
        bus.handle(BusEvent::ByteReceived(byte));
    }
    bus.handle(BusEvent::Stop);
}

/// Index setzen, Repeated Start, `N` Bytes lesen
pub fn bus_read<const N: usize>(bus: &mut BusResponder<'_>, index: u8) -> [u8; N] {
    bus.handle(BusEvent::Start {
        address: ADDR,
        read: false,
    });
    bus.handle(BusEvent::ByteReceived(index));
    bus.handle(BusEvent::Start {
        address: ADDR,
        read: true,
    });
    let bytes = core::array::from_fn(|_| bus.handle(BusEvent::ByteRequested).unwrap());
    bus.handle(BusEvent::Nack);
    bus.handle(BusEvent::Stop);
    bytes
}
