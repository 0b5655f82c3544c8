// I²C Target-Modus: übersetzt Peripheral-Interrupts in TargetSignals
//
// esp-hal hat keinen Target-Treiber. Der Master-Treiber übernimmt Takt,
// Pin-Routing und Open-Drain-Setup; danach wird das Peripheral per
// Register in den Target-Modus geschaltet. Der Treiber bleibt im Static
// liegen, damit sein Drop das Peripheral nicht zurücksetzt.
//
// Clock-Stretching ist aktiv: bei Adress-Treffer (nur Lese-Richtung) und
// bei leerem TX-FIFO hält die Hardware SCL fest, bis der Interrupt-Handler
// reagiert hat. So wird jedes gesendete Byte einzeln beim Responder angefragt.
// Schreib-Transaktionen erscheinen nur als RX-FIFO-Bytes; den fehlenden
// Start ergänzt `BusResponder::on_target_signal()`.

use core::cell::RefCell;

use critical_section::Mutex;
use esp_hal::Blocking;
use esp_hal::gpio::interconnect::PeripheralOutput;
use esp_hal::handler;
use esp_hal::i2c::master::{Config, ConfigError, I2c};
use esp_hal::interrupt;
use esp_hal::peripherals::{I2C0, Interrupt};
use esp_hal::time::Rate;
use heizung_core::{BusResponder, RegisterFile, TargetSignal};

use crate::config::{I2C_FREQUENCY_KHZ, I2C_INTERRUPT_PRIORITY};

/// `SR.STRETCH_CAUSE`: Adresse erkannt
const STRETCH_ADDRESS_MATCH: u8 = 0;
/// `SR.STRETCH_CAUSE`: TX-FIFO leer während Lese-Transaktion
const STRETCH_TX_EMPTY: u8 = 1;

/// RX-FIFO Schwelle: Interrupt ab dem ersten Byte
const RX_WATERMARK: u8 = 1;

/// Fehler beim Start des I²C-Targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum I2cTargetError {
    /// Peripheral-Konfiguration abgelehnt
    Config,
    /// Interrupt konnte nicht aktiviert werden
    Interrupt,
}

impl From<ConfigError> for I2cTargetError {
    fn from(_: ConfigError) -> Self {
        I2cTargetError::Config
    }
}

struct I2cTarget {
    _bus: I2c<'static, Blocking>,
    responder: BusResponder<'static>,
}

/// Zustand des Interrupt-Handlers, einmal beim Start befüllt
static I2C_TARGET: Mutex<RefCell<Option<I2cTarget>>> = Mutex::new(RefCell::new(None));

/// Startet den I²C-Target auf `address` und bindet den Interrupt-Handler
///
/// Ab hier kann der Bus-Controller jederzeit die Register-Datei lesen und schreiben.
pub fn start(
    i2c0: I2C0<'static>,
    sda: impl PeripheralOutput<'static>,
    scl: impl PeripheralOutput<'static>,
    registers: &'static RegisterFile,
    address: u8,
) -> Result<(), I2cTargetError> {
    let config = Config::default().with_frequency(Rate::from_khz(I2C_FREQUENCY_KHZ));
    let bus = I2c::new(i2c0, config)?.with_sda(sda).with_scl(scl);

    configure_target_mode(address);

    critical_section::with(|cs| {
        I2C_TARGET.borrow_ref_mut(cs).replace(I2cTarget {
            _bus: bus,
            responder: BusResponder::new(address, registers),
        });
    });

    unsafe { interrupt::bind_interrupt(Interrupt::I2C_EXT0, i2c_target_isr.handler()) };
    interrupt::enable(Interrupt::I2C_EXT0, I2C_INTERRUPT_PRIORITY)
        .map_err(|_| I2cTargetError::Interrupt)
}

fn configure_target_mode(address: u8) {
    let regs = I2C0::regs();

    regs.ctr()
        .modify(|_, w| w.ms_mode().clear_bit().slv_tx_auto_start_en().set_bit());
    regs.slave_addr()
        .write(|w| unsafe { w.slave_addr().bits(u16::from(address)) });
    regs.fifo_conf().modify(|_, w| unsafe {
        w.nonfifo_en()
            .clear_bit()
            .fifo_addr_cfg_en()
            .clear_bit()
            .rxfifo_wm_thrhd()
            .bits(RX_WATERMARK)
    });
    regs.scl_stretch_conf()
        .modify(|_, w| w.slave_scl_stretch_en().set_bit());

    // FIFOs leeren
    regs.fifo_conf()
        .modify(|_, w| w.tx_fifo_rst().set_bit().rx_fifo_rst().set_bit());
    regs.fifo_conf()
        .modify(|_, w| w.tx_fifo_rst().clear_bit().rx_fifo_rst().clear_bit());

    // Konfiguration übernehmen
    regs.ctr().modify(|_, w| w.conf_upgate().set_bit());

    regs.int_clr().write(|w| unsafe { w.bits(u32::MAX) });
    regs.int_ena().write(|w| {
        w.rxfifo_wm()
            .set_bit()
            .trans_complete()
            .set_bit()
            .slave_stretch()
            .set_bit()
    });
}

impl I2cTarget {
    fn service(&mut self) {
        let regs = I2C0::regs();
        let pending = regs.int_status().read();

        if pending.slave_stretch().bit_is_set() {
            let sr = regs.sr().read();
            match sr.stretch_cause().bits() {
                STRETCH_ADDRESS_MATCH => {
                    // Index-Byte der vorherigen Schreib-Transaktion (Repeated Start)
                    self.drain_rx_fifo();
                    if sr.slave_rw().bit_is_set() {
                        self.signal(TargetSignal::ReadAddressed);
                    }
                }
                STRETCH_TX_EMPTY => self.signal(TargetSignal::TxEmpty),
                // RX-FIFO voll
                _ => self.drain_rx_fifo(),
            }
            regs.scl_stretch_conf()
                .modify(|_, w| w.slave_scl_stretch_clr().set_bit());
        }

        if pending.rxfifo_wm().bit_is_set() {
            self.drain_rx_fifo();
        }

        if pending.trans_complete().bit_is_set() {
            self.drain_rx_fifo();
            self.signal(TargetSignal::Complete);
        }

        regs.int_clr().write(|w| unsafe { w.bits(pending.bits()) });
    }

    fn drain_rx_fifo(&mut self) {
        let regs = I2C0::regs();
        let count = regs.sr().read().rxfifo_cnt().bits();
        for _ in 0..count {
            let byte = regs.data().read().fifo_rdata().bits();
            self.signal(TargetSignal::Received(byte));
        }
    }

    /// Signal an den Responder, angefordertes Byte in den TX-FIFO
    fn signal(&mut self, signal: TargetSignal) {
        if let Some(byte) = self.responder.on_target_signal(signal) {
            I2C0::regs()
                .data()
                .write(|w| unsafe { w.fifo_rdata().bits(byte) });
        }
    }
}

#[handler]
fn i2c_target_isr() {
    critical_section::with(|cs| {
        if let Some(target) = I2C_TARGET.borrow_ref_mut(cs).as_mut() {
            target.service();
        }
    });
}
