//! I²C Target (Responder) für die Register-Datei
//!
//! Explizite Zustandsmaschine, getrieben von Bus-Ereignissen. Die Firmware
//! übersetzt die Interrupts des I²C-Peripherals in `BusEvent`s und ruft
//! `BusResponder::handle()` direkt im Interrupt-Kontext auf.
//!
//! Schreib-Transaktion: `[Adresse+W] [Index] [Daten] [Daten] ...`
//! Lese-Transaktion:    `[Adresse+R] [Daten] [Daten] ...` ab dem zuletzt gesetzten Index
//!
//! Der Index läuft nach jedem Byte weiter und springt am Ende der
//! Register-Datei auf 0 zurück. Beide Register sind vom Bus aus beschreibbar;
//! die Regelschleife setzt Bit 0 des Status-Bytes in jeder Iteration neu.
//!
//! Hardware-Targets melden nicht jedes Protokoll-Ereignis einzeln (der
//! ESP32-C6 z.B. keinen Adress-Treffer beim Schreiben). `TargetSignal` und
//! `BusResponder::on_target_signal()` ergänzen die fehlenden Ereignisse.

use crate::registers::{REGISTER_COUNT, RegisterFile};

/// Wert, der gesendet wird, wenn es nichts zu senden gibt (Bus-Ruhepegel)
pub const IDLE_FILLER: u8 = 0xFF;

/// Ereignisse vom I²C-Peripheral
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusEvent {
    /// (Repeated) Start mit Adress-Byte; `read` = Richtungs-Bit
    Start { address: u8, read: bool },
    /// Controller hat ein Byte geschrieben
    ByteReceived(u8),
    /// Controller will ein Byte lesen
    ByteRequested,
    /// Controller hat das letzte gelesene Byte nicht quittiert
    Nack,
    /// Stop-Bedingung
    Stop,
}

/// Signale eines Hardware-I²C-Targets, wie sie im Interrupt ankommen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TargetSignal {
    /// Adress-Treffer mit Lese-Richtung, SCL wird gehalten
    ReadAddressed,
    /// TX-FIFO leer während einer Lese-Transaktion
    TxEmpty,
    /// Byte aus dem RX-FIFO (nur in Schreib-Transaktionen)
    Received(u8),
    /// Transaktion beendet
    Complete,
}

/// Protokoll-Zustand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusState {
    Idle,
    /// Adressiert zum Schreiben, wartet auf das Index-Byte
    AddressedWrite,
    /// Index gesetzt, folgende Bytes gehen in die Register
    IndexSelected,
    /// Index war ungültig, restliche Bytes dieser Transaktion werden verworfen
    Rejected,
    /// Adressiert zum Lesen
    AddressedRead,
}

pub struct BusResponder<'a> {
    address: u8,
    registers: &'a RegisterFile,
    state: BusState,
    pointer: usize,
}

impl<'a> BusResponder<'a> {
    /// Neuer Responder auf der gegebenen 7-Bit-Adresse
    pub fn new(address: u8, registers: &'a RegisterFile) -> Self {
        Self {
            address: address & 0x7F,
            registers,
            state: BusState::Idle,
            pointer: 0,
        }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn state(&self) -> BusState {
        self.state
    }

    /// Zuletzt gesetzter Register-Index
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Verarbeitet ein Bus-Ereignis
    ///
    /// Gibt bei `ByteRequested` das zu sendende Byte zurück, sonst `None`.
    pub fn handle(&mut self, event: BusEvent) -> Option<u8> {
        match event {
            BusEvent::Start { address, read } => {
                self.state = if address & 0x7F != self.address {
                    BusState::Idle
                } else if read {
                    BusState::AddressedRead
                } else {
                    BusState::AddressedWrite
                };
                None
            }
            BusEvent::ByteReceived(byte) => {
                self.receive(byte);
                None
            }
            BusEvent::ByteRequested => Some(self.transmit()),
            BusEvent::Nack | BusEvent::Stop => {
                self.state = BusState::Idle;
                None
            }
        }
    }

    fn receive(&mut self, byte: u8) {
        match self.state {
            BusState::AddressedWrite => {
                let index = usize::from(byte);
                if index < REGISTER_COUNT {
                    self.pointer = index;
                    self.state = BusState::IndexSelected;
                } else {
                    self.state = BusState::Rejected;
                }
            }
            BusState::IndexSelected => {
                self.registers.write(self.pointer, byte);
                self.advance();
            }
            // Verworfen: ungültiger Index, falsche Richtung oder nicht adressiert
            BusState::Rejected | BusState::AddressedRead | BusState::Idle => {}
        }
    }

    /// Verarbeitet ein Signal des Hardware-Targets
    ///
    /// Ein empfangenes Byte außerhalb einer Schreib-Transaktion eröffnet eine
    /// neue; die Hardware hat die Adresse dann bereits geprüft.
    /// Gibt das Byte für den TX-FIFO zurück, wenn die Hardware eines braucht.
    pub fn on_target_signal(&mut self, signal: TargetSignal) -> Option<u8> {
        match signal {
            TargetSignal::ReadAddressed => {
                self.handle(BusEvent::Start {
                    address: self.address,
                    read: true,
                });
                self.handle(BusEvent::ByteRequested)
            }
            TargetSignal::TxEmpty => self.handle(BusEvent::ByteRequested),
            TargetSignal::Received(byte) => {
                if !self.in_write_transaction() {
                    self.handle(BusEvent::Start {
                        address: self.address,
                        read: false,
                    });
                }
                self.handle(BusEvent::ByteReceived(byte))
            }
            TargetSignal::Complete => self.handle(BusEvent::Stop),
        }
    }

    fn in_write_transaction(&self) -> bool {
        matches!(
            self.state,
            BusState::AddressedWrite | BusState::IndexSelected | BusState::Rejected
        )
    }

    fn transmit(&mut self) -> u8 {
        if self.state != BusState::AddressedRead {
            return IDLE_FILLER;
        }
        let byte = self.registers.read(self.pointer).unwrap_or(IDLE_FILLER);
        self.advance();
        byte
    }

    fn advance(&mut self) {
        self.pointer = (self.pointer + 1) % REGISTER_COUNT;
    }
}
