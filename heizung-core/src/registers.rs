//! Register-Datei für den I²C-Bus
//!
//! Zwei Bytes, gemeinsam genutzt von Bus-Interrupt und Regelschleife.
//! Jedes Byte liegt in einer eigenen `critical_section::Mutex<Cell<u8>>`;
//! Einzelzugriffe sind damit unteilbar. Über mehrere Bytes hinweg gibt es
//! keine Invariante.

use core::cell::Cell;

use critical_section::Mutex;

/// Anzahl der Register (Status + Steuerung)
pub const REGISTER_COUNT: usize = 2;

/// Index des Status-Bytes
pub const STATUS_REGISTER: usize = 0;

/// Index des Steuer-Bytes
pub const CONTROL_REGISTER: usize = 1;

const _: () = assert!(REGISTER_COUNT >= 2 && REGISTER_COUNT < 255);

pub struct RegisterFile {
    cells: [Mutex<Cell<u8>>; REGISTER_COUNT],
}

impl RegisterFile {
    /// Alle Register auf 0
    pub const fn new() -> Self {
        Self {
            cells: [const { Mutex::new(Cell::new(0)) }; REGISTER_COUNT],
        }
    }

    /// Liest ein Register. `None` bei ungültigem Index.
    pub fn read(&self, index: usize) -> Option<u8> {
        let cell = self.cells.get(index)?;
        Some(critical_section::with(|cs| cell.borrow(cs).get()))
    }

    /// Schreibt ein Register. Ungültige Indizes werden ignoriert (`false`).
    pub fn write(&self, index: usize, value: u8) -> bool {
        match self.cells.get(index) {
            Some(cell) => {
                critical_section::with(|cs| cell.borrow(cs).set(value));
                true
            }
            None => false,
        }
    }

    /// Setzt alle Register auf 0
    pub fn clear(&self) {
        critical_section::with(|cs| {
            for cell in &self.cells {
                cell.borrow(cs).set(0);
            }
        });
    }

    pub fn status(&self) -> u8 {
        critical_section::with(|cs| self.cells[STATUS_REGISTER].borrow(cs).get())
    }

    pub fn set_status(&self, value: u8) {
        critical_section::with(|cs| self.cells[STATUS_REGISTER].borrow(cs).set(value));
    }

    /// Read-Modify-Write auf dem Status-Byte
    pub fn update_status(&self, f: impl FnOnce(u8) -> u8) {
        critical_section::with(|cs| {
            let cell = self.cells[STATUS_REGISTER].borrow(cs);
            cell.set(f(cell.get()));
        });
    }

    pub fn control(&self) -> u8 {
        critical_section::with(|cs| self.cells[CONTROL_REGISTER].borrow(cs).get())
    }

    pub fn set_control(&self, value: u8) {
        critical_section::with(|cs| self.cells[CONTROL_REGISTER].borrow(cs).set(value));
    }

    /// Snapshot-Prüfen-Zurückschreiben des Steuer-Bytes als ein kritischer Abschnitt
    ///
    /// Während `f` läuft, kann der Bus-Interrupt das Steuer-Byte nicht ändern.
    /// `f` bekommt den aktuellen Wert und kann ihn überschreiben.
    pub fn with_control<R>(&self, f: impl FnOnce(&mut u8) -> R) -> R {
        critical_section::with(|cs| {
            let cell = self.cells[CONTROL_REGISTER].borrow(cs);
            let mut value = cell.get();
            let result = f(&mut value);
            cell.set(value);
            result
        })
    }

    /// Kopie aller Register (für Logging und Tests)
    pub fn snapshot(&self) -> [u8; REGISTER_COUNT] {
        critical_section::with(|cs| core::array::from_fn(|i| self.cells[i].borrow(cs).get()))
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}
