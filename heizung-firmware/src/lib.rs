// Library-Root: Hardware-Anbindung und Tasks der Heizungs-Steuerung
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von heizung-core
pub use heizung_core::{ControlLoop, RegisterFile, TickCounter};

// ============================================================================
// Testing-Strategie
// ============================================================================
//
// Dieses Crate kompiliert nur für riscv32imac-unknown-none-elf (esp-hal,
// esp-rtos, Interrupt-Handler). Es enthält deshalb nur dünne Adapter:
//
// - hal/*:   Implementierungen der heizung-core Traits für GPIO, Watchdog, I²C
// - tasks/*: Embassy Tasks, die generische Logik mit konkreter Hardware aufrufen
//
// Die eigentliche Logik (PWM-Muster, Register-Protokoll, Regelschleife)
// liegt in heizung-core und wird in heizung-tests mit Mocks auf dem Host getestet.
