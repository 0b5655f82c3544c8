// Task-Modul: Enthält alle Embassy Tasks
//
// Tick-Task und Control-Task laufen asynchron und teilen sich nur den
// Tick-Zähler (atomar). Der I²C-Interrupt ist kein Task, siehe hal::i2c_target.

pub mod control;
pub mod tick;

// Re-export Tasks für einfachen Import
pub use control::control_task;
pub use tick::tick_task;
