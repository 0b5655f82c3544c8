//! Heizung Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, Pure Functions und die Zustandsmaschinen
//! (Bus-Responder, Regelschleife), die im Firmware-Crate an die
//! ESP32-Peripherie gebunden werden.

#![no_std]

pub mod bus;
pub mod control;
pub mod logic;
pub mod registers;
pub mod tick;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use bus::{BusEvent, BusResponder, BusState, TargetSignal};
pub use control::{ControlLoop, IterationReport, LOOP_INTERVAL_MS, WATCHDOG_TIMEOUT_MS};
pub use logic::{NUM_HEATER_LEVELS, PWM_PERIOD, heater_pattern, relay_pattern};
pub use registers::{CONTROL_REGISTER, REGISTER_COUNT, RegisterFile, STATUS_REGISTER};
pub use tick::TickCounter;
pub use traits::{RelayError, RelayOutputs, VentilationInput, Watchdog};
pub use types::{ControlRequest, HeaterLevel, RelayMask, RequestError, ResetCause, StatusFlags};
