// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus heizung-core für die ESP32-C6 Peripherie.
// Die Logik dahinter ist in heizung-core und wird dort auf dem Host getestet.

pub mod i2c_target;
pub mod relay_port;
pub mod ventilation;
pub mod watchdog;

pub use i2c_target::I2cTargetError;
pub use relay_port::RelayPort;
pub use ventilation::VentilationLine;
pub use watchdog::{WatchdogTimer, last_reset_cause};
