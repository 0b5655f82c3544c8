// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Embassy Async Runtime
use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use esp_heizung_steuerung::config::{I2C_TARGET_ADDRESS, WATCHDOG_TIMEOUT_MS};
use esp_heizung_steuerung::hal::{
    RelayPort, VentilationLine, WatchdogTimer, i2c_target, last_reset_cause,
};
use esp_heizung_steuerung::tasks::{control_task, tick_task};
use esp_heizung_steuerung::{ControlLoop, RegisterFile, TickCounter};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Start-Sequenz:
/// 1. Relais aus, Lüftungs-Eingang konfigurieren
/// 2. Register-Datei löschen, Reset-Ursache ins Status-Byte
/// 3. Watchdog aktivieren
/// 4. I²C-Target und Tick-Zähler starten, Regelschleife spawnen
///
/// Danach schläft main() - alle Arbeit läuft in Tasks und im I²C-Interrupt.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // Relais-Ausgänge: Heiz-Stufe 1-3, Zusatz A, Zusatz B
    let mut relays = RelayPort::new([
        peripherals.GPIO18.into(),
        peripherals.GPIO19.into(),
        peripherals.GPIO20.into(),
        peripherals.GPIO21.into(),
        peripherals.GPIO22.into(),
    ]);
    if let Err(e) = ControlLoop::release_outputs(&mut relays) {
        error!("Failed to release relays: {}", e);
    }

    // Lüftungs-Freigabe (LOW = Lüftung läuft)
    let ventilation = VentilationLine::new(peripherals.GPIO3);

    // Geteilter Zustand: Register-Datei (I²C ↔ Regelschleife) und Tick-Zähler
    static REGISTERS: static_cell::StaticCell<RegisterFile> = static_cell::StaticCell::new();
    let registers: &'static RegisterFile = REGISTERS.init(RegisterFile::new());

    static TICKS: static_cell::StaticCell<TickCounter> = static_cell::StaticCell::new();
    let ticks: &'static TickCounter = TICKS.init(TickCounter::pwm());

    // Reset-Ursache ins Status-Byte (bleibt bis zum nächsten Neustart stehen)
    let reset_cause = last_reset_cause();
    info!("Reset cause: {}", reset_cause);
    let control = ControlLoop::startup(registers, ticks, reset_cause);

    // Watchdog: Neustart, wenn die Regelschleife hängt
    let watchdog = WatchdogTimer::start(peripherals.TIMG1, WATCHDOG_TIMEOUT_MS);
    info!("Watchdog armed ({} ms)", WATCHDOG_TIMEOUT_MS);

    // I²C-Target: ab hier liest/schreibt der Lüftungs-Controller die Register
    i2c_target::start(
        peripherals.I2C0,
        peripherals.GPIO6,
        peripherals.GPIO7,
        registers,
        I2C_TARGET_ADDRESS,
    )
    .unwrap();
    info!("I2C target listening on {=u8:#x}", I2C_TARGET_ADDRESS);

    // Spawn Tick Task (PWM-Zeitbasis)
    spawner.spawn(tick_task(ticks)).unwrap();

    // Spawn Control Task (Regelschleife)
    spawner
        .spawn(control_task(control, watchdog, ventilation, relays))
        .unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
