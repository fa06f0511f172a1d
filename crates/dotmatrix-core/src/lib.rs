//! Cycle-driven DMG (original Game Boy) emulation core.
//!
//! This crate contains the platform-agnostic emulator logic (CPU/MMU/PPU/APU
//! and friends). Frontends own the window, the audio device, and file I/O;
//! they drive the core through the [`gameboy::GameBoy`] facade: construct it
//! from a ROM blob, call [`gameboy::GameBoy::run`] with host callbacks, and
//! read back cartridge RAM on teardown.

/// Audio Processing Unit (APU) emulation.
pub mod apu;

/// Cartridge mappers (MBC) and ROM/RAM/RTC handling.
pub mod cartridge;

/// Sharp LR35902 CPU core.
pub mod cpu;

/// High-level facade that wires the CPU and MMU into a single machine.
pub mod gameboy;

/// Joypad input register and button state.
pub mod input;

/// Memory map and hardware plumbing.
pub mod mmu;

/// Pixel Processing Unit (PPU) emulation.
pub mod ppu;

/// Serial unit stub with captured output.
pub mod serial;

/// Divider/timer unit.
pub mod timer;

pub use cartridge::{Cartridge, CartridgeError};
pub use gameboy::{GameBoy, Options};
pub use input::Button;
pub use ppu::{Shade, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Master clock rate in T-states per second.
pub const CPU_CLOCK_HZ: u32 = 4_194_304;

/// T-states per rendered frame (154 scanlines of 456 dots).
pub const CYCLES_PER_FRAME: u32 = 70_224;
