use std::time::{Duration, Instant};

use log::{info, LevelFilter};

use crate::{
    cartridge::{Cartridge, CartridgeError},
    cpu::Cpu,
    input::Button,
    mmu::Mmu,
    ppu::FrameBuffer,
    CYCLES_PER_FRAME,
};

/// Wall-clock frame rate the run loop throttles to.
pub const TARGET_FPS: f64 = 59.73;

/// Construction-time switches, mirroring the frontends' command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    /// Invoke the pre-instruction debug hook.
    pub debugger: bool,
    /// Raise the log level to trace.
    pub trace: bool,
    /// Cap the log level at error.
    pub disable_logs: bool,
    /// Stop the run loop when the program enters a `JR -2` loop to itself
    /// (test ROMs idle that way once they finish).
    pub exit_on_infinite_jr: bool,
    /// Echo serial output to stdout (blargg's ROMs report through serial).
    pub print_serial: bool,
}

/// Pre-instruction callback; receives the CPU and MMU about to execute.
pub type DebugHook = Box<dyn FnMut(&Cpu, &Mmu)>;

/// The assembled machine: CPU plus MMU (which owns every other unit), driven
/// in lockstep off the shared cycle count.
pub struct GameBoy {
    pub cpu: Cpu,
    pub mmu: Mmu,
    elapsed_cycles: u64,
    options: Options,
    debug_hook: Option<DebugHook>,
    exit_requested: bool,
}

impl GameBoy {
    /// Build a machine from a ROM blob and an optional save blob. The save
    /// seeds cartridge RAM when its size matches the header's declaration.
    pub fn new(
        rom: Vec<u8>,
        options: Options,
        save: Option<Vec<u8>>,
    ) -> Result<Self, CartridgeError> {
        let level = if options.disable_logs {
            LevelFilter::Error
        } else if options.trace {
            LevelFilter::Trace
        } else {
            LevelFilter::Info
        };
        log::set_max_level(level);

        let cart = Cartridge::from_bytes(rom, save)?;
        info!(target: "gameboy", "loaded ROM: {} ({:?})", cart.title(), cart.kind());

        let mut mmu = Mmu::new();
        if options.print_serial {
            mmu.serial = crate::serial::Serial::new(true);
        }
        mmu.load_cart(cart);

        Ok(Self {
            cpu: Cpu::new(),
            mmu,
            elapsed_cycles: 0,
            options,
            debug_hook: None,
            exit_requested: false,
        })
    }

    /// Install the pre-instruction hook used when `Options::debugger` is
    /// set. No semantics are imposed on the callback.
    pub fn set_debug_hook(&mut self, hook: DebugHook) {
        self.debug_hook = Some(hook);
    }

    /// Total T-states executed since construction.
    pub fn elapsed_cycles(&self) -> u64 {
        self.elapsed_cycles
    }

    pub fn button_pressed(&mut self, button: Button) {
        self.mmu.input.button_pressed(button, &mut self.mmu.if_reg);
    }

    pub fn button_released(&mut self, button: Button) {
        self.mmu.input.button_released(button);
    }

    /// Battery-backed cartridge RAM, for the host to persist.
    pub fn cartridge_ram_bytes(&self) -> &[u8] {
        self.mmu
            .cart
            .as_ref()
            .map(|c| c.ram_bytes())
            .unwrap_or(&[])
    }

    /// Bytes written out the serial port so far.
    pub fn take_serial_output(&mut self) -> Vec<u8> {
        self.mmu.take_serial()
    }

    /// Execute one CPU step and advance PPU, APU, and Timer by the cycles it
    /// consumed, in that order. Returns the cycle count.
    pub fn tick(&mut self) -> u32 {
        if self.options.debugger {
            if let Some(mut hook) = self.debug_hook.take() {
                hook(&self.cpu, &self.mmu);
                self.debug_hook = Some(hook);
            }
        }

        if self.options.exit_on_infinite_jr && !self.cpu.halted {
            let pc = self.cpu.pc;
            if self.mmu.read_byte(pc) == 0x18 && self.mmu.read_byte(pc.wrapping_add(1)) == 0xFE {
                self.exit_requested = true;
            }
        }

        let cycles = self.cpu.step(&mut self.mmu);
        self.elapsed_cycles += cycles as u64;

        self.mmu.ppu.step(cycles, &mut self.mmu.if_reg);
        self.mmu.apu.step(cycles);
        self.mmu.timer.step(cycles, &mut self.mmu.if_reg);
        if let Some(cart) = self.mmu.cart.as_mut() {
            cart.step(cycles);
        }

        cycles
    }

    /// Whether `exit_on_infinite_jr` tripped.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Drive the machine until `should_close` returns true, delivering
    /// frames and audio buffers to the host and throttling each frame to the
    /// ~59.73 Hz wall-clock target.
    pub fn run<SC, VB, AU>(&mut self, mut should_close: SC, mut on_vblank: VB, mut on_audio: AU)
    where
        SC: FnMut() -> bool,
        VB: FnMut(&FrameBuffer),
        AU: FnMut(&[f32], &[f32]),
    {
        let frame_budget = Duration::from_secs_f64(1.0 / TARGET_FPS);

        while !should_close() {
            let frame_start = Instant::now();
            let frame_end_cycles = self.elapsed_cycles + CYCLES_PER_FRAME as u64;

            while self.elapsed_cycles < frame_end_cycles {
                if should_close() || self.exit_requested {
                    return;
                }
                self.tick();

                if self.mmu.ppu.take_frame_ready() {
                    // Snapshot to owned storage before the callback: the
                    // PPU keeps rendering into its live buffer, and host
                    // threads may hold on past this step.
                    let frame = Box::new(*self.mmu.ppu.framebuffer());
                    on_vblank(&*frame);
                }
                if let Some((left, right)) = self.mmu.apu.drain_samples() {
                    on_audio(&left, &right);
                }
            }

            let spent = frame_start.elapsed();
            if spent < frame_budget {
                std::thread::sleep(frame_budget - spent);
            }
        }
    }
}
