//! Shared helpers: ROM images are synthesized in memory, with header bytes
//! filled in and code placed at the entry point. No fixtures on disk.

#![allow(dead_code)]

use dotmatrix_core::{GameBoy, Options};

pub const ROM_BANK_SIZE: usize = 0x4000;

/// Build a ROM image of `banks` 16 KiB banks with the given cartridge type
/// and RAM size code, and `code` placed at 0x0100.
pub fn build_rom(cart_type: u8, ram_code: u8, banks: usize, code: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; ROM_BANK_SIZE * banks.max(2)];
    rom[0x0134..0x0139].copy_from_slice(b"DMTRX");
    rom[0x0147] = cart_type;
    rom[0x0148] = rom_size_code(banks.max(2));
    rom[0x0149] = ram_code;
    rom[0x0100..0x0100 + code.len()].copy_from_slice(code);
    rom
}

fn rom_size_code(banks: usize) -> u8 {
    // Header encodes bank count as 2 << code.
    let mut code = 0u8;
    while (2usize << code) < banks {
        code += 1;
    }
    code
}

/// A plain 32 KiB no-MBC ROM running `code` from the entry point.
pub fn simple_rom(code: &[u8]) -> Vec<u8> {
    build_rom(0x00, 0x00, 2, code)
}

pub fn boot(rom: Vec<u8>) -> GameBoy {
    GameBoy::new(rom, Options::default(), None).expect("valid test ROM")
}

pub fn boot_with_options(rom: Vec<u8>, options: Options) -> GameBoy {
    GameBoy::new(rom, options, None).expect("valid test ROM")
}

/// Step until at least `cycles` T-states have elapsed.
pub fn run_cycles(gb: &mut GameBoy, cycles: u64) {
    let target = gb.elapsed_cycles() + cycles;
    while gb.elapsed_cycles() < target {
        gb.tick();
    }
}
