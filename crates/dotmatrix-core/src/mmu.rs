use crate::{
    apu::Apu, cartridge::Cartridge, input::Input, ppu::Ppu, serial::Serial, timer::Timer,
};

const WRAM_SIZE: usize = 0x2000;
const HRAM_SIZE: usize = 0x7F;

/// Address-space router. Owns work RAM and high RAM and delegates every
/// other region to its component owner.
pub struct Mmu {
    pub cart: Option<Cartridge>,
    wram: [u8; WRAM_SIZE],
    hram: [u8; HRAM_SIZE],
    pub if_reg: u8,
    pub ie_reg: u8,
    pub ppu: Ppu,
    pub apu: Apu,
    pub timer: Timer,
    pub serial: Serial,
    pub input: Input,
}

impl Mmu {
    pub fn new() -> Self {
        let mut timer = Timer::new();
        // DIV phase at the end of the boot ROM; mooneye's boot_div tests
        // measure this value on DMG.
        timer.step(0xABCC, &mut 0u8);

        Self {
            cart: None,
            wram: [0; WRAM_SIZE],
            hram: [0; HRAM_SIZE],
            if_reg: 0xE1,
            ie_reg: 0,
            ppu: Ppu::new(),
            apu: Apu::new(),
            timer,
            serial: Serial::new(false),
            input: Input::new(),
        }
    }

    pub fn load_cart(&mut self, cart: Cartridge) {
        self.cart = Some(cart);
    }

    pub fn read_byte(&mut self, addr: u16) -> u8 {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => {
                self.cart.as_ref().map(|c| c.read(addr)).unwrap_or(0xFF)
            }
            0x8000..=0x9FFF => self.ppu.vram[(addr - 0x8000) as usize],
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize],
            // Echo RAM mirrors 0xC000-0xDDFF.
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize],
            0xFE00..=0xFE9F => self.ppu.oam[(addr - 0xFE00) as usize],
            0xFEA0..=0xFEFF => 0xFF,
            0xFF00 => self.input.read(),
            0xFF01 | 0xFF02 => self.serial.read(addr),
            0xFF04..=0xFF07 => self.timer.read(addr),
            0xFF0F => self.if_reg,
            0xFF10..=0xFF3F => self.apu.read_reg(addr),
            0xFF40..=0xFF4B => self.ppu.read_reg(addr),
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize],
            0xFFFF => self.ie_reg,
            _ => 0xFF,
        }
    }

    pub fn write_byte(&mut self, addr: u16, val: u8) {
        match addr {
            0x0000..=0x7FFF | 0xA000..=0xBFFF => {
                if let Some(cart) = self.cart.as_mut() {
                    cart.write(addr, val);
                }
            }
            0x8000..=0x9FFF => self.ppu.vram[(addr - 0x8000) as usize] = val,
            0xC000..=0xDFFF => self.wram[(addr - 0xC000) as usize] = val,
            0xE000..=0xFDFF => self.wram[(addr - 0xE000) as usize] = val,
            0xFE00..=0xFE9F => self.ppu.oam[(addr - 0xFE00) as usize] = val,
            0xFEA0..=0xFEFF => {}
            0xFF00 => self.input.write(val),
            0xFF01 | 0xFF02 => self.serial.write(addr, val, &mut self.if_reg),
            0xFF04 => self.reset_div(),
            0xFF05..=0xFF07 => self.timer.write(addr, val, &mut self.if_reg),
            0xFF0F => self.if_reg = (val & 0x1F) | (self.if_reg & 0xE0),
            0xFF10..=0xFF3F => self.apu.write_reg(addr, val),
            0xFF46 => {
                self.ppu.dma = val;
                self.oam_dma(val);
            }
            0xFF40..=0xFF4B => self.ppu.write_reg(addr, val, &mut self.if_reg),
            0xFF80..=0xFFFE => self.hram[(addr - 0xFF80) as usize] = val,
            0xFFFF => self.ie_reg = val,
            _ => {}
        }
    }

    pub fn reset_div(&mut self) {
        self.timer.reset_div(&mut self.if_reg);
    }

    /// OAM DMA: copy 160 bytes from `src << 8` into OAM. The copy is modeled
    /// as instantaneous; on hardware it occupies 160 machine cycles.
    fn oam_dma(&mut self, src: u8) {
        let base = (src as u16) << 8;
        for i in 0..0xA0u16 {
            let mut addr = base.wrapping_add(i);
            // Sources above 0xDFFF alias the echo region back into WRAM.
            if addr >= 0xFE00 {
                addr = addr.wrapping_sub(0x2000);
            }
            let byte = self.read_byte(addr);
            self.ppu.oam[i as usize] = byte;
        }
    }

    pub fn take_serial(&mut self) -> Vec<u8> {
        self.serial.take_output()
    }
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}
