//! # Memory
//!
//! 4 MiB of RAM plus a borrowed ROM image, decoded through the fixed
//! [`region`] table. Accesses are always whole little-endian words; byte
//! accesses are built on top of them.

pub mod region;

use thiserror::Error;

use crate::bitwise::Bits;

use region::{ADDRESS_MASK, MemoryRegion};

/// Size of the RAM fitted to the machine.
pub const RAM_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

impl std::fmt::Display for AccessKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read => f.write_str("read"),
            Self::Write => f.write_str("write"),
        }
    }
}

/// Non-fatal oddities met while accessing memory. The access still
/// completes (reads yield 0, writes are dropped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDiagnostic {
    #[error("read past end of ROM at {address:#010X}; returning 0")]
    OutOfBoundsRomRead { address: u32 },

    #[error("{access} on stubbed {target} at {address:#010X}")]
    StubbedIoAccess {
        address: u32,
        access: AccessKind,
        target: &'static str,
    },
}

pub struct Memory<'rom> {
    ram: Vec<u8>,
    rom: &'rom [u8],

    /// The ROM answers on the low addresses from reset until the first
    /// access to one of the ROM windows.
    rom_mapped_low: bool,

    last_diagnostic: Option<AccessDiagnostic>,
}

impl<'rom> Memory<'rom> {
    #[must_use]
    pub fn new(rom: &'rom [u8]) -> Self {
        tracing::debug!("ROM size: {:#X}", rom.len());

        Self {
            ram: vec![0; RAM_SIZE],
            rom,
            rom_mapped_low: true,
            last_diagnostic: None,
        }
    }

    #[must_use]
    pub const fn rom(&self) -> &'rom [u8] {
        self.rom
    }

    #[must_use]
    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    /// Replaces the RAM contents. `ram` is truncated or zero padded to [`RAM_SIZE`].
    pub fn load_ram(&mut self, ram: &[u8]) {
        let len = ram.len().min(RAM_SIZE);
        self.ram[..len].copy_from_slice(&ram[..len]);
        self.ram[len..].fill(0);
    }

    #[must_use]
    pub const fn is_rom_mapped_low(&self) -> bool {
        self.rom_mapped_low
    }

    pub const fn map_rom_low(&mut self, mapped: bool) {
        self.rom_mapped_low = mapped;
    }

    /// Returns and clears the last diagnostic raised by an access.
    pub const fn take_diagnostic(&mut self) -> Option<AccessDiagnostic> {
        self.last_diagnostic.take()
    }

    pub fn load_word(&mut self, address: u32) -> u32 {
        let address = address & ADDRESS_MASK;
        let region = MemoryRegion::decode(address);
        self.touch(region);

        match region {
            MemoryRegion::Logical if self.rom_mapped_low => {
                tracing::trace!("fetching from ROM mapped low");
                self.read_rom(address, address)
            }
            MemoryRegion::Logical | MemoryRegion::PhysicalRam => self.read_ram(address),
            MemoryRegion::Io | MemoryRegion::LowRom => {
                self.report(AccessDiagnostic::StubbedIoAccess {
                    address,
                    access: AccessKind::Read,
                    target: if region == MemoryRegion::Io {
                        "I/O controllers"
                    } else {
                        "low ROM"
                    },
                });
                0
            }
            MemoryRegion::HighRom => self.read_rom(address, address - region.base()),
        }
    }

    pub fn store_word(&mut self, address: u32, value: u32) {
        let address = address & ADDRESS_MASK;
        let region = MemoryRegion::decode(address);
        self.touch(region);

        match region {
            MemoryRegion::Logical | MemoryRegion::PhysicalRam => {
                let index = Self::ram_index(address);
                self.ram[index..index + 4].copy_from_slice(&value.to_le_bytes());
            }
            _ => self.report(AccessDiagnostic::StubbedIoAccess {
                address,
                access: AccessKind::Write,
                target: MemoryRegion::write_target(address),
            }),
        }
    }

    /// Loads the containing word and extracts the lane selected by `address & 3`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn load_byte(&mut self, address: u32) -> u8 {
        let word = self.load_word(address);
        word.get_byte((address & 0b11) as u8)
    }

    /// Stores a whole word holding `value` in the lane selected by
    /// `address & 3` and zero in the other three lanes.
    ///
    /// The previous content of the other lanes is NOT preserved.
    #[allow(clippy::cast_possible_truncation)]
    pub fn store_byte(&mut self, address: u32, value: u8) {
        let word = 0_u32.with_byte((address & 0b11) as u8, value);
        self.store_word(address, word);
    }

    fn touch(&mut self, region: MemoryRegion) {
        if self.rom_mapped_low && region.unmaps_low_rom() {
            tracing::debug!("{region} accessed, ROM no longer mapped low");
            self.rom_mapped_low = false;
        }
    }

    fn report(&mut self, diagnostic: AccessDiagnostic) {
        match diagnostic {
            AccessDiagnostic::OutOfBoundsRomRead { .. } => tracing::warn!("{diagnostic}"),
            AccessDiagnostic::StubbedIoAccess { .. } => tracing::debug!("{diagnostic}"),
        }
        self.last_diagnostic = Some(diagnostic);
    }

    /// RAM repeats every [`RAM_SIZE`] bytes inside both RAM windows.
    const fn ram_index(address: u32) -> usize {
        (address as usize) & (RAM_SIZE - 1)
    }

    fn read_ram(&self, address: u32) -> u32 {
        let index = Self::ram_index(address);
        let mut bytes = [0; 4];
        bytes.copy_from_slice(&self.ram[index..index + 4]);
        u32::from_le_bytes(bytes)
    }

    fn read_rom(&mut self, address: u32, offset: u32) -> u32 {
        let offset = offset as usize;
        let Some(available) = self.rom.get(offset..) else {
            self.report(AccessDiagnostic::OutOfBoundsRomRead { address });
            return 0;
        };

        if available.is_empty() {
            self.report(AccessDiagnostic::OutOfBoundsRomRead { address });
            return 0;
        }

        // A ROM image whose size is not a multiple of 4 reads as zero padded.
        let mut bytes = [0; 4];
        let len = available.len().min(4);
        bytes[..len].copy_from_slice(&available[..len]);
        u32::from_le_bytes(bytes)
    }
}

impl std::fmt::Debug for Memory<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("ram_size", &self.ram.len())
            .field("rom_size", &self.rom.len())
            .field("rom_mapped_low", &self.rom_mapped_low)
            .finish_non_exhaustive()
    }
}
