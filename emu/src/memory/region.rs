//! # Address Map
//!
//! The ARM2 drives a 26-bit address bus. Every address is reduced to
//! `addr & 0x03FF_FFFC` before it is decoded, so only word aligned addresses
//! inside 64 MiB reach a region.
//!
//! ```text
//! 0x000_0000 ┌──────────────────────────────┐
//!            │ Logical RAM                  │ ROM instead while mapped low (reset)
//! 0x200_0000 ├──────────────────────────────┤
//!            │ Physical RAM                 │
//! 0x300_0000 ├──────────────────────────────┤
//!            │ I/O controllers              │ stubbed
//! 0x340_0000 ├──────────────────────────────┤
//!            │ Low ROM    (writes: VIDC)    │ stubbed
//! 0x360_0000 │            (writes: MEMC)    │
//! 0x380_0000 ├──────────────────────────────┤
//!            │ High ROM   (writes: L2P)     │ backed by the ROM image
//! 0x3FF_FFFF └──────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

/// Reduces an address to the 26-bit, word aligned bus value.
pub const ADDRESS_MASK: u32 = 0x03FF_FFFC;

pub const LOGICAL_RAM_START: u32 = 0x0000_0000;
pub const PHYSICAL_RAM_START: u32 = 0x0200_0000;
pub const IO_START: u32 = 0x0300_0000;
pub const LOW_ROM_START: u32 = 0x0340_0000;
pub const MEMC_START: u32 = 0x0360_0000;
pub const HIGH_ROM_START: u32 = 0x0380_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryRegion {
    /// `0x000_0000..=0x1FF_FFFF`, ROM or RAM depending on the low mapping.
    Logical,

    /// `0x200_0000..=0x2FF_FFFF`.
    PhysicalRam,

    /// `0x300_0000..=0x33F_FFFF`.
    Io,

    /// `0x340_0000..=0x37F_FFFF`, no ROM behind it.
    LowRom,

    /// `0x380_0000..=0x3FF_FFFF`, the ROM image.
    HighRom,
}

impl MemoryRegion {
    /// Decodes an (already masked or raw) address into its region.
    #[must_use]
    pub const fn decode(address: u32) -> Self {
        match address & ADDRESS_MASK {
            LOGICAL_RAM_START..PHYSICAL_RAM_START => Self::Logical,
            PHYSICAL_RAM_START..IO_START => Self::PhysicalRam,
            IO_START..LOW_ROM_START => Self::Io,
            LOW_ROM_START..HIGH_ROM_START => Self::LowRom,
            _ => Self::HighRom,
        }
    }

    /// Start address of the region.
    #[must_use]
    pub const fn base(self) -> u32 {
        match self {
            Self::Logical => LOGICAL_RAM_START,
            Self::PhysicalRam => PHYSICAL_RAM_START,
            Self::Io => IO_START,
            Self::LowRom => LOW_ROM_START,
            Self::HighRom => HIGH_ROM_START,
        }
    }

    /// Touching the ROM windows switches the ROM out of the low addresses.
    #[must_use]
    pub const fn unmaps_low_rom(self) -> bool {
        matches!(self, Self::LowRom | Self::HighRom)
    }

    /// Name of the device a write to `address` would land on.
    #[must_use]
    pub const fn write_target(address: u32) -> &'static str {
        match address & ADDRESS_MASK {
            LOGICAL_RAM_START..IO_START => "RAM",
            IO_START..LOW_ROM_START => "I/O controllers",
            LOW_ROM_START..MEMC_START => "VIDC",
            MEMC_START..HIGH_ROM_START => "DMA/MEMC",
            _ => "logical-to-physical translator",
        }
    }
}

impl std::fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Logical => f.write_str("logical RAM"),
            Self::PhysicalRam => f.write_str("physical RAM"),
            Self::Io => f.write_str("I/O controllers"),
            Self::LowRom => f.write_str("low ROM"),
            Self::HighRom => f.write_str("high ROM"),
        }
    }
}
