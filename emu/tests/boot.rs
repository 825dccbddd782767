use emu::cpu::registers::REG_LR;
use emu::{AccessDiagnostic, Arm2, FaultKind, MachineState, StepOutcome};
use pretty_assertions::assert_eq;
use rand::Rng;

fn rom_with(words: &[u32]) -> Vec<u8> {
    words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

/// Jumps from the reset vector into high ROM, loads two literals, stores one
/// through the other into low RAM and reads it back post-indexed.
const BOOT: [u32; 11] = [
    0xEAE0_0002, // 0x00  B 0x03800010
    0,
    0,
    0,
    0xE59F_100C, // 0x10  LDR R1, [R15, 12]
    0xE59F_200C, // 0x14  LDR R2, [R15, 12]
    0xE581_2000, // 0x18  STR R2, [R1]
    0xE491_3004, // 0x1C  LDR R3, [R1], 4
    0xE800_0000, // 0x20  undefined, stops the run
    0x0000_1000, // 0x24
    0xDEAD_BEEF, // 0x28
];

#[test]
fn unconditional_branch_with_zero_offset() {
    let rom = rom_with(&[0xEA00_0000]);
    let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());
    cpu.registers.set(REG_LR, 0x5555);

    assert_eq!(cpu.step(), Ok(StepOutcome::Executed));

    assert_eq!(cpu.fetch_address(), 0x0000_0008);
    assert_eq!(cpu.registers.get(REG_LR), 0x5555);
    assert_eq!(cpu.sink(), &vec!["00000000  EA000000  B 0x00000008".to_string()]);
}

#[test]
fn branch_with_link() {
    let rom = rom_with(&[0xEB00_0010]);
    let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());

    cpu.step().unwrap();

    assert_eq!(cpu.registers.get(REG_LR), 0x8);
    assert_eq!(cpu.fetch_address(), 0x0000_0048);
}

#[test]
fn load_pre_indexed_from_physical_ram() {
    // LDR R0, [R1]
    let rom = rom_with(&[0xE591_0000]);
    let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());
    cpu.registers.set(1, 0x0200_1000);
    cpu.memory.store_word(0x0200_1000, 0x4433_2211);

    cpu.step().unwrap();

    assert_eq!(cpu.registers.get(0), 0x4433_2211);
    assert_eq!(cpu.registers.get(1), 0x0200_1000);
    assert_eq!(cpu.fetch_address(), 4);
}

#[test]
fn boot_into_high_rom() {
    let rom = rom_with(&BOOT);
    let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());

    let fault = cpu.run();

    assert_eq!(fault.kind, FaultKind::UndefinedInstruction);
    assert_eq!(fault.address, 0x0380_0020);
    assert_eq!(fault.word, 0xE800_0000);
    assert_eq!(cpu.steps(), 5);

    assert!(!cpu.memory.is_rom_mapped_low());
    assert_eq!(cpu.registers.get(1), 0x1004);
    assert_eq!(cpu.registers.get(2), 0xDEAD_BEEF);
    assert_eq!(cpu.registers.get(3), 0xDEAD_BEEF);
    assert_eq!(cpu.memory.load_word(0x1000), 0xDEAD_BEEF);
    assert_eq!(cpu.memory.load_word(0x0200_1000), 0xDEAD_BEEF);

    assert_eq!(
        cpu.into_sink(),
        vec![
            "00000000  EAE00002  B 0x03800010",
            "03800010  E59F100C  LDR R1, [R15, 12]",
            "03800014  E59F200C  LDR R2, [R15, 12]",
            "03800018  E5812000  STR R2, [R1]",
            "0380001C  E4913004  LDR R3, [R1], 4",
            "03800020  E8000000  ...",
        ]
    );
}

#[test]
fn fault_is_repeatable() {
    let rom = rom_with(&BOOT);
    let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());

    let first = cpu.run();
    let second = cpu.step().unwrap_err();
    assert_eq!(first, second);
}

#[test]
fn conditional_branch_follows_flags() {
    let mut rng = rand::thread_rng();

    for _ in 0..200 {
        let cond = rng.gen_range(0..16_u32);
        let flags = rng.gen_range(0..16_u32);
        // B<cond> +0x40
        let rom = rom_with(&[(cond << 28) | 0x0A00_0010]);
        let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());
        cpu.registers.set(15, (flags << 28) | 8);

        let expected = cpu
            .registers
            .psr()
            .can_execute(emu::cpu::condition::Condition::of_word(cond << 28));

        match cpu.step() {
            Ok(StepOutcome::Executed) => {
                assert!(expected);
                assert_eq!(cpu.fetch_address(), 0x48);
            }
            Ok(StepOutcome::Skipped) => {
                assert!(!expected);
                assert_eq!(cpu.fetch_address(), 0x4);
            }
            Err(fault) => panic!("{fault}"),
        }
        assert_eq!(cpu.registers.get(15) >> 28, flags);
    }
}

#[test]
fn loads_past_rom_end_read_zero() {
    // LDR R0, [R1]
    let rom = rom_with(&[0xE591_0000]);
    let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());
    cpu.registers.set(0, 0xFFFF_FFFF);
    cpu.registers.set(1, 0x0380_1000);

    cpu.step().unwrap();

    assert_eq!(cpu.registers.get(0), 0);
    assert_eq!(
        cpu.memory.take_diagnostic(),
        Some(AccessDiagnostic::OutOfBoundsRomRead {
            address: 0x0380_1000
        })
    );
}

#[test]
fn snapshot_survives_json() {
    let rom = rom_with(&BOOT);
    let mut cpu = Arm2::with_sink(&rom, Vec::<String>::new());
    cpu.run_for(4).unwrap();

    let state = cpu.snapshot();
    let json = serde_json::to_string(&state).unwrap();
    let decoded: MachineState = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, state);

    let mut resumed = Arm2::with_sink(&rom, Vec::<String>::new());
    resumed.restore(decoded);
    assert_eq!(resumed.steps(), 4);
    assert!(!resumed.memory.is_rom_mapped_low());

    let fault = resumed.run();
    assert_eq!(fault.address, 0x0380_0020);
    assert_eq!(resumed.registers.get(3), 0xDEAD_BEEF);
    assert_eq!(resumed.registers.visible(), {
        cpu.run();
        cpu.registers.visible()
    });
}
