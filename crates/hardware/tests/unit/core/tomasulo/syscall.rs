//! # System Calls at Commit
//!
//! ECALL runs only when it reaches the head, sees every older register write,
//! and squashes so younger instructions observe its result in `a0`.

use pretty_assertions::assert_eq;
use rvsim_tomasulo_core::SimError;

use crate::common::TestContext;
use crate::common::builder::instruction::{InstructionBuilder as I, exit};
use crate::common::harness::{DATA_BASE, program};

#[test]
fn write_then_use_result() {
    let prog = program([
        &[
            I::new().lui(11, DATA_BASE >> 12).build(),
            I::new().addi(10, 0, 1).build(),
            I::new().addi(12, 0, 4).build(),
            I::new().addi(17, 0, 64).build(),
            I::new().ecall().build(),
            // a0 now holds the byte count.
            I::new().add(10, 10, 10).build(),
        ],
        &exit(),
    ]);
    let mut ctx = TestContext::new(&prog).poke(DATA_BASE, u32::from_le_bytes(*b"hi!\n"));
    assert_eq!(ctx.run(), 8);
    assert_eq!(ctx.output(), b"hi!\n");

    let log = ctx.log.borrow();
    let numbers: Vec<u32> = log.calls.iter().map(|c| c.number).collect();
    assert_eq!(numbers, vec![64, 93]);
    assert_eq!((log.calls[0].a0, log.calls[0].a1, log.calls[0].a2), (1, DATA_BASE, 4));
    assert!(log.calls[0].cycle < log.calls[1].cycle);
    assert_eq!(ctx.core.stats().syscalls, 2);
}

#[test]
fn ecall_sees_slow_older_results() {
    // The exit status comes out of a long divide issued just before the ECALL.
    let prog = program([
        &[
            I::new().addi(1, 0, 84).build(),
            I::new().addi(2, 0, 2).build(),
            I::new().addi(17, 0, 93).build(),
            I::new().div(10, 1, 2).build(),
            I::new().ecall().build(),
        ],
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 42);
}

#[test]
fn exit_group_also_exits() {
    let prog = program([&[
        I::new().addi(10, 0, 3).build(),
        I::new().addi(17, 0, 94).build(),
        I::new().ecall().build(),
    ]]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 3);
}

#[test]
fn negative_exit_status() {
    let prog = program([&[I::new().addi(10, 0, -1).build()], &exit()]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), -1);
}

#[test]
fn unimplemented_syscall_is_fatal() {
    let prog = program([&[I::new().addi(17, 0, 999).build(), I::new().ecall().build()], &exit()]);
    let mut ctx = TestContext::new(&prog);
    assert!(matches!(ctx.try_run(), Err(SimError::UnimplementedSyscall(999))));
}

#[test]
fn nothing_runs_after_exit() {
    let prog = program([
        &exit(),
        &[I::new().addi(10, 0, 50).build(), I::new().sw(2, 10, -4).build()],
    ]);
    let mut ctx = TestContext::new(&prog);
    assert_eq!(ctx.run(), 0);
    assert_eq!(ctx.reg(10), 0);
    assert_eq!(ctx.core.memory().slice(0xFFFF_FFEC, 4).unwrap(), &[0, 0, 0, 0]);

    // The clock stops at exit.
    let cycle = ctx.core.cycle();
    let report = ctx.core.tick().unwrap();
    assert_eq!(report.exit, Some(0));
    assert_eq!(ctx.core.cycle(), cycle);
}

#[test]
fn handler_runs_once_with_committed_arguments() {
    use rvsim_tomasulo_core::common::RegisterFile;
    use rvsim_tomasulo_core::config::Config;
    use rvsim_tomasulo_core::core::Tomasulo;
    use rvsim_tomasulo_core::isa::abi;
    use rvsim_tomasulo_core::sim::syscall::SyscallOutcome;
    use rvsim_tomasulo_core::soc::FlatMemory;

    use crate::common::harness::{CODE_BASE, IMAGE_LEN, small_layout};
    use crate::common::mocks::syscall::MockHandler;

    // A slow divide feeds a0; the handler must still see its result.
    let prog = program([
        &[
            I::new().addi(5, 0, 84).build(),
            I::new().addi(6, 0, 2).build(),
            I::new().div(10, 5, 6).build(),
        ],
        &exit(),
    ]);
    let mut memory = FlatMemory::new(&small_layout(), CODE_BASE, IMAGE_LEN);
    let bytes: Vec<u8> = prog.iter().flat_map(|w| w.to_le_bytes()).collect();
    memory.load(CODE_BASE, &bytes).unwrap();
    let mut regs = RegisterFile::new();
    regs.pc = CODE_BASE;

    let mut handler = MockHandler::new();
    handler
        .expect_handle()
        .times(1)
        .withf(|regs, _, _| regs.read(abi::REG_A7) == 93 && regs.read(abi::REG_A0) == 42)
        .returning(|regs, _, _| Ok(SyscallOutcome::Exit(regs.read(abi::REG_A0) as i32)));

    let mut core = Tomasulo::new(&Config::default(), regs, Box::new(memory), Box::new(handler));
    let mut exit_code = None;
    for _ in 0..1_000 {
        exit_code = core.tick().unwrap().exit;
        if exit_code.is_some() {
            break;
        }
    }
    assert_eq!(exit_code, Some(42));
}
