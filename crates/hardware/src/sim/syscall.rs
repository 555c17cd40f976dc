//! Linux system-call emulation.
//!
//! ECALL retires through a `SyscallHandler`. The default handler, `LinuxSyscalls`,
//! forwards the few calls a statically linked RV32 program makes at startup and
//! for I/O to the host through `libc`. It provides:
//! 1. **Identity:** `getuid`, `geteuid`, `getgid`, `getegid` all report root.
//! 2. **Heap:** `brk` echoes its argument; the image region already has headroom.
//! 3. **Files:** `openat`, `close`, `read`, `write`, `readlinkat`, `fstat`.
//! 4. **System info:** `uname` with the machine reported as `riscv32`.
//! 5. **Exit:** `exit` and `exit_group` end the run with the code in `a0`.
//!
//! Arguments arrive in `a0`..`a5`, the number in `a7`, and the result goes back
//! in `a0`. Host failures are returned to the guest as `-errno`.

use std::ffi::CString;

use crate::common::{RegisterFile, Result, SimError};
use crate::isa::abi;
use crate::soc::traits::{AccessWidth, Memory};

/// RISC-V Linux system-call numbers (asm-generic table).
pub mod nr {
    /// `openat(dirfd, path, flags, mode)`
    pub const OPENAT: u32 = 56;
    /// `close(fd)`
    pub const CLOSE: u32 = 57;
    /// `read(fd, buf, count)`
    pub const READ: u32 = 63;
    /// `write(fd, buf, count)`
    pub const WRITE: u32 = 64;
    /// `readlinkat(dirfd, path, buf, size)`
    pub const READLINKAT: u32 = 78;
    /// `fstat(fd, statbuf)`
    pub const FSTAT: u32 = 80;
    /// `exit(code)`
    pub const EXIT: u32 = 93;
    /// `exit_group(code)`
    pub const EXIT_GROUP: u32 = 94;
    /// `uname(buf)`
    pub const UNAME: u32 = 160;
    /// `getuid()`
    pub const GETUID: u32 = 174;
    /// `geteuid()`
    pub const GETEUID: u32 = 175;
    /// `getgid()`
    pub const GETGID: u32 = 176;
    /// `getegid()`
    pub const GETEGID: u32 = 177;
    /// `brk(addr)`
    pub const BRK: u32 = 214;
}

/// Longest guest path accepted by `openat` and `readlinkat`.
const PATH_MAX: u32 = 4096;

/// Size of one `utsname` field, NUL included.
const UTSNAME_FIELD: usize = 65;

/// Size of the guest `struct stat` (asm-generic 64-bit-file layout).
const GUEST_STAT_SIZE: u32 = 128;

/// Result of dispatching one system call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyscallOutcome {
    /// The result was written to `a0`; execution continues.
    Continue,
    /// The guest asked to exit with this status.
    Exit(i32),
}

/// Services ECALL at commit.
pub trait SyscallHandler {
    /// Handles the system call described by the committed register state.
    ///
    /// # Arguments
    ///
    /// * `regs` - Architectural registers; the result is written to `a0`.
    /// * `memory` - Guest memory, for buffer and path arguments.
    /// * `clock` - Current cycle, for logging.
    fn handle(
        &mut self,
        regs: &mut RegisterFile,
        memory: &mut dyn Memory,
        clock: u64,
    ) -> Result<SyscallOutcome>;
}

/// Host-backed Linux system calls.
///
/// With [`LinuxSyscalls::capturing`], writes to file descriptors 1 and 2 are
/// collected in memory instead of reaching the host.
#[derive(Debug, Default)]
pub struct LinuxSyscalls {
    captured: Option<Vec<u8>>,
}

impl LinuxSyscalls {
    /// Creates a handler that writes guest output straight to the host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handler that buffers guest stdout and stderr.
    pub fn capturing() -> Self {
        Self {
            captured: Some(Vec::new()),
        }
    }

    /// Output buffered so far, if capturing.
    pub fn captured(&self) -> Option<&[u8]> {
        self.captured.as_deref()
    }

    fn write(&mut self, memory: &dyn Memory, fd: u32, buf: u32, count: u32) -> Result<u32> {
        let bytes = memory.slice(buf, count)?;
        if let Some(out) = self.captured.as_mut().filter(|_| fd == 1 || fd == 2) {
            out.extend_from_slice(bytes);
            return Ok(count);
        }
        // SAFETY: `bytes` is a live borrow of exactly `count` bytes of guest memory.
        let ret = unsafe { libc::write(fd as i32, bytes.as_ptr().cast(), bytes.len()) };
        Ok(host_result(ret as i64))
    }
}

impl SyscallHandler for LinuxSyscalls {
    fn handle(
        &mut self,
        regs: &mut RegisterFile,
        memory: &mut dyn Memory,
        clock: u64,
    ) -> Result<SyscallOutcome> {
        let n = regs.read(abi::REG_A7);
        let [a0, a1, a2, a3] = [
            regs.read(abi::REG_A0),
            regs.read(abi::REG_A1),
            regs.read(abi::REG_A2),
            regs.read(abi::REG_A3),
        ];
        tracing::debug!(n, a0, a1, a2, clock, "syscall");

        let ret = match n {
            nr::GETUID | nr::GETEUID | nr::GETGID | nr::GETEGID => 0,
            nr::BRK => a0,
            nr::UNAME => sys_uname(memory, a0)?,
            nr::OPENAT => sys_openat(memory, a0, a1, a2, a3)?,
            nr::CLOSE => {
                // SAFETY: closing a descriptor touches no guest memory.
                host_result(i64::from(unsafe { libc::close(a0 as i32) }))
            }
            nr::READ => sys_read(memory, a0, a1, a2)?,
            nr::WRITE => self.write(memory, a0, a1, a2)?,
            nr::READLINKAT => sys_readlinkat(memory, a0, a1, a2, a3)?,
            nr::FSTAT => sys_fstat(memory, a0, a1)?,
            nr::EXIT | nr::EXIT_GROUP => {
                let code = a0 as i32;
                tracing::info!(code, clock, "guest exited");
                return Ok(SyscallOutcome::Exit(code));
            }
            other => return Err(SimError::UnimplementedSyscall(other)),
        };
        regs.write(abi::REG_A0, ret);
        Ok(SyscallOutcome::Continue)
    }
}

/// Maps a host return value to the guest convention: the value itself, or `-errno`.
fn host_result(ret: i64) -> u32 {
    if ret < 0 {
        let errno = std::io::Error::last_os_error()
            .raw_os_error()
            .unwrap_or(libc::EIO);
        (-errno) as u32
    } else {
        ret as u32
    }
}

/// Guest `AT_FDCWD` is -100 as a 32-bit word; widen it for the host.
const fn host_dirfd(dirfd: u32) -> i32 {
    dirfd as i32
}

/// Reads a NUL-terminated string from guest memory.
fn read_c_string(memory: &dyn Memory, addr: u32) -> Result<CString> {
    let mut bytes = Vec::new();
    for offset in 0..PATH_MAX {
        let byte = memory.read_integer(addr.wrapping_add(offset), AccessWidth::Byte, false)? as u8;
        if byte == 0 {
            return CString::new(bytes).map_err(|_| SimError::MemoryFault { addr });
        }
        bytes.push(byte);
    }
    Err(SimError::MemoryFault { addr })
}

fn sys_openat(memory: &dyn Memory, dirfd: u32, path: u32, flags: u32, mode: u32) -> Result<u32> {
    let path = read_c_string(memory, path)?;
    // SAFETY: `path` is a valid NUL-terminated string owned for the call.
    let fd = unsafe { libc::openat(host_dirfd(dirfd), path.as_ptr(), flags as i32, mode) };
    Ok(host_result(i64::from(fd)))
}

fn sys_read(memory: &mut dyn Memory, fd: u32, buf: u32, count: u32) -> Result<u32> {
    let bytes = memory.slice_mut(buf, count)?;
    // SAFETY: `bytes` is an exclusive borrow of exactly `count` bytes of guest memory.
    let ret = unsafe { libc::read(fd as i32, bytes.as_mut_ptr().cast(), bytes.len()) };
    Ok(host_result(ret as i64))
}

fn sys_readlinkat(
    memory: &mut dyn Memory,
    dirfd: u32,
    path: u32,
    buf: u32,
    size: u32,
) -> Result<u32> {
    let path = read_c_string(memory, path)?;
    let out = memory.slice_mut(buf, size)?;
    // SAFETY: `path` is NUL-terminated and `out` is an exclusive borrow of `size` bytes.
    let ret = unsafe {
        libc::readlinkat(host_dirfd(dirfd), path.as_ptr(), out.as_mut_ptr().cast(), out.len())
    };
    Ok(host_result(ret as i64))
}

fn sys_fstat(memory: &mut dyn Memory, fd: u32, buf: u32) -> Result<u32> {
    // SAFETY: `libc::stat` is plain old data; all-zero is a valid value.
    let mut st: libc::stat = unsafe { std::mem::zeroed() };
    // SAFETY: `st` is a valid, writable `stat` for the duration of the call.
    let ret = unsafe { libc::fstat(fd as i32, &raw mut st) };
    if ret < 0 {
        return Ok(host_result(i64::from(ret)));
    }

    let out = memory.slice_mut(buf, GUEST_STAT_SIZE)?;
    out.fill(0);
    let mut put = |offset: usize, bytes: &[u8]| {
        out[offset..offset + bytes.len()].copy_from_slice(bytes);
    };
    put(0, &(st.st_dev as u64).to_le_bytes());
    put(8, &(st.st_ino as u64).to_le_bytes());
    put(16, &(st.st_mode as u32).to_le_bytes());
    put(20, &(st.st_nlink as u32).to_le_bytes());
    put(24, &st.st_uid.to_le_bytes());
    put(28, &st.st_gid.to_le_bytes());
    put(32, &(st.st_rdev as u64).to_le_bytes());
    put(48, &(st.st_size as i64).to_le_bytes());
    put(56, &(st.st_blksize as i32).to_le_bytes());
    put(64, &(st.st_blocks as i64).to_le_bytes());
    for (offset, sec, nsec) in [
        (72, st.st_atime as i64, st.st_atime_nsec as u32),
        (88, st.st_mtime as i64, st.st_mtime_nsec as u32),
        (104, st.st_ctime as i64, st.st_ctime_nsec as u32),
    ] {
        put(offset, &sec.to_le_bytes());
        put(offset + 8, &nsec.to_le_bytes());
    }
    Ok(0)
}

fn sys_uname(memory: &mut dyn Memory, buf: u32) -> Result<u32> {
    // SAFETY: `libc::utsname` is plain old data; all-zero is a valid value.
    let mut host: libc::utsname = unsafe { std::mem::zeroed() };
    // SAFETY: `host` is a valid, writable `utsname` for the duration of the call.
    let ret = unsafe { libc::uname(&raw mut host) };
    if ret < 0 {
        return Ok(host_result(i64::from(ret)));
    }

    let machine = b"riscv32";
    let fields: [&[libc::c_char]; 4] = [&host.sysname, &host.nodename, &host.release, &host.version];
    let out = memory.slice_mut(buf, (UTSNAME_FIELD * 6) as u32)?;
    out.fill(0);
    for (idx, field) in fields.iter().enumerate() {
        let dst = &mut out[idx * UTSNAME_FIELD..(idx + 1) * UTSNAME_FIELD - 1];
        for (d, s) in dst.iter_mut().zip(field.iter().take_while(|c| **c != 0)) {
            *d = *s as u8;
        }
    }
    out[4 * UTSNAME_FIELD..4 * UTSNAME_FIELD + machine.len()].copy_from_slice(machine);
    Ok(0)
}
