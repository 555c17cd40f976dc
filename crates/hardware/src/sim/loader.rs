//! ELF Loader and Process Initialization.
//!
//! This module turns a statically linked RV32 ELF executable into a ready-to-run
//! guest. It performs:
//! 1. **Parsing:** Reads the ELF32 file header and program headers with `object`.
//! 2. **Segment loading:** Copies every non-empty `PT_LOAD` segment into the image
//!    region; the zero-initialised tail of each segment covers `.bss`.
//! 3. **Stack setup:** Builds the Linux initial stack (program headers, program
//!    name, `argc`/`argv`, an empty `envp`, and the auxiliary vector) at the top of
//!    the address space, with `sp` aligned to 16 bytes.

use std::path::Path;

use object::LittleEndian;
use object::elf::{EM_RISCV, FileHeader32, PT_LOAD, ProgramHeader32};
use object::read::elf::{FileHeader, ProgramHeader};

use crate::common::constants::{GUEST_PAGE_SIZE, WORD_SIZE};
use crate::common::{RegisterFile, Result, SimError};
use crate::config::MemoryConfig;
use crate::isa::abi;
use crate::soc::memory::FlatMemory;
use crate::soc::traits::{AccessWidth, Memory};

/// Auxiliary vector keys placed on the initial stack.
mod auxv {
    pub const AT_NULL: u32 = 0;
    pub const AT_PHDR: u32 = 3;
    pub const AT_PHENT: u32 = 4;
    pub const AT_PHNUM: u32 = 5;
    pub const AT_PAGESZ: u32 = 6;
    pub const AT_ENTRY: u32 = 9;
    pub const AT_SECURE: u32 = 23;
    pub const AT_RANDOM: u32 = 25;
}

/// Size of one ELF32 program header.
const PHENT_SIZE: u32 = size_of::<ProgramHeader32<LittleEndian>>() as u32;

/// A loaded program: its memory plus the initial register values.
#[derive(Debug)]
pub struct LoadedImage {
    /// Guest memory with segments and initial stack in place.
    pub memory: FlatMemory,
    /// Entry point from the ELF header.
    pub entry: u32,
    /// Initial stack pointer.
    pub sp: u32,
    /// Lowest loaded virtual address.
    pub image_base: u32,
    /// One past the highest loaded virtual address (before headroom).
    pub image_end: u32,
}

impl LoadedImage {
    /// Register file with `pc` at the entry point and `sp` set.
    pub fn registers(&self) -> RegisterFile {
        let mut regs = RegisterFile::new();
        regs.pc = self.entry;
        regs.write(abi::REG_SP, self.sp);
        regs
    }
}

/// Reads and loads an ELF executable from disk.
///
/// # Arguments
///
/// * `path` - Path to the executable; its display form becomes `argv[0]`.
/// * `layout` - Stack, TLS, and heap sizes.
pub fn load_elf(path: impl AsRef<Path>, layout: &MemoryConfig) -> Result<LoadedImage> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    load_elf_bytes(&data, &path.display().to_string(), layout)
}

/// Loads an ELF executable already in memory.
///
/// # Arguments
///
/// * `data` - Raw ELF file contents.
/// * `program_name` - String placed on the stack as `argv[0]`.
/// * `layout` - Stack, TLS, and heap sizes.
///
/// # Returns
///
/// The populated memory, entry point, and initial stack pointer.
pub fn load_elf_bytes(data: &[u8], program_name: &str, layout: &MemoryConfig) -> Result<LoadedImage> {
    let header = FileHeader32::<LittleEndian>::parse(data)?;
    let endian = header.endian()?;
    if header.e_machine(endian) != EM_RISCV {
        return Err(SimError::InvalidImage(format!(
            "e_machine {} is not RISC-V",
            header.e_machine(endian)
        )));
    }

    let segments: Vec<_> = header
        .program_headers(endian, data)?
        .iter()
        .filter(|ph| ph.p_type(endian) == PT_LOAD && ph.p_memsz(endian) != 0)
        .collect();
    let image_base = segments
        .iter()
        .map(|ph| ph.p_vaddr(endian))
        .min()
        .ok_or_else(|| SimError::InvalidImage("no loadable segments".into()))?;
    let image_end = segments
        .iter()
        .map(|ph| ph.p_vaddr(endian).wrapping_add(ph.p_memsz(endian)))
        .max()
        .unwrap_or(image_base);

    let mut memory = FlatMemory::new(layout, image_base, image_end.wrapping_sub(image_base));
    for ph in &segments {
        let vaddr = ph.p_vaddr(endian);
        let bytes = ph
            .data(endian, data)
            .map_err(|()| SimError::InvalidImage(format!("segment at {vaddr:#x} exceeds file")))?;
        tracing::debug!(
            vaddr = format_args!("{vaddr:#010x}"),
            filesz = bytes.len(),
            memsz = ph.p_memsz(endian),
            "load segment"
        );
        memory.load(vaddr, bytes)?;
    }

    let entry = header.e_entry(endian);
    let phnum = u32::from(header.e_phnum(endian));
    let phoff = header.e_phoff(endian) as usize;
    let phdrs = data
        .get(phoff..phoff + (phnum * PHENT_SIZE) as usize)
        .ok_or_else(|| SimError::InvalidImage("program headers exceed file".into()))?;

    let sp = build_stack(&mut memory, phdrs, program_name, entry, phnum)?;
    tracing::info!(
        entry = format_args!("{entry:#010x}"),
        sp = format_args!("{sp:#010x}"),
        "loaded {program_name}"
    );

    Ok(LoadedImage {
        memory,
        entry,
        sp,
        image_base,
        image_end,
    })
}

/// Writes the initial process stack and returns the stack pointer.
///
/// Layout, from high to low addresses: raw program headers, the NUL-terminated
/// program name, then (16-byte aligned) `argc`, `argv[0]`, `NULL`, `NULL` for
/// `envp`, and the auxiliary vector pairs ending in `AT_NULL`.
fn build_stack(
    memory: &mut FlatMemory,
    phdrs: &[u8],
    program_name: &str,
    entry: u32,
    phnum: u32,
) -> Result<u32> {
    let mut top = 0u32.wrapping_sub(phdrs.len() as u32);
    memory.load(top, phdrs)?;
    let phdr_addr = top;

    let mut name = program_name.as_bytes().to_vec();
    name.push(0);
    top = top.wrapping_sub(name.len() as u32);
    memory.load(top, &name)?;
    let argv0 = top;

    top &= !(WORD_SIZE - 1);

    let aux = [
        (auxv::AT_ENTRY, entry),
        (auxv::AT_PHNUM, phnum),
        (auxv::AT_PHENT, PHENT_SIZE),
        (auxv::AT_PHDR, phdr_addr),
        (auxv::AT_PAGESZ, GUEST_PAGE_SIZE),
        (auxv::AT_SECURE, 0),
        (auxv::AT_RANDOM, top),
        (auxv::AT_NULL, 0),
    ];

    let argc = 1u32;
    let words = 1 + argc + 1 + 1 + 2 * aux.len() as u32;
    top = top.wrapping_sub(words * WORD_SIZE) & !15;

    let mut cursor = top;
    let mut push = |value: u32| -> Result<()> {
        memory.write(cursor, AccessWidth::Word, value)?;
        cursor = cursor.wrapping_add(WORD_SIZE);
        Ok(())
    };
    push(argc)?;
    push(argv0)?;
    push(0)?;
    push(0)?;
    for (key, value) in aux {
        push(key)?;
        push(value)?;
    }
    Ok(top)
}
