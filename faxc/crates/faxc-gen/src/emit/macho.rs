//! Mach-O 64 container: a 32-byte
//! `mach_header_64`, two `LC_SEGMENT_64` load commands (`__TEXT`,
//! `__DATA`, one section each) and an `LC_MAIN` entry-point command.

use super::{round_up, Artifact};

const PAGE: u64 = 0x1000;
const TEXT_VADDR: u64 = 0x100000000 + 0x1000;
const HEADER_SIZE: u32 = 32;

const MH_MAGIC_64: u32 = 0xFEED_FACF;
const CPU_TYPE_X86_64: u32 = 0x0100_0007;
const CPU_SUBTYPE_X86_64_ALL: u32 = 3;
const MH_EXECUTE: u32 = 2;
const MH_NOUNDEFS: u32 = 0x1;

const LC_SEGMENT_64: u32 = 0x19;
const LC_MAIN: u32 = 0x8000_0028;

const SEGMENT_CMD_SIZE: u32 = 72;
const SECTION_CMD_SIZE: u32 = 80;
const MAIN_CMD_SIZE: u32 = 24;

pub fn build(artifact: &Artifact) -> Vec<u8> {
 let code_size = artifact.code.len() as u64;
 let data_size = artifact.data.len().max(1) as u64;

 let ncmds = 3u32;
 let sizeofcmds = 2 * (SEGMENT_CMD_SIZE + SECTION_CMD_SIZE) + MAIN_CMD_SIZE;
 let header_total = HEADER_SIZE + sizeofcmds;

 let text_file_off = round_up(header_total, PAGE as u32) as u64;
 let text_vaddr = TEXT_VADDR;
 let text_file_size = code_size;

 let data_file_off = text_file_off + round_up(code_size.max(1) as u32, PAGE as u32) as u64;
 let data_vaddr = text_vaddr + round_up(code_size.max(1) as u32, PAGE as u32) as u64;
 let data_file_size = data_size;

 let mut out = Vec::with_capacity((data_file_off + data_file_size) as usize);

 // mach_header_64
 out.extend_from_slice(&MH_MAGIC_64.to_le_bytes());
 out.extend_from_slice(&CPU_TYPE_X86_64.to_le_bytes());
 out.extend_from_slice(&CPU_SUBTYPE_X86_64_ALL.to_le_bytes());
 out.extend_from_slice(&MH_EXECUTE.to_le_bytes());
 out.extend_from_slice(&ncmds.to_le_bytes());
 out.extend_from_slice(&sizeofcmds.to_le_bytes());
 out.extend_from_slice(&MH_NOUNDEFS.to_le_bytes());
 out.extend_from_slice(&0u32.to_le_bytes()); // reserved

 debug_assert_eq!(out.len() as u32, HEADER_SIZE);

 write_segment(
 &mut out,
 "__TEXT",
 text_vaddr,
 round_up(code_size.max(1) as u32, PAGE as u32) as u64,
 0,
 round_up(code_size.max(1) as u32, PAGE as u32) as u64,
 5, // maxprot: r-x
 5, // initprot: r-x
 "__text",
 text_vaddr,
 text_file_size,
 text_file_off,
 0x8000_0400, // S_ATTR_PURE_INSTRUCTIONS | S_ATTR_SOME_INSTRUCTIONS
 );

 write_segment(
 &mut out,
 "__DATA",
 data_vaddr,
 round_up(data_size as u32, PAGE as u32) as u64,
 data_file_off,
 round_up(data_size as u32, PAGE as u32) as u64,
 3, // maxprot: rw-
 3, // initprot: rw-
 "__data",
 data_vaddr,
 data_file_size,
 data_file_off,
 0,
 );

 // LC_MAIN
 out.extend_from_slice(&LC_MAIN.to_le_bytes());
 out.extend_from_slice(&MAIN_CMD_SIZE.to_le_bytes());
 out.extend_from_slice(&(artifact.entry_offset as u64).to_le_bytes()); // entryoff (file offset into __TEXT, relative is fine since text starts at file offset 0 of the segment's data)
 out.extend_from_slice(&0u64.to_le_bytes()); // stacksize: use default

 debug_assert_eq!(out.len() as u32, header_total);

 out.resize(text_file_off as usize, 0);
 out.extend_from_slice(&artifact.code);
 out.resize(data_file_off as usize, 0);
 out.extend_from_slice(&artifact.data);

 for &(code_offset, data_offset) in &artifact.data_relocs {
 let site = text_file_off as usize + code_offset as usize;
 let addr = data_vaddr + data_offset as u64;
 out[site..site + 8].copy_from_slice(&addr.to_le_bytes());
 }

 out
}

#[allow(clippy::too_many_arguments)]
fn write_segment(
 out: &mut Vec<u8>,
 seg_name: &str,
 vmaddr: u64,
 vmsize: u64,
 fileoff: u64,
 filesize: u64,
 maxprot: u32,
 initprot: u32,
 sect_name: &str,
 sect_addr: u64,
 sect_size: u64,
 sect_offset: u64,
 sect_flags: u32,
) {
 out.extend_from_slice(&LC_SEGMENT_64.to_le_bytes());
 out.extend_from_slice(&(SEGMENT_CMD_SIZE + SECTION_CMD_SIZE).to_le_bytes());
 out.extend_from_slice(&pad16(seg_name));
 out.extend_from_slice(&vmaddr.to_le_bytes());
 out.extend_from_slice(&vmsize.to_le_bytes());
 out.extend_from_slice(&fileoff.to_le_bytes());
 out.extend_from_slice(&filesize.to_le_bytes());
 out.extend_from_slice(&maxprot.to_le_bytes());
 out.extend_from_slice(&initprot.to_le_bytes());
 out.extend_from_slice(&1u32.to_le_bytes()); // nsects
 out.extend_from_slice(&0u32.to_le_bytes()); // flags

 out.extend_from_slice(&pad16(sect_name));
 out.extend_from_slice(&pad16(seg_name));
 out.extend_from_slice(&sect_addr.to_le_bytes());
 out.extend_from_slice(&sect_size.to_le_bytes());
 out.extend_from_slice(&(sect_offset as u32).to_le_bytes());
 out.extend_from_slice(&12u32.to_le_bytes()); // align, 2^12 = 0x1000
 out.extend_from_slice(&0u32.to_le_bytes()); // reloff
 out.extend_from_slice(&0u32.to_le_bytes()); // nreloc
 out.extend_from_slice(&sect_flags.to_le_bytes());
 out.extend_from_slice(&0u32.to_le_bytes()); // reserved1
 out.extend_from_slice(&0u32.to_le_bytes()); // reserved2
 out.extend_from_slice(&0u32.to_le_bytes()); // reserved3
}

fn pad16(name: &str) -> [u8; 16] {
 let mut buf = [0u8; 16];
 let bytes = name.as_bytes();
 buf[..bytes.len()].copy_from_slice(bytes);
 buf
}
