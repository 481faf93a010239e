//! ELF64 container: 16-byte
//! identification, a 64-byte file header, and two `PT_LOAD` program
//! headers placing code at 0x401000 and data at 0x402000.

use super::{round_up, Artifact};

const PAGE: u32 = 0x1000;
const CODE_VADDR: u64 = 0x401000;
const DATA_VADDR: u64 = 0x402000;
const EHDR_SIZE: u32 = 64;
const PHDR_SIZE: u32 = 56;

pub fn build(artifact: &Artifact) -> Vec<u8> {
 let code_off = PAGE;
 let code_size = artifact.code.len() as u64;
 let data_off = code_off + round_up(artifact.code.len().max(1) as u32, PAGE);
 let data_size = artifact.data.len() as u64;
 let entry = CODE_VADDR + artifact.entry_offset as u64;

 let mut out = Vec::with_capacity((data_off as usize) + artifact.data.len().max(1));

 // e_ident
 out.extend_from_slice(&[0x7F, b'E', b'L', b'F']);
 out.push(2); // ELFCLASS64
 out.push(1); // ELFDATA2LSB
 out.push(1); // EV_CURRENT
 out.push(0); // ELFOSABI_SYSV
 out.extend_from_slice(&[0u8; 8]); // abi version + padding

 out.extend_from_slice(&2u16.to_le_bytes()); // e_type: ET_EXEC
 out.extend_from_slice(&0x3Eu16.to_le_bytes()); // e_machine: EM_X86_64
 out.extend_from_slice(&1u32.to_le_bytes()); // e_version
 out.extend_from_slice(&entry.to_le_bytes()); // e_entry
 out.extend_from_slice(&(EHDR_SIZE as u64).to_le_bytes()); // e_phoff
 out.extend_from_slice(&0u64.to_le_bytes()); // e_shoff
 out.extend_from_slice(&0u32.to_le_bytes()); // e_flags
 out.extend_from_slice(&(EHDR_SIZE as u16).to_le_bytes()); // e_ehsize
 out.extend_from_slice(&(PHDR_SIZE as u16).to_le_bytes()); // e_phentsize
 out.extend_from_slice(&2u16.to_le_bytes()); // e_phnum
 out.extend_from_slice(&0u16.to_le_bytes()); // e_shentsize
 out.extend_from_slice(&0u16.to_le_bytes()); // e_shnum
 out.extend_from_slice(&0u16.to_le_bytes()); // e_shstrndx

 debug_assert_eq!(out.len() as u32, EHDR_SIZE);

 write_phdr(&mut out, 5, code_off as u64, CODE_VADDR, code_size, round_up(artifact.code.len().max(1) as u32, PAGE) as u64);
 write_phdr(&mut out, 6, data_off as u64, DATA_VADDR, data_size, round_up(artifact.data.len().max(1) as u32, PAGE) as u64);

 debug_assert_eq!(out.len() as u32, EHDR_SIZE + 2 * PHDR_SIZE);

 out.resize(code_off as usize, 0);
 out.extend_from_slice(&artifact.code);
 out.resize(data_off as usize, 0);
 out.extend_from_slice(&artifact.data);

 for &(code_offset, data_offset) in &artifact.data_relocs {
 let site = code_off as usize + code_offset as usize;
 let addr = DATA_VADDR + data_offset as u64;
 out[site..site + 8].copy_from_slice(&addr.to_le_bytes());
 }

 out
}

fn write_phdr(out: &mut Vec<u8>, flags: u32, offset: u64, vaddr: u64, filesz: u64, memsz: u64) {
 out.extend_from_slice(&1u32.to_le_bytes()); // p_type: PT_LOAD
 out.extend_from_slice(&flags.to_le_bytes());
 out.extend_from_slice(&offset.to_le_bytes());
 out.extend_from_slice(&vaddr.to_le_bytes()); // p_vaddr
 out.extend_from_slice(&vaddr.to_le_bytes()); // p_paddr
 out.extend_from_slice(&filesz.to_le_bytes());
 out.extend_from_slice(&memsz.to_le_bytes());
 out.extend_from_slice(&(PAGE as u64).to_le_bytes()); // p_align
}

#[cfg(test)]
mod tests {
 use super::*;

 fn sample() -> Artifact {
 Artifact { code: vec![0xC3], data: vec![9, 9], entry_offset: 0, data_relocs: vec![] }
 }

 #[test]
 fn patches_data_abs_relocation_to_data_vaddr() {
 let mut code = vec![0x48, 0xB8, 0, 0, 0, 0, 0, 0, 0, 0];
 code.push(0xC3);
 let artifact = Artifact { code, data: vec![b'h', b'i', 0], entry_offset: 0, data_relocs: vec![(2, 0)] };
 let bytes = build(&artifact);
 let site = PAGE as usize + 2;
 let addr = u64::from_le_bytes(bytes[site..site + 8].try_into().unwrap());
 assert_eq!(addr, DATA_VADDR);
 }

 #[test]
 fn identification_and_header_fields() {
 let bytes = build(&sample());
 assert_eq!(&bytes[0..4], &[0x7F, b'E', b'L', b'F']);
 assert_eq!(bytes[4], 2);
 assert_eq!(bytes[5], 1);
 let e_phoff = u64::from_le_bytes(bytes[32..40].try_into().unwrap());
 assert_eq!(e_phoff, 64);
 let e_phentsize = u16::from_le_bytes(bytes[54..56].try_into().unwrap());
 assert_eq!(e_phentsize, 56);
 let e_phnum = u16::from_le_bytes(bytes[56..58].try_into().unwrap());
 assert_eq!(e_phnum, 2);
 }

 #[test]
 fn program_headers_are_pt_load_with_expected_vaddrs() {
 let bytes = build(&sample());
 let ph0 = 64;
 let p_type = u32::from_le_bytes(bytes[ph0..ph0 + 4].try_into().unwrap());
 assert_eq!(p_type, 1);
 let p_flags = u32::from_le_bytes(bytes[ph0 + 4..ph0 + 8].try_into().unwrap());
 assert_eq!(p_flags, 5);
 let p_vaddr = u64::from_le_bytes(bytes[ph0 + 16..ph0 + 24].try_into().unwrap());
 assert_eq!(p_vaddr, 0x401000);

 let ph1 = 64 + 56;
 let p_flags1 = u32::from_le_bytes(bytes[ph1 + 4..ph1 + 8].try_into().unwrap());
 assert_eq!(p_flags1, 6);
 let p_vaddr1 = u64::from_le_bytes(bytes[ph1 + 16..ph1 + 24].try_into().unwrap());
 assert_eq!(p_vaddr1, 0x402000);
 }
}
