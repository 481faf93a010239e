//! Module layout: concatenates each function's encoded instruction
//! stream into one `.text`-equivalent buffer and patches the `rel32`
//! call relocations `encode::encode_function` left behind.
//!
//! Calls between compiled functions resolve here. Calls to the runtime
//! library (`faxc_rt_*` syscalls stubs) are left as unresolved entries
//! in [`LinkResult::unresolved`] — this pass lays out one module's own
//! code, it does not shell out to a platform linker, so binding those
//! symbols to `faxc-runtime`'s actual addresses is the emitted binary's
//! job, not this one's.

use crate::encode::{CodeBuffer, RelocationKind};
use crate::error::{CodeGenError, Result};
use faxc_util::Symbol;
use std::collections::HashMap;

pub struct LinkResult {
 pub code: Vec<u8>,
 pub symbol_offsets: HashMap<String, u32>,
 pub unresolved: Vec<UnresolvedCall>,
 /// `(code_site_offset, data_section_offset)` pairs left by `DataAbs`
 /// relocations, patched by the binary emitter once it knows the
 /// container's data base address.
 pub data_relocs: Vec<(u32, u32)>,
}

#[derive(Debug, Clone)]
pub struct UnresolvedCall {
 pub offset: u32,
 pub symbol: String,
}

/// Lays out `functions` (name, encoded body) back to back and patches
/// every relocation whose symbol matches another function in the same
/// set. `entry` names the function whose start becomes the artifact's
/// entry offset. `data_offsets` resolves `DataAbs` relocations (string
/// literals and named handles) to their offset within the module's data
/// section, built by `crate::strtab::build`.
pub fn link(functions: &[(Symbol, CodeBuffer)], entry: Symbol, data_offsets: &HashMap<Symbol, u32>) -> Result<(LinkResult, u32)> {
 let mut code = Vec::new();
 let mut symbol_offsets = HashMap::new();
 let mut pending = Vec::new();

 for (name, buf) in functions {
 let base = code.len() as u32;
 symbol_offsets.insert(name.as_str().to_string(), base);
 for reloc in &buf.relocations {
 pending.push((base + reloc.offset, reloc.symbol, reloc.kind));
 }
 code.extend_from_slice(&buf.bytes);
 }

 let mut unresolved = Vec::new();
 let mut data_relocs = Vec::new();
 for (site, symbol, kind) in pending {
 match kind {
 RelocationKind::Rel32 => {
 if let Some(&target) = symbol_offsets.get(symbol.as_str()) {
 let disp = (target as i64) - (site as i64 + 4);
 let disp = i32::try_from(disp)
 .map_err(|_| CodeGenError::Internal(format!("call displacement to '{}' out of rel32 range", symbol.as_str())))?;
 code[site as usize..site as usize + 4].copy_from_slice(&disp.to_le_bytes());
 } else {
 unresolved.push(UnresolvedCall { offset: site, symbol: symbol.as_str().to_string() });
 }
 }
 RelocationKind::DataAbs => {
 let data_offset = data_offsets
 .get(&symbol)
 .ok_or_else(|| CodeGenError::Internal(format!("no data section entry for '{}'", symbol.as_str())))?;
 data_relocs.push((site, *data_offset));
 }
 }
 }

 let entry_offset = *symbol_offsets
 .get(entry.as_str())
 .ok_or_else(|| CodeGenError::FunctionNotFound(entry.as_str().to_string()))?;

 Ok((LinkResult { code, symbol_offsets, unresolved, data_relocs }, entry_offset))
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::encode::Relocation;

 fn sym(s: &'static str) -> Symbol {
 Symbol::intern(s)
 }

 #[test]
 fn patches_intra_module_call() {
 let callee = (sym("callee"), CodeBuffer { bytes: vec![0xC3], relocations: vec![] });
 let caller = (
 sym("caller"),
 CodeBuffer {
 bytes: vec![0xE8, 0, 0, 0, 0],
 relocations: vec![Relocation { offset: 1, symbol: sym("callee"), kind: RelocationKind::Rel32 }],
 },
 );
 let (result, entry_offset) = link(&[caller, callee], sym("caller"), &HashMap::new()).unwrap();
 assert_eq!(entry_offset, 0);
 assert!(result.unresolved.is_empty());
 let disp = i32::from_le_bytes(result.code[1..5].try_into().unwrap());
 assert_eq!(disp, (5 - 5) as i32);
 }

 #[test]
 fn leaves_runtime_calls_unresolved() {
 let caller = (
 sym("main"),
 CodeBuffer {
 bytes: vec![0xE8, 0, 0, 0, 0],
 relocations: vec![Relocation { offset: 1, symbol: sym("faxc_rt_print"), kind: RelocationKind::Rel32 }],
 },
 );
 let (result, _) = link(&[caller], sym("main"), &HashMap::new()).unwrap();
 assert_eq!(result.unresolved.len(), 1);
 assert_eq!(result.unresolved[0].symbol, "faxc_rt_print");
 }

 #[test]
 fn resolves_data_abs_relocation_against_data_offsets() {
 let caller = (
 sym("main"),
 CodeBuffer {
 bytes: vec![0x48, 0xB8, 0, 0, 0, 0, 0, 0, 0, 0],
 relocations: vec![Relocation { offset: 2, symbol: sym("str.0"), kind: RelocationKind::DataAbs }],
 },
 );
 let mut data_offsets = HashMap::new();
 data_offsets.insert(sym("str.0"), 7u32);
 let (result, _) = link(&[caller], sym("main"), &data_offsets).unwrap();
 assert_eq!(result.data_relocs, vec![(2, 7)]);
 }
}
