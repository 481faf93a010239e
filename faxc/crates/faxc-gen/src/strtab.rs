//! Data section builder: collects every `Address::Global` symbol
//! referenced by a module's LIR (string literals and named handles,
//! both carried as `faxc_mir::ConstantKind::String` up through LIR) into
//! one NUL-terminated byte buffer, so `linker::link` and the binary
//! emitters have a single data blob with stable per-symbol offsets.

use faxc_lir::{Address, Function, Instruction};
use faxc_util::Symbol;
use std::collections::HashMap;

/// Walks every function's instruction stream for `Lea { addr: Global, .. }`
/// references and lays out one NUL-terminated entry per distinct symbol.
pub fn build(functions: &[Function]) -> (Vec<u8>, HashMap<Symbol, u32>) {
 let mut data = Vec::new();
 let mut offsets = HashMap::new();
 for f in functions {
 for instr in &f.instructions {
 if let Instruction::Lea { addr: Address::Global(symbol), .. } = instr {
 offsets.entry(*symbol).or_insert_with(|| {
 let offset = data.len() as u32;
 data.extend_from_slice(symbol.as_str().as_bytes());
 data.push(0);
 offset
 });
 }
 }
 }
 (data, offsets)
}

#[cfg(test)]
mod tests {
 use super::*;
 use faxc_lir::Operand;

 #[test]
 fn dedups_repeated_globals_and_nul_terminates() {
 let mut f = Function::new(Symbol::intern("f"));
 let v0 = faxc_lir::VirtualRegister::new(0);
 f.instructions.push(Instruction::Lea { dest: Operand::Reg(v0), addr: Address::Global(Symbol::intern("hi")) });
 f.instructions.push(Instruction::Lea { dest: Operand::Reg(v0), addr: Address::Global(Symbol::intern("hi")) });
 let (data, offsets) = build(&[f]);
 assert_eq!(data, b"hi\0");
 assert_eq!(offsets[&Symbol::intern("hi")], 0);
 }

 #[test]
 fn lays_out_distinct_symbols_back_to_back() {
 let mut f = Function::new(Symbol::intern("f"));
 let v0 = faxc_lir::VirtualRegister::new(0);
 f.instructions.push(Instruction::Lea { dest: Operand::Reg(v0), addr: Address::Global(Symbol::intern("a")) });
 f.instructions.push(Instruction::Lea { dest: Operand::Reg(v0), addr: Address::Global(Symbol::intern("bb")) });
 let (data, offsets) = build(&[f]);
 assert_eq!(data, b"a\0bb\0");
 assert_eq!(offsets[&Symbol::intern("a")], 0);
 assert_eq!(offsets[&Symbol::intern("bb")], 2);
 }
}
