//! x86-64 instruction selector and encoder. Lowers a single
//! `faxc_lir::Function` plus its `regalloc::Allocation` into raw
//! machine code, resolving every virtual register to either a physical
//! GPR or a stack spill slot along the way.
//!
//! Every local jump target (`Instruction::Label`) is intra-function, so
//! this runs in two passes over the instruction stream: the first walks
//! the selector without emitting bytes to learn each label's offset
//! (every `rel32` form is a fixed width regardless of the eventual
//! displacement, so lengths don't depend on the values being patched),
//! the second emits real bytes with displacements resolved. Calls to
//! other functions or to `faxc-runtime` symbols can't be resolved here —
//! module layout happens after every function is encoded — so those
//! addresses are recorded as a [`Relocation`] instead and patched by
//! `crate::linker`.

use crate::error::{CodeGenError, Result};
use crate::regalloc::{Allocation, Location};
use faxc_lir::{Address, CallTarget, Condition, Function, Instruction, Operand, PhysicalRegister};
use faxc_util::Symbol;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct CodeBuffer {
 pub bytes: Vec<u8>,
 pub relocations: Vec<Relocation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelocationKind {
 /// A 32-bit PC-relative displacement, ending 4 bytes before `offset + 4`.
 Rel32,
 /// A 64-bit absolute address of a symbol in the data section, patched
 /// once the binary emitter picks the container's data base address.
 DataAbs,
}

#[derive(Debug, Clone)]
pub struct Relocation {
 pub offset: u32,
 pub symbol: Symbol,
 pub kind: RelocationKind,
}

/// Encodes `func` against its register allocation, returning the code
/// bytes and the list of unresolved call/jump targets.
pub fn encode_function(func: &Function, alloc: &Allocation) -> Result<CodeBuffer> {
 let labels = label_offsets(func, alloc)?;
 let mut out = CodeBuffer::default();
 let mut enc = Encoder { alloc, labels: &labels, buf: &mut out, sizing: false };
 for instr in &func.instructions {
 enc.emit(instr)?;
 }
 Ok(out)
}

/// First pass: instruction lengths don't depend on label values (every
/// jump/call uses a fixed-width `rel32` form), so this can run the same
/// selector with patching disabled and forward references tolerated.
fn label_offsets(func: &Function, alloc: &Allocation) -> Result<HashMap<String, u32>> {
 let mut probe = CodeBuffer::default();
 let mut labels = HashMap::new();
 for instr in &func.instructions {
 if let Instruction::Label { name } = instr {
 labels.insert(name.clone(), probe.bytes.len() as u32);
 continue;
 }
 let mut enc = Encoder { alloc, labels: &labels, buf: &mut probe, sizing: true };
 enc.emit(instr)?;
 }
 Ok(labels)
}

struct Encoder<'a> {
 alloc: &'a Allocation,
 labels: &'a HashMap<String, u32>,
 buf: &'a mut CodeBuffer,
 /// Set during the label-offset prepass: jump patching is skipped
 /// (forward references aren't in `labels` yet) since only byte
 /// length matters for this pass.
 sizing: bool,
}

/// A resolved operand: either a physical register or a memory location,
/// never a bare virtual register (the allocator always assigns one).
enum Res {
 Reg(u8),
 Mem { base: u8, disp: i32 },
 Imm(i64),
}

impl<'a> Encoder<'a> {
 fn push(&mut self, b: u8) {
 self.buf.bytes.push(b);
 }

 fn push_slice(&mut self, bs: &[u8]) {
 self.buf.bytes.extend_from_slice(bs);
 }

 fn resolve(&self, op: &Operand) -> Result<Res> {
 match op {
 Operand::PhysReg(r) => Ok(Res::Reg(reg_num(*r)?)),
 Operand::Reg(vr) => match self.alloc.locations.get(vr) {
 Some(Location::Reg(p)) => Ok(Res::Reg(reg_num(*p)?)),
 Some(Location::Spill(off)) => Ok(Res::Mem { base: reg_num(PhysicalRegister::RBP)?, disp: -*off }),
 None => Err(CodeGenError::RegisterAllocationFailed(format!("{:?}", vr))),
 },
 Operand::Imm(n) => Ok(Res::Imm(*n)),
 Operand::Mem(addr) => self.resolve_addr(addr),
 Operand::Label(_) => Err(CodeGenError::InvalidOperandType("bare label operand".into())),
 }
 }

 fn resolve_addr(&self, addr: &Address) -> Result<Res> {
 match addr {
 Address::Base { base } => Ok(Res::Mem { base: reg_num(*base)?, disp: 0 }),
 Address::BaseOffset { base, offset } => Ok(Res::Mem { base: reg_num(*base)?, disp: *offset }),
 Address::StackRelative { offset } => Ok(Res::Mem { base: reg_num(PhysicalRegister::RBP)?, disp: *offset }),
 Address::Indexed { .. } | Address::RipRelative { .. } | Address::Absolute(_) | Address::Global(_) => {
 Err(CodeGenError::UnsupportedConstruct(format!("{:?}", addr)))
 }
 }
 }

 /// `modrm` + optional `SIB`/disp for `reg_field` against a resolved
 /// r/m operand, plus the REX prefix bits it implies.
 fn modrm_rm(&mut self, reg_field: u8, rm: &Res) -> Result<(u8, u8)> {
 match rm {
 Res::Reg(r) => {
 self.push(0xC0 | ((reg_field & 7) << 3) | (r & 7));
 Ok((reg_field, *r))
 }
 Res::Mem { base, disp } => {
 let modbits = if *disp == 0 && (base & 7) != 5 { 0b00 } else { 0b10 };
 self.push((modbits << 6) | ((reg_field & 7) << 3) | (base & 7));
 if (base & 7) == 4 {
 self.push(0x24); // SIB: no index, base = RSP/R12
 }
 if modbits == 0b10 {
 self.push_slice(&disp.to_le_bytes());
 } else if (base & 7) == 5 {
 self.push_slice(&0i32.to_le_bytes());
 }
 Ok((reg_field, *base))
 }
 Res::Imm(_) => Err(CodeGenError::InvalidOperandType("immediate used as r/m".into())),
 }
 }

 fn rex(&mut self, reg_field: u8, rm_field: u8) {
 let w = 1u8;
 let r = (reg_field >> 3) & 1;
 let b = (rm_field >> 3) & 1;
 self.push(0x40 | (w << 3) | (r << 2) | (b));
 }

 /// Binary ALU op of the `dest OP= src` shape (`Add`/`Sub`/`And`/`Or`/
 /// `Xor`/`Cmp`/`Test`): `reg_opcode` is the `/r` form (`dest, src`
 /// both non-immediate), `imm_opcode`/`imm_ext` the `/<ext> id` form.
 fn alu(&mut self, reg_opcode: u8, imm_opcode: u8, imm_ext: u8, dest: &Operand, src: &Operand) -> Result<()> {
 let d = self.resolve(dest)?;
 let s = self.resolve(src)?;
 match (&d, &s) {
 (Res::Reg(dr), Res::Reg(sr)) => {
 self.rex(*sr, *dr);
 self.push(reg_opcode);
 self.modrm_rm(*sr, &d)?;
 }
 (Res::Mem { base, .. }, Res::Reg(sr)) => {
 self.rex(*sr, *base);
 self.push(reg_opcode);
 self.modrm_rm(*sr, &d)?;
 }
 (Res::Reg(dr), Res::Mem { base, .. }) => {
 self.rex(*dr, *base);
 self.push(reg_opcode + 2); // the `/r` reverse form (reg <- r/m)
 self.modrm_rm(*dr, &s)?;
 }
 (_, Res::Imm(imm)) => {
 let rm_field = match &d {
 Res::Reg(r) => *r,
 Res::Mem { base, .. } => *base,
 Res::Imm(_) => unreachable!(),
 };
 self.rex(0, rm_field);
 self.push(imm_opcode);
 self.modrm_rm(imm_ext, &d)?;
 self.push_slice(&(*imm as i32).to_le_bytes());
 }
 (Res::Imm(_), _) => return Err(CodeGenError::InvalidOperandType("immediate destination".into())),
 }
 Ok(())
 }

 fn mov(&mut self, dest: &Operand, src: &Operand) -> Result<()> {
 let d = self.resolve(dest)?;
 let s = self.resolve(src)?;
 match (&d, &s) {
 (Res::Reg(dr), Res::Imm(imm)) => {
 self.rex(0, *dr);
 self.push(0xB8 + (dr & 7));
 self.push_slice(&imm.to_le_bytes());
 }
 (Res::Mem { base, .. }, Res::Imm(imm)) => {
 self.rex(0, *base);
 self.push(0xC7);
 self.modrm_rm(0, &d)?;
 self.push_slice(&(*imm as i32).to_le_bytes());
 }
 (Res::Reg(dr), Res::Reg(sr)) => {
 self.rex(*sr, *dr);
 self.push(0x89);
 self.modrm_rm(*sr, &d)?;
 }
 (Res::Mem { base, .. }, Res::Reg(sr)) => {
 self.rex(*sr, *base);
 self.push(0x89);
 self.modrm_rm(*sr, &d)?;
 }
 (Res::Reg(dr), Res::Mem { base, .. }) => {
 self.rex(*dr, *base);
 self.push(0x8B);
 self.modrm_rm(*dr, &s)?;
 }
 (Res::Imm(_), _) => return Err(CodeGenError::InvalidOperandType("immediate destination".into())),
 (Res::Mem { .. }, Res::Mem { .. }) => {
 return Err(CodeGenError::UnsupportedConstruct("memory-to-memory mov".into()))
 }
 }
 Ok(())
 }

 fn unary(&mut self, ext: u8, dest: &Operand) -> Result<()> {
 let d = self.resolve(dest)?;
 let rm_field = match &d {
 Res::Reg(r) => *r,
 Res::Mem { base, .. } => *base,
 Res::Imm(_) => return Err(CodeGenError::InvalidOperandType("immediate destination".into())),
 };
 self.rex(0, rm_field);
 self.push(0xF7);
 self.modrm_rm(ext, &d)?;
 Ok(())
 }

 fn push_pop(&mut self, opcode_base: u8, op: &Operand) -> Result<()> {
 match self.resolve(op)? {
 Res::Reg(r) => {
 if r >= 8 {
 self.push(0x41);
 }
 self.push(opcode_base + (r & 7));
 Ok(())
 }
 Res::Mem { .. } => Err(CodeGenError::UnsupportedConstruct("push/pop memory operand".into())),
 Res::Imm(imm) if opcode_base == 0x50 => {
 // `push imm32`
 self.push(0x68);
 self.push_slice(&(imm as i32).to_le_bytes());
 Ok(())
 }
 Res::Imm(_) => Err(CodeGenError::InvalidOperandType("pop immediate".into())),
 }
 }

 fn shift(&mut self, ext: u8, dest: &Operand, count: &Operand) -> Result<()> {
 let d = self.resolve(dest)?;
 let rm_field = match &d {
 Res::Reg(r) => *r,
 Res::Mem { base, .. } => *base,
 Res::Imm(_) => return Err(CodeGenError::InvalidOperandType("immediate destination".into())),
 };
 match self.resolve(count)? {
 Res::Imm(1) => {
 self.rex(0, rm_field);
 self.push(0xD1);
 self.modrm_rm(ext, &d)?;
 }
 Res::Imm(n) => {
 self.rex(0, rm_field);
 self.push(0xC1);
 self.modrm_rm(ext, &d)?;
 self.push(n as u8);
 }
 Res::Reg(r) if r == reg_num(PhysicalRegister::RCX)? => {
 self.rex(0, rm_field);
 self.push(0xD3);
 self.modrm_rm(ext, &d)?;
 }
 _ => return Err(CodeGenError::UnsupportedConstruct("shift count must be immediate or CL".into())),
 }
 Ok(())
 }

 /// Writes a placeholder `rel32` slot for an intra-function jump
 /// target. During the real pass every label is already known, so the
 /// displacement is resolved immediately; during the sizing prepass
 /// forward references aren't resolvable yet and the placeholder is
 /// left as zero (only its length matters there).
 fn emit_jump_target(&mut self, target: &str) -> Result<()> {
 let offset = self.buf.bytes.len() as u32;
 self.push_slice(&0i32.to_le_bytes());
 if self.sizing {
 return Ok(());
 }
 let label_offset = *self
 .labels
 .get(target)
 .ok_or_else(|| CodeGenError::BlockNotFound(target.to_string()))?;
 let next_insn = offset + 4;
 let disp = label_offset as i64 - next_insn as i64;
 self.buf.bytes[offset as usize..offset as usize + 4].copy_from_slice(&(disp as i32).to_le_bytes());
 Ok(())
 }

 /// Marks a `rel32` slot at the current write position for `symbol`,
 /// patched later by module layout once every function's base address
 /// is known.
 fn record_jump(&mut self, symbol: Symbol) {
 let offset = self.buf.bytes.len() as u32;
 self.push_slice(&0i32.to_le_bytes());
 if !self.sizing {
 self.buf.relocations.push(Relocation { offset, symbol, kind: RelocationKind::Rel32 });
 }
 }

 fn emit(&mut self, instr: &Instruction) -> Result<()> {
 use Instruction::*;
 match instr {
 Nop => self.push(0x90),
 Label { .. } => {}
 Mov { dest, src } => self.mov(dest, src)?,
 Movzx { dest, src } | Movsx { dest, src, .. } => {
 // widths collapse to 64 bits throughout this pipeline, so
 // a plain mov already has the right bit pattern.
 self.mov(dest, src)?;
 }
 Xchg { dest, src } => {
 let d = self.resolve(dest)?;
 let s = self.resolve(src)?;
 if let (Res::Reg(dr), Res::Reg(sr)) = (&d, &s) {
 self.rex(*sr, *dr);
 self.push(0x87);
 self.modrm_rm(*sr, &d)?;
 } else {
 return Err(CodeGenError::UnsupportedConstruct("xchg with memory operand".into()));
 }
 }
 Lea { dest, addr: Address::Global(symbol) } => {
 // A global (string literal / named handle) has no known
 // address until the module is linked and the data section
 // is placed, so this emits the same byte shape as a
 // `mov reg, imm64` with a zero placeholder and leaves a
 // `DataAbs` relocation for the binary emitter to patch.
 let d = self.resolve(dest)?;
 let dr = match d {
 Res::Reg(r) => r,
 _ => return Err(CodeGenError::InvalidOperandType("lea destination must be a register".into())),
 };
 self.rex(0, dr);
 self.push(0xB8 + (dr & 7));
 let offset = self.buf.bytes.len() as u32;
 self.push_slice(&0i64.to_le_bytes());
 if !self.sizing {
 self.buf.relocations.push(Relocation { offset, symbol: *symbol, kind: RelocationKind::DataAbs });
 }
 }
 Lea { dest, addr } => {
 let d = self.resolve(dest)?;
 let a = self.resolve_addr(addr)?;
 let dr = match d {
 Res::Reg(r) => r,
 _ => return Err(CodeGenError::InvalidOperandType("lea destination must be a register".into())),
 };
 let base = match a {
 Res::Mem { base, .. } => base,
 _ => return Err(CodeGenError::UnsupportedConstruct("lea source must be memory".into())),
 };
 self.rex(dr, base);
 self.push(0x8D);
 self.modrm_rm(dr, &a)?;
 }
 Push { src } => self.push_pop(0x50, src)?,
 Pop { dest } => self.push_pop(0x58, dest)?,
 Cmov { cond, dest, src } => {
 let d = self.resolve(dest)?;
 let s = self.resolve(src)?;
 let (dr, sr) = match (&d, &s) {
 (Res::Reg(dr), Res::Reg(sr)) => (*dr, *sr),
 _ => return Err(CodeGenError::UnsupportedConstruct("cmov requires two registers".into())),
 };
 self.rex(dr, sr);
 self.push(0x0F);
 self.push(0x40 | cond_code(*cond));
 self.modrm_rm(dr, &s)?;
 }
 Load { dest, addr, .. } => self.mov(dest, &Operand::Mem(addr.clone()))?,
 Store { addr, src, .. } => self.mov(&Operand::Mem(addr.clone()), src)?,
 Add { dest, src } => self.alu(0x01, 0x81, 0, dest, src)?,
 Sub { dest, src } => self.alu(0x29, 0x81, 5, dest, src)?,
 And { dest, src } => self.alu(0x21, 0x81, 4, dest, src)?,
 Or { dest, src } => self.alu(0x09, 0x81, 1, dest, src)?,
 Xor { dest, src } => self.alu(0x31, 0x81, 6, dest, src)?,
 Cmp { src1, src2 } => self.alu(0x39, 0x81, 7, src1, src2)?,
 Test { src1, src2 } => {
 let d = self.resolve(src1)?;
 let s = self.resolve(src2)?;
 match (&d, &s) {
 (Res::Reg(dr), Res::Reg(sr)) => {
 self.rex(*sr, *dr);
 self.push(0x85);
 self.modrm_rm(*sr, &d)?;
 }
 (Res::Reg(dr), Res::Imm(imm)) => {
 self.rex(0, *dr);
 self.push(0xF7);
 self.modrm_rm(0, &d)?;
 self.push_slice(&(*imm as i32).to_le_bytes());
 }
 _ => return Err(CodeGenError::UnsupportedConstruct("test operand shape".into())),
 }
 }
 Mul { dest, src, signed } => {
 // two-operand `imul reg, r/m`; unsigned multiply has no
 // equivalent two-operand form so this selector only
 // targets signed `Mul`, matching every call site in
 // `faxc-lir::lower`.
 if !signed {
 return Err(CodeGenError::UnsupportedConstruct("unsigned two-operand mul".into()));
 }
 let d = self.resolve(dest)?;
 let s = self.resolve(src)?;
 let (dr, sr) = match (&d, &s) {
 (Res::Reg(dr), Res::Reg(sr)) => (*dr, *sr),
 (Res::Reg(dr), Res::Mem { base, .. }) => (*dr, *base),
 _ => return Err(CodeGenError::UnsupportedConstruct("mul operand shape".into())),
 };
 self.rex(dr, sr);
 self.push(0x0F);
 self.push(0xAF);
 self.modrm_rm(dr, &s)?;
 }
 Imul { dest, src1, src2: Some(src2) } => {
 let d = self.resolve(dest)?;
 let s1 = self.resolve(src1)?;
 let dr = match d {
 Res::Reg(r) => r,
 _ => return Err(CodeGenError::InvalidOperandType("imul destination must be a register".into())),
 };
 match (self.resolve(src2)?, s1) {
 (Res::Imm(imm), Res::Reg(sr)) => {
 self.rex(dr, sr);
 self.push(0x69);
 self.push(0xC0 | ((dr & 7) << 3) | (sr & 7));
 self.push_slice(&(imm as i32).to_le_bytes());
 }
 _ => return Err(CodeGenError::UnsupportedConstruct("three-operand imul requires an immediate".into())),
 }
 }
 Imul { dest, src1, src2: None } => self.emit(&Mul { dest: dest.clone(), src: src1.clone(), signed: true })?,
 Idiv { dest, src } | IdivUnsigned { dest, src } => {
 // `dest = dest / src` widened through RDX:RAX, matching
 // `faxc-lir::lower`'s one-register-in-one-register-out
 // shape rather than the raw two-operand `idiv` form.
 let d = self.resolve(dest)?;
 let dr = match d {
 Res::Reg(r) => r,
 _ => return Err(CodeGenError::InvalidOperandType("idiv destination must be a register".into())),
 };
 let rax = reg_num(PhysicalRegister::RAX)?;
 let rdx = reg_num(PhysicalRegister::RDX)?;
 if dr != rax {
 self.rex(rax, dr);
 self.push(0x89);
 self.push(0xC0 | ((rax & 7) << 3) | (dr & 7));
 }
 self.push(0x48);
 self.push(0x99); // cqo: sign-extend rax into rdx:rax
 let s = self.resolve(src)?;
 let sr = match s {
 Res::Reg(r) => r,
 Res::Imm(_) => return Err(CodeGenError::UnsupportedConstruct("idiv by immediate".into())),
 Res::Mem { base, .. } => base,
 };
 self.rex(0, sr);
 self.push(0xF7);
 self.modrm_rm(7, &s)?;
 if dr != rax {
 self.rex(dr, rax);
 self.push(0x89);
 self.push(0xC0 | ((rax & 7) << 3) | (dr & 7));
 }
 let _ = rdx;
 }
 IdivSigned { divisor } => {
 let s = self.resolve(divisor)?;
 let sr = match s {
 Res::Reg(r) => r,
 Res::Mem { base, .. } => base,
 Res::Imm(_) => return Err(CodeGenError::UnsupportedConstruct("idiv by immediate".into())),
 };
 self.push(0x48);
 self.push(0x99);
 self.rex(0, sr);
 self.push(0xF7);
 self.modrm_rm(7, &s)?;
 }
 Div { divisor } => {
 let s = self.resolve(divisor)?;
 let sr = match s {
 Res::Reg(r) => r,
 Res::Mem { base, .. } => base,
 Res::Imm(_) => return Err(CodeGenError::UnsupportedConstruct("div by immediate".into())),
 };
 self.rex(0, sr);
 self.push(0xF7);
 self.modrm_rm(6, &s)?;
 }
 Inc { dest } => self.unary(0, dest)?,
 Dec { dest } => self.unary(1, dest)?,
 Neg { dest } => self.unary(3, dest)?,
 Not { dest } => self.unary(2, dest)?,
 Shl { dest, count } => self.shift(4, dest, count)?,
 Shr { dest, count } => self.shift(5, dest, count)?,
 Sar { dest, count } => self.shift(7, dest, count)?,
 Rol { dest, count } => self.shift(0, dest, count)?,
 Ror { dest, count } => self.shift(1, dest, count)?,
 Jmp { target } => {
 self.push(0xE9);
 self.emit_jump_target(target)?;
 }
 Jcc { cond, target } => {
 self.push(0x0F);
 self.push(0x80 | cond_code(*cond));
 self.emit_jump_target(target)?;
 }
 Call { target } => {
 self.push(0xE8);
 let sym = match target {
 CallTarget::Direct(s) | CallTarget::External(s) => *s,
 CallTarget::Indirect(op) => {
 // drop the opcode byte already pushed; indirect
 // calls use `FF /2`, a different encoding.
 self.buf.bytes.pop();
 let r = self.resolve(op)?;
 let rf = match r {
 Res::Reg(reg) => reg,
 Res::Mem { base, .. } => base,
 Res::Imm(_) => return Err(CodeGenError::InvalidOperandType("call immediate".into())),
 };
 self.rex(0, rf);
 self.push(0xFF);
 self.modrm_rm(2, &r)?;
 return Ok(());
 }
 };
 self.record_jump(sym);
 }
 Ret { .. } => self.push(0xC3),
 EnterFrame { frame_size } => {
 self.push_pop_reg(0x50, PhysicalRegister::RBP);
 self.mov(&Operand::PhysReg(PhysicalRegister::RBP), &Operand::PhysReg(PhysicalRegister::RSP))?;
 if *frame_size > 0 {
 self.alu(0x29, 0x81, 5, &Operand::PhysReg(PhysicalRegister::RSP), &Operand::Imm(*frame_size as i64))?;
 }
 }
 LeaveFrame => {
 self.push(0xC9); // `leave`: rsp <- rbp; pop rbp
 }
 Alloca { dest, size } => {
 self.alu(0x29, 0x81, 5, &Operand::PhysReg(PhysicalRegister::RSP), size)?;
 self.mov(dest, &Operand::PhysReg(PhysicalRegister::RSP))?;
 }
 SaveCalleeSaved { regs } => {
 for r in regs {
 self.push_pop_reg(0x50, *r);
 }
 }
 RestoreCalleeSaved { regs } => {
 for r in regs.iter().rev() {
 self.push_pop_reg(0x58, *r);
 }
 }
 }
 Ok(())
 }

 fn push_pop_reg(&mut self, opcode_base: u8, reg: PhysicalRegister) {
 if let Ok(r) = reg_num(reg) {
 if r >= 8 {
 self.push(0x41);
 }
 self.push(opcode_base + (r & 7));
 }
 }
}

fn reg_num(r: PhysicalRegister) -> Result<u8> {
 use PhysicalRegister::*;
 Ok(match r {
 RAX => 0, RCX => 1, RDX => 2, RBX => 3, RSP => 4, RBP => 5, RSI => 6, RDI => 7,
 R8 => 8, R9 => 9, R10 => 10, R11 => 11, R12 => 12, R13 => 13, R14 => 14, R15 => 15,
 other => return Err(CodeGenError::UnsupportedConstruct(format!("SSE register {:?}", other))),
 })
}

fn cond_code(c: Condition) -> u8 {
 use Condition::*;
 match c {
 O => 0x0, No => 0x1, B => 0x2, Ae => 0x3, Eq => 0x4, Ne => 0x5, Be => 0x6, A => 0x7,
 S => 0x8, Ns => 0x9, P => 0xA, Np => 0xB, L => 0xC, Ge => 0xD, Le => 0xE, G => 0xF,
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use faxc_lir::{Function as LirFunction, VirtualRegister};
 use std::collections::HashMap as Map;

 fn alloc_with(regs: &[(VirtualRegister, PhysicalRegister)]) -> Allocation {
 let mut locations = Map::new();
 for (v, p) in regs {
 locations.insert(*v, Location::Reg(*p));
 }
 Allocation { locations, spill_count: 0 }
 }

 #[test]
 fn encodes_ret() {
 let mut f = LirFunction::new(Symbol::intern("f"));
 f.instructions.push(Instruction::Ret { value: None });
 let alloc = alloc_with(&[]);
 let code = encode_function(&f, &alloc).unwrap();
 assert_eq!(code.bytes, vec![0xC3]);
 }

 #[test]
 fn encodes_mov_reg_imm() {
 let mut f = LirFunction::new(Symbol::intern("f"));
 let v0 = VirtualRegister::new(0);
 f.instructions.push(Instruction::Mov { dest: Operand::Reg(v0), src: Operand::Imm(42) });
 let alloc = alloc_with(&[(v0, PhysicalRegister::RAX)]);
 let code = encode_function(&f, &alloc).unwrap();
 assert_eq!(code.bytes[0], 0x48); // REX.W
 assert_eq!(code.bytes[1], 0xB8); // mov rax, imm64
 assert_eq!(&code.bytes[2..10], &42i64.to_le_bytes());
 }

 #[test]
 fn lea_global_emits_movabs_placeholder_and_data_reloc() {
 let mut f = LirFunction::new(Symbol::intern("f"));
 let v0 = VirtualRegister::new(0);
 f.instructions.push(Instruction::Lea { dest: Operand::Reg(v0), addr: Address::Global(Symbol::intern("str.0")) });
 let alloc = alloc_with(&[(v0, PhysicalRegister::RAX)]);
 let code = encode_function(&f, &alloc).unwrap();
 assert_eq!(code.bytes[0], 0x48); // REX.W
 assert_eq!(code.bytes[1], 0xB8); // mov rax, imm64 placeholder
 assert_eq!(&code.bytes[2..10], &0i64.to_le_bytes());
 assert_eq!(code.relocations.len(), 1);
 assert_eq!(code.relocations[0].symbol.as_str(), "str.0");
 assert_eq!(code.relocations[0].kind, RelocationKind::DataAbs);
 }

 #[test]
 fn records_relocation_for_external_call() {
 let mut f = LirFunction::new(Symbol::intern("f"));
 f.instructions.push(Instruction::Call { target: CallTarget::External(Symbol::intern("faxc_rt_print")) });
 let alloc = alloc_with(&[]);
 let code = encode_function(&f, &alloc).unwrap();
 assert_eq!(code.relocations.len(), 1);
 assert_eq!(code.relocations[0].symbol.as_str(), "faxc_rt_print");
 }

 #[test]
 fn resolves_local_jump_without_relocation() {
 let mut f = LirFunction::new(Symbol::intern("f"));
 f.instructions.push(Instruction::Jmp { target: ".Lbb1".into() });
 f.instructions.push(Instruction::Label { name: ".Lbb1".into() });
 f.instructions.push(Instruction::Ret { value: None });
 let alloc = alloc_with(&[]);
 let code = encode_function(&f, &alloc).unwrap();
 assert!(code.relocations.is_empty());
 // jmp rel32 is 5 bytes; displacement from end of jmp to the
 // label (which sits right after it) is 0.
 assert_eq!(&code.bytes[1..5], &0i32.to_le_bytes());
 }
}
