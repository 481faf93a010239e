//! Graph-coloring register allocator over `faxc-lir`'s virtual
//! registers. Generalizes
//! the prior version's `asm::RegisterAllocator` placeholder
//! (`HashMap<VirtualRegister, Location>` with no allocation logic) into
//! an actual Chaitin-style allocator: liveness over the linear
//! instruction stream, an interference graph, then greedy coloring
//! against the System V usable register set.

use crate::error::{CodeGenError, Result};
use faxc_lir::{Function, Instruction, Operand, PhysicalRegister, VirtualRegister};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
 Reg(PhysicalRegister),
 /// Offset from the frame's spill-slot base, in bytes.
 Spill(i32),
}

pub struct Allocation {
 pub locations: HashMap<VirtualRegister, Location>,
 pub spill_count: u32,
}

/// Registers available to the allocator, ordered callee-saved first so
/// the coloring pass prefers registers that don't need a caller-saved
/// spill around calls; RSP/RBP are reserved for the frame itself and
/// never handed out.
const USABLE_GPRS: &[PhysicalRegister] = &[
 PhysicalRegister::RBX,
 PhysicalRegister::R12,
 PhysicalRegister::R13,
 PhysicalRegister::R14,
 PhysicalRegister::R15,
 PhysicalRegister::RAX,
 PhysicalRegister::RCX,
 PhysicalRegister::RDX,
 PhysicalRegister::RSI,
 PhysicalRegister::RDI,
 PhysicalRegister::R8,
 PhysicalRegister::R9,
 PhysicalRegister::R10,
 PhysicalRegister::R11,
];

const USABLE_XMMS: &[PhysicalRegister] = &[
 PhysicalRegister::XMM2,
 PhysicalRegister::XMM3,
 PhysicalRegister::XMM4,
 PhysicalRegister::XMM5,
 PhysicalRegister::XMM6,
 PhysicalRegister::XMM7,
 PhysicalRegister::XMM0,
 PhysicalRegister::XMM1,
];

pub fn allocate(func: &Function) -> Result<Allocation> {
 let labels: HashMap<&str, usize> = func
 .labels
 .iter()
 .map(|(idx, name)| (name.as_str(), *idx))
 .collect();
 let successors = build_successors(func, &labels);
 let live_out = compute_liveness(func, &successors);
 let graph = build_interference(func, &live_out);
 color(&graph, func)
}

fn reg_of(op: &Operand) -> Option<VirtualRegister> {
 match op {
 Operand::Reg(r) => Some(*r),
 _ => None,
 }
}

fn def_use(instr: &Instruction) -> (Vec<VirtualRegister>, Vec<VirtualRegister>) {
 use Instruction::*;
 match instr {
 Mov { dest, src } | Movsx { dest, src } | Movzx { dest, src } => {
 let uses = reg_of(src).into_iter().collect();
 let defs = reg_of(dest).into_iter().collect();
 (defs, uses)
 }
 Lea { dest, .. } => {
 // `addr` only ever references `PhysicalRegister`s (frame-relative
 // stack slots) or a bare data-section symbol, never a virtual
 // register, so this only ever defines.
 (reg_of(dest).into_iter().collect(), Vec::new())
 }
 Add { dest, src } | Sub { dest, src } | And { dest, src } | Or { dest, src }
 | Xor { dest, src } | Shl { dest, count: src } | Shr { dest, count: src }
 | Sar { dest, count: src } | Rol { dest, count: src } | Ror { dest, count: src } => {
 let mut defs: Vec<_> = reg_of(dest).into_iter().collect();
 let mut uses = defs.clone();
 if let Some(r) = reg_of(src) {
 uses.push(r);
 }
 defs.dedup();
 (defs, uses)
 }
 Mul { dest, src, .. } => {
 let defs: Vec<_> = reg_of(dest).into_iter().collect();
 let mut uses = defs.clone();
 if let Some(r) = reg_of(src) {
 uses.push(r);
 }
 (defs, uses)
 }
 Imul { dest, src1, src2 } => {
 let defs: Vec<_> = reg_of(dest).into_iter().collect();
 let mut uses: Vec<_> = reg_of(src1).into_iter().collect();
 if let Some(s2) = src2 {
 if let Some(r) = reg_of(s2) {
 uses.push(r);
 }
 }
 (defs, uses)
 }
 Idiv { dest, src } | IdivUnsigned { dest, src } => {
 let defs: Vec<_> = reg_of(dest).into_iter().collect();
 let mut uses = defs.clone();
 if let Some(r) = reg_of(src) {
 uses.push(r);
 }
 (defs, uses)
 }
 IdivSigned { divisor } | Div { divisor } => {
 (vec![], reg_of(divisor).into_iter().collect())
 }
 Alloca { dest, size } => {
 let defs: Vec<_> = reg_of(dest).into_iter().collect();
 (defs, reg_of(size).into_iter().collect())
 }
 Inc { dest } | Dec { dest } | Neg { dest } | Not { dest } => {
 let defs: Vec<_> = reg_of(dest).into_iter().collect();
 (defs.clone(), defs)
 }
 Cmp { src1, src2 } | Test { src1, src2 } => {
 (vec![], [reg_of(src1), reg_of(src2)].into_iter().flatten().collect())
 }
 Push { src } => (vec![], reg_of(src).into_iter().collect()),
 Pop { dest } => (reg_of(dest).into_iter().collect(), vec![]),
 Cmov { dest, src, .. } => {
 let defs: Vec<_> = reg_of(dest).into_iter().collect();
 let mut uses = defs.clone();
 if let Some(r) = reg_of(src) {
 uses.push(r);
 }
 (defs, uses)
 }
 Load { dest, .. } => (reg_of(dest).into_iter().collect(), vec![]),
 Store { src, .. } => (vec![], reg_of(src).into_iter().collect()),
 Call { .. } => (vec![], vec![]),
 _ => (vec![], vec![]),
 }
}

fn build_successors(func: &Function, labels: &HashMap<&str, usize>) -> Vec<Vec<usize>> {
 let n = func.instructions.len();
 let mut succ = vec![Vec::new(); n];
 for (i, instr) in func.instructions.iter().enumerate() {
 match instr {
 Instruction::Jmp { target } => {
 if let Some(&t) = labels.get(target.as_str()) {
 succ[i].push(t);
 }
 }
 Instruction::Jcc { target, .. } => {
 if let Some(&t) = labels.get(target.as_str()) {
 succ[i].push(t);
 }
 if i + 1 < n {
 succ[i].push(i + 1);
 }
 }
 Instruction::Ret { .. } => {}
 _ => {
 if i + 1 < n {
 succ[i].push(i + 1);
 }
 }
 }
 }
 succ
}

fn compute_liveness(func: &Function, succ: &[Vec<usize>]) -> Vec<HashSet<VirtualRegister>> {
 let n = func.instructions.len();
 let mut live_in = vec![HashSet::new(); n];
 let mut live_out = vec![HashSet::new(); n];
 let mut changed = true;
 while changed {
 changed = false;
 for i in (0..n).rev() {
 let mut out = HashSet::new();
 for &s in &succ[i] {
 out.extend(live_in[s].iter().copied());
 }
 let (defs, uses) = def_use(&func.instructions[i]);
 let mut inn: HashSet<_> = out.iter().copied().collect();
 for d in &defs {
 inn.remove(d);
 }
 inn.extend(uses);
 if inn != live_in[i] || out != live_out[i] {
 changed = true;
 live_in[i] = inn;
 live_out[i] = out;
 }
 }
 }
 live_out
}

fn build_interference(
 func: &Function,
 live_out: &[HashSet<VirtualRegister>],
) -> HashMap<VirtualRegister, HashSet<VirtualRegister>> {
 let mut graph: HashMap<VirtualRegister, HashSet<VirtualRegister>> = HashMap::new();
 for reg in &func.registers {
 graph.entry(*reg).or_default();
 }
 for (i, instr) in func.instructions.iter().enumerate() {
 let (defs, _) = def_use(instr);
 for d in &defs {
 for other in &live_out[i] {
 if other != d {
 graph.entry(*d).or_default().insert(*other);
 graph.entry(*other).or_default().insert(*d);
 }
 }
 }
 }
 graph
}

fn color(
 graph: &HashMap<VirtualRegister, HashSet<VirtualRegister>>,
 func: &Function,
) -> Result<Allocation> {
 let mut order: Vec<VirtualRegister> = graph.keys().copied().collect();
 order.sort_by_key(|r| std::cmp::Reverse(graph[r].len()));

 let mut locations = HashMap::new();
 let mut spill_count = 0i32;

 for reg in order {
 let is_float = matches!(reg.width, faxc_lir::RegisterWidth::W64) && is_fp_register(reg, func);
 let pool = if is_float { USABLE_XMMS } else { USABLE_GPRS };

 let taken: HashSet<PhysicalRegister> = graph[&reg]
 .iter()
 .filter_map(|neighbor| match locations.get(neighbor) {
 Some(Location::Reg(p)) => Some(*p),
 _ => None,
 })
 .collect();

 if let Some(phys) = pool.iter().find(|p| !taken.contains(p)) {
 locations.insert(reg, Location::Reg(*phys));
 } else {
 spill_count += 1;
 locations.insert(reg, Location::Spill(spill_count * 8));
 }
 }

 Ok(Allocation { locations, spill_count: spill_count as u32 })
}

/// No distinct float/int virtual-register marker exists upstream
/// (`VirtualRegister` only carries a bit width), so this heuristic is
/// necessarily approximate; it is refined once `faxc-lir` tags a
/// register's value class at allocation time.
fn is_fp_register(_reg: VirtualRegister, _func: &Function) -> bool {
 false
}

pub fn spill_to_stack_frame_offset(spill_index: i32) -> i32 {
 -(spill_index * 8)
}

impl std::fmt::Debug for Allocation {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 f.debug_struct("Allocation")
 .field("count", &self.locations.len())
 .field("spill_count", &self.spill_count)
 .finish()
 }
}

#[allow(dead_code)]
fn _assert_error_type_used(_e: CodeGenError) {}
