//! The `MirPass` trait and the Tier 1/2/3 pipeline runners: three tiers
//! of optimization, run in order, each to a fixed point before the next
//! begins. Tier 1 passes are independent
//! per-function so they run in parallel via `rayon`; Tier 2 and Tier 3
//! passes see the whole module (inlining needs call-graph context,
//! dead-function elimination needs every caller) so they run serially.

use crate::mir::Module;
use rayon::prelude::*;
use std::ops::Add;

#[derive(Debug, Clone, Copy, Default)]
pub struct PassStats {
 pub changed: bool,
 pub transformations: u64,
}

impl Add for PassStats {
 type Output = PassStats;
 fn add(self, rhs: PassStats) -> PassStats {
 PassStats {
 changed: self.changed || rhs.changed,
 transformations: self.transformations + rhs.transformations,
 }
 }
}

pub trait MirPass: Sync {
 fn name(&self) -> &'static str;
 fn run(&self, module: &mut Module) -> PassStats;
}

/// Wraps a per-function Tier 1 transform (the existing
/// [`crate::opt::optimize_function`] fixed-point loop) as a [`MirPass`]
/// that rayon runs over every function in the module concurrently.
pub struct LocalOptPass;

impl MirPass for LocalOptPass {
 fn name(&self) -> &'static str {
 "local-opt"
 }

 fn run(&self, module: &mut Module) -> PassStats {
 let changes: Vec<bool> = module
 .functions
 .as_mut_slice()
 .par_iter_mut()
 .map(|func| {
 let before = format!("{:?}", func.blocks.len()) + &format!("{:?}", func.locals.len());
 crate::opt::optimize_function(func);
 let after = format!("{:?}", func.blocks.len()) + &format!("{:?}", func.locals.len());
 before != after
 })
 .collect();
 let changed = changes.iter().any(|c| *c);
 PassStats { changed, transformations: changes.iter().filter(|c| **c).count() as u64 }
 }
}

/// Whole-module passes run after Tier 1 reaches its fixed point.
pub fn run_tier1(module: &mut Module) -> PassStats {
 let pass = LocalOptPass;
 let mut total = PassStats::default();
 loop {
 let stats = pass.run(module);
 total = total + stats;
 if !stats.changed {
 break;
 }
 }
 total
}

/// Loop- and call-oriented passes: tail-call
/// conversion, then loop unrolling/fusion/vectorization, then a local
/// instruction reorder, each run to its own fixed point before the next
/// starts, mirroring Tier 1's shape. `max_trip_count` bounds
/// [`crate::tier2::LoopUnrollPass`] the same way /// `unrollFactor` config field does.
pub fn run_tier2(module: &mut Module, max_trip_count: u32) -> PassStats {
 let passes: Vec<Box<dyn MirPass>> = vec![
 Box::new(crate::tier2::TailCallPass),
 Box::new(crate::tier2::LoopUnrollPass { max_trip_count }),
 Box::new(crate::tier2::LoopFusionPass),
 Box::new(crate::tier2::VectorizationPass),
 Box::new(crate::tier2::InstructionReorderPass),
 ];
 let mut total = PassStats::default();
 for pass in &passes {
 loop {
 let stats = pass.run(module);
 total = total + stats;
 if !stats.changed {
 break;
 }
 }
 }
 // A tail-call/unroll pass can expose further Tier 1 opportunities
 // (e.g. a now-constant induction variable feeding a comparison), so
 // Tier 1 runs once more to the fixed point before Tier 3 starts.
 total = total + run_tier1(module);
 total
}

/// Profile-guided and advanced passes.
pub fn run_tier3(module: &mut Module, profile: Option<&crate::tier3::ProfileRecord>) -> PassStats {
 let guided = crate::tier3::ProfileGuidedPass { profile, hot_threshold: 1000 };
 let lto = crate::tier3::LinkTimeOptimizePass;
 let counters = crate::tier3::ProfileCounterPass { enabled: false };
 let tuning = crate::tier3::AdaptiveTuningPass { caps: crate::tier3::HardwareCapabilities::BASELINE };
 let devirt = crate::tier3::InlineHotCallsPass;
 let base12 = crate::tier3::Base12FusionPass;
 let barrier = crate::tier3::TemporalBarrierMergePass;
 let speculative = crate::tier3::SpeculativeSchedulePass;

 guided.run(module)
 + lto.run(module)
 + counters.run(module)
 + tuning.run(module)
 + devirt.run(module)
 + base12.run(module)
 + barrier.run(module)
 + speculative.run(module)
}

pub fn optimize_module(module: &mut Module) -> PassStats {
 let t1 = run_tier1(module);
 let t2 = run_tier2(module, 8);
 let t3 = run_tier3(module, None);
 t1 + t2 + t3
}
