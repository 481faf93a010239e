//! faxc-mir — Mid-level IR: a typed SSA representation built directly
//! from `faxc_sem::hir`, its CFG/dominator and
//! dataflow analyses, and the three-tier optimization pipeline.

pub mod mir;

mod builder;
mod lower;
mod opt;
mod pass;
mod tier2;
mod tier3;

pub mod analysis;

pub use builder::Builder;
pub use lower::{lower_function, lower_module};
pub use mir::*;
pub use opt::optimize_function;
pub use pass::{optimize_module, run_tier1, run_tier2, run_tier3, MirPass, PassStats};
pub use tier2::{InstructionReorderPass, LoopFusionPass, LoopUnrollPass, TailCallPass, VectorizationPass};
pub use tier3::{
 AdaptiveTuningPass, Base12FusionPass, HardwareCapabilities, InlineHotCallsPass,
 LinkTimeOptimizePass, ProfileCounterPass, ProfileGuidedPass, ProfileRecord,
 SpeculativeSchedulePass, TemporalBarrierMergePass,
};

#[cfg(test)]
mod tests;
