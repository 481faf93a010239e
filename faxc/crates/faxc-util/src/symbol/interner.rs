//! String interner implementation using DashMap for concurrent access.
//!
//! This module provides a thread-safe string interner optimized for compiler use cases:
//! - Lock-free concurrent access via DashMap
//! - Fast hashing with AHasher
//! - Statistics tracking for profiling
//! - Pre-allocated buffer for the DSL's reserved words
//!
//! # Performance Characteristics
//!
//! - **Interning (hit)**: O(1) - hash lookup only
//! - **Interning (miss)**: O(1) - hash insert + allocation
//! - **Symbol comparison**: O(1) - index comparison
//! - **String retrieval**: O(n) - linear search by index (rare operation,
//! traded for lock-free concurrent writes)
//!
//! # Thread Safety
//!
//! The interner is fully thread-safe (`Sync + Send`). Multiple pipeline
//! instances compiling independent translation units, run concurrently,
//! share this table safely because symbols are write-once.

use ahash::AHasher;
use dashmap::DashMap;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::LazyLock;

use super::{InternerStats, Symbol};

/// Global string table instance using DashMap for concurrent access.
///
/// Initialized on first use via `LazyLock`. All reserved words are
/// pre-interned during initialization so they have stable, predictable
/// indices regardless of compilation order.
pub static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
 let table = StringTable::new();
 table.initialize_known_symbols();
 table
});

/// Thread-safe string table using DashMap.
pub struct StringTable {
 /// Maps a string's hash to (interned text, symbol index).
 map: DashMap<u64, (&'static str, u32)>,
 next_index: AtomicU32,
 collisions: AtomicUsize,
 hits: AtomicUsize,
 misses: AtomicUsize,
}

/// End of the reserved keyword index range; see [`super::KW_GAUGE`] and
/// friends for the constants that live below this boundary.
pub(crate) const RESERVED_SYMBOLS_END: u32 = 64;

impl StringTable {
 /// Create a new empty string table.
 ///
 /// The table starts with default capacity and grows as needed.
 /// Reserved words are initialized separately via
 /// `initialize_known_symbols()`.
 #[inline]
 fn new() -> Self {
 Self {
 map: DashMap::with_capacity(256),
 next_index: AtomicU32::new(RESERVED_SYMBOLS_END),
 collisions: AtomicUsize::new(0),
 hits: AtomicUsize::new(0),
 misses: AtomicUsize::new(0),
 }
 }

 /// Pre-intern the DSL's fixed, finite keyword set so
 /// every keyword constant in [`super`] has a stable low index.
 ///
 /// This must match the order of the `KW_*` constants in `symbol/mod.rs`.
 fn initialize_known_symbols(&self) {
 let known_symbols = [
 "Print", "let", "Fn", "ret", "if", "else", "while", "break", "continue", "switch",
 "case", "default", "loop", "call", "overlay",
 ];

 for (idx, symbol) in known_symbols.iter().enumerate() {
 let actual_idx = idx as u32;
 if actual_idx < RESERVED_SYMBOLS_END {
 let interned: &'static str = Box::leak(symbol.to_string().into_boxed_str());
 let hash = Self::hash_string(symbol);
 self.map.insert(hash, (interned, actual_idx));
 }
 }
 }

 /// Intern a string, returning its symbol.
 ///
 /// This function is thread-safe and uses DashMap for concurrent access.
 /// If the string is already interned, returns the existing symbol.
 /// Otherwise, allocates a new entry and returns a new symbol.
 pub fn intern(&self, string: &str) -> Symbol {
 let hash = Self::hash_string(string);

 if let Some(entry) = self.map.get(&hash) {
 if entry.value().0 == string {
 self.hits.fetch_add(1, Ordering::Relaxed);
 return Symbol { index: entry.value().1 };
 }
 }

 self.misses.fetch_add(1, Ordering::Relaxed);

 match self.map.entry(hash) {
 dashmap::mapref::entry::Entry::Occupied(entry) => {
 if entry.get().0 == string {
 return Symbol { index: entry.get().1 };
 }
 self.handle_collision(string, hash)
 }
 dashmap::mapref::entry::Entry::Vacant(entry) => {
 let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
 let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
 entry.insert((interned, idx));
 Symbol { index: idx }
 }
 }
 }

 /// Handle hash collisions by probing with a golden-ratio offset.
 fn handle_collision(&self, string: &str, original_hash: u64) -> Symbol {
 const MAX_PROBES: u64 = 32;
 const PROBE_PRIME: u64 = 0x9e3779b97f4a7c15;

 for i in 1u64..=MAX_PROBES {
 let probe_hash = original_hash.wrapping_add(i.wrapping_mul(PROBE_PRIME));

 if let Some(entry) = self.map.get(&probe_hash) {
 if entry.value().0 == string {
 return Symbol { index: entry.value().1 };
 }
 } else {
 self.collisions.fetch_add(1, Ordering::Relaxed);
 let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
 let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
 self.map.insert(probe_hash, (interned, idx));
 return Symbol { index: idx };
 }
 }

 self.collisions.fetch_add(1, Ordering::Relaxed);
 let interned: &'static str = Box::leak(string.to_string().into_boxed_str());
 let idx = self.next_index.fetch_add(1, Ordering::Relaxed);
 self.map.insert(original_hash, (interned, idx));
 Symbol { index: idx }
 }

 /// Get string by symbol.
 ///
 /// O(n) where n is the number of interned strings — DashMap has no
 /// efficient index-based lookup. Deliberate trade-off for lock-free
 /// concurrent writes; callers on hot paths should cache the `&str`.
 pub fn get(&self, symbol: Symbol) -> Option<&'static str> {
 self.map
 .iter()
 .find(|entry| entry.value().1 == symbol.index)
 .map(|entry| entry.value().0)
 }

 #[inline]
 fn hash_string(string: &str) -> u64 {
 let mut hasher = AHasher::default();
 string.hash(&mut hasher);
 hasher.finish()
 }

 /// Get statistics about the string table for profiling.
 pub fn stats(&self) -> InternerStats {
 let count = self.map.len();
 let capacity = self.map.capacity();
 let collisions = self.collisions.load(Ordering::Relaxed);
 let hits = self.hits.load(Ordering::Relaxed);
 let misses = self.misses.load(Ordering::Relaxed);

 InternerStats {
 count,
 capacity,
 collisions,
 hits,
 misses,
 }
 }

 /// Reset statistics counters (useful for benchmarking/tests).
 #[cfg(test)]
 pub(crate) fn reset_stats(&self) {
 self.collisions.store(0, Ordering::Relaxed);
 self.hits.store(0, Ordering::Relaxed);
 self.misses.store(0, Ordering::Relaxed);
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use std::thread;

 #[test]
 fn test_intern_same_string() {
 let s1 = STRING_TABLE.intern("hello");
 let s2 = STRING_TABLE.intern("hello");
 assert_eq!(s1, s2);
 }

 #[test]
 fn test_intern_different_strings() {
 let s1 = STRING_TABLE.intern("hello");
 let s2 = STRING_TABLE.intern("world");
 assert_ne!(s1, s2);
 }

 #[test]
 fn test_get_string() {
 let symbol = STRING_TABLE.intern("test_string");
 let string = STRING_TABLE.get(symbol);
 assert_eq!(string, Some("test_string"));
 }

 #[test]
 fn test_concurrent_intern() {
 let handles: Vec<_> = (0..20)
 .map(|i| thread::spawn(move || (i, STRING_TABLE.intern(&format!("thread_{}", i)))))
 .collect();

 let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

 let symbols: Vec<_> = results.iter().map(|(_, s)| *s).collect();
 for i in 0..symbols.len() {
 for j in (i + 1)..symbols.len() {
 assert_ne!(symbols[i], symbols[j]);
 }
 }
 }

 #[test]
 fn test_concurrent_same_string() {
 let handles: Vec<_> =
 (0..10).map(|_| thread::spawn(|| STRING_TABLE.intern("concurrent_same"))).collect();

 let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

 for symbol in &results[1..] {
 assert_eq!(results[0], *symbol);
 }
 }

 #[test]
 fn test_stats_tracking() {
 STRING_TABLE.reset_stats();

 let _ = STRING_TABLE.intern("new_unique_string_12345");
 let stats = STRING_TABLE.stats();
 assert!(stats.misses >= 1);

 let _ = STRING_TABLE.intern("new_unique_string_12345");
 let stats = STRING_TABLE.stats();
 assert!(stats.hits >= 1);
 }

 #[test]
 fn test_stats_struct() {
 let stats = STRING_TABLE.stats();
 assert!(stats.count > 0);
 assert!(stats.capacity >= stats.count);
 assert!(stats.load_factor() >= 0.0);
 assert!(stats.load_factor() <= 1.0);
 }

 #[test]
 fn test_hash_collision_handling() {
 let mut symbols = Vec::new();
 for i in 0..1000 {
 symbols.push(STRING_TABLE.intern(&format!("collision_test_{}", i)));
 }

 for i in 0..symbols.len() {
 for j in (i + 1)..symbols.len() {
 assert_ne!(symbols[i], symbols[j]);
 }
 }

 for (i, sym) in symbols.iter().enumerate() {
 let expected = format!("collision_test_{}", i);
 assert_eq!(STRING_TABLE.get(*sym), Some(expected.as_str()));
 }
 }

 #[test]
 fn test_empty_string() {
 let s = STRING_TABLE.intern("");
 assert_eq!(STRING_TABLE.get(s), Some(""));
 }

 #[test]
 fn test_unicode_strings() {
 let test_cases = ["你好", "世界", "🦀", "こんにちは", "Привет"];

 for test in &test_cases {
 let sym = STRING_TABLE.intern(test);
 assert_eq!(STRING_TABLE.get(sym), Some(*test));
 }
 }

 #[test]
 fn test_long_strings() {
 let long_string = "a".repeat(10000);
 let sym = STRING_TABLE.intern(&long_string);
 assert_eq!(STRING_TABLE.get(sym), Some(long_string.as_str()));
 }

 #[test]
 fn test_send_sync() {
 fn assert_send_sync<T: Send + Sync>() {}
 assert_send_sync::<StringTable>();
 }
}
