//! Thin stubs for the source language's monitoring/scheduling/telemetry
//! statements. These statements treat the runtime as an opaque
//! collaborator whose internals are out of scope; what matters to the
//! generated binary is that each name resolves and behaves sanely, not
//! that it does real scheduling or hardware telemetry.
//!
//! `Sync` is the one exception with real semantics: the source language
//! gives no guidance on whether guarded names pick independent locks or
//! share one, so this takes the single-global-lock reading and blocks
//! out overlapping `sync` blocks on every thread.

use std::cell::RefCell;
use std::os::raw::c_char;
use std::sync::{Mutex, MutexGuard};

static GLOBAL_SYNC: Mutex<()> = Mutex::new(());

thread_local! {
 static SYNC_GUARD: RefCell<Vec<MutexGuard<'static, ()>>> = const { RefCell::new(Vec::new()) };
}

#[no_mangle]
pub extern "C" fn faxc_rt_sync_enter() -> i64 {
 let guard = GLOBAL_SYNC.lock().unwrap_or_else(|e| e.into_inner());
 SYNC_GUARD.with(|g| g.borrow_mut().push(guard));
 0
}

#[no_mangle]
pub extern "C" fn faxc_rt_sync_exit() -> i64 {
 SYNC_GUARD.with(|g| {
 g.borrow_mut().pop();
 });
 0
}

/// `Thread`/`Parallel` blocks lower their body inline rather than
/// outlining it into a spawnable function pointer, so these mark the
/// region without actually moving it to another OS thread.
#[no_mangle]
pub extern "C" fn faxc_rt_thread_enter() -> i64 {
 log::debug!("thread block entered");
 0
}

#[no_mangle]
pub extern "C" fn faxc_rt_thread_exit() -> i64 {
 log::debug!("thread block exited");
 0
}

#[no_mangle]
pub extern "C" fn faxc_rt_parallel_enter() -> i64 {
 log::debug!("parallel block entered");
 0
}

#[no_mangle]
pub extern "C" fn faxc_rt_parallel_join() -> i64 {
 log::debug!("parallel block joined");
 0
}

#[no_mangle]
pub extern "C" fn faxc_rt_async(task: i64) -> i64 {
 log::debug!("async task {task} queued");
 task
}

#[no_mangle]
pub extern "C" fn faxc_rt_schedule(n: i64) -> i64 {
 log::debug!("schedule requested over {n} units");
 n
}

/// # Safety
/// `source` must point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn faxc_rt_batch(source: *const c_char, n: i64) -> i64 {
 log::debug!("batch over '{}' with size {n}", c_str_lossy(source));
 n
}

/// # Safety
/// `var` must point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn faxc_rt_scale(var: *const c_char) -> i64 {
 log::debug!("scale requested for '{}'", c_str_lossy(var));
 0
}

/// # Safety
/// `var` must point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn faxc_rt_bounds(var: *const c_char, min: i64, max: i64) -> i64 {
 log::debug!("bounds on '{}': [{min}, {max}]", c_str_lossy(var));
 0
}

/// # Safety
/// `label` must point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn faxc_rt_checkpoint(label: *const c_char) -> i64 {
 log::debug!("checkpoint '{}'", c_str_lossy(label));
 0
}

/// # Safety
/// `label` must point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn faxc_rt_vbreak(label: *const c_char) -> i64 {
 log::debug!("break '{}'", c_str_lossy(label));
 0
}

/// # Safety
/// `name` must point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn faxc_rt_matrix_new(name: *const c_char, rows: i64, cols: i64) -> i64 {
 log::debug!("matrix '{}' allocated: {rows}x{cols}", c_str_lossy(name));
 0
}

/// # Safety
/// `var` must point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn faxc_rt_sanitize_mem(var: *const c_char) -> i64 {
 log::debug!("sanitize_mem on '{}'", c_str_lossy(var));
 0
}

/// # Safety
/// `var` must point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn faxc_rt_sanitize_code(var: *const c_char) -> i64 {
 log::debug!("sanitize_code on '{}'", c_str_lossy(var));
 0
}

#[no_mangle]
pub extern "C" fn faxc_rt_ping() -> i64 {
 log::debug!("ping");
 0
}

#[no_mangle]
pub extern "C" fn faxc_rt_audit() -> i64 {
 log::debug!("audit");
 0
}

#[no_mangle]
pub extern "C" fn faxc_rt_temperature() -> i64 {
 log::debug!("temperature sampled");
 0
}

#[no_mangle]
pub extern "C" fn faxc_rt_pressure() -> i64 {
 log::debug!("pressure sampled");
 0
}

#[no_mangle]
pub extern "C" fn faxc_rt_gauge() -> i64 {
 log::debug!("gauge sampled");
 0
}

unsafe fn c_str_lossy(ptr: *const c_char) -> String {
 std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn sync_enter_exit_balances_the_global_lock() {
 assert_eq!(faxc_rt_sync_enter(), 0);
 assert_eq!(faxc_rt_sync_exit(), 0);
 }

 #[test]
 fn thread_and_parallel_markers_are_harmless_no_ops() {
 assert_eq!(faxc_rt_thread_enter(), 0);
 assert_eq!(faxc_rt_thread_exit(), 0);
 assert_eq!(faxc_rt_parallel_enter(), 0);
 assert_eq!(faxc_rt_parallel_join(), 0);
 }

 #[test]
 fn async_and_schedule_echo_their_argument() {
 assert_eq!(faxc_rt_async(7), 7);
 assert_eq!(faxc_rt_schedule(3), 3);
 }
}
