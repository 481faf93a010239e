//! Binary emitter: wraps a code+data byte buffer
//! into a self-contained PE32+, ELF64, or Mach-O 64 executable. Each
//! format's module builds the exact bit-exact header layout required; this
//! file only picks the format and handles the artifact write/chmod the
//! three formats share.

mod elf;
mod macho;
mod pe;

use crate::error::EmitError;
use faxc_util::Symbol;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
 WindowsX64,
 LinuxX64,
 MacosX64,
}

impl Target {
 pub fn from_triple(s: &str) -> Option<Self> {
 match s {
 "windows-x64" => Some(Target::WindowsX64),
 "linux-x64" => Some(Target::LinuxX64),
 "macos-x64" => Some(Target::MacosX64),
 _ => None,
 }
 }
}

/// A fully laid-out program ready for container wrapping: `code` and
/// `data` are the module's concatenated, relocation-resolved sections
/// (`crate::linker` has already patched every call/jump displacement),
/// `entry_offset` is the byte offset of `main`'s first instruction
/// within `code`.
pub struct Artifact {
 pub code: Vec<u8>,
 pub data: Vec<u8>,
 pub entry_offset: u32,
 /// `(code_offset, data_offset)` pairs from `crate::linker::LinkResult`:
 /// each names an 8-byte `movabs`-shaped placeholder in `code` that
 /// needs the data section's final virtual address added in.
 pub data_relocs: Vec<(u32, u32)>,
}

/// Builds the target's executable container for `artifact` and writes
/// it to `out_path`, marking it executable on POSIX.
pub fn emit(target: Target, artifact: &Artifact, out_path: &Path) -> Result<(), EmitError> {
 let bytes = match target {
 Target::WindowsX64 => pe::build(artifact),
 Target::LinuxX64 => elf::build(artifact),
 Target::MacosX64 => macho::build(artifact),
 };
 std::fs::write(out_path, &bytes)?;
 mark_executable(out_path)?;
 Ok(())
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> std::io::Result<()> {
 use std::os::unix::fs::PermissionsExt;
 let mut perms = std::fs::metadata(path)?.permissions();
 perms.set_mode(0o755);
 std::fs::set_permissions(path, perms)
}

#[cfg(not(unix))]
fn mark_executable(_path: &Path) -> std::io::Result<()> {
 Ok(())
}

fn round_up(value: u32, align: u32) -> u32 {
 (value + align - 1) / align * align
}

/// Every format needs a name for an external/import symbol somewhere in
/// its layout even though this emitter doesn't build a real import
/// table; kept as one helper so the three writers render it the same
/// way in comments/labels during debugging.
#[allow(dead_code)]
fn symbol_name(s: Symbol) -> String {
 s.as_str().to_string()
}
