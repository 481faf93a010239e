//! `faxt` — the command-line driver over `faxc-drv`.
//!
//! Flag parsing is `clap`'s derive API, the same as the prior version's CLI
//! crate; this one just has a much smaller surface, since every flag
//! here maps straight onto a `faxc_drv::Config` field.

use std::path::PathBuf;

use clap::Parser;
use faxc_drv::{Config, EmitType, OptLevel, Session};

/// Compile one or more `.fax` source files.
#[derive(Parser, Debug)]
#[command(name = "faxt")]
#[command(author = "Fax Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line driver for the fax compiler", long_about = None)]
struct Cli {
 /// Source files to compile.
 #[arg(required = true)]
 input: Vec<PathBuf>,

 /// Output file path.
 #[arg(short, long)]
 output: Option<PathBuf>,

 /// Optimization level (0, 1, 2, 3, s).
 #[arg(short = 'O', long = "opt", default_value = "2")]
 opt_level: String,

 /// Target triple (linux-x64, windows-x64, macos-x64).
 #[arg(long)]
 target: Option<String>,

 /// Stop after lexing and print the token stream.
 #[arg(long)]
 emit_tokens: bool,

 /// Stop after parsing and print the AST.
 #[arg(long)]
 emit_ast: bool,

 /// Stop after semantic analysis and print the HIR.
 #[arg(long)]
 emit_hir: bool,

 /// Stop after MIR lowering/optimization and print the MIR.
 #[arg(long)]
 emit_mir: bool,

 /// Stop after LIR lowering and print the LIR.
 #[arg(long)]
 emit_lir: bool,

 /// Stop before linking and write a textual instruction dump.
 #[arg(short = 'S', long)]
 emit_asm: bool,

 /// Include debug information in the binary.
 #[arg(short = 'g')]
 debug: bool,

 /// Verbose pipeline progress on stderr.
 #[arg(short, long)]
 verbose: bool,

 /// Treat warnings as errors.
 #[arg(long = "Werror")]
 warnings_as_errors: bool,
}

impl Cli {
 fn emit_type(&self) -> EmitType {
 if self.emit_tokens {
 EmitType::Tokens
 } else if self.emit_ast {
 EmitType::Ast
 } else if self.emit_hir {
 EmitType::Hir
 } else if self.emit_mir {
 EmitType::Mir
 } else if self.emit_lir {
 EmitType::Lir
 } else if self.emit_asm {
 EmitType::Asm
 } else {
 EmitType::Executable
 }
 }

 fn opt_level(&self) -> anyhow::Result<OptLevel> {
 Ok(match self.opt_level.as_str() {
 "0" => OptLevel::None,
 "1" => OptLevel::Less,
 "2" => OptLevel::Default,
 "3" => OptLevel::Aggressive,
 "s" | "S" => OptLevel::Size,
 other => anyhow::bail!("unrecognized optimization level '{}'", other),
 })
 }

 fn into_config(self) -> anyhow::Result<Config> {
 let opt_level = self.opt_level()?;
 let emit = self.emit_type();
 let mut config = Config {
 input_files: self.input,
 output_file: self.output,
 opt_level,
 emit,
 debug: self.debug,
 verbose: self.verbose,
 warnings_as_errors: self.warnings_as_errors,
 ..Config::default()
 };
 if let Some(target) = self.target {
 config.target = target;
 }
 Ok(config)
 }
}

fn main() -> anyhow::Result<()> {
 let cli = Cli::parse();
 init_logging(cli.verbose);

 let config = cli.into_config()?;
 let mut session = Session::new(config);
 session
 .compile()
 .map_err(|e| anyhow::anyhow!(e.to_string()))
}

/// `RUST_LOG` controls verbosity as usual; `--verbose` just raises the
/// floor so pipeline progress shows up without having to set the
/// environment variable for a one-off run.
fn init_logging(verbose: bool) {
 let mut builder = env_logger::Builder::from_default_env();
 if verbose {
 builder.filter_level(log::LevelFilter::Debug);
 }
 let _ = builder.try_init();
}

#[cfg(test)]
mod tests {
 use super::*;

 #[test]
 fn opt_level_flags_map_to_the_right_enum_variant() {
 let cli = Cli::parse_from(["faxt", "main.fax", "-O", "3"]);
 assert!(matches!(cli.opt_level().unwrap(), OptLevel::Aggressive));
 }

 #[test]
 fn unrecognized_opt_level_is_rejected() {
 let cli = Cli::parse_from(["faxt", "main.fax", "-O", "7"]);
 assert!(cli.opt_level().is_err());
 }

 #[test]
 fn emit_flags_pick_the_earliest_stage_precedence_to_tokens() {
 let cli = Cli::parse_from(["faxt", "main.fax", "--emit-tokens"]);
 assert_eq!(cli.emit_type(), EmitType::Tokens);
 }

 #[test]
 fn no_emit_flag_means_full_executable() {
 let cli = Cli::parse_from(["faxt", "main.fax"]);
 assert_eq!(cli.emit_type(), EmitType::Executable);
 }
}
