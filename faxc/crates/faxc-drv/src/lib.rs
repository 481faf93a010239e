//! faxc-drv - Compiler Driver
//!
//! ============================================================================
//! COMPILER DRIVER OVERVIEW
//! ============================================================================
//!
//! The driver is the entry point and orchestrator for the whole
//! compilation pipeline. It is responsible for:
//!
//! 1. COMMAND LINE PARSING
//! - Parse arguments and flags
//! - Validate options
//! - Build a `Config`
//!
//! 2. FILE MANAGEMENT
//! - Read source files
//! - Manage output paths
//!
//! 3. PIPELINE ORCHESTRATION
//! - Run compilation phases in order
//! - Propagate errors between phases
//! - Manage intermediate artifacts
//!
//! 4. ERROR REPORTING
//! - Aggregate diagnostics from every phase
//! - Format and display errors
//! - Exit with the appropriate code
//!
//! ============================================================================
//! COMPILATION PIPELINE
//! ============================================================================
//!
//! ```
//! Source Files (.fax)
//! │
//! ▼
//! [Read Files]
//! │
//! ▼
//! [Lexer] ──▶ Token Stream
//! │
//! ▼
//! [Parser] ──▶ AST
//! │
//! ▼
//! [Semantic Analysis] ──▶ HIR
//! │
//! ▼
//! [MIR Generation] ──▶ MIR
//! │
//! ▼
//! [MIR Optimization] ──▶ Optimized MIR
//! │
//! ▼
//! [LIR Generation] ──▶ LIR
//! │
//! ▼
//! [Register Allocation] ──▶ LIR with Physical Registers
//! │
//! ▼
//! [Code Generation] ──▶ Assembly / Object File
//! │
//! ▼
//! [Linking] ──▶ Executable
//! ```
//!
//! PHASES DETAIL:
//! --------------
//!
//! Phase 1: Lexical Analysis
//! - Input: Source code (text)
//! - Output: Token stream
//! - Tool: faxc-lex
//! - Errors: Invalid characters, unterminated strings
//!
//! Phase 2: Parsing
//! - Input: Token stream
//! - Output: Abstract Syntax Tree (AST)
//! - Tool: faxc-par
//! - Errors: Syntax errors, unexpected tokens
//!
//! Phase 3: Semantic Analysis
//! - Input: AST
//! - Output: High-level IR (HIR)
//! - Tool: faxc-sem
//! - Errors: Type errors, undefined names, borrow check errors
//!
//! Phase 4: MIR Generation
//! - Input: HIR
//! - Output: Mid-level IR (MIR)
//! - Tool: faxc-mir
//! - Tasks: Lower to SSA form, build CFG
//!
//! Phase 5: MIR Optimization
//! - Input: MIR
//! - Output: Optimized MIR
//! - Tasks: Constant folding, DCE, inlining, etc.
//!
//! Phase 6: LIR Generation
//! - Input: Optimized MIR
//! - Output: Low-level IR (LIR)
//! - Tasks: Lower PHI nodes, explicit memory ops
//!
//! Phase 7: Register Allocation
//! - Input: LIR with virtual registers
//! - Output: LIR with physical registers
//! - Tasks: Graph coloring, spilling
//!
//! Phase 8: Code Generation
//! - Input: LIR
//! - Output: Assembly or object file
//! - Tool: faxc-gen
//!
//! Phase 9: Linking
//! - Input: Object files
//! - Output: Executable
//! - Tool: System linker (ld, link.exe, etc.)
//!
//! ============================================================================
//! COMMAND LINE INTERFACE
//! ============================================================================
//!
//! USAGE:
//!
//! Compile file:
//! faxc main.fax
//!
//! Specify output:
//! faxc main.fax -o myprogram
//!
//! Multiple files:
//! faxc file1.fax file2.fax file3.fax -o program
//!
//! Optimization levels:
//! faxc -O0 main.fax # No optimization (debug)
//! faxc -O1 main.fax # Basic optimization
//! faxc -O2 main.fax # Standard optimization (default)
//! faxc -O3 main.fax # Aggressive optimization
//! faxc -Os main.fax # Optimize for size
//!
//! Emit intermediate representations:
//! faxc --emit-tokens main.fax # Lexer output
//! faxc --emit-ast main.fax # Parser output
//! faxc --emit-hir main.fax # HIR
//! faxc --emit-mir main.fax # MIR
//! faxc --emit-lir main.fax # LIR
//! faxc --emit-asm main.fax # Assembly
//! faxc -S main.fax # Same as --emit-asm
//!
//! Stop after specific phase:
//! faxc -c main.fax # Compile to object file only
//!
//! Target container:
//! faxc --target linux-x64 main.fax
//! faxc --target windows-x64 main.fax
//! faxc --target macos-x64 main.fax
//!
//! Debug options:
//! faxc -g main.fax # Include debug info
//! faxc --verbose main.fax # Verbose output
//! faxc -Werror main.fax # Treat warnings as errors
//!
//! ============================================================================
//! CONFIGURATION
//! ============================================================================
//!
//! Configuration covers every option that affects a compilation.
//!
//! Fields:
//! - input_files: Vec<PathBuf>
//! - output_file: Option<PathBuf>
//! - opt_level: OptLevel
//! - target: String
//! - emit: EmitType
//! - debug: bool
//! - verbose: bool
//! - warnings_as_errors: bool
//! - libraries: Vec<String>
//! - library_paths: Vec<PathBuf>
//!
//! ============================================================================
//! ERROR HANDLING
//! ============================================================================
//!
//! Error Levels:
//! -------------
//! - ERROR: Fatal error, compilation fails
//! - WARNING: Non-fatal, compilation succeeds
//! - NOTE: Additional information
//! - HELP: Suggestion for fix
//!
//! Error Aggregation:
//! ------------------
//! The compiler collects every diagnostic before exiting, so a single
//! invocation surfaces as many problems as it can instead of stopping
//! at the first one.
//!
//! Exit Codes:
//! -----------
//! - 0: Success
//! - 1: Compilation error
//! - 2: Internal compiler error
//! - 3: Command line error

use std::path::PathBuf;

use faxc_util::{Handler, Symbol};

/// Compiler configuration
#[derive(Debug, Clone)]
pub struct Config {
 /// Input source files
 pub input_files: Vec<PathBuf>,

 /// Output file path (None uses the default, `a.out`)
 pub output_file: Option<PathBuf>,

 /// Optimization level
 pub opt_level: OptLevel,

 /// Target triple
 pub target: String,

 /// Emit type (what to produce)
 pub emit: EmitType,

 /// Include debug information
 pub debug: bool,

 /// Verbose output
 pub verbose: bool,

 /// Treat warnings as errors
 pub warnings_as_errors: bool,

 /// Libraries to link
 pub libraries: Vec<String>,

 /// Library search paths
 pub library_paths: Vec<PathBuf>,

 /// Enable incremental compilation
 pub incremental: bool,

 /// Working directory
 pub working_dir: PathBuf,
}

/// Optimization level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptLevel {
 /// No optimization
 None,
 /// Basic optimization
 Less,
 /// Standard optimization
 Default,
 /// Aggressive optimization
 Aggressive,
 /// Optimize for size
 Size,
}

impl Default for OptLevel {
 fn default() -> Self {
 OptLevel::Default
 }
}

/// Emit type - what output to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitType {
 /// Tokens only
 Tokens,
 /// AST only
 Ast,
 /// HIR only
 Hir,
 /// MIR only
 Mir,
 /// LIR only
 Lir,
 /// Assembly
 Asm,
 /// Object file
 Object,
 /// Full executable
 Executable,
}

impl Default for EmitType {
 fn default() -> Self {
 EmitType::Executable
 }
}

impl Default for Config {
 fn default() -> Self {
 Config {
 input_files: Vec::new(),
 output_file: None,
 opt_level: OptLevel::Default,
 target: default_target(),
 emit: EmitType::Executable,
 debug: false,
 verbose: false,
 warnings_as_errors: false,
 libraries: Vec::new(),
 library_paths: Vec::new(),
 incremental: true,
 working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
 }
 }
}

/// Compilation session
///
/// Holds all state for a single compiler invocation.
pub struct Session {
 /// Configuration
 pub config: Config,

 /// Source map (all loaded files)
 pub sources: faxc_util::SourceMap,

 /// Diagnostic handler
 pub diagnostics: Handler,
}

impl Session {
 /// Create new session
 pub fn new(config: Config) -> Self {
 Self {
 config,
 sources: faxc_util::SourceMap::new(),
 diagnostics: Handler::new(),
 }
 }

 /// Run compilation
 pub fn compile(&mut self) -> Result<(), CompileError> {
 if self.config.verbose {
 eprintln!("Configuration: {:?}", self.config);
 }

 let source = self.read_sources()?;
 let results = self.run_pipeline(&source)?;
 self.emit_output(results)?;

 if self.diagnostics.has_errors()
 || (self.config.warnings_as_errors && self.diagnostics.warning_count() > 0)
 {
 return Err(CompileError::CompilationFailed);
 }

 Ok(())
 }

 /// Reads every input file into the session's source map and returns
 /// the primary translation unit's text.
 ///
 /// `faxc_par::Ast` addresses its nodes with arena-local `NodeId`s, so
 /// two files parsed independently can't be spliced into one `Ast`
 /// without a node-id renumbering pass this driver doesn't have yet;
 /// until then only `input_files[0]` is compiled, and every other
 /// file is read (so its existence and encoding are still checked)
 /// but otherwise ignored with a logged warning.
 fn read_sources(&mut self) -> Result<String, CompileError> {
 if self.config.input_files.is_empty() {
 return Err(CompileError::InvalidArguments("no input files".into()));
 }

 let mut primary = None;
 for (i, path) in self.config.input_files.iter().enumerate() {
 if self.config.verbose {
 eprintln!("Reading: {}", path.display());
 }

 let content = std::fs::read_to_string(path)
 .map_err(|e| CompileError::IoError(path.clone(), e))?;

 self.sources.add_file(path.display().to_string(), content.clone());

 if i == 0 {
 primary = Some(content);
 } else {
 log::warn!(
 "{}: multi-file compilation is not supported yet, file ignored",
 path.display()
 );
 }
 }

 Ok(primary.expect("checked non-empty above"))
 }

 /// Runs the full pipeline over `source`, stopping early at whichever
 /// stage `self.config.emit` names.
 fn run_pipeline(&mut self, source: &str) -> Result<CompilationResults, CompileError> {
 use faxc_lex::{Lexer, Token};

 // C1/C2: lex, then run the CIAM preprocessor over the token stream.
 let mut lexer = Lexer::new(source, &self.diagnostics);
 let mut tokens = Vec::new();
 loop {
 let (tok, span) = lexer.next_spanned();
 if tok == Token::Eof {
 break;
 }
 tokens.push((tok, span));
 }

 if self.config.emit == EmitType::Tokens {
 return Ok(CompilationResults::Tokens(tokens));
 }

 let mut pre = faxc_pre::Preprocessor::new();
 let tokens = pre.process(tokens, &self.diagnostics);

 // C3/C4: parse.
 let mut parser = faxc_par::Parser::new(tokens, &self.diagnostics);
 let ast = parser
 .parse()
 .map_err(CompileError::Parse)?;

 if self.config.emit == EmitType::Ast {
 return Ok(CompilationResults::Ast(ast));
 }

 // C4.5: name resolution, local type inference, AST -> HIR.
 let mut analyzer = faxc_sem::SemanticAnalyzer::new(&self.diagnostics);
 let hir_module = analyzer.analyze(&ast);

 if self.config.emit == EmitType::Hir {
 return Ok(CompilationResults::Hir(hir_module));
 }

 // C6: HIR -> MIR/SSA.
 let mut mir_module = faxc_mir::lower_module(&hir_module);

 // C8: three-tier optimization pipeline, scaled to -O.
 match self.config.opt_level {
 OptLevel::None => {}
 OptLevel::Less | OptLevel::Size => {
 faxc_mir::run_tier1(&mut mir_module);
 }
 OptLevel::Default => {
 faxc_mir::run_tier2(&mut mir_module, 8);
 }
 OptLevel::Aggressive => {
 faxc_mir::optimize_module(&mut mir_module);
 }
 }

 if self.config.emit == EmitType::Mir {
 return Ok(CompilationResults::Mir(mir_module));
 }

 // C7/C9 prep: MIR -> LIR, one function at a time.
 let lir_functions: Vec<faxc_lir::Function> = mir_module
 .functions
 .iter_enumerated()
 .map(|(_, f)| faxc_lir::lower_mir_to_lir(f))
 .collect();

 if self.config.emit == EmitType::Lir {
 return Ok(CompilationResults::Lir(lir_functions));
 }

 // Register allocation + instruction selection/encoding, one
 // function at a time; `faxc_gen::strtab` collects every string
 // literal / named handle referenced across the whole module
 // into one data section up front so `encode_function` can emit
 // `DataAbs` relocations against it.
 let (data, data_offsets) = faxc_gen::strtab::build(&lir_functions);

 let mut code_buffers = Vec::with_capacity(lir_functions.len());
 for func in &lir_functions {
 let alloc = faxc_gen::regalloc::allocate(func)
 .map_err(|e| CompileError::CodeGen(e.to_string()))?;
 let buf = faxc_gen::encode::encode_function(func, &alloc)
 .map_err(|e| CompileError::CodeGen(e.to_string()))?;
 code_buffers.push((func.name, buf));
 }

 if self.config.emit == EmitType::Asm {
 return Ok(CompilationResults::Asm(render_asm(&lir_functions)));
 }

 // C10: link the module's functions into one code blob, then
 // wrap it in the target container format.
 let entry = Symbol::intern("__entry");
 let (link_result, entry_offset) =
 faxc_gen::linker::link(&code_buffers, entry, &data_offsets)
 .map_err(|e| CompileError::CodeGen(e.to_string()))?;

 if !link_result.unresolved.is_empty() && self.config.verbose {
 eprintln!(
 "{} unresolved call(s) left for the runtime library to bind",
 link_result.unresolved.len()
 );
 }

 let artifact = faxc_gen::emit::Artifact {
 code: link_result.code,
 data,
 entry_offset,
 data_relocs: link_result.data_relocs,
 };

 Ok(CompilationResults::Binary(artifact))
 }

 /// Emit output
 fn emit_output(&self, results: CompilationResults) -> Result<(), CompileError> {
 match results {
 CompilationResults::Tokens(tokens) => println!("{:?}", tokens),
 CompilationResults::Ast(ast) => {
 println!("{}", faxc_par::print_node(&ast, ast.root, 0));
 }
 CompilationResults::Hir(hir) => println!("{:#?}", hir),
 CompilationResults::Mir(mir) => println!("{:#?}", mir),
 CompilationResults::Lir(lir) => {
 for func in lir {
 println!("{:#?}", func);
 }
 }
 CompilationResults::Asm(text) => {
 let output = self.output_path();
 std::fs::write(&output, text)
 .map_err(|e| CompileError::IoError(output, e))?;
 }
 CompilationResults::Binary(artifact) => {
 let output = self.output_path();
 let target = faxc_gen::emit::Target::from_triple(&self.config.target)
 .ok_or_else(|| {
 CompileError::InvalidArguments(format!(
 "unsupported target '{}'",
 self.config.target
 ))
 })?;
 faxc_gen::emit::emit(target, &artifact, &output)
 .map_err(|e| CompileError::Emit(e.to_string()))?;
 }
 }

 Ok(())
 }

 fn output_path(&self) -> PathBuf {
 self.config
 .output_file
 .clone()
 .unwrap_or_else(|| PathBuf::from("a.out"))
 }
}

/// A textual rendering of a module's LIR used for `--emit-asm`; not a
/// real assembler mnemonic table, just enough per-instruction `Debug`
/// output to inspect what `encode_function` is about to turn into
/// machine code.
fn render_asm(functions: &[faxc_lir::Function]) -> String {
 use std::fmt::Write;
 let mut out = String::new();
 for func in functions {
 let _ = writeln!(out, "{}:", func.name.as_str());
 for instr in &func.instructions {
 let _ = writeln!(out, " {:?}", instr);
 }
 }
 out
}

/// Result of one pipeline run, tagged by how far it got before
/// `Config::emit` asked it to stop.
pub enum CompilationResults {
 Tokens(Vec<(faxc_lex::Token, faxc_util::Span)>),
 Ast(faxc_par::Ast),
 Hir(faxc_sem::hir::Module),
 Mir(faxc_mir::Module),
 Lir(Vec<faxc_lir::Function>),
 Asm(String),
 Binary(faxc_gen::emit::Artifact),
}

/// Compile error
#[derive(Debug)]
pub enum CompileError {
 IoError(PathBuf, std::io::Error),
 CompilationFailed,
 InvalidArguments(String),
 Parse(faxc_par::ParseError),
 CodeGen(String),
 Emit(String),
}

impl std::fmt::Display for CompileError {
 fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
 match self {
 CompileError::IoError(path, e) => {
 write!(f, "IO error for {}: {}", path.display(), e)
 }
 CompileError::CompilationFailed => write!(f, "compilation failed"),
 CompileError::InvalidArguments(s) => write!(f, "invalid arguments: {}", s),
 CompileError::Parse(e) => write!(f, "{}", e),
 CompileError::CodeGen(s) => write!(f, "code generation error: {}", s),
 CompileError::Emit(s) => write!(f, "emit error: {}", s),
 }
 }
}

impl std::error::Error for CompileError {}

/// Parses `std::env::args()` into a [`Config`] and runs the compiler.
/// There is no flag-parsing crate in this crate's dependency table, so
/// this reads the same small, fixed flag set the module doc's usage
/// section above describes, by hand.
pub fn run() -> anyhow::Result<()> {
 let args: Vec<String> = std::env::args().skip(1).collect();
 let config = parse_args(&args).map_err(|e| anyhow::anyhow!(e))?;

 let mut session = Session::new(config);
 session.compile().map_err(|e| anyhow::anyhow!(e.to_string()))
}

fn parse_args(args: &[String]) -> Result<Config, String> {
 let mut config = Config::default();
 let mut i = 0;
 while i < args.len() {
 let arg = &args[i];
 match arg.as_str() {
 "-o" => {
 i += 1;
 let path = args.get(i).ok_or("-o requires a path")?;
 config.output_file = Some(PathBuf::from(path));
 }
 "-O0" => config.opt_level = OptLevel::None,
 "-O1" => config.opt_level = OptLevel::Less,
 "-O2" => config.opt_level = OptLevel::Default,
 "-O3" => config.opt_level = OptLevel::Aggressive,
 "-Os" => config.opt_level = OptLevel::Size,
 "--emit-tokens" => config.emit = EmitType::Tokens,
 "--emit-ast" => config.emit = EmitType::Ast,
 "--emit-hir" => config.emit = EmitType::Hir,
 "--emit-mir" => config.emit = EmitType::Mir,
 "--emit-lir" => config.emit = EmitType::Lir,
 "--emit-asm" | "-S" => config.emit = EmitType::Asm,
 "-c" => config.emit = EmitType::Object,
 "--target" => {
 i += 1;
 config.target = args.get(i).ok_or("--target requires a triple")?.clone();
 }
 "-g" => config.debug = true,
 "--verbose" => config.verbose = true,
 "-Werror" => config.warnings_as_errors = true,
 "--no-incremental" => config.incremental = false,
 other if other.starts_with('-') => {
 return Err(format!("unrecognized flag '{}'", other));
 }
 path => config.input_files.push(PathBuf::from(path)),
 }
 i += 1;
 }

 if config.input_files.is_empty() {
 return Err("no input files".into());
 }

 Ok(config)
}

/// Default target triple, in the short `arch-os` form
/// `faxc_gen::emit::Target::from_triple` understands (`linux-x64`,
/// `windows-x64`, `macos-x64`) rather than a GNU-style triple — there is
/// no cross-compiling toolchain backing `--target` here, just a choice
/// of the three container formats the emitter can write.
fn default_target() -> String {
 std::env::var("FAXC_TARGET").unwrap_or_else(|_| {
 if cfg!(target_os = "windows") {
 "windows-x64".to_string()
 } else if cfg!(target_os = "macos") {
 "macos-x64".to_string()
 } else {
 "linux-x64".to_string()
 }
 })
}

#[allow(dead_code)]
