//! Three-phase pipeline: parse → analyse → generate.
//!
//! Each phase is an embarrassingly parallel map over the compilation
//! units, one worker thread per unit, joined at a barrier. The barrier
//! provides the happens-before edge: every parse-phase registry write is
//! visible to every analyse-phase read, and so on. Results are collected
//! in input order, so the first reported error is deterministic
//! regardless of scheduling.

use std::{
    path::{Path, PathBuf},
    thread,
    time::Instant,
};

use log::info;

use crate::{
    analyser::{symbol_table::SymbolTable, SemanticAnalyser},
    codegen::CodeGenerator,
    common::{
        ast::{Class, ReturnType},
        error::{CompileError, CompileResult, Diagnostic},
        Position,
    },
    fileio::{input::SourceFile, output},
    lexer::Lexer,
    parser::Parser,
    registry::GlobalRegistry,
};

/// Per-file state threaded through the pipeline phases. Owns the source
/// buffer for the whole compilation of that file.
#[derive(Debug)]
struct CompilationUnit {
    source: SourceFile,
    class: Class,
    master_table: SymbolTable,
}

/// Compile every source file, or return the first failure in input order.
/// `registry_dump` optionally writes the completed registry as JSON for
/// external visualization; it does not affect the emitted output.
pub fn compile(paths: &[PathBuf], registry_dump: Option<&Path>) -> CompileResult<()> {
    let registry = GlobalRegistry::new();

    let phase_start = Instant::now();
    let mut units = fan_out(paths, |path| parse_job(path, &registry))?;
    info!("parsing finished in {:.2?}", phase_start.elapsed());

    // the registry is complete and frozen from here on
    validate_entry_point(&registry, paths)?;

    if let Some(dump_path) = registry_dump {
        registry.dump_to_json(dump_path).map_err(|error| CompileError::Io {
            path: dump_path.to_path_buf(),
            error,
        })?;
        info!("registry dumped to {}", dump_path.display());
    }

    let phase_start = Instant::now();
    let master_tables = fan_out(&units, |unit| analyse_job(unit, &registry))?;
    for (unit, master_table) in units.iter_mut().zip(master_tables) {
        unit.master_table = master_table;
    }
    info!("static analysis finished in {:.2?}", phase_start.elapsed());

    let phase_start = Instant::now();
    fan_out(&units, |unit| generate_job(unit, &registry))?;
    info!("code generation finished in {:.2?}", phase_start.elapsed());

    Ok(())
}

/// Run one job per item on its own thread. All results are awaited;
/// they come back in item order and the first failure wins.
fn fan_out<I, T, F>(items: &[I], job: F) -> CompileResult<Vec<T>>
where
    I: Sync,
    T: Send,
    F: Fn(&I) -> CompileResult<T> + Sync,
{
    let job = &job;
    let results: Vec<CompileResult<T>> = thread::scope(|scope| {
        let handles: Vec<_> = items
            .iter()
            .map(|item| scope.spawn(move || job(item)))
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            })
            .collect()
    });

    results.into_iter().collect()
}

fn parse_job(path: &PathBuf, registry: &GlobalRegistry) -> CompileResult<CompilationUnit> {
    let source = SourceFile::load(path)?;
    let lexer = Lexer::new(&source)?;
    let class = Parser::new(lexer, registry).parse()?;
    info!("[Parsed]    {}", source.display_path());

    Ok(CompilationUnit {
        source,
        class,
        master_table: SymbolTable::new(),
    })
}

fn analyse_job(unit: &CompilationUnit, registry: &GlobalRegistry) -> CompileResult<SymbolTable> {
    let master_table =
        SemanticAnalyser::new(registry, unit.source.display_path()).analyse_class(&unit.class)?;
    info!("[Verified]  {}", unit.source.display_path());

    Ok(master_table)
}

fn generate_job(unit: &CompilationUnit, registry: &GlobalRegistry) -> CompileResult<()> {
    let vm_code = CodeGenerator::new(registry, unit.source.display_path())
        .compile_class(&unit.class, &unit.master_table)?;

    output::write_beside(unit.source.path(), &vm_code).map_err(|error| CompileError::Io {
        path: unit.source.path().to_path_buf(),
        error,
    })?;
    info!("[Generated] {}", unit.source.path().with_extension("vm").display());

    Ok(())
}

/// `Main.main` must exist as a static void function before any code
/// generation starts.
fn validate_entry_point(registry: &GlobalRegistry, paths: &[PathBuf]) -> CompileResult<()> {
    let main_file = paths
        .iter()
        .find(|path| path.file_stem().and_then(|stem| stem.to_str()) == Some("Main"))
        .map_or_else(|| "Main.jack".to_string(), |path| path.display().to_string());
    let entry_error = |position: Position, message: String| {
        Err(CompileError::Semantic(Diagnostic::new(
            &main_file, position, message,
        )))
    };

    let Some(signature) = registry.get_signature("Main", "main") else {
        return entry_error(
            Position::new(1, 1),
            "Missing entry point: expected 'function void main()' in class 'Main'".to_string(),
        );
    };
    if !signature.is_static || signature.is_constructor {
        return entry_error(
            signature.position,
            "'Main.main' must be a static function, not a method or constructor.".to_string(),
        );
    }
    if signature.return_type != ReturnType::Void {
        return entry_error(
            signature.position,
            "'Main.main' must have a 'void' return type.".to_string(),
        );
    }
    Ok(())
}
