use std::{path::PathBuf, process::ExitCode};

use log::info;

mod analyser;
mod codegen;
mod common;
mod driver;
mod fileio;
mod lexer;
mod parser;
mod registry;

fn main() -> ExitCode {
    simple_logger::SimpleLogger::new().env().init().unwrap();

    let arguments: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_arguments(&arguments) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    // launching the visualization dashboard is an external tool's job;
    // the compiler only materializes the registry dump it reads
    let registry_dump = invocation
        .dump_registry
        .then(|| std::env::temp_dir().join("jack_registry.json"));
    let files = invocation.files;

    match driver::compile(&files, registry_dump.as_deref()) {
        Ok(()) => {
            info!("compiled {} file(s)", files.len());
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug)]
struct Invocation {
    files: Vec<PathBuf>,
    dump_registry: bool,
}

/// Validate the command line into the list of source files plus the
/// visualization flags. `--viz-ast` is accepted but inert; the AST
/// viewer is an external tool.
fn parse_arguments(arguments: &[String]) -> Result<Invocation, String> {
    if arguments.is_empty() {
        return Err("Usage: jackc <file.jack>...".to_string());
    }

    let mut files = Vec::new();
    let mut dump_registry = false;
    for argument in arguments {
        if argument == "--viz-checker" {
            dump_registry = true;
            continue;
        }
        if argument == "--viz-ast" {
            continue;
        }

        let path = PathBuf::from(argument);
        if !path.exists() {
            return Err(format!("Error: Path does not exist: {}", path.display()));
        }
        if path.extension().and_then(|extension| extension.to_str()) != Some("jack") {
            return Err(format!(
                "Error: Invalid file type. Only .jack files are allowed.\nOffending file: {}",
                path.display()
            ));
        }
        files.push(path);
    }

    if files.is_empty() {
        return Err("No files provided.".to_string());
    }

    let has_main = files
        .iter()
        .any(|path| path.file_name().and_then(|name| name.to_str()) == Some("Main.jack"));
    if !has_main {
        return Err(
            "Error: Compilation Failed.\nReason: Missing 'Main.jack'\nThe list of files to compile must include the Main class."
                .to_string(),
        );
    }

    Ok(Invocation {
        files,
        dump_registry,
    })
}

#[cfg(test)]
mod tests {
    use super::parse_arguments;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_no_arguments_prints_usage() {
        let message = parse_arguments(&[]).expect_err("empty invocation should fail");
        assert!(message.starts_with("Usage:"));
    }

    #[test]
    fn test_flags_alone_are_not_files() {
        let message =
            parse_arguments(&args(&["--viz-ast"])).expect_err("flag-only invocation should fail");
        assert_eq!(message, "No files provided.");
    }

    #[test]
    fn test_missing_path_is_fatal() {
        let message = parse_arguments(&args(&["DoesNotExist.jack"]))
            .expect_err("missing path should fail");
        assert!(message.starts_with("Error: Path does not exist:"));
    }

    #[test]
    fn test_main_source_must_be_present() {
        let workspace = std::env::temp_dir().join(format!("jackc_args_{}", std::process::id()));
        std::fs::create_dir_all(&workspace).expect("workspace should create");
        let other = workspace.join("Other.jack");
        std::fs::write(&other, "class Other { }").expect("file should write");

        let message = parse_arguments(&args(&[other.to_str().expect("utf-8 path")]))
            .expect_err("a file set without Main.jack should fail");
        assert!(message.contains("Missing 'Main.jack'"));

        std::fs::remove_dir_all(&workspace).ok();
    }

    #[test]
    fn test_viz_checker_flag_requests_registry_dump() {
        let workspace = std::env::temp_dir().join(format!("jackc_viz_{}", std::process::id()));
        std::fs::create_dir_all(&workspace).expect("workspace should create");
        let main = workspace.join("Main.jack");
        std::fs::write(&main, "class Main { function void main() { return; } }")
            .expect("file should write");

        let invocation =
            parse_arguments(&args(&["--viz-checker", main.to_str().expect("utf-8 path")]))
                .expect("invocation should be accepted");
        assert!(invocation.dump_registry);
        assert_eq!(invocation.files, vec![main.clone()]);

        std::fs::remove_dir_all(&workspace).ok();
    }

    #[test]
    fn test_wrong_extension_is_fatal() {
        let workspace = std::env::temp_dir().join(format!("jackc_ext_{}", std::process::id()));
        std::fs::create_dir_all(&workspace).expect("workspace should create");
        let stray = workspace.join("Main.vm");
        std::fs::write(&stray, "push constant 0").expect("file should write");

        let message = parse_arguments(&args(&[stray.to_str().expect("utf-8 path")]))
            .expect_err("wrong extension should fail");
        assert!(message.starts_with("Error: Invalid file type."));

        std::fs::remove_dir_all(&workspace).ok();
    }
}
