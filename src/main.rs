use std::process::ExitCode;

use lox_treewalk::{run_file, run_prompt, InterpretResult, Options};

const USAGE: &str = "Usage: lox [--print-ast] [script]";

/// Splits the command line into options and script paths. `None` means an
/// unknown flag.
fn parse_args(args: impl IntoIterator<Item = String>) -> Option<(Options, Vec<String>)> {
    let mut options = Options::default();
    let mut paths = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--print-ast" => options.print_ast = true,
            flag if flag.starts_with("--") => return None,
            _ => paths.push(arg),
        }
    }

    Some((options, paths))
}

fn main() -> ExitCode {
    let Some((options, paths)) = parse_args(std::env::args().skip(1)) else {
        println!("{USAGE}");
        return ExitCode::from(64);
    };

    match paths.as_slice() {
        [] => {
            if let Err(error) = run_prompt(options) {
                eprintln!("{error:#}");
                return ExitCode::from(74);
            }
        }
        [path] => match run_file(path, options) {
            Ok(InterpretResult::Ok) => (),
            Ok(InterpretResult::CompileError) => return ExitCode::from(65),
            Ok(InterpretResult::RuntimeError) => return ExitCode::from(70),
            Err(error) => {
                eprintln!("Could not run \"{}\": {error:#}", path);
                return ExitCode::from(74);
            }
        },
        _ => {
            println!("{USAGE}");
            return ExitCode::from(64);
        }
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn flag_and_script_in_any_order() {
        for list in [["--print-ast", "a.lox"], ["a.lox", "--print-ast"]] {
            let (options, paths) = parse_args(args(&list)).unwrap();
            assert!(options.print_ast);
            assert_eq!(paths, vec!["a.lox"]);
        }
    }

    #[test]
    fn no_arguments_means_the_prompt() {
        let (options, paths) = parse_args(Vec::new()).unwrap();
        assert!(!options.print_ast);
        assert!(paths.is_empty());
    }

    #[test]
    fn unknown_flags_are_rejected() {
        assert!(parse_args(args(&["--print-tokens", "a.lox"])).is_none());
        assert!(parse_args(args(&["--"])).is_none());
    }
}
