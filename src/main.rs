use std::{
    fs::File,
    io::{self, stdin, BufRead, BufReader, IsTerminal},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser as _;
use rechenbuch::interpreter::{InterpretErr, Interpreter};
use rechenbuch::parser::parse;
use rechenbuch::scanner::scan;
use rustyline::error::ReadlineError;
use rustyline::validate::MatchingBracketValidator;
use rustyline::Editor;
use rustyline::{Completer, Helper, Highlighter, Hinter, Validator};
use std::error::Error;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Evaluates integer arithmetic: + - * / and parentheses.
#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Evaluate each non-empty line of this file
    file: Option<PathBuf>,

    /// Evaluate a single expression and exit
    #[arg(short, long, conflicts_with = "file")]
    expr: Option<String>,

    /// Do not print the evaluation trace
    #[arg(short, long)]
    quiet: bool,

    /// Print the parsed tree before evaluating
    #[arg(long)]
    ast: bool,
}

#[derive(Helper, Completer, Hinter, Highlighter, Validator)]
struct BracketHelper {
    #[rustyline(Validator)]
    validator: MatchingBracketValidator,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let mut interpreter = Interpreter::new();

    let ok = if let Some(expr) = &cli.expr {
        run(expr, &mut interpreter, &cli)
    } else if let Some(path) = &cli.file {
        match File::open(path) {
            Ok(file) => run_lines(BufReader::new(file), &mut interpreter, &cli),
            Err(err) => {
                eprintln!("error: {}: {}", path.display(), err);
                false
            }
        }
    } else if !stdin().is_terminal() {
        run_lines(stdin().lock(), &mut interpreter, &cli)
    } else {
        match run_prompt(&mut interpreter, &cli) {
            Ok(()) => true,
            Err(err) => {
                eprintln!("error: {}", err);
                false
            }
        }
    };

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

// A read error (e.g. a line that is not UTF-8) ends the input and fails the run.
fn run_lines(reader: impl BufRead, interpreter: &mut Interpreter, cli: &Cli) -> bool {
    let mut ok = true;
    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("error: {}", err);
                return false;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        ok &= run(&line, interpreter, cli);
    }
    ok
}

fn run_prompt(interpreter: &mut Interpreter, cli: &Cli) -> Result<(), Box<dyn Error>> {
    let h = BracketHelper {
        validator: MatchingBracketValidator::new(),
    };
    let mut rl = Editor::new()?;
    rl.set_helper(Some(h));
    info!("interactive session started");

    loop {
        match rl.readline("calc> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());
                run(&line, interpreter, cli);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(err) => break Err(Box::new(err)),
        }
    }
}

fn run(line: &str, interpreter: &mut Interpreter, cli: &Cli) -> bool {
    match eval_line(line, interpreter, cli) {
        Ok(()) => true,
        Err(err) => {
            warn!(line, %err, "evaluation failed");
            println!("error: {}", err);
            false
        }
    }
}

fn eval_line(line: &str, interpreter: &mut Interpreter, cli: &Cli) -> Result<(), InterpretErr> {
    let expr = parse(scan(line))?;
    if cli.ast {
        println!("{}", expr);
    }
    let res = interpreter.run_expr(&expr)?;
    if !cli.quiet {
        println!("{}", res.trace);
    }
    println!("{}", res.value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser as _;
    use std::io::Cursor;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("rechenbuch").chain(args.iter().copied()))
    }

    #[test]
    fn lines_all_succeed() {
        let input = Cursor::new("1+2\n\n  \n(3*4)\n");
        assert!(run_lines(input, &mut Interpreter::new(), &cli(&["-q"])));
    }

    #[test]
    fn bad_line_fails_run_but_continues() {
        let input = Cursor::new("1/0\n2+2\n");
        assert!(!run_lines(input, &mut Interpreter::new(), &cli(&["--ast"])));
    }

    #[test]
    fn invalid_utf8_fails_run() {
        let input = Cursor::new(b"1+1\n\xff\xfe\n2+2\n".to_vec());
        assert!(!run_lines(input, &mut Interpreter::new(), &cli(&[])));
    }

    #[test]
    fn ast_flag_prints_and_evaluates() {
        let mut interpreter = Interpreter::new();
        assert!(eval_line("2*(3+4)", &mut interpreter, &cli(&["--ast"])).is_ok());
        assert!(matches!(
            eval_line("2*(3+4", &mut interpreter, &cli(&["--ast"])),
            Err(InterpretErr::Parse(_))
        ));
        assert_eq!(interpreter.trace(), "");
    }
}
