use std::io::{self, BufRead, Write};
use std::num::ParseIntError;
use std::process::ExitCode;

use log::debug;
use thiserror::Error;

use pqr_tree::{PQRTree, ReductionError};

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read input: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: {source}")]
    Parse { line: usize, source: ParseIntError },
    #[error("line {line}: expected the number of elements")]
    MissingSize { line: usize },
    #[error("line {line}: {source}")]
    Reduction { line: usize, source: ReductionError<usize> },
}

/// Reads the number of elements, then one constraint per line until a blank line,
/// printing the tree after every step.
fn run(input: impl BufRead, mut output: impl Write) -> Result<(), CliError> {
    let mut lines = input.lines();

    let Some(first) = lines.next() else {
        return Ok(());
    };
    let n = first?
        .split_whitespace()
        .next()
        .ok_or(CliError::MissingSize { line: 1 })?
        .parse::<usize>()
        .map_err(|source| CliError::Parse { line: 1, source })?;

    let mut tree = PQRTree::new(n);
    writeln!(output, "{tree}")?;

    for (i, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            break;
        }
        let number = i + 2;

        let constraint = line
            .split_whitespace()
            .map(str::parse::<usize>)
            .collect::<Result<Vec<usize>, _>>()
            .map_err(|source| CliError::Parse { line: number, source })?;
        debug!("line {number}: constraint of {} elements", constraint.len());

        tree.reduce(&constraint).map_err(|source| CliError::Reduction { line: number, source })?;
        writeln!(output, "{tree}")?;
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run(stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("pqr-reduce: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_str(input: &str) -> Result<String, CliError> {
        let mut output = Vec::new();
        run(input.as_bytes(), &mut output)?;
        Ok(String::from_utf8(output).unwrap())
    }

    #[test]
    fn canonical_session() {
        let output = run_str("6\n0 1 2\n2 3 4\n\n5 4\n").unwrap();
        assert_eq!(output, "(0 1 2 3 4 5)\n(3 4 5 (0 1 2))\n(5 [(3 4) 2 (0 1)])\n");
    }

    #[test]
    fn end_of_input_without_blank_line() {
        assert_eq!(run_str("3\n0 1").unwrap(), "(0 1 2)\n(2 (0 1))\n");
        assert_eq!(run_str("").unwrap(), "");
    }

    #[test]
    fn bad_input() {
        assert!(matches!(run_str("x\n"), Err(CliError::Parse { line: 1, .. })));
        assert!(matches!(run_str("3\n0 y\n"), Err(CliError::Parse { line: 2, .. })));
        assert!(matches!(run_str("3\n0 1\n2 3\n"), Err(CliError::Reduction { line: 3, .. })));
        assert!(matches!(run_str("  \n"), Err(CliError::MissingSize { line: 1 })));
    }
}
