//! # Reading problems
//!
//! Problems are read from small text files, one format per kind of problem, or from expressions
//! given directly as text.
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::data::linear_program::general_form::LinearProgram;
use crate::data::matrix_game::PayoffMatrix;
use crate::data::transportation::TransportationProblem;
use crate::io::error::Import;

pub mod error;
pub mod expression;
pub mod number;
pub mod problem;

/// A problem read from a file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Problem {
    /// From a `.game` file.
    Game(PayoffMatrix),
    /// From a `.transport` file.
    Transportation(TransportationProblem),
    /// From a `.lp` file.
    LinearProgram(LinearProgram),
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Problem::Game(matrix) => write!(f, "{}", matrix),
            Problem::Transportation(problem) => write!(f, "{}", problem),
            Problem::LinearProgram(program) => write!(f, "{}", program),
        }
    }
}

/// Import a problem from a file.
///
/// The kind of problem is determined by the file extension: `game`, `transport` or `lp`.
///
/// # Errors
///
/// When a file extension is unknown, a file cannot be found or read, there is an inconsistency in
/// the problem file, etc. an error type is returned.
pub fn import(file_path: &Path) -> Result<Problem, Import> {
    // Open and read the file
    let mut text = String::new();
    File::open(file_path)
        .map_err(Import::IO)?
        .read_to_string(&mut text)
        .map_err(Import::IO)?;

    // Choose the right parser
    match file_path.extension() {
        Some(extension) => match extension.to_str() {
            Some("game") => problem::parse_game(&text).map(Problem::Game),
            Some("transport") => problem::parse_transportation(&text).map(Problem::Transportation),
            Some("lp") => problem::parse_linear_program(&text).map(Problem::LinearProgram),
            Some(extension_string) => Err(Import::FileExtension(format!(
                "Could not recognise file extension \"{}\" of file: {:?}",
                extension_string, file_path
            ))),
            None => Err(Import::FileExtension(format!(
                "Could not convert OsStr to &str, probably invalid unicode: {:?}",
                extension
            ))),
        },
        None => Err(Import::FileExtension(format!(
            "Could not read extension from file path: {:?}",
            file_path
        ))),
    }
}

#[cfg(test)]
mod test {
    use std::path::Path;

    use crate::io::error::Import;
    use crate::io::import;

    #[test]
    fn unknown_extension() {
        assert!(matches!(import(Path::new("problem.mps")), Err(Import::IO(_))));
        assert!(matches!(import(Path::new(file!())), Err(Import::FileExtension(_))));
    }
}
