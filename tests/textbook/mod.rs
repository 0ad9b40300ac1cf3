//! # Textbook problems
//!
//! Small problems with known answers, stored in the file formats read by `pivotal::io::import`.
use std::path::{Path, PathBuf};

use pivotal::io::{import, Problem};

/// # Generation and execution
#[allow(missing_docs)]
mod test;

/// Relative path of the folder where the problem files are stored.
///
/// The path is relative to the project root folder.
fn problem_file_directory() -> PathBuf {
    Path::new(file!()).parent().unwrap().to_path_buf()
}

/// Read a problem file, based on the file name.
///
/// # Arguments
///
/// * `name`: File name, including extension.
fn read(name: &str) -> Problem {
    import(&problem_file_directory().join(name)).unwrap()
}
