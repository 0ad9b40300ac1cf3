//! # Error reporting for reading problems
//!
//! A collection of enums and structures describing any problems encountered during reading and
//! parsing of problem text, be it a file or a single expression typed by a user.
use std::error::Error;
use std::fmt;
use std::io;

/// An `Import` error is created when an error was encountered during IO or parsing.
///
/// It is the highest error in the io error hierarchy.
#[derive(Debug)]
pub enum Import {
    /// The file extension of the provided file path is not known or supported.
    ///
    /// The contained `String` is a message for the end user.
    FileExtension(String),
    /// The file to read isn't found, or the reading of file couldn't start or was interrupted.
    IO(io::Error),
    /// Contents of the file could not be parsed into a problem.
    ///
    /// # Note
    ///
    /// If the problem is inconsistent, that will not be represented with this error. This variant
    /// should only be created for syntactically incorrect input.
    Parse(Parse),
    /// There is a logical inconsistency in the problem described by the input.
    ///
    /// For example, a cost matrix might have a different number of rows than there are sources.
    Inconsistency(Inconsistency),
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Import::FileExtension(message) => message.fmt(f),
            Import::IO(error) => error.fmt(f),
            Import::Parse(error) => error.fmt(f),
            Import::Inconsistency(error) => error.fmt(f),
        }
    }
}

impl Error for Import {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Import::FileExtension(_) => None,
            Import::IO(error) => Some(error),
            Import::Parse(error) => Some(error),
            Import::Inconsistency(error) => Some(error),
        }
    }
}

impl From<Parse> for Import {
    fn from(error: Parse) -> Self {
        Import::Parse(error)
    }
}

impl From<Inconsistency> for Import {
    fn from(error: Inconsistency) -> Self {
        Import::Inconsistency(error)
    }
}

/// A `Parse` error represents all errors encountered during parsing.
///
/// It may recursively hold more `Parse` errors to provide more detail. At the end of this chain,
/// there may be a location containing the byte offset and the text at which the error was caused.
#[derive(Debug)]
pub struct Parse {
    description: String,
    source: Option<Source>,
}

/// Describes the cause of a `Parse` error.
#[derive(Debug)]
enum Source {
    /// Byte offset and the text that was being parsed.
    Position(usize, String),
    /// Another `Parse` error.
    Nested(Box<Parse>),
    /// An error from outside this module, like a failed integer conversion.
    Other(Box<dyn Error + Send + Sync>),
}

/// Shorthand for results of parsing.
pub type ParseResult<T> = Result<T, Parse>;

impl Parse {
    /// Create a new `Parse` error with only a description.
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into(), source: None }
    }

    /// Create a new `Parse` error that points at a location in the parsed text.
    ///
    /// # Arguments
    ///
    /// * `description`: What's wrong at the moment of creation.
    /// * `position`: Byte offset into `text`.
    /// * `text`: The complete text that was being parsed.
    pub fn with_position(description: impl Into<String>, position: usize, text: &str) -> Self {
        Self {
            description: description.into(),
            source: Some(Source::Position(position, text.to_string())),
        }
    }

    /// Wrap a new `Parse` error around an existing one.
    pub fn wrap(description: impl Into<String>, error: Parse) -> Self {
        Self {
            description: description.into(),
            source: Some(Source::Nested(Box::new(error))),
        }
    }

    /// Wrap a `Parse` error around an error from another library.
    pub fn wrap_other(error: impl Error + Send + Sync + 'static, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            source: Some(Source::Other(Box::new(error))),
        }
    }

    /// Descriptions of all errors in the chain, leading up to this one.
    fn chain_description(&self) -> Vec<String> {
        let mut descriptions = vec![self.description.clone()];

        match &self.source {
            Some(Source::Position(position, text)) => {
                descriptions.push(format!("\tat position {} in \"{}\"", position, text));
            },
            Some(Source::Nested(error)) => descriptions.extend(error.chain_description()),
            Some(Source::Other(error)) => descriptions.push(format!("\tcaused by: {}", error)),
            None => {},
        }

        descriptions
    }
}

impl fmt::Display for Parse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ParseError: {}", self.chain_description().join("\n"))
    }
}

impl Error for Parse {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.source {
            Some(Source::Nested(error)) => Some(error.as_ref()),
            Some(Source::Other(error)) => Some(error.as_ref()),
            _ => None,
        }
    }
}

/// An `Inconsistency` is returned when the problem is inconsistently represented.
///
/// This error is not returned when a problem is infeasible or unbounded. It is meant only for
/// descriptions of problems, and should not be used after a problem was constructed.
#[derive(Debug, Eq, PartialEq)]
pub struct Inconsistency {
    description: String,
}

impl Inconsistency {
    /// Wrap a text in an `Inconsistency`.
    ///
    /// # Arguments
    ///
    /// * `description`: A human-readable text meant for the end user.
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into() }
    }
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ProblemError: {}", self.description)
    }
}

impl Error for Inconsistency {
}
