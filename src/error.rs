use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum NNError {
    // Numeric core errors
    DimensionMismatch(String),
    PreconditionViolation(String),

    // Persistence errors
    CorruptModelData(String),
    IoError(std::io::Error),

    // Dataset errors
    CsvError(csv::Error),
}

impl fmt::Display for NNError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NNError::DimensionMismatch(msg) => write!(f, "Dimension mismatch: {}", msg),
            NNError::PreconditionViolation(msg) => write!(f, "Precondition violation: {}", msg),
            NNError::CorruptModelData(msg) => write!(f, "Corrupt model data: {}", msg),
            NNError::IoError(err) => write!(f, "I/O error: {}", err),
            NNError::CsvError(err) => write!(f, "CSV error: {}", err),
        }
    }
}

impl From<std::io::Error> for NNError {
    fn from(err: std::io::Error) -> NNError {
        NNError::IoError(err)
    }
}

impl From<csv::Error> for NNError {
    fn from(err: csv::Error) -> NNError {
        NNError::CsvError(err)
    }
}

impl Error for NNError {}

pub type Result<T> = std::result::Result<T, NNError>;
