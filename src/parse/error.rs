use crate::prelude::*;

/// everything that can go wrong while reading a legacy vtk file
#[derive(Debug, thiserror::Error, From)]
pub enum ParseError {
    #[error("{0}")]
    MissingHeader(MissingHeader),
    #[error("{0}")]
    UnexpectedEof(UnexpectedEof),
    #[error("{0}")]
    UnexpectedKeyword(UnexpectedKeyword),
    #[error("{0}")]
    InvalidNumber(InvalidNumber),
    #[error("{0}")]
    UnsupportedDataType(UnsupportedDataType),
    #[error("{0}")]
    UnsupportedDataset(UnsupportedDataset),
    #[error("{0}")]
    WrongDataset(WrongDataset),
    #[error("{0}")]
    LengthMismatch(LengthMismatch),
    #[error("{0}")]
    InvalidConnectivity(InvalidConnectivity),
    #[error("{0}")]
    NotUtf8(NotUtf8),
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "file does not start with `# vtk DataFile Version`, found `{first_line}`")]
pub struct MissingHeader {
    first_line: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "file ended while reading {expected}")]
pub struct UnexpectedEof {
    expected: String,
}

#[derive(Display, Debug)]
#[display(fmt = "line {line}: expected {expected}, found `{actual}`")]
pub struct UnexpectedKeyword {
    line: usize,
    expected: String,
    actual: String,
}

impl UnexpectedKeyword {
    pub(crate) fn new<T: Into<String>, V: Into<String>>(line: usize, expected: T, actual: V) -> Self {
        Self {
            line,
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[derive(Display, Debug)]
#[display(fmt = "line {line}: could not parse `{token}` as a number in the {section} section")]
pub struct InvalidNumber {
    line: usize,
    section: String,
    token: String,
}

impl InvalidNumber {
    pub(crate) fn new<T: Into<String>, V: Into<String>>(line: usize, section: T, token: V) -> Self {
        Self {
            line,
            section: section.into(),
            token: token.into(),
        }
    }
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "line {line}: unsupported data type `{name}`")]
pub struct UnsupportedDataType {
    line: usize,
    name: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "unsupported dataset type `{name}`")]
pub struct UnsupportedDataset {
    name: String,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "expected a {expected} dataset, the file contains {actual}")]
pub struct WrongDataset {
    expected: &'static str,
    actual: &'static str,
}

#[derive(Display, Debug)]
#[display(fmt = "{section} section holds {actual} entries, expected {expected}")]
pub struct LengthMismatch {
    section: String,
    expected: usize,
    actual: usize,
}

impl LengthMismatch {
    pub(crate) fn new<T: Into<String>>(section: T, expected: usize, actual: usize) -> Self {
        Self {
            section: section.into(),
            expected,
            actual,
        }
    }
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "cell {cell} references point {point} but the grid only has {num_points} points")]
pub struct InvalidConnectivity {
    cell: usize,
    point: usize,
    num_points: usize,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "line {line} is not valid utf8")]
pub struct NotUtf8 {
    line: usize,
}
