use crate::prelude::*;

#[derive(Debug, thiserror::Error, From)]
pub enum CompressError {
    #[error("{0}")]
    EmptyHierarchy(EmptyHierarchy),
    #[error("{0}")]
    ShapeMismatch(ShapeMismatch),
    #[error("{0}")]
    InvalidTolerance(InvalidTolerance),
    #[error("{0}")]
    UnsupportedSmoothness(UnsupportedSmoothness),
    #[error("{0}")]
    Corrupt(Corrupt),
    #[error("could not write the compressed stream: {0}")]
    Io(std::io::Error),
}

#[derive(Display, Debug)]
#[display(fmt = "a mesh hierarchy needs at least one node")]
pub struct EmptyHierarchy;

#[derive(Display, Debug, Constructor)]
#[display(fmt = "the hierarchy has {hierarchy} nodes but the data has {data} values")]
pub struct ShapeMismatch {
    hierarchy: usize,
    data: usize,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "the error tolerance must be finite and positive, got {tolerance}")]
pub struct InvalidTolerance {
    tolerance: f64,
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "smoothness {smoothness} is not supported, use 0 or infinity")]
pub struct UnsupportedSmoothness {
    smoothness: f64,
}

#[derive(Display, Debug)]
#[display(fmt = "compressed buffer is corrupt: {reason}")]
pub struct Corrupt {
    reason: String,
}

impl Corrupt {
    pub(crate) fn new<T: Into<String>>(reason: T) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
