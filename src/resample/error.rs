use crate::prelude::*;

#[derive(Debug, thiserror::Error, From)]
pub enum ResampleError {
    #[error("{0}")]
    InvalidDimensions(InvalidDimensions),
    #[error("{0}")]
    EmptyInput(EmptyInput),
    #[error("{0}")]
    InvalidBounds(InvalidBounds),
}

#[derive(Display, Debug, Constructor)]
#[display(fmt = "sampling dimensions must all be at least 1, got {:?}", dimensions)]
pub struct InvalidDimensions {
    dimensions: [usize; 3],
}

#[derive(Display, Debug)]
#[display(fmt = "the input mesh has no points to resample")]
pub struct EmptyInput;

#[derive(Display, Debug, Constructor)]
#[display(fmt = "invalid sampling bounds {:?}", bounds)]
pub struct InvalidBounds {
    bounds: [f64; 6],
}
