use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("expected a header line 'N M', found '{0}'")]
    MalformedHeader(String),
    #[error("expected an integer, found '{0}'")]
    ExpectedInteger(String),
    #[error("AP index {0} is out of range for the declared alphabet of size {1}")]
    ApIndexOutOfRange(i64, usize),
    #[error("transition or initial-state list references unknown node id {0}")]
    UnknownNode(usize),
    #[error("input ended before all {0} declared nodes/transitions were read")]
    Truncated(usize),
}
