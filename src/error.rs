use std::io;
use std::result;
use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not open '{0}'")]
    Io(String, #[source] io::Error),
    #[error(transparent)]
    Ts(#[from] ts::Error),
    #[error(transparent)]
    Ltl(#[from] ltl::error::Error),
    #[error("query batch header malformed, expected 'N M', found '{0}'")]
    MalformedQueryHeader(String),
    #[error("query batch header declares more query lines than the input contains")]
    TruncatedQueries,
    #[error("per-start-state query line malformed, expected 'id formula', found '{0}'")]
    MalformedStartQuery(String),
    #[error("start state id {0} is not a node of the transition system")]
    UnknownStartState(usize),
}
