use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("could not parse entire formula, leftover input: '{1}' (parsed '{0}')")]
    Leftover(String, String),
    #[error("error while parsing formula '{0}'")]
    Parsing(String),
    #[error("unexpected end of input while parsing formula")]
    Incomplete,
}
