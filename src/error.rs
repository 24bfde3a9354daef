use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("value {value} does not fit into {kind}<{width}>")]
    OutOfRange {
        kind: &'static str,
        value: i128,
        width: usize,
    },
    #[error("{0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
