use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("OnlineStdDev has been finalized; can't {op}() a value")]
    Finalized { op: &'static str },

    #[error("OnlineStdDev has no data; can't remove() old value")]
    Empty,

    #[error("OnlineStdDev is full; can't insert() new value")]
    Full,

    #[error("histogram can't hold value {0}")]
    TooLarge(u64),

    #[error("histogram count overflows at value {0}")]
    CountOverflow(u64),

    #[error("Invalid histogram table: {0}")]
    InvalidHistogram(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StatsError>;
