use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    #[error("Byte {value:#04x} at offset {offset} is outside the 7-bit data range")]
    ReservedByte { offset: usize, value: u8 },

    /// The write cursor would pass source bytes that have not been staged yet.
    /// The buffer is only trustworthy up to the last successful flush.
    #[error("Staging window overflow: write would end at {write_end}, read mark is {read_end}")]
    StagingOverflow { write_end: usize, read_end: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecompressionError {
    #[error("Output buffer of {capacity} bytes is too small")]
    OutputTooSmall { capacity: usize },

    #[error("Unexpected end of stream")]
    UnexpectedEof,

    #[error("Literal run does not match the token at offset {offset}")]
    LiteralMismatch { offset: usize },
}
