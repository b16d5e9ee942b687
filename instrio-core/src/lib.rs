pub mod arch;
pub mod block;
pub mod config;
pub mod error;
pub mod header;
pub mod library;

pub use arch::*;
pub use block::{
    block_header, from_ieee_block, parse_ascii, parse_binary, to_ieee_block, ElementFormat,
    Endianness,
};
pub use error::{Error, Result};
pub use header::MachineType;
pub use library::*;
