use thiserror::Error;

use crate::Generation;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{generation} record must be box or party length, got {actual} bytes")]
    InvalidLength { generation: Generation, actual: usize },
    #[error("save image needs at least {expected} bytes, got {actual}")]
    SaveLength { expected: usize, actual: usize },
    #[error("{what} index {index} out of range (max {max})")]
    Range {
        what: &'static str,
        index: usize,
        max: usize,
    },
    #[error("section {section} checksum mismatch: computed {computed:#06x}, stored {stored:#06x}")]
    Checksum {
        section: u8,
        computed: u16,
        stored: u16,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn check_range(what: &'static str, index: usize, max: usize) -> Result<()> {
    if index >= max {
        log::debug!("Rejecting {what} index {index}, limit is {max}");
        Err(Error::Range { what, index, max })
    } else {
        Ok(())
    }
}
