//! Positioned reads that report short files as `Error::Truncated`

use std::io::{self, Read, Seek, SeekFrom};

use crate::error::{Error, Result};

/// Fill `buf` from `offset`, turning an early EOF into `Error::Truncated`.
pub(crate) fn read_at<R: Read + Seek>(reader: &mut R, offset: u64, buf: &mut [u8]) -> Result<()> {
    reader.seek(SeekFrom::Start(offset))?;
    match reader.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::Truncated {
            offset,
            wanted: buf.len() as u64,
        }),
        Err(e) => Err(e.into()),
    }
}

/// Read a big-endian `u32` at `offset`.
pub(crate) fn read_u32_at<R: Read + Seek>(reader: &mut R, offset: u64) -> Result<u32> {
    let mut buf = [0u8; 4];
    read_at(reader, offset, &mut buf)?;
    Ok(u32::from_be_bytes(buf))
}
