use std::fmt;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

use tracing::{debug, trace};

use crate::crc::Crc16;

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Larger requested chunk sizes are clamped to this many bytes.
pub const MAX_CHUNK_SIZE: usize = 1 << 20;

/// Checksum of a whole source plus the number of bytes it held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub crc: u16,
    pub len: u64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}", self.crc)
    }
}

/// Read `reader` to EOF in chunks of at most `chunk_size` bytes and checksum it.
///
/// The read buffer never exceeds [`MAX_CHUNK_SIZE`].
pub fn checksum_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<Summary> {
    if chunk_size == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Chunk size must be greater than zero",
        ));
    }

    let mut digest = Crc16::new();
    let mut buf = vec![0u8; chunk_size.min(MAX_CHUNK_SIZE)];
    let mut len: u64 = 0;
    let mut chunks: u64 = 0;

    loop {
        let read_bytes = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        digest.update(&buf[..read_bytes]);
        len += read_bytes as u64;
        chunks += 1;
        trace!(chunk = chunks, bytes = read_bytes, register = digest.register(), "folded chunk");
    }

    let summary = Summary {
        crc: digest.finalize(),
        len,
    };
    debug!(bytes = len, chunks, crc = %summary, "checksum complete");
    Ok(summary)
}

pub fn checksum_file(path: &Path, chunk_size: usize) -> io::Result<Summary> {
    let file = File::open(path)?;
    debug!(path = %path.display(), "checksumming file");
    checksum_reader(file, chunk_size)
}

/// Lets a digest sit at the end of `io::copy` or any other writer pipeline.
impl io::Write for Crc16 {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
