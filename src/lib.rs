//! Nibble-wise, table-driven CRC-16/CCITT (poly 0x1021, init 0x1D0F).
//! Provides the checksum engine with its 16-entry table, plus adapters
//! for checksumming readers and files.

pub mod crc;
pub mod stream;

pub use self::crc::{CHECK, Crc16, INIT, POLYNOMIAL, TABLE, checksum_bytes, crc_update, crc16_ccitt};
