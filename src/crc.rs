//! CRC-16/CCITT (poly 0x1021, init 0x1D0F, no reflection, no final XOR),
//! table-driven one nibble at a time.
//!
//! The same parameter set is published as CRC-16/SPI-FUJITSU (alias
//! CRC-16/AUG-CCITT).

/// Generator polynomial, normal (MSB-first) form.
pub const POLYNOMIAL: u16 = 0x1021;

/// Register seed for a fresh checksum.
pub const INIT: u16 = 0x1D0F;

/// Checksum of the ASCII string `"123456789"`.
pub const CHECK: u16 = 0xE5CC;

/// 16-entry lookup table, one entry per 4-bit index.
pub static TABLE: [u16; 16] = generate_table(POLYNOMIAL);

const fn generate_table(poly: u16) -> [u16; 16] {
    let mut table = [0u16; 16];
    let mut i = 0usize;

    while i < 16 {
        // Align the nibble into the top 4 bits of the register.
        let mut crc = (i as u16) << 12;
        let mut bit = 0;
        while bit < 4 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ poly;
            } else {
                crc <<= 1;
            }
            bit += 1;
        }
        table[i] = crc;
        i += 1;
    }

    table
}

#[inline(always)]
fn step(crc: u16, nibble: u8) -> u16 {
    let index = ((crc >> 12) as u8 ^ nibble) & 0x0F;
    TABLE[index as usize] ^ (crc << 4)
}

/// Fold `data` into the running register `crc` and return the new register.
///
/// Each byte is processed high nibble first, then low nibble. Start a fresh
/// checksum from [`INIT`]; the returned register is the final checksum once
/// all input has been fed.
pub fn crc_update(crc: u16, data: &[u8]) -> u16 {
    let mut crc = crc;

    for &byte in data {
        crc = step(crc, byte >> 4);
        crc = step(crc, byte & 0x0F);
    }

    crc
}

/// Checksum of `data` starting from [`INIT`].
pub fn crc16_ccitt(data: &[u8]) -> u16 {
    crc_update(INIT, data)
}

/// Checksum of `data` in the byte order it is appended to a frame (MSB first).
pub fn checksum_bytes(data: &[u8]) -> [u8; 2] {
    crc16_ccitt(data).to_be_bytes()
}

/// Running checksum for input that arrives in pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Crc16 {
    register: u16,
}

impl Crc16 {
    /// Fresh checksum seeded with [`INIT`].
    pub const fn new() -> Self {
        Self { register: INIT }
    }

    /// Resume from a register saved with [`Crc16::register`].
    pub const fn with_register(register: u16) -> Self {
        Self { register }
    }

    /// Fold the next piece of input into the register.
    pub fn update(&mut self, data: &[u8]) {
        self.register = crc_update(self.register, data);
    }

    /// Checksum of everything fed so far. Further updates may follow.
    pub const fn finalize(&self) -> u16 {
        self.register
    }

    /// Start over from [`INIT`].
    pub fn reset(&mut self) {
        self.register = INIT;
    }

    /// Raw register, for saving a partial computation.
    pub const fn register(&self) -> u16 {
        self.register
    }
}

impl Default for Crc16 {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const REFERENCE: ::crc::Crc<u16> = ::crc::Crc::<u16>::new(&::crc::CRC_16_SPI_FUJITSU);

    #[test]
    fn table_matches_published_constants() {
        let expected: [u16; 16] = [
            0x0000, 0x1021, 0x2042, 0x3063, 0x4084, 0x50a5, 0x60c6, 0x70e7, 0x8108, 0x9129,
            0xa14a, 0xb16b, 0xc18c, 0xd1ad, 0xe1ce, 0xf1ef,
        ];
        assert_eq!(TABLE, expected);
    }

    #[test]
    fn known_answers() {
        assert_eq!(crc_update(INIT, b""), 0x1D0F);
        assert_eq!(crc_update(INIT, b"1"), 0xEAEE);
        assert_eq!(crc_update(INIT, b"123456789"), CHECK);
        assert_eq!(crc16_ccitt(b"123456789"), 0xE5CC);
        assert_eq!(checksum_bytes(b"123456789"), [0xE5, 0xCC]);
    }

    #[test]
    fn reference_crate_agrees_on_check_string() {
        assert_eq!(REFERENCE.checksum(b"123456789"), CHECK);
        assert_eq!(REFERENCE.checksum(b"1"), crc16_ccitt(b"1"));
    }

    #[test]
    fn single_byte_is_two_steps() {
        let byte = 0x31u8;
        let high = TABLE[(((INIT >> 12) as u8 ^ (byte >> 4)) & 0x0F) as usize] ^ (INIT << 4);
        let low = TABLE[(((high >> 12) as u8 ^ (byte & 0x0F)) & 0x0F) as usize] ^ (high << 4);
        assert_eq!(crc_update(INIT, &[byte]), low);
    }

    #[test]
    fn nibble_order_matters() {
        let swapped = b"123456789".iter().fold(INIT, |crc, &b| {
            let crc = step(crc, b & 0x0F);
            step(crc, b >> 4)
        });
        assert_ne!(swapped, CHECK);
    }

    #[test]
    fn high_bits_do_not_leak() {
        // 0xF000 << 4 would be 0xF0000 without truncation.
        assert_eq!(crc_update(0xF000, &[0x00]), 0xEF1F);
        assert_eq!(crc_update(0xFFFF, b"123456789"), 0x29B1);
        assert_eq!(crc_update(0x0000, b"123456789"), 0x31C3);
    }

    #[test]
    fn digest_resets_and_resumes() {
        let mut digest = Crc16::default();
        digest.update(b"1234");
        let saved = digest.register();

        let mut resumed = Crc16::with_register(saved);
        resumed.update(b"56789");
        assert_eq!(resumed.finalize(), CHECK);

        digest.reset();
        assert_eq!(digest.finalize(), INIT);
    }

    proptest! {
        #[test]
        fn empty_input_is_identity(crc in any::<u16>()) {
            prop_assert_eq!(crc_update(crc, &[]), crc);
        }

        #[test]
        fn split_input_matches_whole(
            crc in any::<u16>(),
            a in proptest::collection::vec(any::<u8>(), 0..64),
            b in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let whole: Vec<u8> = a.iter().chain(b.iter()).copied().collect();
            prop_assert_eq!(crc_update(crc_update(crc, &a), &b), crc_update(crc, &whole));
        }

        #[test]
        fn deterministic(
            crc in any::<u16>(),
            data in proptest::collection::vec(any::<u8>(), 0..128),
        ) {
            prop_assert_eq!(crc_update(crc, &data), crc_update(crc, &data));
        }

        #[test]
        fn matches_reference_crate(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(crc16_ccitt(&data), REFERENCE.checksum(&data));
        }

        #[test]
        fn appended_checksum_leaves_zero_residue(
            data in proptest::collection::vec(any::<u8>(), 0..128),
        ) {
            let crc = crc16_ccitt(&data);
            prop_assert_eq!(crc_update(crc, &checksum_bytes(&data)), 0);
        }
    }
}
