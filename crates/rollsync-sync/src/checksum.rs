//! Weak rolling checksum and strong block digest
//!
//! The weak checksum is an Adler-32 variant over a sliding byte window,
//! recomputable in O(1) as the window shifts by one byte. Weak matches are
//! confirmed with an MD5 digest of the window; the digest is used only to
//! disambiguate weak-checksum collisions and carries no security property.

/// Rolling weak checksum state for one scan window.
///
/// Two accumulators in the Adler style: `a` is the byte sum (seeded to 1),
/// `b` the sum of the running values of `a`, both reduced modulo 65521.
/// The combined sum is `(a + b) << 16`, an implementation-defined matching
/// key rather than the canonical Adler-32 combination. It is never compared
/// against an external standard; generator and scanner only need to agree
/// with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingChecksum {
    a: u32,
    b: u32,
    /// Window length, fixed for the lifetime of one scan
    len: u32,
}

impl RollingChecksum {
    /// Largest prime below 2^16, the Adler modulus
    const MOD: u32 = 65521;

    /// Compute the checksum of an initial window from scratch, O(n)
    pub fn new(window: &[u8]) -> Self {
        let mut a: u32 = 1;
        let mut b: u32 = 0;

        for &byte in window {
            a = (a + u32::from(byte)) % Self::MOD;
            b = (b + a) % Self::MOD;
        }

        Self {
            a,
            b,
            len: window.len() as u32,
        }
    }

    /// Slide the window one byte: drop `outgoing` at the front, append
    /// `incoming` at the back, O(1).
    ///
    /// Uses non-negative modular arithmetic throughout so that the rolled
    /// state is always identical to recomputing from scratch over the new
    /// window.
    #[inline]
    pub fn roll(&mut self, outgoing: u8, incoming: u8) {
        let out = u32::from(outgoing);
        let inc = u32::from(incoming);

        self.a = (self.a + Self::MOD - out + inc) % Self::MOD;
        let weighted = (self.len % Self::MOD) * out % Self::MOD;
        self.b = (self.b + Self::MOD - weighted + self.a) % Self::MOD;
    }

    /// Combined 32-bit matching key for the current window
    pub fn sum(&self) -> u32 {
        (self.a + self.b) << 16
    }
}

/// Reduce a weak sum to the 16-bit bucket key used for table indexing.
///
/// Must be applied identically on the generation and scan side.
pub fn weak16(sum: u32) -> u16 {
    (0xffff & ((sum >> 16) ^ sum.wrapping_mul(1009))) as u16
}

/// Strong content digest of a byte range: 32 lowercase hex characters
pub fn strong_digest(data: &[u8]) -> String {
    format!("{:x}", md5::compute(data))
}
