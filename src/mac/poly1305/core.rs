use zeroize::Zeroize;

/// Mask selecting the low 26 bits of a limb.
const LIMB_MASK: u32 = 0x3ff_ffff;

/// Low-level Poly1305 accumulator (RFC 8439, section 2.5).
///
/// Arithmetic is performed modulo `2^130 - 5` on five 26-bit limbs. The
/// state absorbs blocks of at most 16 bytes; buffering of arbitrary-length
/// input lives in [`super::mac`].
///
/// # Security
///
/// - One instance authenticates exactly one message under one key.
/// - All operations are constant time with respect to secret data.
/// - `r`, `s` and the accumulator are wiped on drop.
pub(crate) struct State {
    /// Clamped `r`, split into five 26-bit limbs.
    r: [u32; 5],

    /// Accumulator `h`, five 26-bit limbs.
    h: [u32; 5],

    /// `s`, the second half of the one-time key, added at finalization.
    s: [u8; 16],
}

impl State {
    /// Creates a state from a 32-byte one-time key.
    ///
    /// - `key[0..16]` → `r` (clamped)
    /// - `key[16..32]` → `s`
    pub(crate) fn new(key: &[u8; 32]) -> Self {
        let word = |i: usize| u32::from_le_bytes([key[i], key[i + 1], key[i + 2], key[i + 3]]);

        let r0 = word(0) & 0x0fff_ffff;
        let r1 = word(4) & 0x0fff_fffc;
        let r2 = word(8) & 0x0fff_fffc;
        let r3 = word(12) & 0x0fff_fffc;

        let r = [
            r0 & LIMB_MASK,
            ((r0 >> 26) | (r1 << 6)) & LIMB_MASK,
            ((r1 >> 20) | (r2 << 12)) & LIMB_MASK,
            ((r2 >> 14) | (r3 << 18)) & LIMB_MASK,
            (r3 >> 8) & LIMB_MASK,
        ];

        let mut s = [0u8; 16];
        s.copy_from_slice(&key[16..32]);

        Self { r, h: [0; 5], s }
    }

    /// Absorbs one block of at most 16 bytes.
    ///
    /// The block is read as a little-endian integer with a `1` bit appended
    /// at position `8 * block.len()`, then
    ///
    /// ```text
    /// h = (h + block) * r mod (2^130 - 5)
    /// ```
    pub(crate) fn absorb(&mut self, block: &[u8]) {
        debug_assert!(block.len() <= 16);

        let mut padded = [0u8; 17];
        padded[..block.len()].copy_from_slice(block);
        padded[block.len()] = 1;

        let t0 = u32::from_le_bytes([padded[0], padded[1], padded[2], padded[3]]);
        let t1 = u32::from_le_bytes([padded[4], padded[5], padded[6], padded[7]]);
        let t2 = u32::from_le_bytes([padded[8], padded[9], padded[10], padded[11]]);
        let t3 = u32::from_le_bytes([padded[12], padded[13], padded[14], padded[15]]);
        let t4 = padded[16] as u32;
        padded.zeroize();

        self.h[0] = self.h[0].wrapping_add(t0 & LIMB_MASK);
        self.h[1] = self.h[1].wrapping_add(((t0 >> 26) | (t1 << 6)) & LIMB_MASK);
        self.h[2] = self.h[2].wrapping_add(((t1 >> 20) | (t2 << 12)) & LIMB_MASK);
        self.h[3] = self.h[3].wrapping_add(((t2 >> 14) | (t3 << 18)) & LIMB_MASK);
        self.h[4] = self.h[4].wrapping_add(((t3 >> 8) | (t4 << 24)) & LIMB_MASK);

        let [h0, h1, h2, h3, h4] = self.h.map(u64::from);
        let [r0, r1, r2, r3, r4] = self.r.map(u64::from);

        let r1_5 = r1 * 5;
        let r2_5 = r2 * 5;
        let r3_5 = r3 * 5;
        let r4_5 = r4 * 5;

        let d0 = h0 * r0 + h1 * r4_5 + h2 * r3_5 + h3 * r2_5 + h4 * r1_5;
        let mut d1 = h0 * r1 + h1 * r0 + h2 * r4_5 + h3 * r3_5 + h4 * r2_5;
        let mut d2 = h0 * r2 + h1 * r1 + h2 * r0 + h3 * r4_5 + h4 * r3_5;
        let mut d3 = h0 * r3 + h1 * r2 + h2 * r1 + h3 * r0 + h4 * r4_5;
        let mut d4 = h0 * r4 + h1 * r3 + h2 * r2 + h3 * r1 + h4 * r0;

        let mut c: u64;

        c = d0 >> 26;
        self.h[0] = (d0 as u32) & LIMB_MASK;
        d1 += c;

        c = d1 >> 26;
        self.h[1] = (d1 as u32) & LIMB_MASK;
        d2 += c;

        c = d2 >> 26;
        self.h[2] = (d2 as u32) & LIMB_MASK;
        d3 += c;

        c = d3 >> 26;
        self.h[3] = (d3 as u32) & LIMB_MASK;
        d4 += c;

        c = d4 >> 26;
        self.h[4] = (d4 as u32) & LIMB_MASK;
        self.h[0] += (c * 5) as u32;

        let carry = self.h[0] >> 26;
        self.h[0] &= LIMB_MASK;
        self.h[1] += carry;
    }

    /// Fully reduces the accumulator, adds `s` and returns the 16-byte tag.
    ///
    /// 1. Carry propagation and reduction modulo `2^130 - 5`
    /// 2. Constant-time conditional subtraction of the modulus
    /// 3. Serialization to 128 bits
    /// 4. Addition of `s` modulo `2^128`
    ///
    /// The state must not absorb further blocks afterwards.
    pub(crate) fn finalize(&mut self) -> [u8; 16] {
        let mut c: u32;

        c = self.h[1] >> 26;
        self.h[1] &= LIMB_MASK;
        self.h[2] += c;

        c = self.h[2] >> 26;
        self.h[2] &= LIMB_MASK;
        self.h[3] += c;

        c = self.h[3] >> 26;
        self.h[3] &= LIMB_MASK;
        self.h[4] += c;

        c = self.h[4] >> 26;
        self.h[4] &= LIMB_MASK;
        self.h[0] += c * 5;

        c = self.h[0] >> 26;
        self.h[0] &= LIMB_MASK;
        self.h[1] += c;

        // g = h + 5; select g when it carries out of 2^130 (h >= p)
        let mut g = [0u32; 5];
        g[0] = self.h[0].wrapping_add(5);
        c = g[0] >> 26;
        g[0] &= LIMB_MASK;

        for (h_i, g_i) in self.h[1..].iter().zip(&mut g[1..]) {
            *g_i = h_i.wrapping_add(c);
            c = *g_i >> 26;
            *g_i &= LIMB_MASK;
        }

        let mask = 0u32.wrapping_sub(c);

        for (h_i, g_i) in self.h.iter_mut().zip(&g) {
            *h_i = (*h_i & !mask) | (*g_i & mask);
        }
        g.zeroize();

        let words = [
            self.h[0] | (self.h[1] << 26),
            (self.h[1] >> 6) | (self.h[2] << 20),
            (self.h[2] >> 12) | (self.h[3] << 14),
            (self.h[3] >> 18) | (self.h[4] << 8),
        ];

        let mut h_bytes = [0u8; 16];
        h_bytes
            .chunks_exact_mut(4)
            .zip(&words)
            .for_each(|(chunk, w)| chunk.copy_from_slice(&w.to_le_bytes()));

        let mut tag = [0u8; 16];
        let mut carry = 0u16;
        for ((t, h), s) in tag.iter_mut().zip(&h_bytes).zip(&self.s) {
            let sum = u16::from(*h) + u16::from(*s) + carry;
            *t = sum as u8;
            carry = sum >> 8;
        }
        h_bytes.zeroize();

        tag
    }
}

impl Drop for State {
    fn drop(&mut self) {
        self.r.zeroize();
        self.h.zeroize();
        self.s.zeroize();
    }
}
