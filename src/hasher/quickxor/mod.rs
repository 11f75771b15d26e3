use super::{Hasher, E};

/// Digest width in bytes (160 bits).
const SIZE: usize = 20;
/// Every next input byte is placed 11 bits further in the digest.
const SHIFT: usize = 11;
const WIDTH_IN_BITS: usize = SIZE * 8;
/// After this many input bytes the placement wraps back to bit 0.
const CELLS: usize = SHIFT * WIDTH_IN_BITS;

/// QuickXorHash, the content hash used by OneDrive. Input bytes are XORed into a cyclic buffer;
/// on finish the buffer is folded into 160 bits with an 11-bit stride and the total input length
/// is XORed (little endian) into the last 8 bytes.
pub struct QuickXor {
    cells: Box<[u8; CELLS]>,
    len: u64,
    hash: Option<[u8; SIZE]>,
}

impl Default for QuickXor {
    fn default() -> Self {
        Self::new()
    }
}

impl QuickXor {
    pub fn new() -> Self {
        QuickXor {
            cells: Box::new([0u8; CELLS]),
            len: 0,
            hash: None,
        }
    }

    fn fold(&self) -> [u8; SIZE] {
        // One spare byte catches the carry of the last cell and is folded back into byte 0.
        let mut h = [0u8; SIZE + 1];
        for (i, cell) in self.cells.iter().enumerate() {
            let shift = (i * SHIFT) % WIDTH_IN_BITS;
            let shifted = (*cell as u16) << (shift % 8);
            h[shift / 8] ^= shifted as u8;
            h[shift / 8 + 1] ^= (shifted >> 8) as u8;
        }
        h[0] ^= h[SIZE];
        for (i, byte) in self.len.to_le_bytes().iter().enumerate() {
            h[SIZE - 8 + i] ^= byte;
        }
        let mut digest = [0u8; SIZE];
        digest.copy_from_slice(&h[..SIZE]);
        digest
    }
}

impl Hasher for QuickXor {
    fn hash(&self) -> Result<&[u8], E> {
        Ok(self.hash.as_ref().ok_or(E::NotFinished)?)
    }

    fn absorb(&mut self, data: &[u8]) -> Result<(), E> {
        if self.hash.is_some() {
            return Err(E::AlreadyFinished);
        }
        let mut pos = (self.len % CELLS as u64) as usize;
        for byte in data {
            self.cells[pos] ^= byte;
            pos += 1;
            if pos == CELLS {
                pos = 0;
            }
        }
        self.len += data.len() as u64;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), E> {
        if self.hash.is_some() {
            return Err(E::AlreadyFinished);
        }
        self.hash = Some(self.fold());
        Ok(())
    }
}
