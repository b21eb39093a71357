//! Split index ranges for batched processing.

/// One half-open index range `[from, to)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Chunk {
    pub from: usize,
    pub to: usize,
}

/// Iterator over successive chunks of a length. See [`split_chunks`].
#[derive(Clone, Debug)]
pub struct Chunks {
    len: usize,
    step: usize,
    at: usize,
}

/// Split `len` items into chunks of at most `chunk_size`.
///
/// A zero `chunk_size` is treated as 1. The final chunk is clipped to
/// `len`, so every index is covered exactly once.
pub fn split_chunks(len: usize, chunk_size: usize) -> Chunks {
    Chunks {
        len,
        step: chunk_size.max(1),
        at: 0,
    }
}

impl Iterator for Chunks {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.at >= self.len {
            return None;
        }
        let from = self.at;
        let to = (self.at + self.step).min(self.len);
        self.at = to;
        Some(Chunk { from, to })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.len - self.at).div_ceil(self.step);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Chunks {}
