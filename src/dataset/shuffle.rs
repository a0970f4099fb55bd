use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Bounded reservoir approximating a full shuffle: records pass through a
/// fixed-capacity buffer and leave it in random order. Memory stays bounded
/// no matter how large the source file is.
pub struct ShuffleBuffer {
    buf: Vec<Vec<u8>>,
    capacity: usize,
    rng: StdRng,
}

impl ShuffleBuffer {
    pub fn new(capacity: usize, rng: StdRng) -> Self {
        ShuffleBuffer {
            buf: Vec::with_capacity(capacity.min(4096)),
            capacity,
            rng,
        }
    }

    /// Offers one record. Returns a randomly evicted record once the buffer
    /// is at capacity, None while it is still filling.
    pub fn push(&mut self, record: Vec<u8>) -> Option<Vec<u8>> {
        if self.buf.len() < self.capacity {
            self.buf.push(record);
            return None;
        }
        let slot = self.rng.gen_range(0..self.buf.len());
        Some(std::mem::replace(&mut self.buf[slot], record))
    }

    /// Empties the buffer at end of input, in random order.
    pub fn drain(&mut self) -> Vec<Vec<u8>> {
        self.buf.shuffle(&mut self.rng);
        std::mem::take(&mut self.buf)
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
