//! Fixed-capacity circular byte store
//!
//! Capacity is always a power of two so a cursor maps to a physical
//! offset with a single mask: `offset = cursor & (size - 1)`.
//!
//! # Cursors
//!
//! `in_` (write) and `out` (read) are u32 and only ever move forward,
//! wrapping at `u32::MAX`. All arithmetic is modular:
//!
//! ```text
//! data_length     = in_ - out          (wrapping)
//! available_space = size - data_length
//! ```
//!
//! Because `size` divides 2^32, the wrap of a cursor past `u32::MAX`
//! lands on the same physical offset it would have reached without
//! wrapping. The invariant `0 <= in_ - out <= size` holds at all times.
//!
//! # Thread safety
//!
//! None. The buffer has no internal locking; the owning pool serializes
//! every access under its own mutex.

use core::fmt;

use crate::error::{AllocError, PoolResult};

/// Power-of-two circular byte buffer.
pub struct RingBuffer {
    /// Backing storage, `size` bytes long.
    buffer: Box<[u8]>,
    /// Capacity in bytes (power of two, or 0 when freed).
    size: u32,
    /// Write cursor.
    in_: u32,
    /// Read cursor.
    out: u32,
}

impl RingBuffer {
    /// An empty, unusable buffer with zero capacity.
    ///
    /// Push and pop on it always move zero bytes.
    pub fn empty() -> Self {
        Self {
            buffer: Box::default(),
            size: 0,
            in_: 0,
            out: 0,
        }
    }

    /// Allocate a buffer of at least `capacity` bytes.
    ///
    /// Non-power-of-two capacities are rounded up (100 becomes 128).
    pub fn allocate(capacity: u32) -> PoolResult<Self> {
        if capacity == 0 {
            return Err(AllocError::ZeroCapacity.into());
        }
        let size = capacity
            .checked_next_power_of_two()
            .ok_or(AllocError::CapacityOverflow)?;

        let mut storage: Vec<u8> = Vec::new();
        storage
            .try_reserve_exact(size as usize)
            .map_err(|_| AllocError::OutOfMemory)?;
        storage.resize(size as usize, 0);

        Ok(Self {
            buffer: storage.into_boxed_slice(),
            size,
            in_: 0,
            out: 0,
        })
    }

    /// Re-initialize in place with a new capacity.
    ///
    /// On failure the buffer is left empty (zero capacity).
    pub fn init(&mut self, capacity: u32) -> PoolResult<()> {
        match Self::allocate(capacity) {
            Ok(ring) => {
                *self = ring;
                Ok(())
            }
            Err(e) => {
                self.free();
                Err(e)
            }
        }
    }

    /// Release storage and reset to the empty state. Idempotent.
    pub fn free(&mut self) {
        *self = Self::empty();
    }

    /// Write up to `data.len()` bytes, bounded by free space.
    ///
    /// Returns the number of bytes actually written. Never blocks.
    pub fn push(&mut self, data: &[u8]) -> u32 {
        if self.size == 0 {
            return 0;
        }
        let len = clamp_len(data.len()).min(self.available_space()) as usize;
        let off = (self.in_ & self.mask()) as usize;
        let first = len.min(self.size as usize - off);

        self.buffer[off..off + first].copy_from_slice(&data[..first]);
        self.buffer[..len - first].copy_from_slice(&data[first..len]);

        self.in_ = self.in_.wrapping_add(len as u32);
        len as u32
    }

    /// Read up to `buf.len()` bytes, bounded by stored data.
    ///
    /// Returns the number of bytes actually read.
    pub fn pop(&mut self, buf: &mut [u8]) -> u32 {
        let len = self.copy_out(buf);
        self.out = self.out.wrapping_add(len);
        len
    }

    /// Like `pop`, but leaves the read cursor where it is.
    pub fn peek(&self, buf: &mut [u8]) -> u32 {
        self.copy_out(buf)
    }

    /// Free bytes.
    #[inline]
    pub fn available_space(&self) -> u32 {
        self.size - self.data_length()
    }

    /// Stored bytes.
    #[inline]
    pub fn data_length(&self) -> u32 {
        self.in_.wrapping_sub(self.out)
    }

    /// Capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.in_ == self.out
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.data_length() == self.size
    }

    #[inline(always)]
    fn mask(&self) -> u32 {
        self.size.wrapping_sub(1)
    }

    fn copy_out(&self, buf: &mut [u8]) -> u32 {
        if self.size == 0 {
            return 0;
        }
        let len = clamp_len(buf.len()).min(self.data_length()) as usize;
        let off = (self.out & self.mask()) as usize;
        let first = len.min(self.size as usize - off);

        buf[..first].copy_from_slice(&self.buffer[off..off + first]);
        buf[first..len].copy_from_slice(&self.buffer[..len - first]);
        len as u32
    }
}

#[inline(always)]
fn clamp_len(len: usize) -> u32 {
    len.min(u32::MAX as usize) as u32
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("size", &self.size)
            .field("in", &self.in_)
            .field("out", &self.out)
            .finish()
    }
}
