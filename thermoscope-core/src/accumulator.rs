//! Frame accumulation from a delimiter-less byte stream.
//!
//! The pump protocol has no start/end markers. Frames are approximated by
//! draining the line until a read comes back empty: because the pump sends
//! fixed-length-ish frames in bursts separated by idle time, one drained
//! burst is usually one frame. This is a heuristic - occasionally two frames
//! merge into a burst or one splits across two. Those bursts fall outside
//! the telemetry length window and get dropped downstream; the decoder does
//! not try to repair them.

use thermoscope_protocol::MAX_FRAME_LEN;

use crate::traits::ByteSource;

/// Groups raw read bursts into candidate frames
///
/// Fixed-capacity buffer with an explicit length; a candidate frame can
/// never exceed [`MAX_FRAME_LEN`] bytes.
pub struct FrameAccumulator {
    buf: [u8; MAX_FRAME_LEN],
    len: usize,
}

impl Default for FrameAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameAccumulator {
    /// Create an empty accumulator
    pub const fn new() -> Self {
        Self {
            buf: [0; MAX_FRAME_LEN],
            len: 0,
        }
    }

    /// Drain one burst from the source into a candidate frame
    ///
    /// Clears the buffer, then reads back-to-back (no artificial delay)
    /// until the source reports 0 bytes or the buffer is full, and returns
    /// the accumulated bytes - possibly empty if the line was quiet for the
    /// whole first wait. The caller is expected to hold off for the
    /// quiescence interval after a non-empty burst before pulling again.
    pub fn pull<S: ByteSource>(&mut self, source: &mut S) -> Result<&[u8], S::Error> {
        self.len = 0;
        while self.len < self.buf.len() {
            let n = source.read(&mut self.buf[self.len..])?;
            if n == 0 {
                break;
            }
            self.len += n;
        }
        Ok(self.frame())
    }

    /// Append a chunk read by an external loop, returning how many bytes
    /// were accepted
    ///
    /// Bytes past the buffer capacity are dropped; a short count tells the
    /// caller the burst overflowed (it will fail the length window anyway).
    pub fn extend(&mut self, chunk: &[u8]) -> usize {
        let room = self.buf.len() - self.len;
        let accepted = chunk.len().min(room);
        self.buf[self.len..self.len + accepted].copy_from_slice(&chunk[..accepted]);
        self.len += accepted;
        accepted
    }

    /// The candidate frame accumulated so far
    pub fn frame(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Discard the current frame
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Accumulated byte count
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no bytes have been accumulated
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if the buffer cannot take more bytes
    pub fn is_full(&self) -> bool {
        self.len == self.buf.len()
    }
}
