use std::io::Cursor;

/// Extension trait for `Cursor<u32>` used as a read or write position by every codec.
pub trait IncrementCursor {
    /// Increments the cursor position by 1.
    fn increment(&mut self);
    /// Adds `n` to the cursor position.
    fn add(&mut self, n: u32);
    /// Current position as a slice index.
    fn index(&self) -> usize;
}

impl IncrementCursor for Cursor<u32> {
    fn increment(&mut self) {
        self.set_position(self.position() + 1); // Position needs to be a u64
    }

    fn add(&mut self, n: u32) {
        self.set_position(self.position() + u64::from(n));
    }

    fn index(&self) -> usize {
        self.position() as usize
    }
}
