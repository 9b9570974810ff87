//! Zigzag coding of successive differences.

/// Maps a signed difference to an unsigned code: 0, -1, 1, -2, ... become 0, 1, 2, 3, ...
pub fn zigzag_encode(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Inverse of [`zigzag_encode`].
pub fn zigzag_decode(code: u32) -> i32 {
    (code >> 1) as i32 ^ -((code & 1) as i32)
}

/// Turns values into zigzag codes of their difference to the previous value.
#[derive(Debug, Default, Clone)]
pub struct DeltaZigzagEncoder {
    context: u32,
}

impl DeltaZigzagEncoder {
    /// Creates an encoder whose first difference is taken against `context`.
    pub fn new(context: u32) -> Self {
        Self { context }
    }

    pub fn context(&self) -> u32 {
        self.context
    }

    pub fn set_context(&mut self, context: u32) {
        self.context = context;
    }

    pub fn encode_int(&mut self, value: u32) -> u32 {
        let n = value.wrapping_sub(self.context) as i32;
        self.context = value;
        zigzag_encode(n)
    }

    /// Encodes `src` into the front of `dst`.
    pub fn encode_array(&mut self, src: &[u32], dst: &mut [u32]) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = self.encode_int(s);
        }
    }
}

/// Inverse of [`DeltaZigzagEncoder`].
#[derive(Debug, Default, Clone)]
pub struct DeltaZigzagDecoder {
    context: u32,
}

impl DeltaZigzagDecoder {
    pub fn new(context: u32) -> Self {
        Self { context }
    }

    pub fn context(&self) -> u32 {
        self.context
    }

    pub fn set_context(&mut self, context: u32) {
        self.context = context;
    }

    pub fn decode_int(&mut self, code: u32) -> u32 {
        let value = self.context.wrapping_add(zigzag_decode(code) as u32);
        self.context = value;
        value
    }

    /// Decodes `src` into the front of `dst`.
    pub fn decode_array(&mut self, src: &[u32], dst: &mut [u32]) {
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = self.decode_int(s);
        }
    }
}
