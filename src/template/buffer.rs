// ABOUTME: Append-only output buffer for rendered template bytes
// ABOUTME: Growth goes through try_reserve so allocation failure surfaces as an error

use super::error::Result;

#[derive(Debug, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, chunk: &[u8]) -> Result<()> {
        self.bytes.try_reserve(chunk.len())?;
        self.bytes.extend_from_slice(chunk);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Hand over the rendered bytes. The length is exactly what was appended.
    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}
