//! Compression/encryption hooks, contractual and identity by default. The
//! Redis store calls these on every write/read so a deployment can plug
//! in real compression or at-rest encryption without touching the store.

pub trait Compressor: Send + Sync {
    fn compress(&self, data: &[u8]) -> Vec<u8>;
    fn decompress(&self, data: &[u8]) -> Vec<u8>;
}

/// No-op compressor — the default. Plugging in a real codec (e.g. zstd) or
/// an encryption-at-rest layer means implementing this trait, not modifying
/// the store.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityCompressor;

impl Compressor for IdentityCompressor {
    fn compress(&self, data: &[u8]) -> Vec<u8> {
        data.to_vec()
    }

    fn decompress(&self, data: &[u8]) -> Vec<u8> {
        data.to_vec()
    }
}
