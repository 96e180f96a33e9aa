use crate::crypto::compute_digest;
use crate::framing::types::FrameFormat;

/// Wrap `payload` into canonical wire format.
///
/// Layout:
///
/// ```text
/// [ magic   ]
/// [ payload ]
/// [ digest(payload) ]
/// ```
pub fn encode_frame(payload: &[u8], format: &FrameFormat) -> Vec<u8> {
    let mut out = Vec::with_capacity(format.overhead() + payload.len());

    out.extend_from_slice(&format.magic);
    out.extend_from_slice(payload);

    // Digest covers the payload only, never the magic.
    let digest = compute_digest(format.digest, payload);
    out.extend_from_slice(&digest);

    debug_assert_eq!(out.len(), format.overhead() + payload.len());
    out
}

/// Cheap sniff: long enough and starts with the magic.
///
/// Does not verify the digest. Consumers use this to tell aggregated records
/// from plain ones, which are passed through untouched.
#[inline]
pub fn is_framed(raw: &[u8], format: &FrameFormat) -> bool {
    raw.len() >= format.overhead() && raw.starts_with(&format.magic)
}
