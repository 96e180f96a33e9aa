use crate::crypto::{verify_digest, DigestAlg};
use crate::framing::types::{FrameError, FrameFormat, FrameView};

/// Split and validate a frame against `format`.
///
/// Layout:
///
/// ```text
/// [ magic   (format.magic.len()) ]
/// [ payload (len - overhead)     ]
/// [ digest  (format.digest_size) ]
/// ```
///
/// Checks run in order: length, magic, digest. The payload is borrowed, never copied.
pub fn parse_frame<'a>(raw: &'a [u8], format: &FrameFormat) -> Result<FrameView<'a>, FrameError> {
    let magic_len = format.magic.len();
    let digest_size = format.digest_size();
    let min = magic_len + digest_size;

    if raw.len() < min {
        return Err(FrameError::MalformedFrame {
            len: raw.len(),
            min,
        });
    }

    let digest_at = raw.len() - digest_size;
    let magic = &raw[..magic_len];
    let payload = &raw[magic_len..digest_at];
    let digest = &raw[digest_at..];

    if magic != format.magic.as_slice() {
        return Err(FrameError::BadMagic {
            expected: format.magic.clone(),
            actual: magic.to_vec(),
        });
    }

    verify_digest(format.digest, payload, digest)?;

    Ok(FrameView {
        magic,
        payload,
        digest,
    })
}

/// Validate `raw` as `magic | payload | md5(payload)` and return the payload.
///
/// `digest_size` must match the MD5 output size (16); any other value is a
/// caller configuration error and is rejected before the input is inspected.
pub fn decode_frame<'a>(raw: &'a [u8], magic: &[u8], digest_size: usize) -> Result<&'a [u8], FrameError> {
    let alg = DigestAlg::Md5;
    if digest_size != alg.output_len() {
        return Err(FrameError::DigestSizeMismatch {
            alg,
            expected: alg.output_len(),
            actual: digest_size,
        });
    }

    let format = FrameFormat::new(magic, alg);
    parse_frame(raw, &format).map(|view| view.payload)
}

/// [`decode_frame`] with the KPL constants.
#[inline]
pub fn decode_kpl_frame(raw: &[u8]) -> Result<&[u8], FrameError> {
    parse_frame(raw, &FrameFormat::kpl()).map(|view| view.payload)
}
