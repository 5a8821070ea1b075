/// Media type sent to the model when the leading bytes are not recognized.
pub const DEFAULT_IMAGE_MEDIA_TYPE: &str = "image/jpeg";

/// Labels image bytes by their magic number.
///
/// This is a hint for the model provider, not validation: unknown input is
/// labelled as JPEG.
pub fn detect_image_media_type(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, ..] => "image/png",
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => "image/gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => DEFAULT_IMAGE_MEDIA_TYPE,
    }
}
