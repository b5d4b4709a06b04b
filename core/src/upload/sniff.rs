/// Leading bytes inspected when sniffing a content type.
pub const SNIFF_LEN: usize = 512;

pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Derives a MIME type from the leading bytes of `data` by magic number.
///
/// Unrecognized content falls back to `text/plain; charset=utf-8` when it reads
/// as text and `application/octet-stream` otherwise.
pub fn sniff_content_type(data: &[u8]) -> String {
    let head = &data[..data.len().min(SNIFF_LEN)];
    if let Some(kind) = infer::get(head) {
        return kind.mime_type().to_string();
    }
    if looks_like_text(head) {
        TEXT_PLAIN.to_string()
    } else {
        OCTET_STREAM.to_string()
    }
}

fn looks_like_text(head: &[u8]) -> bool {
    // A multi-byte character may be cut at the sniff boundary
    let utf8 = match std::str::from_utf8(head) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    };
    utf8 && !head.iter().copied().any(is_binary_byte)
}

fn is_binary_byte(b: u8) -> bool {
    matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F)
}
