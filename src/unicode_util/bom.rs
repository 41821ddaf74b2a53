/// Strip a leading UTF-8 or UTF-16 byte-order mark from raw bytes, returning
/// the remaining bytes decoded as UTF-8.
///
/// UTF-16 input is converted to UTF-8 on the spot; this crate otherwise
/// assumes UTF-8 throughout (per the purpose-and-scope non-goal on general
/// codepage transcoding).
pub fn strip_bom(bytes: &[u8]) -> Result<String, crate::error::TokenizerError> {
    if let Some(rest) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8(rest.to_vec())
            .map_err(|e| crate::error::TokenizerError::Decode(e.to_string()));
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFF, 0xFE]) {
        return decode_utf16(rest, true);
    }
    if let Some(rest) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        return decode_utf16(rest, false);
    }
    String::from_utf8(bytes.to_vec()).map_err(|e| crate::error::TokenizerError::Decode(e.to_string()))
}

fn decode_utf16(rest: &[u8], little_endian: bool) -> Result<String, crate::error::TokenizerError> {
    let units: Vec<u16> = rest
        .chunks_exact(2)
        .map(|pair| {
            if little_endian {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        })
        .collect();
    String::from_utf16(&units).map_err(|e| crate::error::TokenizerError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_utf8_with_no_bom_passes_through() {
        assert_eq!(strip_bom("hello".as_bytes()).unwrap(), "hello");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("hi".as_bytes());
        assert_eq!(strip_bom(&bytes).unwrap(), "hi");
    }

    #[test]
    fn utf16_le_bom_is_decoded_to_utf8() {
        // "hi" as UTF-16LE code units after a little-endian BOM.
        let bytes = vec![0xFF, 0xFE, b'h', 0x00, b'i', 0x00];
        assert_eq!(strip_bom(&bytes).unwrap(), "hi");
    }

    #[test]
    fn utf16_be_bom_is_decoded_to_utf8() {
        let bytes = vec![0xFE, 0xFF, 0x00, b'h', 0x00, b'i'];
        assert_eq!(strip_bom(&bytes).unwrap(), "hi");
    }

    #[test]
    fn invalid_utf8_without_a_bom_is_a_decode_error() {
        let bytes = vec![0xFF, 0x00, 0xFF];
        assert!(strip_bom(&bytes).is_err());
    }
}
