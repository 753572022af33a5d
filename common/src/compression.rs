use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use std::io::{Read, Write};

pub fn compress(bytes: &[u8]) -> Result<Vec<u8>, std::io::Error> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::best());
    encoder.write_all(bytes)?;
    encoder.finish()
}

pub fn decompress(bytes: &[u8]) -> Result<Vec<u8>, std::io::Error> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut buffer = Vec::new();
    decoder.read_to_end(&mut buffer)?;

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repetitive_input_shrinks() {
        let input = "{\"Summary\":\"WLAN Control Frame: ACK\"}".repeat(64);
        let compressed = compress(input.as_bytes()).unwrap();

        assert!(compressed.len() < input.len() / 4);
        assert_eq!(decompress(&compressed).unwrap(), input.as_bytes());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(decompress(&[0x00, 0x01, 0x02, 0x03]).is_err());
    }
}
