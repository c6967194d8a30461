#![no_main]

use libfuzzer_sys::fuzz_target;
use nibble_rle::{MAX_DATA_BYTE, compress, decompress};

/// Feeds arbitrary bytes to the decoder.
///
/// # Invariant
/// The decoder returns `Ok(_)` or `Err(_)` and never panics, whatever the
/// input and however small the output buffer.
fn verify_decompression_robustness(data: &[u8]) {
    let mut small = [0u8; 16];
    let _ = decompress(data, &mut small);

    let mut large = vec![0u8; data.len() * 7 + 1];
    let _ = decompress(data, &mut large);
}

/// Masks the input to 7 bits and checks `decompress(compress(data)) == data`.
///
/// # Panics
/// On any mismatch, on an error from either side, or if compression grew
/// the buffer.
fn verify_round_trip(data: &[u8]) {
    let original: Vec<u8> = data.iter().map(|&b| b & MAX_DATA_BYTE).collect();
    let mut buffer = original.clone();

    let len = match compress(&mut buffer) {
        Ok(len) => len,
        Err(e) => panic!("Compression rejected 7-bit input: {e:?}"),
    };
    assert!(len <= original.len(), "Compression grew the buffer");

    let mut decompressed = vec![0u8; original.len()];
    match decompress(&buffer[..len], &mut decompressed) {
        Ok(n) => {
            if decompressed[..n] != original[..] {
                panic!(
                    "Round-trip mismatch!\nInput len: {}\nCompressed len: {}\nDecompressed len: {}",
                    original.len(),
                    len,
                    n
                );
            }
        }
        Err(e) => {
            panic!(
                "Round-trip failed! Decompressor rejected valid compressed data.\nError: {:?}\nInput len: {}",
                e,
                original.len()
            );
        }
    }
}

fuzz_target!(|data: &[u8]| {
    verify_decompression_robustness(data);
    verify_round_trip(data);
});
