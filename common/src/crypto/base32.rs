//! RFC 4648 base32 without padding, the text form of addresses and
//! transaction ids.

use super::CryptoError;

const ALPHABET: &[u8; 32] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ234567";

pub fn encode(data: &[u8]) -> String {
    let mut output = String::with_capacity((data.len() * 8).div_ceil(5));
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for byte in data {
        buffer = (buffer << 8) | *byte as u32;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            output.push(ALPHABET[((buffer >> bits) & 0x1f) as usize] as char);
        }
    }

    if bits > 0 {
        output.push(ALPHABET[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }

    output
}

fn decode_char(c: u8) -> Option<u32> {
    match c {
        b'A'..=b'Z' => Some((c - b'A') as u32),
        b'2'..=b'7' => Some((c - b'2' + 26) as u32),
        _ => None,
    }
}

pub fn decode(data: &str) -> Result<Vec<u8>, CryptoError> {
    let mut output = Vec::with_capacity(data.len() * 5 / 8);
    let mut buffer: u32 = 0;
    let mut bits = 0;

    for c in data.bytes() {
        let value = decode_char(c).ok_or_else(|| CryptoError::InvalidBase32(data.to_owned()))?;
        buffer = (buffer << 5) | value;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            output.push((buffer >> bits) as u8);
        }
    }

    // Leftover bits must be zero padding
    if bits >= 5 || buffer & ((1 << bits) - 1) != 0 {
        return Err(CryptoError::InvalidBase32(data.to_owned()));
    }

    Ok(output)
}
