//! Internet checksum (RFC 1071) as used by IPv4 and ICMP headers.

/// One's-complement sum of `buf` as big-endian 16-bit words, carries folded back in.
///
/// A trailing odd byte is taken as the high byte of a final word padded with zero.
fn ones_complement_sum(buf: &[u8]) -> u16 {
    let mut sum: u32 = 0;
    let mut words = buf.chunks_exact(2);
    for word in &mut words {
        sum += u16::from_be_bytes([word[0], word[1]]) as u32;
        if sum & 0x8000_0000 != 0 {
            sum = (sum & 0xFFFF) + (sum >> 16);
        }
    }
    if let [last] = words.remainder() {
        sum += (*last as u32) << 8;
    }
    while sum >> 16 != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    sum as u16
}

/// Checksum to store in a header whose checksum field is zero in `buf`.
///
/// The value is the numeric word; write it with `to_be_bytes` (or a pnet setter)
/// to get network byte order on the wire.
pub fn internet_checksum(buf: &[u8]) -> u16 {
    !ones_complement_sum(buf)
}

/// True if `buf` carries a valid checksum somewhere in it.
pub fn verify_checksum(buf: &[u8]) -> bool {
    ones_complement_sum(buf) == 0xFFFF
}
