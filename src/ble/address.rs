//! Bluetooth device address (`BD_ADDR`).
//!
//! Stored as six octets in display order (most significant first), the
//! same order the text form `AA:BB:CC:DD:EE:FF` is written in.

use core::fmt::{self, Write};
use heapless::String;

/// Length of the canonical text form `AA:BB:CC:DD:EE:FF`.
pub const ADDRESS_STR_LEN: usize = 17;

/// A 6-byte Bluetooth device address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BdAddr(pub [u8; 6]);

impl BdAddr {
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    pub const fn bytes(&self) -> [u8; 6] {
        self.0
    }

    /// Parse `AA:BB:CC:DD:EE:FF`.
    ///
    /// Exactly six two-digit hex octets separated by `:`. Hex digits may be
    /// either case; anything else (wrong length, other separators, stray
    /// whitespace) yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let raw = s.as_bytes();
        if raw.len() != ADDRESS_STR_LEN {
            return None;
        }

        let mut out = [0u8; 6];
        for (i, octet) in out.iter_mut().enumerate() {
            let at = i * 3;
            if i > 0 && raw[at - 1] != b':' {
                return None;
            }
            *octet = (hex_nibble(raw[at])? << 4) | hex_nibble(raw[at + 1])?;
        }
        Some(Self(out))
    }

    /// Canonical uppercase text form.
    pub fn to_text(&self) -> String<ADDRESS_STR_LEN> {
        let mut s = String::new();
        // 17 bytes always fit.
        let _ = write!(s, "{}", self);
        s
    }
}

fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl fmt::Display for BdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BdAddr {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.to_text().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_uppercase() {
        let addr = BdAddr::parse("AA:11:22:33:44:55").unwrap();
        assert_eq!(addr.bytes(), [0xAA, 0x11, 0x22, 0x33, 0x44, 0x55]);
    }

    #[test]
    fn parse_accepts_lowercase_digits() {
        let addr = BdAddr::parse("de:ad:be:ef:00:01").unwrap();
        assert_eq!(addr, BdAddr::new([0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01]));
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(BdAddr::parse("").is_none());
        assert!(BdAddr::parse("AA:11:22:33:44").is_none());
        assert!(BdAddr::parse("AA:11:22:33:44:55:66").is_none());
        assert!(BdAddr::parse("AA-11-22-33-44-55").is_none());
        assert!(BdAddr::parse("AA:11:22:33:44:5G").is_none());
        assert!(BdAddr::parse(" AA:11:22:33:44:5").is_none());
        assert!(BdAddr::parse("AA:11:22:33:44:55#Foo").is_none());
    }

    #[test]
    fn display_is_uppercase_colon_hex() {
        let addr = BdAddr::new([0x00, 0x1a, 0x7d, 0xda, 0x71, 0x13]);
        assert_eq!(addr.to_text().as_str(), "00:1A:7D:DA:71:13");
    }

    #[test]
    fn text_form_parses_back() {
        let addr = BdAddr::new([0xfe, 0xdc, 0xba, 0x98, 0x76, 0x54]);
        assert_eq!(BdAddr::parse(addr.to_text().as_str()), Some(addr));
    }
}
