//! The classic (pre-pcap-ng) libpcap capture format.
//!
//! A pcap file is a single 24-byte file header followed by a flat sequence
//! of packet records, each a 16-byte header immediately followed by its
//! captured bytes. There is no block structure, no options, and exactly
//! one implicit interface for the whole file — its link type and timestamp
//! resolution are fixed for every packet the file contains.

use crate::error::{Error, Result};
use crate::link_type::LinkType;
use crate::packet::Packet;

const FILE_HEADER_LEN: u64 = 24;
const RECORD_HEADER_LEN: u64 = 16;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum TimestampFormat {
    Microseconds,
    Nanoseconds,
}

/// Walks the flat record sequence of a classic pcap file.
pub(crate) struct Reader<'a> {
    buf: &'a [u8],
    offset: u64,
    link_type: LinkType,
    timestamp_format: TimestampFormat,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(buf: &'a [u8], timestamp_format: TimestampFormat) -> Result<Reader<'a>> {
        if (buf.len() as u64) < FILE_HEADER_LEN {
            return Err(Error::TooShort {
                format: "pcap file header",
                needed: FILE_HEADER_LEN as usize,
                found: buf.len(),
            });
        }
        // version_major(2) version_minor(2) thiszone(4) sigfigs(4) snaplen(4) link_type(4)
        let link_type_raw = u32::from_le_bytes(buf[20..24].try_into().unwrap());
        Ok(Reader {
            buf,
            offset: FILE_HEADER_LEN,
            link_type: LinkType::from(link_type_raw),
            timestamp_format,
        })
    }

    pub(crate) fn data_link_type(&self) -> LinkType {
        self.link_type
    }

    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }

    pub(crate) fn next_packet(&mut self) -> Result<Option<Packet<'a>>> {
        if self.offset >= self.buf.len() as u64 {
            return Ok(None);
        }
        let remaining = self.buf.len() as u64 - self.offset;
        if remaining < RECORD_HEADER_LEN {
            return Err(Error::Truncated {
                offset: self.offset,
                expected: RECORD_HEADER_LEN as usize,
                available: remaining as usize,
            });
        }

        let start = self.offset as usize;
        let ts_sec = u32::from_le_bytes(self.buf[start..start + 4].try_into().unwrap());
        let ts_subsec = u32::from_le_bytes(self.buf[start + 4..start + 8].try_into().unwrap());
        let incl_len = u32::from_le_bytes(self.buf[start + 8..start + 12].try_into().unwrap());
        let orig_len = u32::from_le_bytes(self.buf[start + 12..start + 16].try_into().unwrap());

        let payload_start = start + RECORD_HEADER_LEN as usize;
        let payload_end = payload_start
            .checked_add(incl_len as usize)
            .filter(|&end| end <= self.buf.len())
            .ok_or(Error::Truncated {
                offset: self.offset + RECORD_HEADER_LEN,
                expected: incl_len as usize,
                available: self.buf.len().saturating_sub(payload_start),
            })?;
        let data = &self.buf[payload_start..payload_end];

        let timestamp_subseconds = match self.timestamp_format {
            TimestampFormat::Microseconds => ts_subsec,
            TimestampFormat::Nanoseconds => ts_subsec / 1000,
        };

        self.offset += RECORD_HEADER_LEN + u64::from(incl_len);

        Ok(Some(Packet {
            timestamp_seconds: u64::from(ts_sec),
            timestamp_subseconds,
            captured_length: incl_len,
            original_length: orig_len,
            interface_index: -1,
            data,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s1_bytes() -> Vec<u8> {
        let mut buf = vec![
            0xd4, 0xc3, 0xb2, 0xa1, 0x02, 0x00, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0xff, 0xff, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00,
        ];
        buf.extend_from_slice(&[
            0x01, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x04, 0x00,
            0x00, 0x00, 0xde, 0xad, 0xbe, 0xef,
        ]);
        buf
    }

    #[test]
    fn s1_pcap_microseconds() {
        let buf = s1_bytes();
        let mut r = Reader::new(&buf, TimestampFormat::Microseconds).unwrap();
        assert_eq!(r.data_link_type(), LinkType(1));

        let p = r.next_packet().unwrap().unwrap();
        assert_eq!(p.timestamp_seconds, 1);
        assert_eq!(p.timestamp_subseconds, 2);
        assert_eq!(p.captured_length, 4);
        assert_eq!(p.original_length, 4);
        assert_eq!(p.interface_index, -1);
        assert_eq!(p.data, &[0xde, 0xad, 0xbe, 0xef]);

        assert!(r.next_packet().unwrap().is_none());
        assert_eq!(r.offset(), buf.len() as u64);
        // Idempotent once exhausted.
        assert!(r.next_packet().unwrap().is_none());
    }

    #[test]
    fn s2_pcap_nanoseconds_converted_to_microseconds() {
        let mut buf = s1_bytes();
        buf[0..4].copy_from_slice(&[0x4d, 0x3c, 0xb2, 0xa1]);
        // ts_subsec = 1000 ns
        buf[28..32].copy_from_slice(&1000u32.to_le_bytes());
        let mut r = Reader::new(&buf, TimestampFormat::Nanoseconds).unwrap();
        let p = r.next_packet().unwrap().unwrap();
        assert_eq!(p.timestamp_subseconds, 1);
    }

    #[test]
    fn s6_truncated_payload() {
        let mut buf = s1_bytes();
        buf.truncate(buf.len() - 1);
        let mut r = Reader::new(&buf, TimestampFormat::Microseconds).unwrap();
        assert!(matches!(r.next_packet(), Err(Error::Truncated { .. })));
    }
}
