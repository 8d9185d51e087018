/*!
A read-only reader for capture-file trace formats.

Given a path to a trace file, [`open_reader`] returns a [`Cursor`] that
yields [`Packet`]s one at a time, in file order, alongside whatever
per-trace metadata the format carries: the data-link type, a pcap-ng
trace's [`TraceInterface`] descriptors, and its [`SectionMetadata`].

Three on-disk encodings are understood:

* classic single-section pcap (microsecond or nanosecond resolution);
* block-structured pcap-ng;
* pcap-ng wrapped in a single zstd frame.

From <https://www.tcpdump.org/pcap/pcap.html>:

> The problem of exchanging packet traces becomes more and more critical every day; unfortunately,
> no standard solutions exist for this task right now. One of the most accepted packet interchange
> formats is the one defined by libpcap, which is rather old and is lacking in functionality for
> more modern applications particularly from the extensibility point of view.
>
> This document proposes a new format for recording packet traces.

This crate only reads traces; writing/encoding, live capture, and packet
dissection above link-layer framing are all out of scope.
*/

mod byte_source;
mod cursor;
mod error;
mod format;
mod interface;
mod link_type;
mod packet;
mod pcap;
mod pcapng;

pub use cursor::{open_reader, Cursor};
pub use error::{Error, Result};
pub use interface::{InterfaceStatistics, TimestampResolution, TraceInterface};
pub use link_type::LinkType;
pub use packet::Packet;
pub use pcapng::SectionMetadata;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(bytes: &[u8], suffix: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        f.write_all(bytes).unwrap();
        f.flush().unwrap();
        f
    }

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
    fn s1_pcap_microseconds_end_to_end() {
        let f = write_temp(&s1_bytes(), ".pcap");
        let mut cursor = open_reader(f.path()).unwrap();

        let p = cursor.next_packet().unwrap().unwrap();
        assert_eq!(p.timestamp_seconds, 1);
        assert_eq!(p.timestamp_subseconds, 2);
        assert_eq!(p.captured_length, 4);
        assert_eq!(p.original_length, 4);
        assert_eq!(p.interface_index, -1);
        assert_eq!(p.data, &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(cursor.data_link_type(), Some(LinkType(1)));

        assert!(cursor.next_packet().unwrap().is_none());
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.current_offset(), cursor.file_size());

        cursor.close();
        cursor.close(); // idempotent
    }

    #[test]
    fn s2_pcap_nanoseconds_converted_to_microseconds() {
        let mut buf = s1_bytes();
        buf[0..4].copy_from_slice(&[0x4d, 0x3c, 0xb2, 0xa1]);
        buf[28..32].copy_from_slice(&1000u32.to_le_bytes());
        let f = write_temp(&buf, ".pcap");
        let mut cursor = open_reader(f.path()).unwrap();
        let p = cursor.next_packet().unwrap().unwrap();
        assert_eq!(p.timestamp_subseconds, 1);
    }

    fn block(block_type: u32, body: &[u8]) -> Vec<u8> {
        let total = 12 + body.len() as u32;
        let mut out = Vec::new();
        out.extend_from_slice(&block_type.to_le_bytes());
        out.extend_from_slice(&total.to_le_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(&total.to_le_bytes());
        out
    }

    fn opt(code: u16, value: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&code.to_le_bytes());
        out.extend_from_slice(&(value.len() as u16).to_le_bytes());
        out.extend_from_slice(value);
        while out.len() % 4 != 0 {
            out.push(0);
        }
        out
    }

    fn shb(options: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&0x1A2B3C4Du32.to_le_bytes());
        body.extend_from_slice(&1u16.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&(-1i64).to_le_bytes());
        body.extend_from_slice(options);
        block(0x0A0D0D0A, &body)
    }

    fn idb(link_type: u16, options: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&link_type.to_le_bytes());
        body.extend_from_slice(&0u16.to_le_bytes());
        body.extend_from_slice(&0u32.to_le_bytes());
        body.extend_from_slice(options);
        block(1, &body)
    }

    fn epb(interface_id: u32, ts_high: u32, ts_low: u32, payload: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&interface_id.to_le_bytes());
        body.extend_from_slice(&ts_high.to_le_bytes());
        body.extend_from_slice(&ts_low.to_le_bytes());
        body.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        body.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        body.extend_from_slice(payload);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        block(6, &body)
    }

    fn spb(payload: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        body.extend_from_slice(payload);
        while body.len() % 4 != 0 {
            body.push(0);
        }
        block(3, &body)
    }

    #[test]
    fn s7_simple_packet_block_attributed_to_interface_zero() {
        let mut buf = Vec::new();
        buf.extend(shb(&[]));
        buf.extend(idb(1, &[]));
        buf.extend(spb(&[0xca, 0xfe, 0xba, 0xbe]));

        let f = write_temp(&buf, ".pcapng");
        let mut cursor = open_reader(f.path()).unwrap();

        let p = cursor.next_packet().unwrap().unwrap();
        assert_eq!(p.timestamp_seconds, 0);
        assert_eq!(p.timestamp_subseconds, 0);
        assert_eq!(p.interface_index, 0);
        assert_eq!(p.captured_length, 4);
        assert_eq!(p.original_length, 4);
        assert_eq!(p.data, &[0xca, 0xfe, 0xba, 0xbe]);

        assert!(cursor.next_packet().unwrap().is_none());
    }

    #[test]
    fn s8_custom_block_is_skipped_and_epb_is_yielded() {
        let mut buf = Vec::new();
        buf.extend(shb(&[]));
        buf.extend(idb(1, &[]));
        buf.extend(block(0x0000_0BAD, &[0xaa, 0xbb, 0xcc, 0xdd]));
        buf.extend(epb(0, 0, 1000, &[0xde, 0xad, 0xbe, 0xef]));

        let f = write_temp(&buf, ".pcapng");
        let mut cursor = open_reader(f.path()).unwrap();

        let offset_before = cursor.current_offset();
        let p = cursor.next_packet().unwrap().unwrap();
        assert_eq!(p.data, &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(p.interface_index, 0);
        assert!(cursor.current_offset() > offset_before);

        assert!(cursor.next_packet().unwrap().is_none());
        assert_eq!(cursor.current_offset(), cursor.file_size());
    }

    fn s3_bytes() -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend(shb(&[]));
        buf.extend(idb(1, &opt(9, &[6])));
        buf.extend(epb(0, 0, 1000, &[0xde, 0xad, 0xbe, 0xef]));
        buf
    }

    #[test]
    fn s3_pcapng_minimal_end_to_end() {
        let f = write_temp(&s3_bytes(), ".pcapng");
        let mut cursor = open_reader(f.path()).unwrap();

        let p = cursor.next_packet().unwrap().unwrap();
        assert_eq!(p.timestamp_seconds, 0);
        assert_eq!(p.timestamp_subseconds, 1000);
        assert_eq!(p.interface_index, 0);
        assert_eq!(cursor.trace_interfaces().len(), 1);
        assert_eq!(cursor.data_link_type(), Some(LinkType(1)));

        assert!(cursor.next_packet().unwrap().is_none());
        assert!(cursor.is_exhausted());
        assert_eq!(cursor.current_offset(), cursor.file_size());
    }

    #[test]
    fn s4_interface_options_and_tsresol_9() {
        let mut opts_bytes = Vec::new();
        opts_bytes.extend(opt(2, b"eth0"));
        opts_bytes.extend(opt(3, b"uplink"));
        opts_bytes.extend(opt(12, b"linux"));
        opts_bytes.extend(opt(11, b"tcp"));
        opts_bytes.extend(opt(9, &[9]));

        let mut buf = Vec::new();
        buf.extend(shb(&[]));
        buf.extend(idb(1, &opts_bytes));
        buf.extend(epb(0, 0, 1_500_000_000, &[1, 2, 3, 4]));

        let f = write_temp(&buf, ".pcapng");
        let mut cursor = open_reader(f.path()).unwrap();

        let iface = cursor.trace_interface(0).unwrap();
        assert_eq!(iface.name, Some("eth0"));
        assert_eq!(iface.description, Some("uplink"));
        assert_eq!(iface.os, Some("linux"));
        assert_eq!(iface.filter, Some("tcp"));

        let p = cursor.next_packet().unwrap().unwrap();
        assert_eq!(p.timestamp_seconds, 1);
        assert_eq!(p.timestamp_subseconds, 500_000);
    }

    #[test]
    fn s5_zstd_wrapped_pcapng_matches_plain() {
        let plain = s3_bytes();
        let compressed = zstd::stream::encode_all(plain.as_slice(), 0).unwrap();
        let f = write_temp(&compressed, ".zst");
        let mut cursor = open_reader(f.path()).unwrap();

        let p = cursor.next_packet().unwrap().unwrap();
        assert_eq!(p.timestamp_seconds, 0);
        assert_eq!(p.timestamp_subseconds, 1000);
        assert_eq!(p.interface_index, 0);
        assert_eq!(p.data, &[0xde, 0xad, 0xbe, 0xef]);
        assert!(cursor.next_packet().unwrap().is_none());
    }

    #[test]
    fn s6_truncated_pcap_record_then_close_still_succeeds() {
        let mut buf = s1_bytes();
        buf.truncate(buf.len() - 1);
        let f = write_temp(&buf, ".pcap");
        let mut cursor = open_reader(f.path()).unwrap();
        assert!(matches!(cursor.next_packet(), Err(Error::Truncated { .. })));
        cursor.close();
    }

    #[test]
    fn pcapng_with_only_shb_and_idb_terminates_cleanly() {
        let mut buf = Vec::new();
        buf.extend(shb(&[]));
        buf.extend(idb(1, &[]));
        let f = write_temp(&buf, ".pcapng");
        let mut cursor = open_reader(f.path()).unwrap();
        assert!(cursor.next_packet().unwrap().is_none());
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let f = write_temp(&[0, 0, 0, 0, 1, 2, 3, 4], ".bin");
        assert!(matches!(open_reader(f.path()), Err(Error::UnknownFormat(0))));
    }

    #[test]
    fn missing_file_is_not_found() {
        assert!(matches!(
            open_reader("/nonexistent/path/to/nowhere.pcap"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn next_packet_after_close_is_illegal_state() {
        let f = write_temp(&s1_bytes(), ".pcap");
        let mut cursor = open_reader(f.path()).unwrap();
        cursor.close();
        assert!(matches!(cursor.next_packet(), Err(Error::IllegalState(_))));
    }
}
