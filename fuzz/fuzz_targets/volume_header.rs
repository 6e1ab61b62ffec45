#![no_main]

use ar2_wire::{ByteReader, VolumeHeader};
use libfuzzer_sys::fuzz_target;

// Fuzz target: volume header parse -> write roundtrip.
//
// Any 24 bytes are a valid header; writing it back must reproduce them
// and the text accessors must not panic.
fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let Ok(header) = VolumeHeader::read_from(&mut reader) else {
        assert!(data.len() < 24);
        return;
    };

    let mut buf = Vec::new();
    header.write_to(&mut buf);
    assert_eq!(buf, &data[..24]);

    let _ = header.icao();
    let _ = header.date_time();
    let _ = header.version_number();
    let _ = header.sequence();
});
