#![no_main]

use ar2_wire::ByteReader;
use libfuzzer_sys::fuzz_target;

// Fuzz target: a single Message 31 body.
//
// Exercises the self-extending pointer table, block dispatch by name and
// pointer bounds checks. A successful parse must leave the cursor inside
// the buffer and every moment must satisfy its length invariant.
fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    if let Ok(radial) = ar2_decoder::parse_message31(&mut reader, 20) {
        assert!(reader.position() <= data.len());
        for moment in radial.moments() {
            assert_eq!(
                moment.raw().len(),
                moment.gate_count() * usize::from(moment.word_size()) / 8
            );
            assert_eq!(moment.scaled_data().len(), moment.gate_count());
        }
    }
});
