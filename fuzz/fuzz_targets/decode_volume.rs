#![no_main]

use libfuzzer_sys::fuzz_target;

// Fuzz target: full Archive II decoder entry point.
//
// Covers the gzip envelope, LDM record framing, bzip2 inflation, message
// slot arithmetic and Message 31 parsing. Limits are kept small so the
// bomb guards trip instead of exhausting memory.
fuzz_target!(|data: &[u8]| {
    let config = ar2_decoder::DecoderConfig::default()
        .with_max_record_size(4 << 20)
        .with_max_volume_size(16 << 20);
    let _ = ar2_decoder::Archive2Decoder::new(config).decode(data);
});
