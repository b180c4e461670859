#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(frames) = lhe::io::read_container(data) {
        for f in frames {
            assert!(f.offset + 8 + f.payload.len() <= data.len());
        }
    }
});
