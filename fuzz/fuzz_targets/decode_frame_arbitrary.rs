#![no_main]
use std::sync::OnceLock;

use libfuzzer_sys::fuzz_target;
use lhe::{CodecConfig, FrameCodec};

fn codec() -> &'static FrameCodec {
    static CODEC: OnceLock<FrameCodec> = OnceLock::new();
    CODEC.get_or_init(|| {
        let mut config = CodecConfig::new();
        config.set_nb_workers(1);
        FrameCodec::new(config).expect("default config is valid")
    })
}

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes may be rejected, never panic.
    let _ = lhe::frame::inspect_frame(data);
    if let Ok(frame) = codec().decode(data) {
        assert!(frame.width() > 0 && frame.height() > 0);
    }
});
