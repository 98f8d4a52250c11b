#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are bugs. Decoded rows must encode again.
    if let Ok(rows) = collmex::wire::decode(data) {
        let bytes = collmex::wire::encode(&rows).expect("decoded text is windows-1252");
        assert_eq!(collmex::wire::decode(&bytes).ok(), Some(rows));
    }
});
