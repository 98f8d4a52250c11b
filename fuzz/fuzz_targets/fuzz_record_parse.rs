#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(rows) = collmex::wire::decode(data) {
        for row in &rows {
            let _ = collmex::records::Record::parse(row);
        }
        let _ = collmex::api::Response::partition(rows).and_then(|r| r.check());
    }
});
