#![no_main]

use libfuzzer_sys::fuzz_target;
use bertlv::descriptor::{self, IDENTIFICATION, IDENTIFICATION_ALTERNATIVES};
use bertlv::decode::{self, Config};

fuzz_target!(|data: &[u8]| {
    let config = Config::default();
    let Ok(tlv) = decode::scan_all(data, &config) else {
        return
    };
    let choice = decode::decode_choice(&IDENTIFICATION, tlv.clone());
    if let Ok((idx, value)) = choice {
        let alternative = &IDENTIFICATION_ALTERNATIVES[idx];
        assert!(decode::is_my_message(alternative.descriptor(), &value));
        let _ = decode::strip(value, alternative.descriptor());
    }
    let _ = decode::sequence(tlv, &descriptor::CHARACTER_STRING_FIELDS);
});
