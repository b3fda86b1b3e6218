#![no_main]

use libfuzzer_sys::fuzz_target;
use bertlv::decode::{self, Config, Scan};

fuzz_target!(|data: &[u8]| {
    match decode::scan(data, &Config::default()) {
        Ok(Scan::Complete { tlv, consumed }) => {
            // Scanned values re-encode byte for byte.
            assert_eq!(tlv.to_vec(), &data[..consumed]);
            assert_eq!(tlv.encoded_len(), consumed);
            assert!(tlv.octets().eq(data[..consumed].iter().copied()));
        }
        Ok(Scan::Incomplete { partial }) => {
            assert!(!partial.is_complete());
        }
        Err(_) => { }
    }
});
