#![no_main]

use libfuzzer_sys::fuzz_target;
use bertlv::Buffer;
use bertlv::decode::Config;

fuzz_target!(|data: &[u8]| {
    // Feeding the data octet by octet must not find anything
    // different from feeding it all at once.
    let config = Config::default();
    let mut whole = Buffer::new();
    whole.put_slice(data);
    let mut expected = Vec::new();
    while let Ok(Some(tlv)) = whole.next_tlv(&config) {
        expected.push(tlv);
    }

    let mut buf = Buffer::new();
    let mut found = Vec::new();
    for &octet in data {
        buf.put_slice(&[octet]);
        while let Ok(Some(tlv)) = buf.next_tlv(&config) {
            found.push(tlv);
        }
        buf.compact();
    }
    assert!(found.len() <= expected.len());
    assert_eq!(found[..], expected[..found.len()]);
});
