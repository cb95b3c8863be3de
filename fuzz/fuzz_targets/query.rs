#![no_main]
use libfuzzer_sys::fuzz_target;
use tidy_uri::query;

fuzz_target!(|data: &str| {
    let d1 = query::decode(data);
    let s = query::encode(&d1);
    let d2 = query::decode(&s);
    assert_eq!(d1, d2);
    assert_eq!(query::encode(&d2), s);
});
