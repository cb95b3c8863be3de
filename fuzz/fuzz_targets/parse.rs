#![no_main]
use libfuzzer_sys::fuzz_target;
use tidy_uri::Uri;

fuzz_target!(|data: &str| {
    let Ok(u1) = Uri::parse(data) else {
        return;
    };

    let s = u1.to_string();
    let u2 = Uri::parse(&s).unwrap();
    assert_eq!(u1, u2);
    assert_eq!(u2.to_string(), s);
});
