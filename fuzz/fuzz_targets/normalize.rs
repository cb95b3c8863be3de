#![no_main]
use libfuzzer_sys::fuzz_target;
use tidy_uri::{
    normalize::{normalize, NormalizeOptions, Step},
    Uri,
};

fuzz_target!(|data: (&str, u8)| {
    let (s, flags) = data;
    let Ok(u) = Uri::parse(s) else {
        return;
    };

    let options = NormalizeOptions {
        force_https: flags & 1 != 0,
        remove_fragment: flags & 2 != 0,
        sort_query: flags & 4 != 0,
        trailing_slash: flags & 8 != 0,
        ..NormalizeOptions::default()
    };

    // `normalize` is idempotent: we cannot normalize beyond a normalized `Uri`.
    let n1 = normalize(&u, &options);
    assert_eq!(normalize(&n1, &options), n1);

    // A normalized `Uri` survives serialization.
    assert_eq!(Uri::parse(&n1.to_string()), Ok(n1));

    for step in Step::PRESERVING.into_iter().chain(Step::CHANGING) {
        let once = step.apply(&u);
        assert_eq!(step.apply(&once), once, "{step}");
    }
});
