#![no_main]
use libfuzzer_sys::{arbitrary::Arbitrary, fuzz_target};
use tidy_uri::{Uri, UriBuilder};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    user: &'a str,
    password: &'a str,
    host: &'a str,
    port: Option<u32>,
    path: &'a str,
    query: &'a str,
    fragment: &'a str,
}

fn clean(s: &str, delims: &[char]) -> bool {
    !s.contains(delims)
}

fuzz_target!(|input: Input<'_>| {
    let mut builder = UriBuilder::new();
    builder
        .scheme("http")
        .userinfo(input.user, Some(input.password))
        .host(input.host)
        .path(input.path)
        .query(input.query)
        .fragment(input.fragment);
    if let Some(port) = input.port {
        builder.port(port);
    }

    let Ok(u) = builder.build() else {
        let port = input.port.unwrap();
        assert!(port == 0 || port > 65535);
        return;
    };
    assert_eq!(u.user(), input.user);
    assert_eq!(u.host(), input.host);
    assert_eq!(u.port().map(u32::from), input.port);
    if input.host.is_empty() || input.path.is_empty() || input.path.starts_with('/') {
        assert_eq!(u.path(), input.path);
    } else {
        assert_eq!(u.path().strip_prefix('/'), Some(input.path));
    }

    // Delimiters inside a component cannot be read back.
    if input.host.is_empty()
        || !clean(input.user, &[':', '@', '/', '?', '#', '[', ']'])
        || !clean(input.password, &['@', '/', '?', '#', '[', ']'])
        || !clean(input.host, &[':', '@', '/', '?', '#', '[', ']'])
        || !clean(input.path, &['?', '#'])
        || !clean(input.query, &['#'])
    {
        return;
    }
    assert_eq!(Uri::parse(&u.to_string()), Ok(u));
});
