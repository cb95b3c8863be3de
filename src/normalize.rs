//! Module for normalization.
//!
//! Normalization is a fixed sequence of [`Step`]s, each a pure function from
//! one [`Uri`] to another. The steps that preserve semantics always run; the
//! steps that may change the identified resource run only when enabled in
//! [`NormalizeOptions`].
//!
//! # Examples
//!
//! ```
//! use tidy_uri::{normalize::{normalize, NormalizeOptions}, Uri};
//!
//! let uri = Uri::parse("HTTP://Example.com:80/display?lang=en&article=fred#top")?;
//!
//! let options = NormalizeOptions {
//!     force_https: true,
//!     remove_fragment: true,
//!     sort_query: true,
//!     ..NormalizeOptions::default()
//! };
//! assert_eq!(
//!     normalize(&uri, &options).to_string(),
//!     "https://example.com/display?article=fred&lang=en"
//! );
//! # Ok::<_, tidy_uri::error::ParseError>(())
//! ```

use crate::{component::Scheme, query, Uri};
use alloc::{string::String, vec::Vec};
use core::fmt;

/// Flags enabling the semantics-changing normalization steps.
///
/// All flags default to `false`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct NormalizeOptions {
    /// Rewrites the `http` scheme to `https`.
    pub force_https: bool,
    /// Replaces an IP host with a domain name.
    ///
    /// Needs a hook set with [`Normalizer::resolve_host_ip_with`].
    pub resolve_host_ip: bool,
    /// Adds or removes `www.` as the first host label.
    ///
    /// Needs a hook set with [`Normalizer::www_prefix_with`].
    pub www_prefix: bool,
    /// Removes the fragment.
    pub remove_fragment: bool,
    /// Removes directory index file names such as `index.html` from the path.
    ///
    /// Needs a hook set with [`Normalizer::remove_directory_index_with`].
    pub remove_directory_index: bool,
    /// Sorts the query parameters by key.
    pub sort_query: bool,
    /// Appends `/` to a non-empty path that does not end in one.
    pub trailing_slash: bool,
}

/// A single normalization step.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Step {
    /// Converts the scheme to lowercase.
    LowercaseScheme,
    /// Converts the host to lowercase.
    LowercaseHost,
    /// Removes a port equal to the default port of the scheme.
    RemoveDefaultPort,
    /// Removes the dot-segments `.` and `..` from the path.
    RemoveDotSegments,
    /// Uppercases the hexadecimal digits of percent-encoded octets in the path.
    UppercasePercentEncoding,
    /// Decodes percent-encoded unreserved characters in the path.
    DecodeUnreserved,
    /// Replaces an empty path with `/`.
    AddRootSlash,
    /// Collapses repeated slashes in the path.
    CollapseSlashes,
    /// Rewrites `http` to `https`.
    ForceHttps,
    /// Replaces an IP host with a domain name through a hook.
    ResolveHostIp,
    /// Applies a `www.` prefix policy through a hook.
    WwwPrefix,
    /// Removes the fragment.
    RemoveFragment,
    /// Removes directory index file names through a hook.
    RemoveDirectoryIndex,
    /// Sorts the query parameters by key.
    SortQuery,
    /// Appends `/` to a non-empty path.
    AddTrailingSlash,
}

impl Step {
    /// The semantics-preserving steps, in pipeline order.
    pub const PRESERVING: [Step; 8] = [
        Step::LowercaseScheme,
        Step::LowercaseHost,
        Step::RemoveDefaultPort,
        Step::RemoveDotSegments,
        Step::UppercasePercentEncoding,
        Step::DecodeUnreserved,
        Step::AddRootSlash,
        Step::CollapseSlashes,
    ];

    /// The semantics-changing steps, in pipeline order.
    pub const CHANGING: [Step; 7] = [
        Step::ForceHttps,
        Step::ResolveHostIp,
        Step::WwwPrefix,
        Step::RemoveFragment,
        Step::RemoveDirectoryIndex,
        Step::SortQuery,
        Step::AddTrailingSlash,
    ];

    /// Checks whether the step is guaranteed not to change the identified resource.
    #[must_use]
    pub const fn preserves_semantics(self) -> bool {
        !matches!(
            self,
            Step::ForceHttps
                | Step::ResolveHostIp
                | Step::WwwPrefix
                | Step::RemoveFragment
                | Step::RemoveDirectoryIndex
                | Step::SortQuery
                | Step::AddTrailingSlash
        )
    }

    /// Checks whether the step runs under the given options.
    ///
    /// Semantics-preserving steps always run.
    #[must_use]
    pub fn is_enabled(self, options: &NormalizeOptions) -> bool {
        match self {
            Step::ForceHttps => options.force_https,
            Step::ResolveHostIp => options.resolve_host_ip,
            Step::WwwPrefix => options.www_prefix,
            Step::RemoveFragment => options.remove_fragment,
            Step::RemoveDirectoryIndex => options.remove_directory_index,
            Step::SortQuery => options.sort_query,
            Step::AddTrailingSlash => options.trailing_slash,
            _ => true,
        }
    }

    /// Applies the step alone with the default [`Normalizer`] configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use tidy_uri::{normalize::Step, Uri};
    ///
    /// let uri = Uri::parse("http://example.com/foo//bar.html")?;
    /// assert_eq!(Step::CollapseSlashes.apply(&uri).path(), "/foo/bar.html");
    /// # Ok::<_, tidy_uri::error::ParseError>(())
    /// ```
    #[must_use]
    pub fn apply(self, uri: &Uri) -> Uri {
        Normalizer::new().apply(self, uri)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::LowercaseScheme => "lowercase scheme",
            Step::LowercaseHost => "lowercase host",
            Step::RemoveDefaultPort => "remove default port",
            Step::RemoveDotSegments => "remove dot-segments",
            Step::UppercasePercentEncoding => "uppercase percent-encoding",
            Step::DecodeUnreserved => "decode unreserved characters",
            Step::AddRootSlash => "add root slash",
            Step::CollapseSlashes => "collapse slashes",
            Step::ForceHttps => "force https",
            Step::ResolveHostIp => "resolve host IP",
            Step::WwwPrefix => "www prefix",
            Step::RemoveFragment => "remove fragment",
            Step::RemoveDirectoryIndex => "remove directory index",
            Step::SortQuery => "sort query",
            Step::AddTrailingSlash => "add trailing slash",
        };
        f.write_str(name)
    }
}

/// A caller-supplied transformation used by an extension-point step.
pub type Hook = fn(&Uri) -> Uri;

/// A configurable URI normalizer.
///
/// # Examples
///
/// ```
/// use tidy_uri::{component::Scheme, normalize::Normalizer, Uri};
///
/// const SCHEME_FOO: &Scheme = Scheme::new_or_panic("foo");
///
/// let normalizer = Normalizer::new()
///     .remove_fragment(true)
///     .default_port_with(|scheme| {
///         if scheme == SCHEME_FOO {
///             Some(4673)
///         } else {
///             scheme.default_port()
///         }
///     });
/// let uri = Uri::parse("foo://localhost:4673/a/../b#c")?;
///
/// assert_eq!(normalizer.normalize(&uri).to_string(), "foo://localhost/b");
/// # Ok::<_, tidy_uri::error::ParseError>(())
/// ```
#[derive(Clone, Copy)]
#[allow(missing_debug_implementations)]
#[must_use]
pub struct Normalizer {
    options: NormalizeOptions,
    default_port_f: fn(&Scheme) -> Option<u16>,
    host_ip_f: Option<Hook>,
    www_prefix_f: Option<Hook>,
    directory_index_f: Option<Hook>,
}

impl Normalizer {
    /// Creates a new `Normalizer` with default configuration.
    pub fn new() -> Self {
        Self::with_options(NormalizeOptions::default())
    }

    /// Creates a new `Normalizer` with the given options.
    pub fn with_options(options: NormalizeOptions) -> Self {
        Self {
            options,
            default_port_f: Scheme::default_port,
            host_ip_f: None,
            www_prefix_f: None,
            directory_index_f: None,
        }
    }

    /// Returns the configured options.
    #[must_use]
    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    /// Sets whether to rewrite `http` to `https`.
    pub fn force_https(mut self, value: bool) -> Self {
        self.options.force_https = value;
        self
    }

    /// Sets whether to run the host IP resolution hook.
    pub fn resolve_host_ip(mut self, value: bool) -> Self {
        self.options.resolve_host_ip = value;
        self
    }

    /// Sets whether to run the `www.` prefix hook.
    pub fn www_prefix(mut self, value: bool) -> Self {
        self.options.www_prefix = value;
        self
    }

    /// Sets whether to remove the fragment.
    pub fn remove_fragment(mut self, value: bool) -> Self {
        self.options.remove_fragment = value;
        self
    }

    /// Sets whether to run the directory index hook.
    pub fn remove_directory_index(mut self, value: bool) -> Self {
        self.options.remove_directory_index = value;
        self
    }

    /// Sets whether to sort the query parameters.
    pub fn sort_query(mut self, value: bool) -> Self {
        self.options.sort_query = value;
        self
    }

    /// Sets whether to append `/` to a non-empty path.
    pub fn trailing_slash(mut self, value: bool) -> Self {
        self.options.trailing_slash = value;
        self
    }

    /// Sets the function with which to get the default port of a scheme.
    ///
    /// This defaults to [`Scheme::default_port`].
    pub fn default_port_with(mut self, f: fn(&Scheme) -> Option<u16>) -> Self {
        self.default_port_f = f;
        self
    }

    /// Sets the hook for [`Step::ResolveHostIp`].
    ///
    /// The hook only runs when [`resolve_host_ip`](Self::resolve_host_ip) is enabled.
    pub fn resolve_host_ip_with(mut self, f: Hook) -> Self {
        self.host_ip_f = Some(f);
        self
    }

    /// Sets the hook for [`Step::WwwPrefix`].
    ///
    /// The hook only runs when [`www_prefix`](Self::www_prefix) is enabled.
    pub fn www_prefix_with(mut self, f: Hook) -> Self {
        self.www_prefix_f = Some(f);
        self
    }

    /// Sets the hook for [`Step::RemoveDirectoryIndex`].
    ///
    /// The hook only runs when [`remove_directory_index`](Self::remove_directory_index)
    /// is enabled.
    pub fn remove_directory_index_with(mut self, f: Hook) -> Self {
        self.directory_index_f = Some(f);
        self
    }

    /// Returns the steps to run, in order.
    #[must_use]
    pub fn pipeline(&self) -> Vec<Step> {
        Step::PRESERVING
            .into_iter()
            .chain(Step::CHANGING)
            .filter(|step| step.is_enabled(&self.options))
            .collect()
    }

    /// Normalizes the given URI by running every step of the [pipeline](Self::pipeline).
    #[must_use]
    pub fn normalize(&self, uri: &Uri) -> Uri {
        self.pipeline().into_iter().fold(uri.clone(), |uri, step| {
            tracing::trace!(%step, "applying normalization step");
            self.apply(step, &uri)
        })
    }

    /// Applies a single step regardless of the options.
    #[must_use]
    pub fn apply(&self, step: Step, uri: &Uri) -> Uri {
        match step {
            Step::LowercaseScheme => uri.map(|c| {
                if let Some(scheme) = &mut c.scheme {
                    scheme.make_ascii_lowercase();
                }
            }),
            Step::LowercaseHost => uri.map(|c| {
                if let Some(host) = &mut c.host {
                    host.make_ascii_lowercase();
                }
            }),
            Step::RemoveDefaultPort => {
                let is_default = match (Scheme::new(uri.scheme()), uri.port()) {
                    (Some(scheme), Some(port)) => (self.default_port_f)(scheme) == Some(port),
                    _ => false,
                };
                uri.map(|c| {
                    if is_default {
                        c.port = None;
                    }
                })
            }
            Step::RemoveDotSegments => uri.with_path(&remove_dot_segments(uri.path())),
            Step::UppercasePercentEncoding => {
                uri.with_path(&uppercase_percent_encoding(uri.path()))
            }
            Step::DecodeUnreserved => uri.with_path(&decode_unreserved(uri.path())),
            Step::AddRootSlash => uri.map(|c| {
                if c.path.is_empty() {
                    c.path.push('/');
                }
            }),
            Step::CollapseSlashes => uri.with_path(&collapse_slashes(uri.path())),
            Step::ForceHttps => self.force_https_once(uri),
            Step::ResolveHostIp => run_hook(step, self.host_ip_f, uri),
            Step::WwwPrefix => run_hook(step, self.www_prefix_f, uri),
            Step::RemoveFragment => uri.with_fragment(""),
            Step::RemoveDirectoryIndex => run_hook(step, self.directory_index_f, uri),
            Step::SortQuery => {
                let mut data = uri.query_data();
                data.sort();
                uri.with_query(&query::encode(&data))
            }
            Step::AddTrailingSlash => uri.map(|c| {
                if !c.path.is_empty() && !c.path.ends_with('/') {
                    c.path.push('/');
                }
            }),
        }
    }

    fn force_https_once(&self, uri: &Uri) -> Uri {
        const SCHEME_HTTP: &Scheme = Scheme::new_or_panic("http");
        const SCHEME_HTTPS: &Scheme = Scheme::new_or_panic("https");

        if Scheme::new(uri.scheme()) != Some(SCHEME_HTTP) {
            return uri.clone();
        }
        // A port that is the default for https would otherwise only be
        // removed by the next run.
        let drop_port = uri.port().is_some() && uri.port() == (self.default_port_f)(SCHEME_HTTPS);
        uri.map(|c| {
            c.scheme = Some(SCHEME_HTTPS.as_str().into());
            if drop_port {
                c.port = None;
            }
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn run_hook(step: Step, hook: Option<Hook>, uri: &Uri) -> Uri {
    match hook {
        Some(f) => f(uri),
        None => {
            tracing::trace!(%step, "no hook set, skipping normalization step");
            uri.clone()
        }
    }
}

/// Normalizes a URI with the given options.
///
/// The semantics-preserving steps run unconditionally, in the order of
/// [`Step::PRESERVING`]. Then every step of [`Step::CHANGING`] runs if it is
/// enabled in `options`.
///
/// Extension-point steps are no-ops here; use a [`Normalizer`] to supply hooks.
#[must_use]
pub fn normalize(uri: &Uri, options: &NormalizeOptions) -> Uri {
    Normalizer::with_options(*options).normalize(uri)
}

enum SegKind {
    Dot,
    DoubleDot,
    Normal,
}

fn classify_segment(mut seg: &str) -> SegKind {
    if seg.is_empty() {
        return SegKind::Normal;
    }
    if let Some(rem) = seg.strip_prefix('.') {
        seg = rem;
    } else if let Some(rem) = seg.strip_prefix("%2E") {
        seg = rem;
    } else if let Some(rem) = seg.strip_prefix("%2e") {
        seg = rem;
    }
    if seg.is_empty() {
        SegKind::Dot
    } else if seg == "." || seg == "%2E" || seg == "%2e" {
        SegKind::DoubleDot
    } else {
        SegKind::Normal
    }
}

/// Removes dot-segments from a path as described in
/// [Section 5.2.4 of RFC 3986](https://datatracker.ietf.org/doc/html/rfc3986/#section-5.2.4).
///
/// A leading slash is kept, and `..` never climbs above it. A path ending in
/// a dot-segment keeps a trailing slash. Percent-encoded dots count as dots.
///
/// # Examples
///
/// ```
/// use tidy_uri::normalize::remove_dot_segments;
///
/// assert_eq!(remove_dot_segments("/foo/./bar/baz/../qux"), "/foo/bar/qux");
/// assert_eq!(remove_dot_segments("/a/b/c/./../../g"), "/a/g");
/// assert_eq!(remove_dot_segments("mid/content=5/../6"), "mid/6");
/// assert_eq!(remove_dot_segments("/a/b/.."), "/a/");
/// assert_eq!(remove_dot_segments("/../a"), "/a");
/// ```
#[must_use]
pub fn remove_dot_segments(path: &str) -> String {
    let (rooted, rest) = match path.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, path),
    };

    let mut stack: Vec<&str> = Vec::new();
    let mut ends_with_dot = false;
    for seg in rest.split('/') {
        ends_with_dot = true;
        match classify_segment(seg) {
            SegKind::Dot => {}
            SegKind::DoubleDot => {
                stack.pop();
            }
            SegKind::Normal => {
                stack.push(seg);
                ends_with_dot = false;
            }
        }
    }
    if ends_with_dot {
        stack.push("");
    }

    let mut buf = String::with_capacity(path.len());
    if rooted {
        buf.push('/');
    }
    for (i, seg) in stack.into_iter().enumerate() {
        if i != 0 {
            buf.push('/');
        }
        buf.push_str(seg);
    }
    buf
}

/// Rewrites every percent-encoded octet `%XX` of `s` with `f`, copying the rest.
fn map_pct_encoded(s: &str, mut f: impl FnMut(&mut String, u8, u8)) -> String {
    let bytes = s.as_bytes();
    let mut buf = String::with_capacity(s.len());
    let (mut start, mut i) = (0, 0);

    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let (hi, lo) = (bytes[i + 1], bytes[i + 2]);
            if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() {
                buf.push_str(&s[start..i]);
                f(&mut buf, hi, lo);
                i += 3;
                start = i;
                continue;
            }
        }
        i += 1;
    }
    buf.push_str(&s[start..]);
    buf
}

/// Uppercases the hexadecimal digits of every percent-encoded octet.
///
/// # Examples
///
/// ```
/// use tidy_uri::normalize::uppercase_percent_encoding;
///
/// assert_eq!(uppercase_percent_encoding("/a%c2%b1b/"), "/a%C2%B1b/");
/// ```
#[must_use]
pub fn uppercase_percent_encoding(s: &str) -> String {
    map_pct_encoded(s, |buf, hi, lo| {
        buf.push('%');
        buf.push(hi.to_ascii_uppercase() as char);
        buf.push(lo.to_ascii_uppercase() as char);
    })
}

const fn hex_value(x: u8) -> u8 {
    match x {
        b'0'..=b'9' => x - b'0',
        b'a'..=b'f' => x - b'a' + 10,
        _ => x - b'A' + 10,
    }
}

// unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"
const fn is_unreserved(x: u8) -> bool {
    x.is_ascii_alphanumeric() || matches!(x, b'-' | b'.' | b'_' | b'~')
}

/// Decodes every percent-encoded octet that stands for an unreserved character.
///
/// Other octets are left as they are.
///
/// # Examples
///
/// ```
/// use tidy_uri::normalize::decode_unreserved;
///
/// assert_eq!(decode_unreserved("/%7Eusername/%2fx"), "/~username/%2fx");
/// ```
#[must_use]
pub fn decode_unreserved(s: &str) -> String {
    map_pct_encoded(s, |buf, hi, lo| {
        let x = hex_value(hi) << 4 | hex_value(lo);
        if is_unreserved(x) && !(x.is_ascii_hexdigit() && completes_triplet(buf)) {
            buf.push(x as char);
        } else {
            buf.push('%');
            buf.push(hi as char);
            buf.push(lo as char);
        }
    })
}

/// Checks whether a hex digit pushed onto `buf` would form a new
/// percent-encoded octet with what is already there.
fn completes_triplet(buf: &str) -> bool {
    match buf.as_bytes() {
        [.., b'%'] => true,
        [.., b'%', x] => x.is_ascii_hexdigit(),
        _ => false,
    }
}

/// Collapses every run of slashes into a single slash.
///
/// # Examples
///
/// ```
/// use tidy_uri::normalize::collapse_slashes;
///
/// assert_eq!(collapse_slashes("/foo//bar.html///"), "/foo/bar.html/");
/// ```
#[must_use]
pub fn collapse_slashes(path: &str) -> String {
    let mut buf = String::with_capacity(path.len());
    for x in path.chars() {
        if x == '/' && buf.ends_with('/') {
            continue;
        }
        buf.push(x);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_segments() {
        // Examples from Section 5.4 of RFC 3986, after merging.
        let cases = [
            ("/a/b/c/g", "/a/b/c/g"),
            ("/a/b/c/./g", "/a/b/c/g"),
            ("/a/b/c/g/", "/a/b/c/g/"),
            ("/a/b/c/.", "/a/b/c/"),
            ("/a/b/c/./", "/a/b/c/"),
            ("/a/b/c/..", "/a/b/"),
            ("/a/b/c/../", "/a/b/"),
            ("/a/b/c/../g", "/a/b/g"),
            ("/a/b/c/../..", "/a/"),
            ("/a/b/c/../../g", "/a/g"),
            ("/a/b/c/../../../g", "/g"),
            ("/a/b/c/../../../../g", "/g"),
            ("/./g", "/g"),
            ("/../g", "/g"),
            ("/a/b/c/g.", "/a/b/c/g."),
            ("/a/b/c/.g", "/a/b/c/.g"),
            ("/a/b/c/g..", "/a/b/c/g.."),
            ("/a/b/c/..g", "/a/b/c/..g"),
            ("/a/b/c/./../g", "/a/b/g"),
            ("/a/b/c/./g/.", "/a/b/c/g/"),
            ("/a/b/c/g/./h", "/a/b/c/g/h"),
            ("/a/b/c/g/../h", "/a/b/c/h"),
        ];
        for (input, expected) in cases {
            assert_eq!(remove_dot_segments(input), expected, "input: {input}");
        }
    }

    #[test]
    fn dot_segments_edge_cases() {
        assert_eq!(remove_dot_segments(""), "");
        assert_eq!(remove_dot_segments("/"), "/");
        assert_eq!(remove_dot_segments("//x"), "//x");
        assert_eq!(remove_dot_segments("."), "");
        assert_eq!(remove_dot_segments(".."), "");
        assert_eq!(remove_dot_segments("../a"), "a");
        assert_eq!(remove_dot_segments("/a//../b"), "/a/b");
        assert_eq!(remove_dot_segments("/a/%2E/%2e%2E/b"), "/b");
        assert_eq!(remove_dot_segments("/a/.%2E/b"), "/b");
    }

    #[test]
    fn percent_encoding() {
        assert_eq!(uppercase_percent_encoding("%7e%zz%4"), "%7E%zz%4");
        assert_eq!(uppercase_percent_encoding("caf\u{e9}%c3"), "caf\u{e9}%C3");
        assert_eq!(decode_unreserved("%41%5a%61%7A%30%39%2D%2E%5F%7E"), "AZaz09-._~");
        assert_eq!(decode_unreserved("%20%2F%3a%25"), "%20%2F%3a%25");
        assert_eq!(decode_unreserved("%"), "%");
        // No new octets are formed.
        assert_eq!(decode_unreserved("%%34%31"), "%%341");
        assert_eq!(decode_unreserved("%4%31"), "%4%31");
        assert_eq!(decode_unreserved("%%341"), "%%341");
    }

    #[test]
    fn pipeline_order() {
        assert_eq!(Normalizer::new().pipeline(), Step::PRESERVING);

        let pipeline = Normalizer::new().sort_query(true).force_https(true).pipeline();
        assert_eq!(&pipeline[..8], Step::PRESERVING);
        assert_eq!(&pipeline[8..], [Step::ForceHttps, Step::SortQuery]);
    }

    #[test]
    fn step_groups() {
        assert!(Step::PRESERVING.iter().all(|s| s.preserves_semantics()));
        assert!(Step::CHANGING.iter().all(|s| !s.preserves_semantics()));
    }
}
