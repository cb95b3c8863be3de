//! URI components.

use alloc::{
    borrow::Cow,
    format,
    string::{String, ToString},
};
use core::fmt::{self, Write};
use ref_cast::{ref_cast_custom, RefCastCustom};

/// A [scheme] component.
///
/// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
///
/// # Comparison
///
/// `Scheme`s are compared case-insensitively. You should do a case-insensitive
/// comparison if the scheme specification allows both letter cases in the scheme name.
///
/// # Examples
///
/// ```
/// use tidy_uri::{component::Scheme, Uri};
///
/// const SCHEME_HTTP: &Scheme = Scheme::new_or_panic("http");
///
/// let uri = Uri::parse("HTTP://EXAMPLE.COM/")?;
/// let scheme = Scheme::new(uri.scheme()).unwrap();
///
/// // Case-insensitive comparison.
/// assert_eq!(scheme, SCHEME_HTTP);
/// // Case-sensitive comparison.
/// assert_eq!(scheme.as_str(), "HTTP");
/// # Ok::<_, tidy_uri::error::ParseError>(())
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct Scheme {
    inner: str,
}

impl Scheme {
    #[ref_cast_custom]
    #[inline]
    pub(crate) const fn new_validated(scheme: &str) -> &Scheme;

    /// Converts a string slice to `&Scheme`.
    ///
    /// # Panics
    ///
    /// Panics if the string is not a valid scheme name according to
    /// [Section 3.1 of RFC 3986][scheme]. For a non-panicking variant,
    /// use [`new`](Self::new).
    ///
    /// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
    #[inline]
    #[must_use]
    pub const fn new_or_panic(s: &str) -> &Scheme {
        match Self::new(s) {
            Some(scheme) => scheme,
            None => panic!("invalid scheme"),
        }
    }

    /// Converts a string slice to `&Scheme`, returning `None` if the conversion fails.
    #[inline]
    #[must_use]
    pub const fn new(s: &str) -> Option<&Scheme> {
        if is_valid_scheme(s.as_bytes()) {
            Some(Scheme::new_validated(s))
        } else {
            None
        }
    }

    /// Returns the scheme component as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the default port of the scheme, if known.
    ///
    /// Only `http` (80) and `https` (443) are recognized. Use
    /// [`Normalizer::default_port_with`] to supply a wider table.
    ///
    /// [`Normalizer::default_port_with`]: crate::normalize::Normalizer::default_port_with
    ///
    /// # Examples
    ///
    /// ```
    /// use tidy_uri::component::Scheme;
    ///
    /// assert_eq!(Scheme::new_or_panic("HTTPS").default_port(), Some(443));
    /// assert_eq!(Scheme::new_or_panic("ftp").default_port(), None);
    /// ```
    #[must_use]
    pub fn default_port(&self) -> Option<u16> {
        const SCHEME_HTTP: &Scheme = Scheme::new_or_panic("http");
        const SCHEME_HTTPS: &Scheme = Scheme::new_or_panic("https");

        if self == SCHEME_HTTP {
            Some(80)
        } else if self == SCHEME_HTTPS {
            Some(443)
        } else {
            None
        }
    }
}

impl PartialEq for Scheme {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.inner.eq_ignore_ascii_case(&other.inner)
    }
}

impl Eq for Scheme {}

impl fmt::Debug for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

// scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
pub(crate) const fn is_valid_scheme(s: &[u8]) -> bool {
    let [first, rem @ ..] = s else {
        return false;
    };
    if !first.is_ascii_alphabetic() {
        return false;
    }
    let mut i = 0;
    while i < rem.len() {
        let x = rem[i];
        if !(x.is_ascii_alphanumeric() || matches!(x, b'+' | b'-' | b'.')) {
            return false;
        }
        i += 1;
    }
    true
}

/// A named field of a URI, used for enumerated access to [`Uri`] and [`UriBuilder`].
///
/// The first eight variants are the primitive components; [`UserInfo`](Self::UserInfo),
/// [`HostInfo`](Self::HostInfo), and [`Authority`](Self::Authority) are composites
/// derived from them.
///
/// [`Uri`]: crate::Uri
/// [`UriBuilder`]: crate::build::UriBuilder
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Field {
    /// The scheme component.
    Scheme,
    /// The user name within the userinfo subcomponent.
    User,
    /// The password within the userinfo subcomponent.
    Password,
    /// The host subcomponent.
    Host,
    /// The port subcomponent.
    Port,
    /// The path component.
    Path,
    /// The query component.
    Query,
    /// The fragment component.
    Fragment,
    /// `user[":" password]`.
    UserInfo,
    /// `host[":" port]`.
    HostInfo,
    /// `[userinfo "@"] hostinfo`.
    Authority,
}

impl Field {
    /// All primitive fields, in serialization order.
    pub const PRIMITIVES: [Field; 8] = [
        Field::Scheme,
        Field::User,
        Field::Password,
        Field::Host,
        Field::Port,
        Field::Path,
        Field::Query,
        Field::Fragment,
    ];

    /// Checks whether the field is derived from other fields.
    #[must_use]
    pub const fn is_composite(self) -> bool {
        matches!(self, Field::UserInfo | Field::HostInfo | Field::Authority)
    }

    /// Returns the lowercase name of the field.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Field::Scheme => "scheme",
            Field::User => "user",
            Field::Password => "password",
            Field::Host => "host",
            Field::Port => "port",
            Field::Path => "path",
            Field::Query => "query",
            Field::Fragment => "fragment",
            Field::UserInfo => "userinfo",
            Field::HostInfo => "hostinfo",
            Field::Authority => "authority",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The plain component record of a URI.
///
/// This is what the [parser](crate::parse::parse) produces and what a
/// [`UriBuilder`] edits. Nothing is validated here: the port may be out of
/// range and optional fields may hold empty strings until the record is
/// committed with [`Uri::from_components`].
///
/// [`Uri::from_components`]: crate::Uri::from_components
/// [`UriBuilder`]: crate::build::UriBuilder
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Components {
    /// The scheme, without the trailing `':'`.
    pub scheme: Option<String>,
    /// The user name.
    pub user: Option<String>,
    /// The password.
    pub password: Option<String>,
    /// The host, including the brackets of an IP literal.
    pub host: Option<String>,
    /// The port. Ports too large for `u32` saturate to [`u32::MAX`].
    pub port: Option<u32>,
    /// The path, possibly empty.
    pub path: String,
    /// The raw query, without the leading `'?'`.
    pub query: Option<String>,
    /// The fragment, without the leading `'#'`.
    pub fragment: Option<String>,
}

fn or_empty(s: &Option<String>) -> &str {
    s.as_deref().unwrap_or("")
}

fn first_segment_has_colon(path: &str) -> bool {
    let first = match path.find('/') {
        Some(i) => &path[..i],
        None => path,
    };
    first.contains(':')
}

impl Components {
    /// Replaces every empty optional string with `None`, and drops a
    /// password that has no user.
    pub(crate) fn prune_empty(&mut self) {
        for field in [
            &mut self.scheme,
            &mut self.user,
            &mut self.password,
            &mut self.host,
            &mut self.query,
            &mut self.fragment,
        ] {
            if field.as_deref() == Some("") {
                *field = None;
            }
        }
        if self.user.is_none() {
            self.password = None;
        }
    }

    /// Brings the record into the shape a [`Uri`](crate::Uri) stores:
    /// empty strings pruned, and a path that reads back unchanged.
    ///
    /// A non-empty path next to a host is rooted with `'/'`. Without a scheme
    /// or a host, a path whose first segment contains `':'` gets a leading
    /// `"./"` so that it is not taken for a scheme.
    pub(crate) fn canonicalize(&mut self) {
        self.prune_empty();
        if self.has_host() {
            if !self.path.is_empty() && !self.path.starts_with('/') {
                self.path.insert(0, '/');
            }
        } else if self.scheme.is_none() && first_segment_has_colon(&self.path) {
            self.path.insert_str(0, "./");
        }
    }

    pub(crate) fn has_user(&self) -> bool {
        !or_empty(&self.user).is_empty()
    }

    pub(crate) fn has_host(&self) -> bool {
        !or_empty(&self.host).is_empty()
    }

    pub(crate) fn userinfo(&self) -> Cow<'_, str> {
        if !self.has_user() {
            return Cow::Borrowed("");
        }
        match self.password.as_deref() {
            Some(pass) if !pass.is_empty() => Cow::Owned([or_empty(&self.user), pass].join(":")),
            _ => Cow::Borrowed(or_empty(&self.user)),
        }
    }

    pub(crate) fn hostinfo(&self) -> Cow<'_, str> {
        let host = or_empty(&self.host);
        match self.port {
            Some(port) => Cow::Owned(format!("{host}:{port}")),
            None => Cow::Borrowed(host),
        }
    }

    pub(crate) fn authority(&self) -> Cow<'_, str> {
        if !self.has_host() {
            return Cow::Borrowed("");
        }
        let hostinfo = self.hostinfo();
        if !self.has_user() {
            return hostinfo;
        }
        let userinfo = self.userinfo();
        let mut buf = String::with_capacity(userinfo.len() + 1 + hostinfo.len());
        buf.push_str(&userinfo);
        buf.push('@');
        buf.push_str(&hostinfo);
        Cow::Owned(buf)
    }

    pub(crate) fn get(&self, field: Field) -> Cow<'_, str> {
        match field {
            Field::Scheme => Cow::Borrowed(or_empty(&self.scheme)),
            Field::User => Cow::Borrowed(or_empty(&self.user)),
            Field::Password => Cow::Borrowed(or_empty(&self.password)),
            Field::Host => Cow::Borrowed(or_empty(&self.host)),
            Field::Port => match self.port {
                Some(port) => Cow::Owned(port.to_string()),
                None => Cow::Borrowed(""),
            },
            Field::Path => Cow::Borrowed(&self.path),
            Field::Query => Cow::Borrowed(or_empty(&self.query)),
            Field::Fragment => Cow::Borrowed(or_empty(&self.fragment)),
            Field::UserInfo => self.userinfo(),
            Field::HostInfo => self.hostinfo(),
            Field::Authority => self.authority(),
        }
    }

    pub(crate) fn has(&self, field: Field) -> bool {
        match field {
            Field::Port => self.port.is_some(),
            _ => !self.get(field).is_empty(),
        }
    }

    /// Writes the canonical serialization of the record.
    ///
    /// A scheme that is not valid is left out.
    pub(crate) fn write_to(&self, f: &mut impl Write) -> fmt::Result {
        let scheme = self
            .scheme
            .as_deref()
            .filter(|s| is_valid_scheme(s.as_bytes()));
        if let Some(scheme) = scheme {
            f.write_str(scheme)?;
            f.write_char(':')?;
        }

        let authority = self.authority();
        if !authority.is_empty() {
            f.write_str("//")?;
            f.write_str(&authority)?;
            if !self.path.is_empty() && !self.path.starts_with('/') {
                f.write_char('/')?;
            }
        } else if self.path.starts_with("//") {
            // Keep the path from being read back as an authority.
            f.write_str("//")?;
        } else if scheme.is_none() && first_segment_has_colon(&self.path) {
            // Keep the first segment from being read back as a scheme.
            f.write_str("./")?;
        }

        f.write_str(&self.path)?;

        if let Some(query) = self.query.as_deref().filter(|s| !s.is_empty()) {
            f.write_char('?')?;
            f.write_str(query)?;
        }
        if let Some(fragment) = self.fragment.as_deref().filter(|s| !s.is_empty()) {
            f.write_char('#')?;
            f.write_str(fragment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_validation() {
        assert!(Scheme::new("http").is_some());
        assert!(Scheme::new("svn+ssh").is_some());
        assert!(Scheme::new("a.b-c").is_some());
        assert!(Scheme::new("").is_none());
        assert!(Scheme::new("1http").is_none());
        assert!(Scheme::new("ht tp").is_none());
        assert!(Scheme::new("+x").is_none());
    }

    #[test]
    fn composites_follow_primitives() {
        let mut c = Components {
            host: Some("example.org".into()),
            ..Components::default()
        };
        assert_eq!(c.authority(), "example.org");

        c.port = Some(8080);
        c.user = Some("user".into());
        assert_eq!(c.userinfo(), "user");
        assert_eq!(c.hostinfo(), "example.org:8080");
        assert_eq!(c.authority(), "user@example.org:8080");

        c.password = Some("pass".into());
        assert_eq!(c.authority(), "user:pass@example.org:8080");

        // A password alone does not form a userinfo.
        c.user = None;
        assert_eq!(c.userinfo(), "");
        assert_eq!(c.authority(), "example.org:8080");

        c.host = None;
        assert_eq!(c.authority(), "");
    }

    #[test]
    fn prune_empty() {
        let mut c = Components {
            scheme: Some(String::new()),
            query: Some(String::new()),
            fragment: Some("top".into()),
            ..Components::default()
        };
        c.prune_empty();
        assert_eq!(c.scheme, None);
        assert_eq!(c.query, None);
        assert_eq!(c.fragment.as_deref(), Some("top"));
    }

    fn written(c: &Components) -> String {
        let mut buf = String::new();
        c.write_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn path_shape() {
        let mut c = Components {
            host: Some("a".into()),
            path: "y".into(),
            ..Components::default()
        };
        assert_eq!(written(&c), "//a/y");
        c.canonicalize();
        assert_eq!(c.path, "/y");

        let mut c = Components {
            path: "a:b/c".into(),
            ..Components::default()
        };
        assert_eq!(written(&c), "./a:b/c");
        c.canonicalize();
        assert_eq!(c.path, "./a:b/c");
        assert_eq!(written(&c), "./a:b/c");

        // A colon past the first segment is harmless.
        let c = Components {
            path: "a/b:c".into(),
            ..Components::default()
        };
        assert_eq!(written(&c), "a/b:c");

        let c = Components {
            scheme: Some("1x".into()),
            host: Some("a".into()),
            ..Components::default()
        };
        assert_eq!(written(&c), "//a");
    }
}
