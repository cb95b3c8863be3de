//! Component parser for the generic URI syntax.

use crate::{
    component::{is_valid_scheme, Components},
    error::{ParseError, ParseErrorKind},
};
use alloc::string::{String, ToString};

type Result<T> = core::result::Result<T, ParseError>;

/// Returns immediately with an error.
macro_rules! err {
    ($index:expr, $kind:ident) => {
        return Err(ParseError::new($index, ParseErrorKind::$kind))
    };
}

/// Splits a URI string into its components.
///
/// The input is read as
/// `[scheme ":"] ["//" authority] path ["?" query] ["#" fragment]`
/// with `authority = [userinfo "@"] host [":" port]`. A scheme is recognized
/// whenever a `':'` occurs before any `'/'`, `'?'`, or `'#'`.
///
/// No percent-decoding takes place, and the port is not range-checked:
/// that happens when the components are committed to a [`Uri`].
///
/// [`Uri`]: crate::Uri
///
/// # Errors
///
/// Returns `Err` if the scheme is malformed, the port is not numeric,
/// or a bracket in the authority is unbalanced.
///
/// # Examples
///
/// ```
/// use tidy_uri::parse::parse;
///
/// let c = parse("ldap://[2001:db8::7]/c=GB?objectClass?one")?;
/// assert_eq!(c.scheme.as_deref(), Some("ldap"));
/// assert_eq!(c.host.as_deref(), Some("[2001:db8::7]"));
/// assert_eq!(c.path, "/c=GB");
/// assert_eq!(c.query.as_deref(), Some("objectClass?one"));
///
/// let c = parse("mailto:John.Doe@example.com")?;
/// assert_eq!(c.host, None);
/// assert_eq!(c.path, "John.Doe@example.com");
/// # Ok::<_, tidy_uri::error::ParseError>(())
/// ```
pub fn parse(s: &str) -> Result<Components> {
    parse_located(s).map(|(out, _)| out)
}

/// Like [`parse`], but also returns the index of the port, if any.
pub(crate) fn parse_located(s: &str) -> Result<(Components, Option<usize>)> {
    Parser { s, pos: 0 }.parse().inspect_err(|e| {
        tracing::debug!(index = e.index(), kind = ?e.kind(), "failed to parse URI");
    })
}

struct Parser<'a> {
    s: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.s[self.pos..]
    }

    /// Reads up to (not including) the first byte in `delims`, or to the end.
    fn read_until(&mut self, delims: &[u8]) -> &'a str {
        let rest = self.rest();
        let len = rest
            .bytes()
            .position(|x| delims.contains(&x))
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn parse(mut self) -> Result<(Components, Option<usize>)> {
        let mut out = Components::default();
        let mut port_index = None;

        self.parse_scheme(&mut out)?;

        if let Some(rem) = self.rest().strip_prefix("//") {
            let start = self.pos + 2;
            let len = rem.find(['/', '?', '#']).unwrap_or(rem.len());
            self.pos = start + len;
            port_index = parse_authority(&self.s[start..self.pos], start, &mut out)?;
        }

        out.path = self.read_until(b"?#").to_string();

        if self.rest().starts_with('?') {
            self.pos += 1;
            out.query = Some(self.read_until(b"#").to_string());
        }

        if self.rest().starts_with('#') {
            self.pos += 1;
            out.fragment = Some(self.rest().to_string());
        }

        Ok((out, port_index))
    }

    fn parse_scheme(&mut self, out: &mut Components) -> Result<()> {
        let Some(i) = self.s.find([':', '/', '?', '#']) else {
            return Ok(());
        };
        if self.s.as_bytes()[i] != b':' {
            // A relative reference.
            return Ok(());
        }

        let scheme = &self.s[..i];
        if !is_valid_scheme(scheme.as_bytes()) {
            err!(0, InvalidScheme);
        }
        out.scheme = Some(scheme.to_string());
        self.pos = i + 1;
        Ok(())
    }
}

/// Parses the authority `auth` starting at index `offset` of the input,
/// returning the index of the port.
fn parse_authority(auth: &str, offset: usize, out: &mut Components) -> Result<Option<usize>> {
    let (userinfo, hostport, host_offset) = match auth.rfind('@') {
        Some(i) => (Some(&auth[..i]), &auth[i + 1..], offset + i + 1),
        None => (None, auth, offset),
    };

    let (host, port) = split_port(hostport, host_offset)?;

    if host.is_empty() {
        // Userinfo and port cannot be written back without a host.
        return Ok(None);
    }
    out.host = Some(host.to_string());
    out.port = port.map(|(port, _)| port);

    if let Some(userinfo) = userinfo {
        let (user, password) = match userinfo.split_once(':') {
            Some((user, password)) => (user, Some(password)),
            None => (userinfo, None),
        };
        if !user.is_empty() {
            out.user = Some(user.to_string());
            out.password = password.filter(|s| !s.is_empty()).map(String::from);
        }
    }
    Ok(port.map(|(_, index)| index))
}

/// Splits `host[":" port]`, honoring the brackets of an IP literal.
fn split_port(s: &str, offset: usize) -> Result<(&str, Option<(u32, usize)>)> {
    let (host, port) = if let Some(inner) = s.strip_prefix('[') {
        let Some(close) = inner.find(']') else {
            err!(offset, UnbalancedBracket);
        };
        if let Some(i) = inner[..close].find('[') {
            err!(offset + 1 + i, UnbalancedBracket);
        }
        let host_end = close + 2;
        match s.as_bytes().get(host_end) {
            None => (s, None),
            Some(b':') => (&s[..host_end], Some((&s[host_end + 1..], offset + host_end + 1))),
            Some(_) => err!(offset + host_end, UnexpectedChar),
        }
    } else {
        if let Some(i) = s.find(['[', ']']) {
            err!(offset + i, UnbalancedBracket);
        }
        match s.rfind(':') {
            Some(i) => {
                if let Some(j) = s[..i].find(':') {
                    err!(offset + j, UnexpectedChar);
                }
                (&s[..i], Some((&s[i + 1..], offset + i + 1)))
            }
            None => (s, None),
        }
    };

    let port = match port {
        Some((digits, start)) => parse_port(digits, start)?.map(|port| (port, start)),
        None => None,
    };
    Ok((host, port))
}

/// Parses the digits of a port, treating an empty port as absent.
fn parse_port(digits: &str, start: usize) -> Result<Option<u32>> {
    if digits.is_empty() {
        return Ok(None);
    }
    let mut port: u32 = 0;
    for (i, x) in digits.bytes().enumerate() {
        if !x.is_ascii_digit() {
            err!(start + i, InvalidPort);
        }
        port = port.saturating_mul(10).saturating_add(u32::from(x - b'0'));
    }
    Ok(Some(port))
}
