//! Destructure DID URLs into their components.
//!
//! A DID URL is of the form
//!
//! `did:<method>[:<namespace>]:<unique-id>[/<path>][?<query>][#<fragment>]`.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::did::{normalize_did, split_did, Did};
use crate::error::Error;

static DID_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^([^/?#]*)?([^?#]*)(\\?([^#]*))?(#([^#]+$))?$").expect("should compile")
});
static PATH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^(/([a-zA-Z0-9\\-._~!$&'()*+,;=:@]|%[0-9a-fA-F]{2})*)*$").expect("should compile")
});
static QUERY_FRAGMENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^(([a-zA-Z0-9\\-._~!$&'()*+,;=:@/?]|%[0-9a-fA-F]{2})*)?$").expect("should compile")
});

/// Whether a DID URL component must be present, must be absent, or may be
/// either.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Part {
    /// The component must be empty.
    Empty,

    /// The component must be non-empty.
    Required,

    /// The component may be empty or not.
    Optional,
}

impl Part {
    fn check(self, name: &str, value: &str, url: &str) -> crate::Result<()> {
        match self {
            Self::Empty if !value.is_empty() => {
                Err(Error::MalformedDidUrl(format!("{url}: {name} must be empty")))
            }
            Self::Required if value.is_empty() => {
                Err(Error::MalformedDidUrl(format!("{url}: {name} is required")))
            }
            _ => Ok(()),
        }
    }
}

/// A DID URL split into its components.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DidUrl {
    /// The DID the URL is relative to.
    pub did: String,

    /// Path, including the leading `/`. Empty if absent.
    pub path: String,

    /// Query, without the leading `?`. Empty if absent.
    pub query: String,

    /// Fragment, without the leading `#`. Empty if absent.
    ///
    /// For URLs referencing a verification method or service, the fragment
    /// identifies the resource within the DID document.
    pub fragment: String,
}

impl DidUrl {
    /// Validate the DID and each of the URL components. `path` and `query` are
    /// checked for presence as well as syntax, `fragment` likewise.
    ///
    /// # Errors
    ///
    /// Returns an error if the DID is invalid for `method` and `namespaces`,
    /// or if a component is malformed or its presence does not match.
    pub fn validate(
        &self, method: &str, namespaces: &[String], path: Part, query: Part, fragment: Part,
    ) -> crate::Result<()> {
        let url = self.to_string();

        Did::from_str(&self.did)?.validate(method, namespaces)?;

        path.check("path", &self.path, &url)?;
        if !PATH_REGEX.is_match(&self.path) {
            return Err(Error::MalformedDidUrl(format!("{url}: path is not valid")));
        }
        query.check("query", &self.query, &url)?;
        if !QUERY_FRAGMENT_REGEX.is_match(&self.query) {
            return Err(Error::MalformedDidUrl(format!("{url}: query is not valid")));
        }
        fragment.check("fragment", &self.fragment, &url)?;
        if !QUERY_FRAGMENT_REGEX.is_match(&self.fragment) {
            return Err(Error::MalformedDidUrl(format!("{url}: fragment is not valid")));
        }

        Ok(())
    }

    /// Lower-case the DID's unique id when it is a UUID.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        self.did = normalize_did(&self.did);
        self
    }
}

impl FromStr for DidUrl {
    type Err = Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        let (did, path, query, fragment) = split_did_url(s)?;
        Ok(Self {
            did,
            path,
            query,
            fragment,
        })
    }
}

impl Display for DidUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&join_did_url(&self.did, &self.path, &self.query, &self.fragment))
    }
}

/// Split a DID URL into `(did, path, query, fragment)`.
///
/// # Errors
///
/// Returns [`Error::MalformedDidUrl`] if the string does not have the shape of
/// a URL, and [`Error::MalformedDid`] if the DID portion is malformed.
pub fn split_did_url(url: &str) -> crate::Result<(String, String, String, String)> {
    let Some(caps) = DID_URL_REGEX.captures(url) else {
        return Err(Error::MalformedDidUrl(format!("{url}: unable to split did url")));
    };
    let part = |i: usize| caps.get(i).map_or_else(String::new, |m| m.as_str().to_string());

    let did = part(1);
    split_did(&did)?;

    Ok((did, part(2), part(4), part(6)))
}

/// Join DID URL components. `query` and `fragment` are only appended, with
/// their delimiters, when non-empty.
#[must_use]
pub fn join_did_url(did: &str, path: &str, query: &str, fragment: &str) -> String {
    let mut url = format!("{did}{path}");
    if !query.is_empty() {
        url.push('?');
        url.push_str(query);
    }
    if !fragment.is_empty() {
        url.push('#');
        url.push_str(fragment);
    }
    url
}

/// Parse and validate a DID URL.
///
/// # Errors
///
/// See [`DidUrl::validate`].
pub fn validate_did_url(
    url: &str, method: &str, namespaces: &[String], path: Part, query: Part, fragment: Part,
) -> crate::Result<()> {
    DidUrl::from_str(url)?.validate(method, namespaces, path, query, fragment)
}

/// Normalize the DID portion of a DID URL. Strings that do not parse are
/// returned unchanged.
#[must_use]
pub fn normalize_did_url(url: &str) -> String {
    DidUrl::from_str(url).map_or_else(|_| url.to_string(), |u| u.normalize().to_string())
}
