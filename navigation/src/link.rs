//! Interception filter: which link clicks become soft navigations.

use std::collections::BTreeSet;

use url::Url;

use crate::config::NavigationConfig;

/// The attributes of a clicked `<a>` element that the filter looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Anchor {
    /// Raw `href` attribute, exactly as written.
    pub href: Option<String>,
    /// `target` attribute.
    pub target: Option<String>,
    /// Names of every attribute on the element.
    pub attributes: BTreeSet<String>,
}

impl Anchor {
    /// An anchor with only an `href`.
    pub fn new(href: &str) -> Self {
        Self::from_attributes([("href".to_string(), href.to_string())])
    }

    /// Builds an anchor from `(name, value)` attribute pairs.
    pub fn from_attributes(attrs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut anchor = Self::default();
        for (name, value) in attrs {
            match name.as_str() {
                "href" => anchor.href = Some(value),
                "target" => anchor.target = Some(value),
                _ => {}
            }
            anchor.attributes.insert(name);
        }
        anchor
    }

    /// Sets `target`, builder style.
    #[must_use]
    pub fn with_target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self.attributes.insert("target".to_string());
        self
    }

    /// Adds a valueless attribute, builder style.
    #[must_use]
    pub fn with_attribute(mut self, name: &str) -> Self {
        self.attributes.insert(name.to_string());
        self
    }

    /// True when the element carries `name`.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }
}

/// Why a link was left to native navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// No `href` attribute.
    MissingHref,
    /// `target="_blank"`.
    NewWindow,
    /// `mailto:` link.
    MailTo,
    /// `tel:` link.
    Tel,
    /// Pure in-page fragment (`#...`).
    Fragment,
    /// The `href` does not resolve against the current location.
    Unresolvable,
    /// The link leaves the current host.
    CrossOrigin,
    /// The `href` contains an excluded pattern.
    Excluded(String),
    /// The element carries the opt-out attribute.
    OptOut,
}

/// Decides whether a click on `anchor` should be hijacked, returning the
/// resolved destination when it should.
///
/// # Errors
///
/// Returns the first [`Rejection`] that applies, checked in this order:
/// link shape, host, excluded patterns, opt-out attribute.
pub fn classify(
    anchor: &Anchor,
    location: &Url,
    config: &NavigationConfig,
) -> Result<Url, Rejection> {
    let href = anchor.href.as_deref().ok_or(Rejection::MissingHref)?;
    if anchor.target.as_deref() == Some("_blank") {
        return Err(Rejection::NewWindow);
    }
    if href.starts_with("mailto:") {
        return Err(Rejection::MailTo);
    }
    if href.starts_with("tel:") {
        return Err(Rejection::Tel);
    }
    if href.starts_with('#') {
        return Err(Rejection::Fragment);
    }

    let destination = location.join(href).map_err(|_| Rejection::Unresolvable)?;
    if destination.host_str() != location.host_str() {
        return Err(Rejection::CrossOrigin);
    }

    if let Some(pattern) = config
        .exclude_patterns
        .iter()
        .find(|p| href.contains(p.as_str()))
    {
        return Err(Rejection::Excluded(pattern.clone()));
    }

    if anchor.has_attribute(&config.opt_out_attribute) {
        return Err(Rejection::OptOut);
    }

    Ok(destination)
}

/// True when a click on `anchor` should become a soft navigation.
pub fn should_intercept(anchor: &Anchor, location: &Url, config: &NavigationConfig) -> bool {
    match classify(anchor, location, config) {
        Ok(_) => true,
        Err(reason) => {
            tracing::trace!(href = ?anchor.href, ?reason, "link left to native navigation");
            false
        }
    }
}
