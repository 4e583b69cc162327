//! Small storefront hooks that sit beside the checkout pipeline.

use chrono::{Datelike, Utc};
use url::Url;

use crate::HookError;

/// Query argument the platform appends when a product is added to the cart.
pub const ADD_TO_CART_ARG: &str = "add-to-cart";

/// Resolve the redirect after an add-to-cart action.
///
/// A non-empty `supplied` URL is returned unchanged. Otherwise the shopper is
/// sent back to `current_url` without the `add-to-cart` argument, so a page
/// refresh does not add the product a second time. Other query segments are
/// kept byte for byte, as is the fragment. A URL without the argument is
/// returned exactly as given.
///
/// # Errors
///
/// Returns [`HookError::InvalidUrl`] if `current_url` is not an absolute URL.
pub fn add_to_cart_redirect(supplied: Option<&str>, current_url: &str) -> Result<String, HookError> {
    if let Some(url) = supplied.filter(|u| !u.trim().is_empty()) {
        return Ok(url.to_string());
    }

    let mut url = Url::parse(current_url).map_err(|source| HookError::InvalidUrl {
        url: current_url.to_string(),
        source,
    })?;

    let Some(query) = url.query() else {
        return Ok(current_url.to_string());
    };
    let segments: Vec<&str> = query.split('&').collect();
    let kept: Vec<&str> = segments
        .iter()
        .copied()
        .filter(|segment| !is_add_to_cart(segment))
        .collect();
    if kept.len() == segments.len() {
        return Ok(current_url.to_string());
    }

    let rebuilt = kept.join("&");
    if rebuilt.is_empty() {
        url.set_query(None);
    } else {
        url.set_query(Some(&rebuilt));
    }

    Ok(url.to_string())
}

/// Whether a raw `name[=value]` query segment carries the add-to-cart argument.
fn is_add_to_cart(segment: &str) -> bool {
    let name = segment.split_once('=').map_or(segment, |(name, _)| name);
    name.eq_ignore_ascii_case(ADD_TO_CART_ARG)
}

/// Substitute `{site_title}` and `{year}` in an email footer template.
#[must_use]
pub fn render_footer(template: &str, site_title: &str, year: i32) -> String {
    template
        .replace("{site_title}", site_title)
        .replace("{year}", &year.to_string())
}

/// Storefront-wide switches read from the checkout configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontHooks {
    site_title: String,
    footer_template: Option<String>,
    suppress_structured_data: bool,
}

impl StorefrontHooks {
    #[must_use]
    pub fn new(
        site_title: impl Into<String>,
        footer_template: Option<String>,
        suppress_structured_data: bool,
    ) -> Self {
        Self {
            site_title: site_title.into(),
            footer_template,
            suppress_structured_data,
        }
    }

    /// Footer text for `year`, or `None` to keep the platform default.
    #[must_use]
    pub fn email_footer_text(&self, year: i32) -> Option<String> {
        self.footer_template
            .as_deref()
            .map(|t| render_footer(t, &self.site_title, year))
    }

    /// Footer text for the current UTC year.
    #[must_use]
    pub fn current_email_footer_text(&self) -> Option<String> {
        self.email_footer_text(Utc::now().year())
    }

    /// Whether product JSON-LD should be emitted on storefront pages.
    #[must_use]
    pub fn structured_data_enabled(&self) -> bool {
        !self.suppress_structured_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplied_url_wins() {
        let out = add_to_cart_redirect(
            Some("https://shop.example.com/cart/"),
            "https://shop.example.com/product/x/?add-to-cart=1758",
        )
        .unwrap();
        assert_eq!(out, "https://shop.example.com/cart/");
    }

    #[test]
    fn blank_supplied_url_falls_back() {
        let out = add_to_cart_redirect(
            Some("  "),
            "https://shop.example.com/product/x/?add-to-cart=1758",
        )
        .unwrap();
        assert_eq!(out, "https://shop.example.com/product/x/");
    }

    #[test]
    fn strips_only_add_to_cart() {
        let out = add_to_cart_redirect(
            None,
            "https://shop.example.com/shop/?orderby=price&add-to-cart=1758&page=2#top",
        )
        .unwrap();
        assert_eq!(out, "https://shop.example.com/shop/?orderby=price&page=2#top");
    }

    #[test]
    fn other_segments_keep_their_raw_form() {
        let out = add_to_cart_redirect(
            None,
            "https://shop.example.com/?flag&add-to-cart=1&x=1",
        )
        .unwrap();
        assert_eq!(out, "https://shop.example.com/?flag&x=1");

        let out = add_to_cart_redirect(
            None,
            "https://shop.example.com/?s=a%20b&add-to-cart=1",
        )
        .unwrap();
        assert_eq!(out, "https://shop.example.com/?s=a%20b");
    }

    #[test]
    fn url_without_add_to_cart_is_returned_as_given() {
        for raw in [
            "https://shop.example.com/?q=a%20b",
            "https://shop.example.com/?q=a+b&flag",
            "https://shop.example.com/?add-to-cart-note=1",
        ] {
            assert_eq!(add_to_cart_redirect(None, raw).unwrap(), raw);
        }
    }

    #[test]
    fn bare_and_only_argument_is_dropped_with_the_query() {
        let out = add_to_cart_redirect(None, "https://shop.example.com/shop/?add-to-cart#top").unwrap();
        assert_eq!(out, "https://shop.example.com/shop/#top");
    }

    #[test]
    fn url_without_query_is_unchanged() {
        let out = add_to_cart_redirect(None, "https://shop.example.com/shop/").unwrap();
        assert_eq!(out, "https://shop.example.com/shop/");
    }

    #[test]
    fn relative_url_is_rejected() {
        let err = add_to_cart_redirect(None, "/shop/?add-to-cart=1").unwrap_err();
        assert!(matches!(err, HookError::InvalidUrl { ref url, .. } if url == "/shop/?add-to-cart=1"));
    }

    #[test]
    fn footer_placeholders_are_replaced() {
        assert_eq!(
            render_footer("© {year} {site_title}. All rights reserved.", "Superiocity", 2026),
            "© 2026 Superiocity. All rights reserved."
        );
        assert_eq!(render_footer("plain", "Superiocity", 2026), "plain");
    }

    #[test]
    fn hooks_without_footer_keep_default() {
        let hooks = StorefrontHooks::new("Superiocity", None, false);
        assert!(hooks.email_footer_text(2026).is_none());
        assert!(hooks.structured_data_enabled());
    }

    #[test]
    fn hooks_with_footer_and_suppression() {
        let hooks = StorefrontHooks::new("Superiocity", Some("{site_title}".to_string()), true);
        assert_eq!(hooks.email_footer_text(2026).as_deref(), Some("Superiocity"));
        assert!(hooks.current_email_footer_text().is_some());
        assert!(!hooks.structured_data_enabled());
    }
}
