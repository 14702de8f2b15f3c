//! Expiry notice content

use crate::models::Product;

/// Rendered notice: subject plus plain-text and HTML bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryNotice {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl ExpiryNotice {
    pub fn new(product: &Product, days_remaining: i64) -> Self {
        let name = product.display_name();
        let barcode = &product.barcode;

        Self {
            subject: format!(
                "Notice: product {} expires in {} days",
                name, days_remaining
            ),
            text: format!(
                "Product {} (barcode: {}) expires in {} days.",
                name, barcode, days_remaining
            ),
            html: format!(
                "<p>Product <b>{}</b> (barcode: {}) expires in <b>{}</b> days.</p>",
                escape_html(name),
                escape_html(barcode),
                days_remaining
            ),
        }
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
