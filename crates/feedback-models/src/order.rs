//! Order and review types.
//!
//! Orders are completed marketplace transactions fetched from the host's
//! account API; a buyer may attach a review (star rating plus free text)
//! to an order after purchase.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a marketplace order, as it appears after the `#` sign
/// in host messages (alphanumeric, case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Creates an order id from its raw string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A buyer review attached to an order.
///
/// Both parts are optional: the marketplace allows star-only and
/// text-only reviews, and a retracted review may come back as an order
/// with an empty `Review` still attached.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Star rating, 1-5.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stars: Option<u8>,

    /// Free-text body of the review.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Review {
    /// Creates a review with both a rating and text.
    pub fn new(stars: u8, text: impl Into<String>) -> Self {
        Self {
            stars: Some(stars),
            text: Some(text.into()),
        }
    }

    /// Returns true when the review carries any usable content: a star
    /// rating, or text that is non-blank after trimming.
    pub fn has_content(&self) -> bool {
        if self.stars.is_some() {
            return true;
        }
        self.text
            .as_deref()
            .map(|t| !t.trim().is_empty())
            .unwrap_or(false)
    }

    /// Review text trimmed of surrounding whitespace, empty if absent.
    pub fn trimmed_text(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }
}

/// A completed marketplace order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Identifier of the order.
    pub id: OrderId,

    /// Buyer's display name.
    pub buyer: String,

    /// Title of the purchased item.
    pub title: String,

    /// Price paid, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Buyer review, if one is currently attached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,
}

impl Order {
    /// Creates an order without a review.
    pub fn new(id: impl Into<OrderId>, buyer: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            buyer: buyer.into(),
            title: title.into(),
            price: None,
            review: None,
        }
    }

    /// Attaches a review.
    pub fn with_review(mut self, review: Review) -> Self {
        self.review = Some(review);
        self
    }

    /// Sets the price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Returns true when the order carries a review with usable content.
    pub fn has_review_content(&self) -> bool {
        self.review.as_ref().map(Review::has_content).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_with_stars_only_has_content() {
        let review = Review {
            stars: Some(5),
            text: None,
        };
        assert!(review.has_content());
    }

    #[test]
    fn review_with_blank_text_has_no_content() {
        let review = Review {
            stars: None,
            text: Some("   \n".to_string()),
        };
        assert!(!review.has_content());
    }

    #[test]
    fn review_with_text_only_has_content() {
        let review = Review {
            stars: None,
            text: Some("great seller".to_string()),
        };
        assert!(review.has_content());
    }

    #[test]
    fn empty_review_has_no_content() {
        assert!(!Review::default().has_content());
    }

    #[test]
    fn order_without_review_has_no_content() {
        let order = Order::new("AB12", "alice", "100 gold");
        assert!(!order.has_review_content());

        let order = order.with_review(Review::new(5, "great!"));
        assert!(order.has_review_content());
    }

    #[test]
    fn order_id_serializes_as_plain_string() {
        let id = OrderId::new("AB12");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"AB12\"");

        let back: OrderId = serde_json::from_str("\"AB12\"").unwrap();
        assert_eq!(back, id);
    }
}
