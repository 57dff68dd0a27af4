//! Prompt construction.
//!
//! The completion request is a single user message rendered from a fixed
//! template. The operator-configurable part is the info block: a bullet
//! list of order attributes selected through the field toggles in the
//! settings menu.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Local};
use regex::Regex;

use feedback_models::{Order, PromptFields};

/// Template of the user message sent to the completion API.
const PROMPT_TEMPLATE: &str = "\
Hi! You are the AI assistant of our online store for in-game goods.

Customer and order details:
{info_block}

Your task:
- Reply to the customer in a friendly tone.
- Use plenty of emoji.
- Work the customer and order details into the reply.
- Write a long, detailed reply of up to 700 characters.
- Wish the customer something nice.

Important:
- Do not mention external websites.
- No insults, profanity, illegal or political content.
- DO NOT OUTPUT CODE FRAGMENTS OR CODE LISTINGS.
- DO NOT USE MARKDOWN / HTML / ANY MARKUP.

End with the line: Thank you for the {rating}-star review left on {date} at {time}!";

/// Info block shown when the operator disabled every field.
const EMPTY_INFO_BLOCK: &str = "- (all fields disabled in settings)";

/// Regex matching `{placeholder}` tokens in the template.
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("Invalid placeholder regex"));

/// Renders the attribute list interpolated into `{info_block}`.
///
/// One line per enabled field; attributes the order does not carry
/// render with an empty value rather than being skipped, so the reader
/// of the prompt can tell "disabled" from "unknown".
pub fn build_info_block(fields: &PromptFields, order: &Order) -> String {
    if fields.all_disabled() {
        return EMPTY_INFO_BLOCK.to_string();
    }

    let review = order.review.as_ref();
    let mut lines = Vec::new();

    if fields.name {
        lines.push(info_line(format!("- Buyer: {}", order.buyer)));
    }
    if fields.item {
        lines.push(info_line(format!("- Item: {}", order.title)));
    }
    if fields.cost {
        let cost = order.price.map(|p| p.to_string()).unwrap_or_default();
        lines.push(info_line(format!("- Price: {cost}")));
    }
    if fields.rating {
        let stars = review
            .and_then(|r| r.stars)
            .map(|s| s.to_string())
            .unwrap_or_default();
        lines.push(info_line(format!("- Rating: {stars} out of 5")));
    }
    if fields.text {
        let text = review.map(|r| r.trimmed_text()).unwrap_or("");
        lines.push(info_line(format!("- Review: {text}")));
    }

    lines.join("\n")
}

fn info_line(line: String) -> String {
    line.trim_end().to_string()
}

/// Builds the completion prompt for an order's current review.
pub fn build_prompt(fields: &PromptFields, order: &Order) -> String {
    render_prompt(fields, order, Local::now())
}

fn render_prompt(fields: &PromptFields, order: &Order, now: DateTime<Local>) -> String {
    let review = order.review.as_ref();

    let mut values: HashMap<&str, String> = HashMap::new();
    values.insert("info_block", build_info_block(fields, order));
    values.insert("name", order.buyer.clone());
    values.insert("item", order.title.clone());
    values.insert(
        "cost",
        order.price.map(|p| p.to_string()).unwrap_or_default(),
    );
    values.insert(
        "rating",
        review
            .and_then(|r| r.stars)
            .map(|s| s.to_string())
            .unwrap_or_default(),
    );
    values.insert(
        "text",
        review.map(|r| r.trimmed_text()).unwrap_or("").to_string(),
    );
    values.insert("date", now.format("%d.%m.%Y").to_string());
    values.insert("time", now.format("%H:%M:%S").to_string());

    interpolate(PROMPT_TEMPLATE, &values)
}

/// Substitutes `{key}` tokens from `values`; unknown keys expand to the
/// empty string rather than failing the render.
fn interpolate(template: &str, values: &HashMap<&str, String>) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &regex::Captures<'_>| {
            values.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use feedback_models::Review;

    fn sample_order() -> Order {
        Order::new("AB12", "alice", "100 gold")
            .with_price(25.0)
            .with_review(Review::new(5, "great!"))
    }

    #[test]
    fn info_block_lists_enabled_fields_in_order() {
        let block = build_info_block(&PromptFields::default(), &sample_order());
        assert_eq!(
            block,
            "- Buyer: alice\n- Item: 100 gold\n- Price: 25\n- Rating: 5 out of 5\n- Review: great!"
        );
    }

    #[test]
    fn info_block_skips_disabled_fields() {
        let fields = PromptFields {
            name: false,
            item: false,
            cost: false,
            rating: true,
            text: true,
        };
        let block = build_info_block(&fields, &sample_order());
        assert_eq!(block, "- Rating: 5 out of 5\n- Review: great!");
    }

    #[test]
    fn info_block_with_all_fields_disabled() {
        let fields = PromptFields {
            name: false,
            item: false,
            cost: false,
            rating: false,
            text: false,
        };
        assert_eq!(
            build_info_block(&fields, &sample_order()),
            "- (all fields disabled in settings)"
        );
    }

    #[test]
    fn info_block_renders_missing_price_with_empty_value() {
        let order = Order::new("AB12", "alice", "100 gold").with_review(Review::new(4, "ok"));
        let block = build_info_block(&PromptFields::default(), &order);
        assert!(block.contains("- Price:"));
        assert!(!block.contains("- Price: "));
    }

    #[test]
    fn prompt_interpolates_rating_date_and_time() {
        let now = Local.with_ymd_and_hms(2024, 3, 7, 14, 30, 5).unwrap();
        let prompt = render_prompt(&PromptFields::default(), &sample_order(), now);

        assert!(prompt.contains("- Buyer: alice"));
        assert!(prompt
            .contains("Thank you for the 5-star review left on 07.03.2024 at 14:30:05!"));
        assert!(!prompt.contains('{'), "unresolved placeholder in: {prompt}");
    }

    #[test]
    fn unknown_placeholders_expand_to_empty() {
        let values = HashMap::from([("known", "x".to_string())]);
        assert_eq!(interpolate("a {known} b {bogus} c", &values), "a x b  c");
    }
}
