//! Terminal output.

use serde::Serialize;
use vitrine_core::{Cart, format_price};

#[allow(clippy::print_stdout)]
pub fn line(text: &str) {
    println!("{text}");
}

#[allow(clippy::print_stdout)]
pub fn lines(rows: &[String]) {
    for row in rows {
        println!("{row}");
    }
}

/// Pretty-printed JSON.
pub fn json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    line(&serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One row per line item, then the totals.
pub fn cart(cart: &Cart) {
    if cart.is_empty() {
        line("Cart is empty");
        return;
    }

    let rows: Vec<String> = cart
        .items()
        .iter()
        .map(|item| {
            format!(
                "{:>4}  {:>3} x {:>12}  {}",
                item.id,
                item.quantity,
                format_price(item.product.price),
                item.product.title
            )
        })
        .collect();
    lines(&rows);
    line(&format!(
        "{} item(s), total {}",
        cart.total_items(),
        format_price(cart.total())
    ));
}
