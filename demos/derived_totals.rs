//! Derived keys, reference handles and cycle detection

use pantry::{State, Store, StoreError};
use serde_json::{json, Value};

fn number(state: &State, key: &str) -> f64 {
    state.get(key).and_then(Value::as_f64).unwrap_or(0.0)
}

fn main() -> anyhow::Result<()> {
    println!("=== Derived Totals ===\n");

    let store = Store::new();

    let price = store.set("price", json!(12.5))?;
    let quantity = store.set("quantity", json!(2))?;

    println!("1. Declaring derived keys");
    store.derive("subtotal", &["price", "quantity"], |s| {
        number(s, "price") * number(s, "quantity")
    })?;
    store.derive("tax", &["subtotal"], |s| number(s, "subtotal") * 0.2)?;
    let total = store.derive("total", &["subtotal", "tax"], |s| {
        number(s, "subtotal") + number(s, "tax")
    })?;

    let _watch = total.subscribe(|value| {
        println!("   [total] {}", value.cloned().unwrap_or(Value::Null));
    });

    println!("\n2. Updating inputs through handles");
    quantity.set(json!(3))?;
    price.set(json!(10))?;

    println!("\n3. Closing a dependency loop");
    match store.derive("price", &["total"], |s| number(s, "total")) {
        Err(StoreError::CyclicDependency { chain, .. }) => {
            println!("   rejected: {}", chain.join(" -> "));
        }
        other => println!("   unexpected: {other:?}"),
    }

    println!("\nFinal state: {:#?}", store.state());
    Ok(())
}
