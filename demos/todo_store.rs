//! Store example with structured values

use pantry::Store;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct TodoItem {
    id: usize,
    text: String,
    completed: bool,
}

fn todos(store: &Store) -> anyhow::Result<Vec<TodoItem>> {
    Ok(store.get_as::<Vec<TodoItem>>("todos")?.unwrap_or_default())
}

fn main() -> anyhow::Result<()> {
    println!("=== Todo Store Example ===\n");

    let store = Store::new();
    store.set_default("todos", json!([]))?;
    store.set_default("filter", json!("all"))?;

    // Count of open todos, kept in sync with the list
    store.derive("active", &["todos"], |state| {
        state
            .get("todos")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item["completed"] == json!(false))
                    .count()
            })
            .unwrap_or(0)
    })?;

    // Subscribe to state changes
    store.subscribe("active", |active| {
        println!("Active todos: {}", active.cloned().unwrap_or(Value::Null));
    });

    // Add a todo
    println!("\nAdding todo...");
    let mut items = todos(&store)?;
    items.push(TodoItem {
        id: 1,
        text: "Learn Pantry".to_string(),
        completed: false,
    });
    store.set("todos", serde_json::to_value(&items)?)?;

    // Complete the todo
    println!("\nCompleting todo...");
    let mut items = todos(&store)?;
    if let Some(todo) = items.first_mut() {
        todo.completed = true;
    }
    store.set("todos", serde_json::to_value(&items)?)?;

    // Back to the defaults
    println!("\nResetting...");
    store.reset()?;

    println!("\nFinal state: {:#?}", store.state());
    Ok(())
}
