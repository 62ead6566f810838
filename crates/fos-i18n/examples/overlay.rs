//! Example: register translated nodes, click one, then let a mutation clean up

use fos_dom::Document;
use fos_i18n::{
    ElementRegistry, ElementStore, KeyBinding, ModifierKey, ObserverOptions, removed_nodes,
};

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let json = r#"{ "highlightColor": "rgb(0, 120, 255)" }"#;
    let options: ObserverOptions = serde_json::from_str(json).unwrap_or_default();

    let mut doc = Document::new("https://example.com/");
    let body = doc.body();
    let tree = doc.tree_mut();
    let h1 = tree.create_element("h1");
    let title = tree.create_text("Welcome");
    tree.append_child(body, h1).unwrap();
    tree.append_child(h1, title).unwrap();
    tree.take_records();

    let mut registry = ElementRegistry::new(options, ElementStore::new(), |click| {
        println!("Clicked {} with keys:", click.target);
        for key in &click.keys_and_defaults {
            println!("  {} (ns: {:?}, default: {:?})", key.key, key.ns, key.default_value);
        }
    });

    let binding = KeyBinding::new("welcome").with_default("Welcome");
    registry.register(&mut doc, h1, title, binding.into());
    registry.run(true);

    registry.handle_mouse_over(&mut doc, Some(title)).unwrap();
    registry.handle_key_down(&mut doc, ModifierKey::Alt).unwrap();
    registry.handle_click(&doc, title).unwrap();

    doc.tree_mut().remove_child(body, h1).unwrap();
    let records = doc.tree_mut().take_records();
    let removed = removed_nodes(&doc, &records);
    registry.cleanup_removed_nodes(&mut doc, &removed);

    println!("Tracked elements after removal: {}", registry.store().len());
    registry.stop(&mut doc);
}
