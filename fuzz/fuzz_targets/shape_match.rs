#![no_main]

// Harness: shape_match
// Focus: deep partial matching never panics on arbitrary JSON shapes, and a
// shape built from a target's own fields always matches it.

use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use ability_core::testing::{Product, User};
use ability_core::Shape;
use serde_json::json;

#[derive(Arbitrary, Debug)]
struct ShapeFrame {
    seller: String,
    public: bool,
    raw_shape: Vec<u8>,
}

fuzz_target!(|frame: ShapeFrame| {
    let product = Product { seller: User::new(&frame.seller), is_public: frame.public };

    let own = Shape::try_from(json!({ "isPublic": frame.public, "seller": { "name": frame.seller } }))
        .expect("object literal");
    assert!(own.matches(&product));

    // Arbitrary bytes that happen to parse as JSON must match or not, never panic.
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&frame.raw_shape) {
        if let Ok(shape) = Shape::try_from(value) {
            let _ = shape.matches(&product);
        }
    }
});
