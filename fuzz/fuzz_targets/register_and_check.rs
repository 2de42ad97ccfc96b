#![no_main]

// Harness: register_and_check
// Focus: arbitrary registration sequences; checks against instances never
// error, `cannot` is the negation of `can`, and a `$manage`/`$all` grant
// allows everything.

use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use ability_core::testing::{Product, User, PRODUCT, USER};
use ability_core::{Ability, ModelId, RuleOptions};

#[derive(Arbitrary, Debug)]
struct RuleFrame {
    deny: bool,
    action: u8,
    target_product: bool,
    scope: u8,
    manage: bool,
}

#[derive(Arbitrary, Debug)]
struct CheckFrame {
    rules: Vec<RuleFrame>,
    action: u8,
    scope: u8,
    grant_all: bool,
}

const ACTIONS: [&str; 4] = ["create", "read", "update", "delete"];
const SCOPES: [&str; 3] = ["$global", "tenant-a", "tenant-b"];

fuzz_target!(|frame: CheckFrame| {
    let mut ability = Ability::new();
    for rule in &frame.rules {
        let action = if rule.manage { "$manage" } else { ACTIONS[rule.action as usize % ACTIONS.len()] };
        let target: ModelId = if rule.target_product { PRODUCT } else { USER };
        let options = RuleOptions::new().scopes(SCOPES[rule.scope as usize % SCOPES.len()]);
        if rule.deny {
            ability.disallow_with(USER, action, target, options);
        } else {
            ability.allow_with(USER, action, target, options);
        }
    }
    if frame.grant_all {
        ability.allow(USER, "$manage", "$all");
    }

    let user = User::new("fuzz");
    let product = Product::new(&user);
    let action = ACTIONS[frame.action as usize % ACTIONS.len()];
    let scope = SCOPES[frame.scope as usize % SCOPES.len()];

    let can = ability.can_in(&user, action, &product, scope).expect("no conditions registered");
    let cannot = ability.cannot_in(&user, action, &product, scope).expect("no conditions registered");
    assert_eq!(can, !cannot);
    if frame.grant_all {
        assert!(can);
    }
});
