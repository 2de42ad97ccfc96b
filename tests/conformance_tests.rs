#![cfg(test)]

use ability_core::testing::{Product, User, UserKind, PRODUCT, USER};
use ability_core::{and, not, or, shape, Ability, AbilityError, Condition};

// --- Helpers ---

fn same_user() -> Condition {
    Condition::new(|p: &User, t: &User| p.name == t.name)
}

fn owns_product() -> Condition {
    Condition::new(|user: &User, product: &Product| user.name == product.seller.name)
}

/// Builds the rule set a given user would be handed at login.
fn ability_for(user: &User) -> Ability {
    let mut ability = Ability::new();

    ability.allow(USER, "read", USER);
    ability.allow_if(USER, "update", USER, same_user());
    ability.allow_if(USER, "delete", USER, same_user());

    ability.allow(USER, "create", PRODUCT);
    ability.allow_if(USER, "read", PRODUCT, shape!({ "isPublic": true }));
    ability.allow_if(USER, ["update", "delete"], PRODUCT, owns_product());

    match user.kind {
        UserKind::Admin => ability.allow(USER, "$manage", "$all"),
        UserKind::Manager => ability.allow(USER, "$manage", PRODUCT),
        UserKind::User => {}
    }

    ability
}

const CRUD: [&str; 4] = ["create", "read", "update", "delete"];

fn crud(ability: &Ability, performer: &User, target: &dyn ability_core::Subject) -> [bool; 4] {
    CRUD.map(|action| {
        ability
            .can(performer, action, ability_core::Target::instance(target))
            .unwrap()
    })
}

// --- Scenarios ---

#[test]
fn admin_can_do_everything_on_instances() {
    let admin = User::with_kind("Admin", UserKind::Admin);
    let user_b = User::new("B");
    let ability = ability_for(&admin);

    assert_eq!(crud(&ability, &admin, &admin), [true; 4]);
    assert_eq!(crud(&ability, &admin, &user_b), [true; 4]);
    assert_eq!(crud(&ability, &admin, &Product::new(&user_b)), [true; 4]);
    assert_eq!(crud(&ability, &admin, &Product::private(&user_b)), [true; 4]);
}

#[test]
fn type_targets_fail_only_where_conditions_apply() {
    let admin = User::with_kind("Admin", UserKind::Admin);
    let ability = ability_for(&admin);

    assert!(ability.can(&admin, "create", &USER).unwrap());
    assert!(ability.can(&admin, "read", &USER).unwrap());
    assert!(matches!(
        ability.can(&admin, "update", &USER),
        Err(AbilityError::UnevaluableCondition { .. })
    ));
    assert!(ability.can(&admin, "delete", &USER).is_err());

    assert!(ability.can(&admin, "create", &PRODUCT).unwrap());
    assert!(ability.can(&admin, "read", &PRODUCT).is_err());
    assert!(ability.can(&admin, "update", &PRODUCT).is_err());
    assert!(ability.can(&admin, "delete", &PRODUCT).is_err());
}

#[test]
fn manager_manages_products_only() {
    let manager = User::with_kind("Manager", UserKind::Manager);
    let user_b = User::new("B");
    let ability = ability_for(&manager);

    assert_eq!(crud(&ability, &manager, &manager), [false, true, true, true]);
    assert_eq!(crud(&ability, &manager, &user_b), [false, true, false, false]);
    assert!(!ability.can(&manager, "create", &USER).unwrap());
    assert!(ability.can(&manager, "read", &USER).unwrap());

    for product in [Product::new(&user_b), Product::private(&user_b)] {
        assert_eq!(crud(&ability, &manager, &product), [true; 4]);
    }
    assert!(ability.can(&manager, "create", &PRODUCT).unwrap());
    assert!(ability.can(&manager, "read", &PRODUCT).is_err());
}

#[test]
fn plain_users_follow_ownership_and_visibility() {
    let user_a = User::new("A");
    let user_b = User::new("B");
    let ability_a = ability_for(&user_a);
    let ability_b = ability_for(&user_b);

    let product1 = Product::new(&user_a);
    let product2 = Product::new(&user_b);
    let product3 = Product::private(&user_b);

    assert_eq!(crud(&ability_a, &user_a, &user_a), [false, true, true, true]);
    assert_eq!(crud(&ability_a, &user_a, &user_b), [false, true, false, false]);

    assert_eq!(crud(&ability_a, &user_a, &product1), [true; 4]);
    assert_eq!(crud(&ability_a, &user_a, &product2), [true, true, false, false]);
    assert_eq!(crud(&ability_a, &user_a, &product3), [true, false, false, false]);

    assert_eq!(crud(&ability_b, &user_b, &product1), [true, true, false, false]);
    assert_eq!(crud(&ability_b, &user_b, &product2), [true; 4]);
    assert_eq!(crud(&ability_b, &user_b, &product3), [true, false, true, true]);
}

#[test]
fn inabilities_block_role_escalation() {
    let build = |user: &User| {
        let mut ability = Ability::new();
        ability.allow(USER, "read", USER);
        ability.allow_if(USER, ["update", "delete"], USER, same_user());
        // Nobody may change their own role.
        ability.disallow_if(
            USER,
            "update",
            USER,
            Condition::new(|p: &User, t: &User| p.kind != t.kind),
        );
        if user.kind == UserKind::Admin {
            ability.allow(USER, "$manage", "$all");
        }
        ability
    };

    let admin = User::with_kind("Admin", UserKind::Admin);
    let user_a = User::new("A");
    let user_b = User::new("B");
    let user_a_promoted = User::with_kind("A", UserKind::Admin);

    assert!(!build(&user_a).can(&user_a, "update", &user_a_promoted).unwrap());
    assert!(!build(&user_b).can(&user_b, "update", &user_a_promoted).unwrap());
    assert!(build(&admin).can(&admin, "update", &user_a_promoted).unwrap());
}

#[test]
fn manage_grant_beats_matching_deny() {
    let admin = User::with_kind("Admin", UserKind::Admin);
    let mut ability = Ability::new();
    ability.allow(USER, "$manage", "$all");
    ability.disallow(USER, "delete", USER);

    assert!(ability.can(&admin, "delete", &User::new("B")).unwrap());
    assert!(!ability.cannot(&admin, "delete", &User::new("B")).unwrap());
}

#[test]
fn shape_conditions_compare_fields() {
    let build = |user: &User| {
        let mut ability = Ability::new();
        ability.allow_if(USER, "update", USER, shape!({ "name": user.name.clone() }));
        ability
    };

    let user_a = User::new("A");
    let user_b = User::new("B");

    assert!(build(&user_a).can(&user_a, "update", &user_a).unwrap());
    assert!(!build(&user_a).can(&user_a, "update", &user_b).unwrap());
    assert!(!build(&user_b).can(&user_b, "update", &user_a).unwrap());
    assert!(build(&user_b).can(&user_b, "update", &user_b).unwrap());
}

#[test]
fn chained_conditions() {
    let mut ability = Ability::new();
    ability.allow_if(
        USER,
        "read",
        PRODUCT,
        or([Condition::from(shape!({ "isPublic": true })), owns_product()]),
    );

    let user_a = User::new("A");
    let user_b = User::new("B");
    let product1 = Product::new(&user_a);
    let product2 = Product::new(&user_b);
    let product3 = Product::private(&user_b);

    assert!(ability.can(&user_a, "read", &product1).unwrap());
    assert!(ability.can(&user_a, "read", &product2).unwrap());
    assert!(!ability.can(&user_a, "read", &product3).unwrap());
    assert!(ability.can(&user_b, "read", &product1).unwrap());
    assert!(ability.can(&user_b, "read", &product2).unwrap());
    assert!(ability.can(&user_b, "read", &product3).unwrap());
}

#[test]
fn nested_combinators_in_rules() {
    let mut ability = Ability::new();
    // Public products not sold by the performer.
    ability.allow_if(
        USER,
        "review",
        PRODUCT,
        and([Condition::from(shape!({ "isPublic": true })), not(owns_product())]),
    );

    let user_a = User::new("A");
    let user_b = User::new("B");
    assert!(ability.can(&user_a, "review", &Product::new(&user_b)).unwrap());
    assert!(!ability.can(&user_a, "review", &Product::new(&user_a)).unwrap());
    assert!(!ability.can(&user_a, "review", &Product::private(&user_b)).unwrap());
}
