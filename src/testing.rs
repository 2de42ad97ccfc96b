//!
//! Test utilities: a small user/product domain and tracing setup.
//! Compiled for unit tests and with the `test-utils` feature.

use crate::subject::{Field, Subject};
use crate::types::ModelId;

pub const USER: ModelId = ModelId::new("User");
pub const PRODUCT: ModelId = ModelId::new("Product");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserKind {
    User,
    Manager,
    Admin,
}

impl UserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserKind::User => "user",
            UserKind::Manager => "manager",
            UserKind::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub name: String,
    pub kind: UserKind,
}

impl User {
    pub fn new(name: &str) -> Self {
        User::with_kind(name, UserKind::User)
    }

    pub fn with_kind(name: &str, kind: UserKind) -> Self {
        User {
            name: name.to_owned(),
            kind,
        }
    }
}

impl Subject for User {
    fn model(&self) -> ModelId {
        USER
    }

    fn field(&self, name: &str) -> Option<Field<'_>> {
        match name {
            "name" => Some(self.name.as_str().into()),
            "type" => Some(self.kind.as_str().into()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub seller: User,
    pub is_public: bool,
}

impl Product {
    pub fn new(seller: &User) -> Self {
        Product {
            seller: seller.clone(),
            is_public: true,
        }
    }

    pub fn private(seller: &User) -> Self {
        Product {
            seller: seller.clone(),
            is_public: false,
        }
    }
}

impl Subject for Product {
    fn model(&self) -> ModelId {
        PRODUCT
    }

    fn field(&self, name: &str) -> Option<Field<'_>> {
        match name {
            "seller" => Some(Field::Subject(&self.seller)),
            // Exposed as an accessor to exercise computed fields.
            "isPublic" => Some(Field::computed(move || self.is_public.into())),
            _ => None,
        }
    }
}

/// Installs a `tracing` subscriber writing to the test output. Safe to call
/// from several tests.
#[cfg(feature = "tracing-subscriber")]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

#[cfg(not(feature = "tracing-subscriber"))]
pub fn init_tracing() {}
