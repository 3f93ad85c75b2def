//! Identifiers used across the domain, plus the identifier-generation capability.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a warehouse (the tenant boundary for products).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarehouseId(String);

/// Identifier of a product within a warehouse.
///
/// Either supplied by the caller or produced by an [`IdGenerator`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

macro_rules! impl_string_newtype {
    ($t:ty) => {
        impl $t {
            /// Wrap an identifier verbatim. No normalization or escaping is applied.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $t {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $t {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_newtype!(WarehouseId);
impl_string_newtype!(ProductId);

/// Source of fresh product identifiers.
///
/// Injected wherever an identifier has to be minted so tests can substitute a
/// deterministic implementation.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> ProductId;
}

/// Random UUIDv4 identifiers (lowercase, hyphenated).
///
/// Backed by the OS CSPRNG; collision probability is negligible.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidV4Generator;

impl IdGenerator for UuidV4Generator {
    fn next_id(&self) -> ProductId {
        ProductId(Uuid::new_v4().to_string())
    }
}

/// Deterministic `<prefix>-<n>` identifiers, starting at 1.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> ProductId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        ProductId(format!("{}-{}", self.prefix, n))
    }
}

/// Always returns the same identifier.
#[derive(Debug, Clone)]
pub struct FixedIdGenerator(ProductId);

impl FixedIdGenerator {
    pub fn new(id: impl Into<ProductId>) -> Self {
        Self(id.into())
    }
}

impl IdGenerator for FixedIdGenerator {
    fn next_id(&self) -> ProductId {
        self.0.clone()
    }
}

impl<G> IdGenerator for std::sync::Arc<G>
where
    G: IdGenerator + ?Sized,
{
    fn next_id(&self) -> ProductId {
        (**self).next_id()
    }
}
