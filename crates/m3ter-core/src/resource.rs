//! The `Resource` trait and paginated list envelope.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// An entity exposed by the API under `/organizations/{org}/{PATH}`.
///
/// Implementors are attribute bags identified by an opaque `id`; most also
/// carry a human-assigned `code` that is unique within the resource type.
pub trait Resource: Serialize + DeserializeOwned + Send + Sync {
    /// Endpoint path segment, e.g. `"accounts"`.
    const PATH: &'static str;

    /// Human-readable type name used in log lines.
    const KIND: &'static str;

    /// Server-assigned identifier, absent on resources not yet created.
    fn id(&self) -> Option<&str>;

    /// Human-assigned code, for types that have one.
    fn code(&self) -> Option<&str> {
        None
    }

    /// Display name, for types that have one.
    fn name(&self) -> Option<&str> {
        None
    }
}

/// One page of a list response: `{"data": [...], "nextToken": "..."}`.
///
/// The absence of `nextToken` marks the final page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in server order.
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,

    /// Continuation marker for the next page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_token.is_some()
    }
}

/// Implements [`Resource`] for a struct with an `id: Option<String>` field.
///
/// Trailing `code` / `name` idents wire the optional accessors to the
/// same-named fields.
macro_rules! resource {
    (@accessor code) => {
        fn code(&self) -> Option<&str> {
            self.code.as_deref()
        }
    };
    (@accessor name) => {
        fn name(&self) -> Option<&str> {
            self.name.as_deref()
        }
    };
    ($ty:ident, $path:literal $(, $field:ident)*) => {
        impl $crate::resource::Resource for $ty {
            const PATH: &'static str = $path;
            const KIND: &'static str = stringify!($ty);

            fn id(&self) -> Option<&str> {
                self.id.as_deref()
            }

            $(resource!(@accessor $field);)*
        }
    };
}
