//! Macros for reducing boilerplate when defining records
//!
//! These macros generate the struct and trait implementations needed for each
//! record type backed by a declared [`CollectionSchema`](crate::core::schema::CollectionSchema).

/// Create a record type bound to a collection schema
///
/// Generates the struct with its store-managed metadata fields (`id`,
/// `created_at`, `updated_at`) followed by the declared fields, plus the
/// `Entity` and `Record` implementations.
///
/// # Example
///
/// ```rust,ignore
/// pub static PING_SCHEMA: CollectionSchema = CollectionSchema {
///     name: "ping",
///     fields: &[FieldSpec::id("blog_id").required()],
///     default_sort: DEFAULT_SORT,
/// };
///
/// impl_record!(Ping, PING_SCHEMA, {
///     blog_id: Uuid,
/// });
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $(#[$meta:meta])*
        $type:ident,
        $schema:ident,
        {
            $( $(#[$field_meta:meta])* $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Unique identifier assigned by the store
            pub id: ::uuid::Uuid,

            /// When this record was created
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this record was last updated
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,

            $( $(#[$field_meta])* pub $field : $field_type ),*
        }

        impl $crate::core::entity::Entity for $type {
            fn collection_name() -> &'static str {
                $schema.name
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }
        }

        impl $crate::core::entity::Record for $type {
            fn schema() -> &'static $crate::core::schema::CollectionSchema {
                &$schema
            }
        }
    };
}
