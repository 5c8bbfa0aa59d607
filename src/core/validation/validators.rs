//! Reusable field validators
//!
//! These validators are composed by [`CollectionSchema`](crate::core::schema::CollectionSchema)
//! to check document fields before they reach the store.

use crate::core::schema::FieldType;
use serde_json::Value;
use uuid::Uuid;

/// Validator: field must not be null
pub fn not_null() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| {
        if value.is_null() {
            Err("null value not allowed".to_string())
        } else {
            Ok(())
        }
    }
}

/// Validator: value must match the declared field type
///
/// Null values pass; nullability is checked by [`not_null`].
pub fn of_type(
    field_type: FieldType,
) -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    move |_: &str, value: &Value| {
        if value.is_null() {
            return Ok(());
        }
        match field_type {
            FieldType::Id => match value.as_str() {
                Some(s) if Uuid::parse_str(s).is_ok() => Ok(()),
                _ => Err("must be a valid identifier".to_string()),
            },
            FieldType::String => {
                if value.is_string() {
                    Ok(())
                } else {
                    Err("must be of string type".to_string())
                }
            }
        }
    }
}

/// Validator: string must not be empty
pub fn not_empty() -> impl Fn(&str, &Value) -> Result<(), String> + Send + Sync + Clone {
    |_: &str, value: &Value| match value.as_str() {
        Some("") => Err("empty values not allowed".to_string()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_not_null_rejects_null() {
        let v = not_null();
        assert_eq!(
            v("blog_id", &json!(null)),
            Err("null value not allowed".to_string())
        );
        assert!(v("blog_id", &json!("x")).is_ok());
    }

    #[test]
    fn test_id_type_accepts_uuid_strings() {
        let v = of_type(FieldType::Id);
        assert!(v("blog_id", &json!(Uuid::new_v4().to_string())).is_ok());
        assert!(v("blog_id", &json!("not-an-id")).is_err());
        assert!(v("blog_id", &json!(42)).is_err());
    }

    #[test]
    fn test_string_type() {
        let v = of_type(FieldType::String);
        assert!(v("token", &json!("abc")).is_ok());
        assert!(v("token", &json!(["abc"])).is_err());
        assert!(v("token", &json!(true)).is_err());
    }

    #[test]
    fn test_type_check_skips_null() {
        assert!(of_type(FieldType::Id)("last_delivered_post_id", &json!(null)).is_ok());
    }

    #[test]
    fn test_not_empty() {
        let v = not_empty();
        assert!(v("token", &json!("")).is_err());
        assert!(v("token", &json!("t")).is_ok());
        assert!(v("token", &json!(null)).is_ok());
    }
}
