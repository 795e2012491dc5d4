use crate::RawSnowflake;
use core::fmt;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Serialized as the decimal string so that JSON clients without 64-bit
/// integers see the exact value.
impl Serialize for RawSnowflake {
    fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(self)
    }
}

/// Accepts the decimal string form or a plain unsigned integer.
impl<'de> Deserialize<'de> for RawSnowflake {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SnowflakeVisitor;

        impl de::Visitor<'_> for SnowflakeVisitor {
            type Value = RawSnowflake;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a snowflake as a decimal string or unsigned integer")
            }

            fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(RawSnowflake::from_raw(v))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u64::try_from(v)
                    .map(RawSnowflake::from_raw)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        d.deserialize_any(SnowflakeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use crate::RawSnowflake;
    use serde_json::json;

    #[test]
    fn serializes_as_decimal_string() {
        let id = RawSnowflake::from_raw(u64::MAX);
        assert_eq!(
            serde_json::to_value(id).unwrap(),
            json!("18446744073709551615")
        );
    }

    #[test]
    fn deserializes_from_string_or_integer() {
        let from_str: RawSnowflake = serde_json::from_value(json!("42")).unwrap();
        let from_int: RawSnowflake = serde_json::from_value(json!(42)).unwrap();
        assert_eq!(from_str, RawSnowflake::from_raw(42));
        assert_eq!(from_int, from_str);
    }

    #[test]
    fn rejects_negative_and_garbage() {
        assert!(serde_json::from_value::<RawSnowflake>(json!(-1)).is_err());
        assert!(serde_json::from_value::<RawSnowflake>(json!("nope")).is_err());
        assert!(serde_json::from_value::<RawSnowflake>(json!(1.5)).is_err());
    }
}
