//! Module containing conditions, the structured predicates accepted by the
//! list APIs

use crate::error::{Error, Result};
use std::fmt::{Display, Formatter};

/// A single scalar value usable as a filter value or condition operand.
///
/// ## BotB internals:
/// Scalars are stringified into a json-like form suitable for urlencoding,
/// i.e. without quotes around strings and with booleans as the lowercase
/// literals `true`/`false` (not `True` or `1`).
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Scalar {
    /// Whether this scalar looks like a number to the backend's filter
    /// compiler: an integer, or a string consisting solely of digits.
    pub(crate) fn is_numeric(&self) -> bool {
        match self {
            Scalar::Int(_) => true,
            Scalar::Str(s) => !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()),
            _ => false,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Scalar::Int(value) => write!(f, "{}", value),
            Scalar::Float(value) => write!(f, "{}", value),
            Scalar::Str(value) => write!(f, "{}", value),
            Scalar::Bool(value) => write!(f, "{}", if *value { "true" } else { "false" }),
        }
    }
}

/// Operand of a [`Condition`]; either a single scalar or a non-empty list of
/// scalars (for operators like `IN`).
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

macro_rules! into_scalar {
    ($($ty:ty => $variant:ident($conv:expr)),* $(,)?) => {
        $(
            impl From<$ty> for Scalar {
                fn from(value: $ty) -> Scalar {
                    Scalar::$variant($conv(value))
                }
            }

            impl From<$ty> for Operand {
                fn from(value: $ty) -> Operand {
                    Operand::Scalar(value.into())
                }
            }
        )*
    };
}

into_scalar! {
    i64 => Int(|v| v),
    i32 => Int(i64::from),
    u64 => Int(|v| v as i64),
    u32 => Int(i64::from),
    f64 => Float(|v| v),
    bool => Bool(|v| v),
    String => Str(|v| v),
    &str => Str(str::to_string),
}

impl From<Scalar> for Operand {
    fn from(scalar: Scalar) -> Operand {
        Operand::Scalar(scalar)
    }
}

impl<S: Into<Scalar>> From<Vec<S>> for Operand {
    fn from(values: Vec<S>) -> Operand {
        Operand::List(values.into_iter().map(Into::into).collect())
    }
}

/// A condition passed to a list API query.
///
/// Conditions are immutable value objects; they are constructed by the
/// caller and serialized once per outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Object property the condition applies to.
    pub property: String,

    /// Operator for the condition, e.g. `=`, `LIKE`, `IN`, `>` or one of the
    /// `IN_SUBQUERY:*` specials.
    pub operator: String,

    /// Operand for the condition.
    pub operand: Operand,
}

impl Condition {
    pub fn new(property: impl Into<String>, operator: impl Into<String>, operand: impl Into<Operand>) -> Condition {
        Condition {
            property: property.into(),
            operator: operator.into(),
            operand: operand.into(),
        }
    }

    /// Serializes this condition into the wire parameters understood by the
    /// list API, as the `index`-th condition of the request.
    ///
    /// ## BotB internals:
    /// Every condition contributes `conditions[i][key]`,
    /// `conditions[i][property]` (the same value twice; the API accepts
    /// either spelling and pyBotB-era clients send both) and
    /// `conditions[i][operator]`. Scalar operands become a single
    /// `conditions[i][operand]`, one-element lists become
    /// `conditions[i][operand][]`, longer lists one `conditions[i][operand][n]`
    /// per element. Empty lists are not transmittable and fail with
    /// [`Error::InvalidQuery`].
    pub fn encode_into(&self, index: usize, params: &mut Vec<(String, String)>) -> Result<()> {
        params.push((format!("conditions[{}][key]", index), self.property.clone()));
        params.push((format!("conditions[{}][property]", index), self.property.clone()));
        params.push((format!("conditions[{}][operator]", index), self.operator.clone()));

        match &self.operand {
            Operand::Scalar(scalar) => params.push((format!("conditions[{}][operand]", index), scalar.to_string())),
            Operand::List(values) =>
                match values.as_slice() {
                    [] =>
                        return Err(Error::InvalidQuery(
                            "length of list operand must be more than 0".to_string(),
                        )),
                    [value] => params.push((format!("conditions[{}][operand][]", index), value.to_string())),
                    values =>
                        for (n, value) in values.iter().enumerate() {
                            params.push((format!("conditions[{}][operand][{}]", index, n), value.to_string()));
                        },
                },
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Condition, Error};

    fn encode(condition: Condition) -> Result<Vec<(String, String)>, Error> {
        let mut params = Vec::new();
        condition.encode_into(0, &mut params)?;
        Ok(params)
    }

    #[test]
    fn scalar_operand() {
        let params = encode(Condition::new("level", ">", 10)).unwrap();

        assert_eq!(params, vec![
            ("conditions[0][key]".to_string(), "level".to_string()),
            ("conditions[0][property]".to_string(), "level".to_string()),
            ("conditions[0][operator]".to_string(), ">".to_string()),
            ("conditions[0][operand]".to_string(), "10".to_string()),
        ]);
    }

    #[test]
    fn bool_operand_is_lowercase() {
        let params = encode(Condition::new("late", "=", true)).unwrap();
        assert_eq!(params[3].1, "true");

        let params = encode(Condition::new("late", "=", false)).unwrap();
        assert_eq!(params[3].1, "false");
    }

    #[test]
    fn single_element_list_uses_empty_brackets() {
        let params = encode(Condition::new("id", "IN", vec![774])).unwrap();

        assert_eq!(params[3], ("conditions[0][operand][]".to_string(), "774".to_string()));
    }

    #[test]
    fn multi_element_list_is_indexed() {
        let params = encode(Condition::new("id", "IN", vec![1, 2, 3])).unwrap();

        assert_eq!(params[3].0, "conditions[0][operand][0]");
        assert_eq!(params[4].0, "conditions[0][operand][1]");
        assert_eq!(params[5].0, "conditions[0][operand][2]");
    }

    #[test]
    fn empty_list_operand_is_rejected() {
        let result = encode(Condition::new("id", "IN", Vec::<i64>::new()));

        assert!(matches!(result, Err(Error::InvalidQuery(_))));
    }
}
