use duckdb::types::Value;

/// SQL type assigned to a CSV column from the values seen in one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    BigInt,
    Double,
    Boolean,
    Varchar,
}

impl ColumnType {
    pub fn sql_name(self) -> &'static str {
        match self {
            Self::BigInt => "BIGINT",
            Self::Double => "DOUBLE",
            Self::Boolean => "BOOLEAN",
            Self::Varchar => "VARCHAR",
        }
    }

    /// Pick the narrowest type every present value parses as, or `None` when
    /// no value is present at all.
    pub fn infer<'a>(values: impl IntoIterator<Item = Option<&'a str>>) -> Option<Self> {
        let mut any_present = false;
        let mut all_int = true;
        let mut all_float = true;
        let mut all_bool = true;

        for value in values.into_iter().flatten() {
            any_present = true;
            if all_int && value.parse::<i64>().is_err() {
                all_int = false;
            }
            if all_float && value.parse::<f64>().is_err() {
                all_float = false;
            }
            if all_bool && parse_bool(value).is_none() {
                all_bool = false;
            }
            if !all_int && !all_float && !all_bool {
                return Some(Self::Varchar);
            }
        }

        if !any_present {
            None
        } else if all_int {
            Some(Self::BigInt)
        } else if all_float {
            Some(Self::Double)
        } else if all_bool {
            Some(Self::Boolean)
        } else {
            Some(Self::Varchar)
        }
    }

    /// Smallest type holding every value of both `self` and `other` without
    /// loss. Integers widen to `Double`; any other mix is `Varchar`.
    pub fn widen(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::BigInt, Self::Double) | (Self::Double, Self::BigInt) => Self::Double,
            _ => Self::Varchar,
        }
    }

    /// Convert one cell into the value bound for this column. Cells that do
    /// not parse fall back to text and are left to the database to cast.
    pub fn to_value(self, cell: Option<&str>) -> Value {
        let Some(cell) = cell else {
            return Value::Null;
        };
        match self {
            Self::BigInt => cell
                .parse::<i64>()
                .map(Value::BigInt)
                .unwrap_or_else(|_| Value::Text(cell.to_string())),
            Self::Double => cell
                .parse::<f64>()
                .map(Value::Double)
                .unwrap_or_else(|_| Value::Text(cell.to_string())),
            Self::Boolean => parse_bool(cell)
                .map(Value::Boolean)
                .unwrap_or_else(|| Value::Text(cell.to_string())),
            Self::Varchar => Value::Text(cell.to_string()),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::ColumnType;
    use duckdb::types::Value;

    #[test]
    fn infers_integers_before_floats() {
        let ty = ColumnType::infer([Some("1"), Some("-20"), None, Some("+3")]);
        assert_eq!(ty, Some(ColumnType::BigInt));
    }

    #[test]
    fn mixed_numbers_become_double() {
        let ty = ColumnType::infer([Some("1"), Some("2.5"), Some("1e3")]);
        assert_eq!(ty, Some(ColumnType::Double));
    }

    #[test]
    fn booleans_in_any_case() {
        let ty = ColumnType::infer([Some("True"), Some("false"), Some("TRUE")]);
        assert_eq!(ty, Some(ColumnType::Boolean));
    }

    #[test]
    fn text_wins_over_everything() {
        let ty = ColumnType::infer([Some("1"), Some("true"), Some("Hardy Vineyards")]);
        assert_eq!(ty, Some(ColumnType::Varchar));
    }

    #[test]
    fn all_missing_has_no_type() {
        assert_eq!(ColumnType::infer([None, None]), None);
        assert_eq!(ColumnType::infer(std::iter::empty()), None);
    }

    #[test]
    fn widening_never_loses_values() {
        use ColumnType::{BigInt, Boolean, Double, Varchar};
        assert_eq!(BigInt.widen(BigInt), BigInt);
        assert_eq!(BigInt.widen(Double), Double);
        assert_eq!(Double.widen(BigInt), Double);
        assert_eq!(Boolean.widen(BigInt), Varchar);
        assert_eq!(Double.widen(Boolean), Varchar);
        assert_eq!(Varchar.widen(BigInt), Varchar);
        assert_eq!(Boolean.widen(Boolean), Boolean);
    }

    #[test]
    fn converts_cells_to_bound_values() {
        assert_eq!(ColumnType::BigInt.to_value(Some("42")), Value::BigInt(42));
        assert_eq!(ColumnType::Double.to_value(Some("0.5")), Value::Double(0.5));
        assert_eq!(ColumnType::Boolean.to_value(Some("FALSE")), Value::Boolean(false));
        assert_eq!(
            ColumnType::Varchar.to_value(Some("750mL")),
            Value::Text("750mL".to_string())
        );
        assert_eq!(ColumnType::BigInt.to_value(None), Value::Null);
    }
}
