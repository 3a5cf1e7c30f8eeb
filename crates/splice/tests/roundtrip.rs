//! Property tests: markers survive interpolation and parsing, and
//! flattening respects the placeholder/parameter contract.

use chrono::DateTime;
use proptest::prelude::*;
use rust_decimal::Decimal;
use splice::{SqlParameter, SqlType, SqlValue, Token, sql};

fn arb_type() -> impl Strategy<Value = SqlType> {
    prop_oneof![
        Just(SqlType::Boolean),
        Just(SqlType::Integer),
        Just(SqlType::Float),
        Just(SqlType::String),
        Just(SqlType::Decimal),
        Just(SqlType::Timestamp),
    ]
}

// NaN is excluded: it breaks equality, not the encoding.
fn arb_value_of(ty: SqlType) -> BoxedStrategy<SqlValue> {
    match ty {
        SqlType::Boolean => any::<bool>().prop_map(SqlValue::Bool).boxed(),
        SqlType::Integer => any::<i64>().prop_map(SqlValue::Int).boxed(),
        SqlType::Float => (-1.0e15..1.0e15f64).prop_map(SqlValue::Float).boxed(),
        SqlType::String => ".*".prop_map(SqlValue::String).boxed(),
        SqlType::Decimal => (any::<i64>(), 0u32..=28)
            .prop_map(|(mantissa, scale)| SqlValue::Decimal(Decimal::new(mantissa, scale)))
            .boxed(),
        SqlType::Timestamp => (-8_000_000_000i64..8_000_000_000, 0u32..1_000_000_000)
            .prop_map(|(secs, nanos)| {
                SqlValue::Timestamp(DateTime::from_timestamp(secs, nanos).unwrap())
            })
            .boxed(),
    }
}

fn arb_parameter() -> impl Strategy<Value = SqlParameter> {
    prop_oneof![
        arb_type().prop_flat_map(|ty| {
            arb_value_of(ty).prop_map(move |value| SqlParameter::Scalar {
                ty,
                value: Some(value),
            })
        }),
        arb_type().prop_map(|ty| SqlParameter::Scalar { ty, value: None }),
        arb_type().prop_flat_map(|ty| {
            prop::collection::vec(arb_value_of(ty), 0..8).prop_map(move |values| {
                SqlParameter::List {
                    ty,
                    values: Some(values),
                }
            })
        }),
        arb_type().prop_map(|ty| SqlParameter::List { ty, values: None }),
    ]
}

proptest! {
    #[test]
    fn marker_roundtrip_preserves_tag_and_value(p in arb_parameter()) {
        let stmt = sql(&format!("SELECT * FROM t WHERE c = {p}")).unwrap();
        prop_assert_eq!(stmt.tokens().len(), 2);
        prop_assert_eq!(&stmt.tokens()[1], &Token::Parameter(p));
    }

    #[test]
    fn placeholder_count_matches_parameter_count(ps in prop::collection::vec(arb_parameter(), 0..6)) {
        let mut text = String::from("SELECT * FROM t");
        for (i, p) in ps.iter().enumerate() {
            text.push_str(if i == 0 { " WHERE x = " } else { " AND x = " });
            text.push_str(&p.to_string());
        }

        let built = sql(&text).unwrap().to_driver_sql();
        prop_assert_eq!(built.sql.matches('?').count(), ps.len());
        prop_assert_eq!(built.params, ps);
    }

    #[test]
    fn flattening_is_pure(p in arb_parameter()) {
        let stmt = sql(&format!("UPDATE t SET c = {p}")).unwrap();
        prop_assert_eq!(stmt.to_driver_sql(), stmt.to_driver_sql());
        prop_assert_eq!(stmt.to_debug_sql(), stmt.to_debug_sql());
    }

    #[test]
    fn nested_statement_roundtrip(p in arb_parameter(), text in "[a-zA-Z0-9_ =<>']*") {
        let inner = sql(&format!("{text}{p}")).unwrap();
        let outer = sql(&format!("SELECT * FROM t WHERE id IN ({inner})")).unwrap();

        // Splicing adds nothing at the boundary.
        let expected = format!("SELECT * FROM t WHERE id IN ({})", inner.to_debug_sql());
        prop_assert_eq!(outer.to_debug_sql(), expected);
        prop_assert_eq!(outer.to_driver_sql().params, inner.to_driver_sql().params);
    }
}
