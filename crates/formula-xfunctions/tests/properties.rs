use formula_xfunctions::modes::escape_wildcards;
use formula_xfunctions::{
    ArgValue, Array, InvalidReason, MatchOutcome, Projected, ReferenceHost, Value, XFunctions,
};
use proptest::prelude::*;

fn fns() -> XFunctions<ReferenceHost> {
    XFunctions::new(ReferenceHost::new())
}

fn xmatch(
    lookup: f64,
    values: &[f64],
    as_row: bool,
    match_mode: f64,
    search_mode: f64,
) -> MatchOutcome {
    let values: Vec<Value> = values.iter().copied().map(Value::Number).collect();
    let array = if as_row {
        Array::row(values)
    } else {
        Array::column(values)
    };
    fns().xmatch(
        ArgValue::number(lookup),
        ArgValue::Array(array),
        ArgValue::number(match_mode),
        ArgValue::number(search_mode),
    )
}

fn arb_distinct(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::btree_set(-1000i32..1000, 1..max_len)
        .prop_map(|set| set.into_iter().map(f64::from).collect::<Vec<_>>())
        .prop_shuffle()
}

fn arb_sorted(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-50i32..50, 1..max_len).prop_map(|mut v| {
        v.sort_unstable();
        v.into_iter().map(f64::from).collect()
    })
}

proptest! {
    #[test]
    fn unique_values_are_found_at_their_index(
        values in arb_distinct(24),
        pick in any::<prop::sample::Index>(),
        as_row in any::<bool>(),
    ) {
        let idx = pick.index(values.len());
        for search in [1.0, -1.0] {
            prop_assert_eq!(
                xmatch(values[idx], &values, as_row, 0.0, search),
                MatchOutcome::Found(idx + 1)
            );
        }
    }

    #[test]
    fn native_and_scan_agree_on_ascending_input(values in arb_sorted(24), lookup in -60i32..60) {
        let lookup = f64::from(lookup);
        let native = xmatch(lookup, &values, true, -1.0, 2.0);
        let scanned = xmatch(lookup, &values, true, -1.0, 1.0);
        prop_assert_eq!(native, scanned);
    }

    #[test]
    fn native_and_scan_agree_on_descending_input(values in arb_sorted(24), lookup in -60i32..60) {
        let mut values = values;
        values.reverse();
        let lookup = f64::from(lookup);
        let native = xmatch(lookup, &values, false, 1.0, -2.0);
        let scanned = xmatch(lookup, &values, false, 1.0, 1.0);
        prop_assert_eq!(native, scanned);
    }

    #[test]
    fn exact_binary_agrees_with_forward_exact_on_sorted_input(
        values in arb_sorted(24),
        lookup in -60i32..60,
    ) {
        let lookup = f64::from(lookup);
        prop_assert_eq!(
            xmatch(lookup, &values, true, 0.0, 2.0),
            xmatch(lookup, &values, true, 0.0, 1.0)
        );
    }

    #[test]
    fn reverse_exact_reports_the_last_occurrence(
        values in prop::collection::vec(0i32..5, 1..20),
        lookup in 0i32..5,
    ) {
        let values: Vec<f64> = values.into_iter().map(f64::from).collect();
        let lookup = f64::from(lookup);
        let expected = match values.iter().rposition(|v| *v == lookup) {
            Some(idx) => MatchOutcome::Found(idx + 1),
            None => MatchOutcome::NotFound,
        };
        prop_assert_eq!(xmatch(lookup, &values, true, 0.0, -1.0), expected);
    }

    #[test]
    fn escaping_leaves_plain_text_alone(text in "[a-zA-Z0-9 .,_-]{0,16}") {
        prop_assert_eq!(escape_wildcards(&text), text.as_str());
    }

    #[test]
    fn blocks_are_never_vectors(rows in 2usize..6, cols in 2usize..6) {
        let array = Array::new(rows, cols, vec![Value::Number(1.0); rows * cols]);
        prop_assert_eq!(
            fns().xmatch(
                ArgValue::number(1.0),
                ArgValue::Array(array),
                ArgValue::Missing,
                ArgValue::Missing,
            ),
            MatchOutcome::InvalidRequest(InvalidReason::NotAVector)
        );
    }

    #[test]
    fn lookup_round_trips_through_an_identical_column(values in arb_distinct(16)) {
        let cells: Vec<Value> = values.iter().copied().map(Value::Number).collect();
        for (i, cell) in cells.iter().enumerate() {
            let out = fns().xlookup(
                ArgValue::Scalar(cell.clone()),
                ArgValue::Array(Array::column(cells.clone())),
                ArgValue::Array(Array::column(cells.clone())),
                ArgValue::Missing,
                ArgValue::Missing,
            );
            prop_assert_eq!(out, Ok(Projected::Array(Array::row(vec![cells[i].clone()]))));
        }
    }
}
