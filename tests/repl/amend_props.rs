use nestrepl::repl::{ExpressionBuffer, IndexBase, LineRange, ReplError};
use proptest::prelude::*;
use proptest::sample::Index;

fn buffer(lines: &[String]) -> ExpressionBuffer {
    let mut buffer = ExpressionBuffer::new();
    for line in lines {
        buffer.push_line(line);
    }
    buffer
}

proptest! {
    #[test]
    fn amend_matches_a_vec_model(
        lines in prop::collection::vec("[a-z]{1,5}", 1..8),
        a in any::<Index>(),
        b in any::<Index>(),
        delete in any::<bool>(),
        from_end in any::<bool>(),
    ) {
        let len = lines.len();
        let (x, y) = (a.index(len), b.index(len));
        let (start, end) = (x.min(y), x.max(y));

        // one-based from the front, or negative from the back
        let typed = |i: usize| if from_end { i as isize - len as isize } else { i as isize + 1 };
        let range = LineRange::inclusive(typed(start), typed(end));

        let replacement = if delete { ExpressionBuffer::DELETE } else { "replaced" };
        let mut amended = buffer(&lines);
        amended.amend(&range, IndexBase::One, replacement).unwrap();

        let mut model = lines.clone();
        model.drain(start..=end);
        if !delete {
            model.insert(start, "replaced".to_string());
        }
        let expected = buffer(&model);
        prop_assert_eq!(amended.as_str(), expected.as_str());
    }

    #[test]
    fn out_of_range_leaves_buffer_untouched(
        lines in prop::collection::vec("[a-z]{1,5}", 1..8),
        past in 1isize..5,
    ) {
        let mut amended = buffer(&lines);
        let range = LineRange::single(lines.len() as isize + past);
        let result = amended.amend(&range, IndexBase::One, "x");
        prop_assert!(matches!(result, Err(ReplError::AmendOutOfRange { .. })), "expected AmendOutOfRange");
        prop_assert_eq!(amended, buffer(&lines));
    }
}
