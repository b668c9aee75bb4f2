use rrbvec::RrbVector;

// S3: a range fork is element-equal to the plain sub-range it denotes.
#[test]
fn sublist_fork_matches_plain_range() {
    let l: RrbVector<i64> = (0..10_000).collect();
    let sub = l.fork_range(100, 9_900).unwrap();
    let expected: Vec<i64> = (100..9_900).collect();
    assert_eq!(sub.len(), expected.len());
    for (i, want) in expected.iter().enumerate() {
        assert_eq!(sub.get(i).unwrap(), want);
    }
}

#[test]
fn fork_range_of_whole_sequence_matches_original() {
    let l: RrbVector<i64> = (0..2_000).collect();
    let sub = l.fork_range(0, l.len()).unwrap();
    assert_eq!(sub.len(), l.len());
    for i in 0..l.len() {
        assert_eq!(sub.get(i).unwrap(), l.get(i).unwrap());
    }
}

#[test]
fn fork_range_empty_span_is_empty() {
    let l: RrbVector<i64> = (0..100).collect();
    let sub = l.fork_range(40, 40).unwrap();
    assert_eq!(sub.len(), 0);
}
