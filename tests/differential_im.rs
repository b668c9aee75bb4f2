//! Replays a sequence of operations against `RrbVector` and `im::Vector`
//! side by side, asserting the two agree after every step. `im::Vector` is
//! a mature, independently-implemented persistent vector, making it a
//! stronger oracle than hand-rolling a second model here.

use im::Vector as ImVector;
use rrbvec::RrbVector;

fn assert_same(rrb: &RrbVector<i32>, model: &ImVector<i32>) {
    assert_eq!(rrb.len(), model.len());
    for i in 0..model.len() {
        assert_eq!(*rrb.get(i).unwrap(), model[i]);
    }
}

#[test]
fn append_insert_remove_set_track_im_vector() {
    let mut rrb: RrbVector<i32> = RrbVector::new();
    let mut model: ImVector<i32> = ImVector::new();

    for i in 0..3000 {
        rrb.append(i).unwrap();
        model.push_back(i);
    }
    assert_same(&rrb, &model);

    for i in (0..model.len()).step_by(37) {
        rrb.set(i, -(i as i32)).unwrap();
        model.set(i, -(i as i32));
    }
    assert_same(&rrb, &model);

    for i in (0..model.len()).step_by(53).rev() {
        let got = rrb.remove(i).unwrap();
        let want = model.remove(i);
        assert_eq!(got, want);
    }
    assert_same(&rrb, &model);

    for i in (0..model.len()).step_by(29) {
        rrb.insert(i, 9000 + i as i32).unwrap();
        model.insert(i, 9000 + i as i32);
    }
    assert_same(&rrb, &model);
}

#[test]
fn fork_then_mutate_each_lineage_tracks_its_own_im_model() {
    let mut rrb: RrbVector<i32> = (0..2000).collect();
    let mut model: ImVector<i32> = (0..2000).collect();

    let mut rrb_fork = rrb.fork();
    let model_fork = model.clone();

    for i in 0..500 {
        rrb.set(i, -1).unwrap();
        model.set(i, -1);
    }
    for i in 1500..2000 {
        rrb_fork.set(i, -2).unwrap();
    }
    let mut model_fork_mutated = model_fork.clone();
    for i in 1500..2000 {
        model_fork_mutated.set(i, -2);
    }

    assert_same(&rrb, &model);
    assert_same(&rrb_fork, &model_fork_mutated);
}

#[cfg(feature = "proptest")]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum Op {
        Append(i32),
        Insert(usize, i32),
        Remove(usize),
        Set(usize, i32),
        RemoveRange(usize, usize),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            any::<i32>().prop_map(Op::Append),
            (0usize..2000, any::<i32>()).prop_map(|(i, x)| Op::Insert(i, x)),
            (0usize..2000).prop_map(Op::Remove),
            (0usize..2000, any::<i32>()).prop_map(|(i, x)| Op::Set(i, x)),
            (0usize..2000, 0usize..2000).prop_map(|(a, b)| Op::RemoveRange(a, b)),
        ]
    }

    proptest! {
        #[test]
        fn random_ops_match_im_vector(ops in prop::collection::vec(op_strategy(), 1..400)) {
            let mut rrb: RrbVector<i32> = RrbVector::new();
            let mut model: ImVector<i32> = ImVector::new();

            for op in ops {
                match op {
                    Op::Append(x) => {
                        rrb.append(x).unwrap();
                        model.push_back(x);
                    }
                    Op::Insert(i, x) => {
                        let i = if model.is_empty() { 0 } else { i % (model.len() + 1) };
                        rrb.insert(i, x).unwrap();
                        model.insert(i, x);
                    }
                    Op::Remove(i) => {
                        if !model.is_empty() {
                            let i = i % model.len();
                            let got = rrb.remove(i).unwrap();
                            let want = model.remove(i);
                            prop_assert_eq!(got, want);
                        }
                    }
                    Op::Set(i, x) => {
                        if !model.is_empty() {
                            let i = i % model.len();
                            rrb.set(i, x).unwrap();
                            model.set(i, x);
                        }
                    }
                    Op::RemoveRange(a, b) => {
                        if !model.is_empty() {
                            let len = model.len();
                            let lo = a % (len + 1);
                            let hi = b % (len + 1);
                            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
                            rrb.remove_range(lo, hi).unwrap();
                            let right = model.split_off(hi);
                            model.truncate(lo);
                            model.extend(right);
                        }
                    }
                }
            }

            prop_assert_eq!(rrb.len(), model.len());
            for i in 0..model.len() {
                prop_assert_eq!(*rrb.get(i).unwrap(), model[i]);
            }
        }
    }
}
