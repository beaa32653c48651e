use super::*;

use crate::node::Node;
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;

/// Number of elements held by the internal subtree at `node`, whose slots are
/// indexed with `shift`. Asserts the rightmost-dense shape on the way.
fn validate_subtree<T>(node: &Node<T>, shift: u32, p: &VectorParameters, is_root: bool) -> usize {
    assert!(
        matches!(node, Node::Internal(_)),
        "expected internal node at shift {shift}"
    );
    let children = node.children();
    assert_eq!(children.len(), p.internal_width());
    if !is_root {
        assert!(
            !children[0].is_empty(),
            "internal node with no children must be Empty (shift {shift})"
        );
    }

    let live = children.iter().take_while(|c| !c.is_empty()).count();
    assert!(
        children[live..].iter().all(Node::is_empty),
        "gap among children at shift {shift}"
    );

    let child_capacity = 1usize << shift;
    let mut total = 0usize;
    for (i, child) in children[..live].iter().enumerate() {
        let size = if shift == p.leaf_shift() {
            assert!(matches!(child, Node::Leaf(_)), "expected leaf below shift {shift}");
            assert_eq!(child.values().len(), p.leaf_width(), "trie leaves must be full");
            p.leaf_width()
        } else {
            validate_subtree(child, shift - p.internal_shift(), p, false)
        };
        if i + 1 < live {
            assert_eq!(size, child_capacity, "only the rightmost child may be partial");
        }
        total += size;
    }
    total
}

pub(crate) fn validate_vector<T>(v: &Vector<T>) {
    let p = v.params;
    assert!(v.shift >= p.leaf_shift());
    assert_eq!((v.shift - p.leaf_shift()) % p.internal_shift(), 0);

    assert!(matches!(v.tail, Node::Leaf(_)), "tail must be a leaf");
    let tail_len = v.tail.values().len();
    assert_eq!(tail_len, v.count - v.tail_offset());
    assert_eq!(tail_len == 0, v.count == 0, "tail is empty only when the vector is");

    let trie_len = validate_subtree(&v.root, v.shift, &p, true);
    assert_eq!(trie_len, v.tail_offset());

    if v.shift > p.leaf_shift() {
        assert!(
            !v.root.children()[1].is_empty(),
            "root is taller than needed"
        );
    }
}

fn isolated(leaf_shift: u32, internal_shift: u32) -> Vector<u32> {
    let params = VectorParameters::new(leaf_shift, internal_shift).unwrap();
    Vector::with_tag_source(params, Arc::new(TagSource::new()))
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 8)]
    Push(u32),
    #[proptest(weight = 4)]
    Pop,
    #[proptest(weight = 3)]
    Set(usize, u32),
    #[proptest(weight = 2)]
    Get(usize),
    #[proptest(weight = 1)]
    Fork,
    #[proptest(weight = 1)]
    Switch(usize),
}

const MAX_LINEAGES: usize = 8;

fn run_ops(mut root: Vector<u32>, ops: Vec<Op>) -> std::result::Result<(), TestCaseError> {
    let mut lineages: Vec<(Vector<u32>, Vec<u32>)> = Vec::new();
    let initial_shift = root.shift();
    lineages.push((root.fork(), Vec::new()));
    let mut cur = 0usize;

    for op in ops {
        let (v, m) = &mut lineages[cur];
        match op {
            Op::Push(x) => {
                v.push(x);
                m.push(x);
            }
            Op::Pop => {
                prop_assert_eq!(v.try_pop(), m.pop());
            }
            Op::Set(i, x) => {
                if m.is_empty() {
                    prop_assert!(v.set(i, x).is_err());
                } else {
                    let i = i % m.len();
                    v.set(i, x).unwrap();
                    m[i] = x;
                }
            }
            Op::Get(i) => {
                let i = i % (m.len() + 1);
                prop_assert_eq!(v.get(i).ok(), m.get(i));
            }
            Op::Fork => {
                if lineages.len() < MAX_LINEAGES {
                    let (v, m) = &mut lineages[cur];
                    let forked = (v.fork(), m.clone());
                    lineages.push(forked);
                }
            }
            Op::Switch(k) => {
                cur = k % lineages.len();
            }
        }
        prop_assert_eq!(lineages[cur].0.len(), lineages[cur].1.len());
    }

    for (v, m) in &lineages {
        validate_vector(v);
        let got: Vec<u32> = v.iter().copied().collect();
        prop_assert_eq!(&got, m);
    }

    // The unused original is untouched by everything above.
    prop_assert!(root.is_empty());
    prop_assert_eq!(root.shift(), initial_shift);
    validate_vector(&root);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_lineages_match_models(
        leaf_shift in 1u32..=3,
        internal_shift in 1u32..=3,
        ops in prop::collection::vec(any::<Op>(), 0..=1500),
    ) {
        run_ops(isolated(leaf_shift, internal_shift), ops)?;
    }

    #[test]
    fn prop_push_then_pop_restores(
        leaf_shift in 1u32..=3,
        internal_shift in 1u32..=3,
        prefix in prop::collection::vec(any::<u32>(), 0..=200),
        value in any::<u32>(),
    ) {
        let mut v = isolated(leaf_shift, internal_shift);
        v.extend(prefix.iter().copied());
        let before = v.len();

        v.push(value);
        prop_assert_eq!(v.try_pop(), Some(value));
        prop_assert_eq!(v.len(), before);
        validate_vector(&v);
        prop_assert!(v.iter().copied().eq(prefix.iter().copied()));
    }

    #[test]
    fn prop_height_round_trip(
        leaf_shift in 1u32..=3,
        internal_shift in 1u32..=3,
        k in 0usize..=600,
    ) {
        let mut v = isolated(leaf_shift, internal_shift);
        let initial = v.shift();
        for i in 0..k {
            v.push(i as u32);
        }
        validate_vector(&v);
        for i in (0..k).rev() {
            prop_assert_eq!(v.try_pop(), Some(i as u32));
        }
        prop_assert_eq!(v.len(), 0);
        prop_assert_eq!(v.shift(), initial);
        validate_vector(&v);
    }

    #[test]
    fn prop_set_touches_one_index(
        len in 1usize..=300,
        index in any::<usize>(),
        value in any::<u32>(),
    ) {
        let mut v = isolated(2, 2);
        v.extend((0..len).map(|i| i as u32));
        let index = index % len;
        let mut fork = v.fork();

        fork.set(index, value).unwrap();
        for i in 0..len {
            let expected = if i == index { value } else { i as u32 };
            prop_assert_eq!(fork[i], expected);
            prop_assert_eq!(v[i], i as u32);
        }
        validate_vector(&fork);
    }
}

#[test]
fn bulk_push_across_three_root_growths() {
    // Leaf width 4, fan-out 4: the root grows when the trie passes 16, 64 and
    // 256 elements.
    let mut v = isolated(2, 2);
    let mut shifts = vec![v.shift()];
    for i in 0..300u32 {
        v.push(i);
        if *shifts.last().unwrap() != v.shift() {
            shifts.push(v.shift());
        }
    }
    assert_eq!(shifts, vec![2, 4, 6, 8]);
    validate_vector(&v);
    for j in 0..300 {
        assert_eq!(v[j], j as u32);
    }
}

#[test]
fn fork_of_fork_chain() {
    let mut base = isolated(1, 2);
    base.extend(0..100);
    let mut generations = Vec::new();
    let mut cur = base.fork();
    for g in 0..10u32 {
        cur.set(g as usize, 1000 + g).unwrap();
        cur.push(2000 + g);
        let next = cur.fork();
        generations.push(std::mem::replace(&mut cur, next));
    }

    for (g, v) in generations.iter().enumerate() {
        validate_vector(v);
        assert_eq!(v.len(), 101 + g);
        for i in 0..=g {
            assert_eq!(v[i], 1000 + i as u32);
        }
        assert_eq!(v[g + 1], (g + 1) as u32);
        assert_eq!(*v.last().unwrap(), 2000 + g as u32);
    }
    assert!(base.iter().copied().eq(0..100));
}

#[test]
fn seeded_random_stress() {
    let mut rng = StdRng::seed_from_u64(0x5eed_f0c4);
    for round in 0..20 {
        let leaf_shift = rng.gen_range(1..=4);
        let internal_shift = rng.gen_range(1..=4);
        let ops: Vec<Op> = (0..4000)
            .map(|_| match rng.gen_range(0..100) {
                0..=49 => Op::Push(rng.gen()),
                50..=79 => Op::Pop,
                80..=89 => Op::Set(rng.gen(), rng.gen()),
                90..=95 => Op::Get(rng.gen()),
                96..=97 => Op::Fork,
                _ => Op::Switch(rng.gen()),
            })
            .collect();
        if let Err(err) = run_ops(isolated(leaf_shift, internal_shift), ops) {
            panic!("round {round} ({leaf_shift}, {internal_shift}): {err}");
        }
    }
}
