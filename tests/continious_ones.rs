use std::{iter, panic};

use rand::seq::SliceRandom;
use rand::{thread_rng, Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64;

use ::pqr_tree::{PQRTree, ReductionError};

#[test]
fn consecutive_ones_test() {
    let base = thread_rng().next_u64();
    for (i, seed) in (0..1000).map(|i| (i, base.wrapping_add(i))) {
        let mut rng = Pcg64::seed_from_u64(seed);
        let rows = rng.gen_range(2..=16);
        let cols = rng.gen_range(2..=16);
        // Every fourth matrix gets columns that need not be intervals.
        let arbitrary = i % 4 == 3;

        if panic::catch_unwind(|| consecutive_ones_test_iter(rows, cols, arbitrary, seed)).is_err() {
            panic!("{rows}x{cols} matrix (arbitrary columns: {arbitrary}) failed with seed {seed}");
        }
    }
}

fn consecutive_ones_test_iter(rows: usize, cols: usize, arbitrary: bool, seed: u64) {
    let mut rng = Pcg64::seed_from_u64(seed);

    let mut data = vec![vec![0; cols]; rows];

    for col in 0..cols {
        if arbitrary {
            data.iter_mut().for_each(|r| r[col] = rng.gen_range(0..=1));
            data[rng.gen_range(0..rows)][col] = 1;
        } else {
            let s = rng.gen_range(0..rows);
            let e = rng.gen_range((s + 1)..=rows);
            data[s..e].iter_mut().for_each(|r| r[col] = 1);
        }
    }

    data.shuffle(&mut rng);

    let mut pq = PQRTree::new(rows);
    for c in 0..cols {
        let s = (0..rows).filter(|&r| data[r][c] == 1).collect::<Vec<usize>>();
        assert_ne!(s.len(), 0);
        pq.reduce(&s).unwrap();
    }

    let mut frontier = pq.frontier();
    if !pq.is_feasible() {
        assert!(arbitrary, "{pq}");
        frontier.sort();
        assert_eq!(frontier, (0..rows).collect::<Vec<usize>>());
        return;
    }

    assert_eq!(frontier.len(), rows);
    for c in 0..cols {
        let changes = frontier
            .iter()
            .map(|&r| data[r][c])
            .chain(iter::once(0))
            .fold((0, 0), |(prev, acc), curr| (curr, if curr == prev { acc } else { acc + 1 }))
            .1;

        assert_eq!(changes, 2, "column {c} split in {pq}");
    }
}

#[test]
fn earlier_constraints_stay_consecutive() {
    let constraints: [&[char]; 4] = [&['a', 'b', 'c'], &['c', 'd', 'e'], &['e', 'f'], &['b', 'c', 'd']];

    let mut tree = PQRTree::from_leaves(&['a', 'b', 'c', 'd', 'e', 'f', 'g']).unwrap();
    for (i, constraint) in constraints.iter().enumerate() {
        tree.reduce(constraint).unwrap();
        println!("{tree}");

        let frontier = tree.frontier();
        for earlier in &constraints[..=i] {
            let positions: Vec<usize> =
                earlier.iter().map(|l| frontier.iter().position(|f| f == l).unwrap()).collect();
            let span = positions.iter().max().unwrap() - positions.iter().min().unwrap();
            assert_eq!(span + 1, earlier.len(), "{earlier:?} split in {tree}");
        }
    }
    assert!(tree.is_feasible());
}

#[test]
fn rendering_is_stable() {
    let mut tree = PQRTree::new(8);
    for constraint in [&[1, 2, 3][..], &[3, 4], &[0, 1], &[5, 6, 7], &[4, 5]] {
        tree.reduce(constraint).unwrap();
        assert_eq!(tree.to_string(), tree.to_string());
    }

    let mut labels: Vec<String> = tree
        .to_string()
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    labels.sort_by_key(|l| l.parse::<usize>().unwrap());
    assert_eq!(labels, (0..8).map(|l| l.to_string()).collect::<Vec<String>>());
}

#[test]
fn invalid_labels() {
    let mut tree = PQRTree::new(3);
    assert_eq!(tree.reduce(&[0, 3]), Err(ReductionError::LeafNotFound(3)));
    assert_eq!(tree.reduce(&[2, 2]), Err(ReductionError::DuplicateLeaf(2)));
    assert_eq!(tree.reduce(&[1, 2, 2]).unwrap_err().to_string(), "leaf 2 appears more than once in the constraint");
    assert_eq!(tree.to_string(), "(0 1 2)");
}
