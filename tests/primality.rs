//! End-to-end checks through the public API on both executor backends

use num_bigint::BigUint;
use num_traits::Zero;
use primepulse::executor::{Executor, RayonExecutor, WorkerPool};
use primepulse::prime::{CheckOptions, PartitionMode, PrimeProcessor, TrialDivisionTester};
use primepulse::CheckError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SMALL_PRIMES: &[u64] = &[
    3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293,
];

fn backends() -> Vec<(&'static str, Box<dyn Executor>)> {
    vec![
        ("pool", Box::new(WorkerPool::new(4).unwrap())),
        ("rayon", Box::new(RayonExecutor::new(4).unwrap())),
    ]
}

fn is_prime_naive(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    let mut d = 2;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 1;
    }
    true
}

#[test]
fn small_number_scenarios() {
    for (name, executor) in backends() {
        let executor = executor.as_ref();

        let mut t = TrialDivisionTester::new(BigUint::from(4u32));
        assert!(!t.is_prime(executor, 4).unwrap(), "{}", name);
        assert_eq!(t.factor(), Some(&BigUint::from(2u32)));

        let mut t = TrialDivisionTester::new(BigUint::from(97u32));
        assert!(t.is_prime(executor, 4).unwrap(), "{}", name);
        assert_eq!(t.factor(), None);

        let mut t = TrialDivisionTester::new(BigUint::from(91u32));
        assert!(!t.is_prime(executor, 4).unwrap(), "{}", name);
        let factor = t.factor().unwrap();
        assert!(*factor == BigUint::from(7u32) || *factor == BigUint::from(13u32));
        assert!((BigUint::from(91u32) % factor).is_zero());

        let mut t = TrialDivisionTester::new(BigUint::from(29u32));
        assert!(t.is_prime(executor, 10).unwrap(), "{}", name);

        let mut t = TrialDivisionTester::new(BigUint::from(97u32));
        assert!(matches!(t.is_prime(executor, 0), Err(CheckError::InvalidParallelism(0))));
    }
}

#[test]
fn odd_numbers_match_naive_test() {
    for (name, executor) in backends() {
        for n in (3u64..2_000).step_by(2) {
            for parallelism in [1usize, 3, 8] {
                let mut t = TrialDivisionTester::new(BigUint::from(n));
                let prime = t.is_prime(executor.as_ref(), parallelism).unwrap();
                assert_eq!(prime, is_prime_naive(n), "{}: n = {}, p = {}", name, n, parallelism);
                if let Some(f) = t.factor() {
                    assert!((BigUint::from(n) % f).is_zero());
                    assert!(*f != BigUint::from(1u32) && *f != BigUint::from(n));
                }
            }
        }
    }
}

#[test]
fn random_semiprimes_have_dividing_factor() {
    let pool = WorkerPool::new(4).unwrap();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..50 {
        let a = SMALL_PRIMES[rng.gen_range(0..SMALL_PRIMES.len())];
        let b = SMALL_PRIMES[rng.gen_range(0..SMALL_PRIMES.len())];
        let n = BigUint::from(a * b);
        let parallelism = rng.gen_range(1..=16);

        let mut t = TrialDivisionTester::new(n.clone());
        assert!(!t.is_prime(&pool, parallelism).unwrap(), "n = {}", n);
        let factor = t.factor().unwrap();
        assert!((&n % factor).is_zero(), "{} does not divide {}", factor, n);
    }
}

#[test]
fn exhaustive_mode_matches_reference_verdicts() {
    let pool = WorkerPool::new(4).unwrap();
    for n in (101u64..1_500).step_by(2) {
        let reference = TrialDivisionTester::new(BigUint::from(n))
            .is_prime_with(&pool, &CheckOptions::new(7))
            .unwrap();
        let exhaustive = TrialDivisionTester::new(BigUint::from(n))
            .is_prime_with(&pool, &CheckOptions::new(7).with_partition(PartitionMode::Exhaustive))
            .unwrap();
        assert_eq!(reference, exhaustive, "n = {}", n);
    }
}

#[test]
fn beyond_u64_composite() {
    // (2^64 + 13) * 3 has the small factor 3 in the first sub-range
    let n = ((BigUint::from(1u32) << 64usize) + BigUint::from(13u32)) * BigUint::from(3u32);
    let pool = WorkerPool::new(4).unwrap();

    let mut t = TrialDivisionTester::new(n.clone());
    assert!(!t.is_prime(&pool, 4).unwrap());
    assert!((&n % t.factor().unwrap()).is_zero());
}
