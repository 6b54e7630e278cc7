use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::OsRng;
use sigma_tree::group;
use sigma_tree::prover::{prove, SecretSet};
use sigma_tree::proof_serializer::serialize_proof;
use sigma_tree::sigma_boolean::SigmaBoolean;
use sigma_tree::sigma_leaf::SigmaLeaf;
use sigma_tree::verifier::verify;

fn dlog_leaf(witness: group::Scalar) -> SigmaBoolean {
    let h = group::exp(group::generator(), witness);
    SigmaBoolean::Leaf(SigmaLeaf::ProveDlog { h })
}

fn bench_leaf(c: &mut Criterion) {
    let mut rng = OsRng;
    let w = group::random_scalar(&mut rng);
    let prop = dlog_leaf(w);
    let mut secrets = SecretSet::new();
    secrets.push(w);

    c.bench_function("prove/leaf", |b| {
        b.iter(|| prove(&prop, &secrets, &[], b"bench", &mut rng).unwrap())
    });

    let tree = prove(&prop, &secrets, &[], b"bench", &mut rng).unwrap();
    let bytes = serialize_proof(&tree).unwrap();
    c.bench_function("verify/leaf", |b| {
        b.iter(|| verify(&prop, b"bench", &bytes).unwrap())
    });
}

fn bench_and(c: &mut Criterion) {
    let mut rng = OsRng;
    let w1 = group::random_scalar(&mut rng);
    let w2 = group::random_scalar(&mut rng);
    let prop = SigmaBoolean::And(vec![dlog_leaf(w1), dlog_leaf(w2)]);
    let mut secrets = SecretSet::new();
    secrets.push(w1);
    secrets.push(w2);

    c.bench_function("prove/and-2", |b| {
        b.iter(|| prove(&prop, &secrets, &[], b"bench", &mut rng).unwrap())
    });

    let tree = prove(&prop, &secrets, &[], b"bench", &mut rng).unwrap();
    let bytes = serialize_proof(&tree).unwrap();
    c.bench_function("verify/and-2", |b| {
        b.iter(|| verify(&prop, b"bench", &bytes).unwrap())
    });
}

fn bench_or(c: &mut Criterion) {
    let mut rng = OsRng;
    let w1 = group::random_scalar(&mut rng);
    let w2_unknown = group::random_scalar(&mut rng);
    let prop = SigmaBoolean::Or(vec![dlog_leaf(w1), dlog_leaf(w2_unknown)]);
    let mut secrets = SecretSet::new();
    secrets.push(w1);

    c.bench_function("prove/or-2", |b| {
        b.iter(|| prove(&prop, &secrets, &[], b"bench", &mut rng).unwrap())
    });

    let tree = prove(&prop, &secrets, &[], b"bench", &mut rng).unwrap();
    let bytes = serialize_proof(&tree).unwrap();
    c.bench_function("verify/or-2", |b| {
        b.iter(|| verify(&prop, b"bench", &bytes).unwrap())
    });
}

fn bench_threshold(c: &mut Criterion) {
    let mut rng = OsRng;
    let w1 = group::random_scalar(&mut rng);
    let w2 = group::random_scalar(&mut rng);
    let w3_unknown = group::random_scalar(&mut rng);
    let prop = SigmaBoolean::Threshold(2, vec![dlog_leaf(w1), dlog_leaf(w2), dlog_leaf(w3_unknown)]);
    let mut secrets = SecretSet::new();
    secrets.push(w1);
    secrets.push(w2);

    c.bench_function("prove/threshold-2-of-3", |b| {
        b.iter(|| prove(&prop, &secrets, &[], b"bench", &mut rng).unwrap())
    });

    let tree = prove(&prop, &secrets, &[], b"bench", &mut rng).unwrap();
    let bytes = serialize_proof(&tree).unwrap();
    c.bench_function("verify/threshold-2-of-3", |b| {
        b.iter(|| verify(&prop, b"bench", &bytes).unwrap())
    });
}

criterion_group!(benches, bench_leaf, bench_and, bench_or, bench_threshold);
criterion_main!(benches);
