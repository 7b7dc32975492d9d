use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use flowers_core::{HashingCost, PasswordHasher};
use tokio::runtime::Runtime;

fn cost_settings() -> Vec<(&'static str, HashingCost)> {
  vec![
    (
      "low_1mib_t1",
      HashingCost {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
      },
    ),
    ("default_19mib_t2", HashingCost::default()),
    (
      "high_64mib_t3",
      HashingCost {
        memory_kib: 65_536,
        iterations: 3,
        parallelism: 1,
      },
    ),
  ]
}

fn bench_hash_by_cost(c: &mut Criterion) {
  let mut group = c.benchmark_group("password_hash");
  group.sample_size(10);
  for (label, cost) in cost_settings() {
    let hasher = PasswordHasher::with_cost(cost).unwrap();
    group.bench_with_input(BenchmarkId::from_parameter(label), &hasher, |b, hasher| {
      b.iter(|| hasher.hash("correct horse battery staple").unwrap());
    });
  }
  group.finish();
}

fn bench_verify_by_cost(c: &mut Criterion) {
  let mut group = c.benchmark_group("password_verify");
  group.sample_size(10);
  for (label, cost) in cost_settings() {
    let hasher = PasswordHasher::with_cost(cost).unwrap();
    let hash = hasher.hash("correct horse battery staple").unwrap();
    group.bench_with_input(BenchmarkId::from_parameter(label), &hash, |b, hash| {
      b.iter(|| assert!(hasher.verify("correct horse battery staple", hash)));
    });
  }
  group.finish();
}

// Offloading to the blocking pool is what request handlers pay per call.
fn bench_verify_async_default(c: &mut Criterion) {
  let rt = Runtime::new().unwrap();
  let hasher = PasswordHasher::new();
  let hash = hasher.hash("correct horse battery staple").unwrap();
  let mut group = c.benchmark_group("password_verify_async");
  group.sample_size(10);
  group.bench_function("default_cost", |b| {
    b.to_async(&rt).iter(|| {
      let hasher = hasher.clone();
      let hash = hash.clone();
      async move { hasher.verify_async("correct horse battery staple".to_string(), hash).await.unwrap() }
    });
  });
  group.finish();
}

criterion_group!(benches, bench_hash_by_cost, bench_verify_by_cost, bench_verify_async_default);
criterion_main!(benches);
