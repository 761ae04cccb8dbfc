use criterion::BenchmarkGroup;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::criterion_group;
use criterion::criterion_main;
use procsys::erts::Env;
use procsys::erts::EnvConfig;
use procsys::erts::Environment;
use std::hint::black_box;
use std::sync::Arc;
use std::sync::Barrier;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;
use std::time::Instant;

const THREADS: &[usize] = &[2, 4, 8];

fn bench_make_ref(criterion: &mut Criterion) {
  let mut group: BenchmarkGroup<_> = criterion.benchmark_group("make_ref");
  let env: Arc<Env> = Env::new(EnvConfig::default());

  group.bench_function("single-threaded", |bench| {
    bench.iter(|| black_box(env.make_ref()))
  });

  for threads in THREADS {
    let id: BenchmarkId = BenchmarkId::new("contended", threads);

    group.bench_with_input(id, threads, |bench, &threads| {
      bench.iter_custom(|iters| {
        let barrier: Arc<Barrier> = Arc::new(Barrier::new(threads + 1));

        let handles: Vec<JoinHandle<Duration>> = (0..threads)
          .map(|_| {
            let barrier: Arc<Barrier> = Arc::clone(&barrier);
            let env: Arc<Env> = Arc::clone(&env);

            thread::spawn(move || {
              barrier.wait();

              let start: Instant = Instant::now();

              for _ in 0..iters {
                black_box(env.make_ref());
              }

              start.elapsed()
            })
          })
          .collect();

        barrier.wait();

        handles.into_iter().map(|handle| handle.join().unwrap()).sum()
      })
    });
  }

  group.finish();
}

criterion_group! {
  name = benches;
  config = Criterion::default();
  targets = bench_make_ref
}

criterion_main!(benches);
