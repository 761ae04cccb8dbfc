//! Benchmarks for `procsys`. See `benches/`.
