#![cfg(loom)]

use loom::thread;
use procsys::core::Ref;
use procsys::erts::Env;
use procsys::erts::EnvConfig;
use procsys::erts::Environment;
use std::sync::Arc;

#[test]
fn make_ref_unique() {
  loom::model(|| {
    let env: Arc<Env> = Env::new(EnvConfig::default());

    let threads: Vec<_> = (0..2)
      .map(|_| {
        let env: Arc<Env> = Arc::clone(&env);

        thread::spawn(move || [env.make_ref(), env.make_ref()])
      })
      .collect();

    let mut refs: Vec<Ref> = threads
      .into_iter()
      .flat_map(|handle| handle.join().unwrap())
      .collect();

    refs.sort();
    refs.dedup();

    assert_eq!(refs.len(), 4, "duplicate reference allocated");
    assert!(refs.iter().all(|mref| mref.env() == env.id()));
  });
}

#[test]
fn make_ref_monotonic_per_thread() {
  loom::model(|| {
    let env: Arc<Env> = Env::new(EnvConfig::default());

    let t1 = {
      let env: Arc<Env> = Arc::clone(&env);

      thread::spawn(move || {
        let a: Ref = env.make_ref();
        let b: Ref = env.make_ref();

        assert!(a.number() < b.number(), "reference numbers went backwards");
      })
    };

    let last: Ref = env.make_ref();

    t1.join().unwrap();

    assert!(env.make_ref().number() > last.number());
  });
}
