//! The `slice2cs` generator through a full cycle.

use slicedep_lib::evaluate::evaluate;
use slicedep_lib::orchestrate::{BatchOptions, evaluate_all};
use slicedep_lib::record::{self, RecordLoad};

use super::common::{TestEnv, touch_future};

#[tokio::test]
async fn csharp_generation_records_and_settles() {
  let env = TestEnv::csharp();
  let included = env.write_file("slice/Types.ice", "module Types {}\n");
  env.report_dependencies(&[&included]);
  let source = env.source("Foo.ice");

  let first = evaluate(&env.ctx, &source);
  assert!(first.build_required);
  assert_eq!(first.outputs, vec![env.root().join("out/Foo.cs")]);

  let batch = evaluate_all(&env.ctx, std::slice::from_ref(&source), &BatchOptions::default()).await;
  assert!(batch.is_success());
  assert!(env.root().join("out/Foo.cs").exists());

  let record_path = env.root().join("out/slice2cs.Foo.d");
  assert_eq!(env.ctx.record_path(&source), record_path);
  let RecordLoad::Found(stored) = record::load(&record_path) else {
    panic!("record was not written");
  };
  assert_eq!(stored.depends_on, vec![included.clone()]);
  assert!(!stored.options.contains_key("HeaderExt"));

  let second = evaluate(&env.ctx, &source);
  assert!(!second.build_required);
  assert!(second.inputs.contains(&included));
  assert!(second.inputs.contains(&env.generator()));

  touch_future(&included);
  assert!(evaluate(&env.ctx, &source).build_required);
}
