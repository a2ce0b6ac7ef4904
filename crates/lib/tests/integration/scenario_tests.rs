//! A single source through its whole lifecycle.

use slicedep_lib::evaluate::evaluate;
use slicedep_lib::generator::OptionMap;
use slicedep_lib::orchestrate::{BatchOptions, evaluate_all};
use slicedep_lib::record::{self, RecordLoad};

use super::common::TestEnv;

fn options(pairs: &[(&str, &str)]) -> OptionMap {
  pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[tokio::test]
async fn foo_from_scratch_then_header_extension_change() {
  let env = TestEnv::new();
  let mut source = env.source("Foo.ice");

  let first = evaluate(&env.ctx, &source);
  assert!(first.build_required);
  assert_eq!(
    first.outputs,
    vec![env.root().join("out/Foo.cpp"), env.root().join("out/Foo.h")]
  );

  let batch = evaluate_all(&env.ctx, std::slice::from_ref(&source), &BatchOptions::default()).await;
  assert!(batch.is_success());

  let RecordLoad::Found(stored) = record::load(&env.ctx.record_path(&source)) else {
    panic!("record was not written");
  };
  assert_eq!(stored.source_path, "Foo.ice");
  assert!(stored.depends_on.is_empty());
  assert_eq!(
    stored.options,
    options(&[("OutputDir", "out"), ("SourceExt", "cpp"), ("HeaderExt", "h")])
  );

  let second = evaluate(&env.ctx, &source);
  assert!(!second.build_required);
  assert_eq!(second.outputs, first.outputs);

  source.options.header_ext = "hpp".to_string();
  let third = evaluate(&env.ctx, &source);
  assert!(third.build_required);
  assert_eq!(
    third.outputs,
    vec![env.root().join("out/Foo.cpp"), env.root().join("out/Foo.hpp")]
  );

  let batch = evaluate_all(&env.ctx, std::slice::from_ref(&source), &BatchOptions::default()).await;
  assert!(batch.is_success());
  assert!(env.root().join("out/Foo.hpp").exists());

  let RecordLoad::Found(stored) = record::load(&env.ctx.record_path(&source)) else {
    panic!("record was not rewritten");
  };
  assert_eq!(stored.options["HeaderExt"], "hpp");
  assert!(!evaluate(&env.ctx, &source).build_required);
}

#[tokio::test]
async fn record_file_is_readable_json() {
  let env = TestEnv::new();
  let included = env.write_file("slice/Types.ice", "module Types {}\n");
  env.report_dependencies(&[&included]);
  let source = env.source("Foo.ice");

  evaluate_all(&env.ctx, std::slice::from_ref(&source), &BatchOptions::default()).await;

  let text = std::fs::read_to_string(env.ctx.record_path(&source)).unwrap();
  let json: serde_json::Value = serde_json::from_str(&text).unwrap();
  assert_eq!(json["version"], 1);
  assert_eq!(json["sourcePath"], "Foo.ice");
  assert_eq!(json["dependsOn"][0], included.display().to_string());
  assert_eq!(json["options"]["OutputDir"], "out");
  assert!(text.contains('\n'), "record should be pretty-printed");
}
