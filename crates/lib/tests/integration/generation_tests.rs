//! Generator failures, diagnostics and header relocation.

use slicedep_lib::evaluate::evaluate;
use slicedep_lib::generate::GenerateError;
use slicedep_lib::orchestrate::{BatchOptions, evaluate_all};
use slicedep_lib::record::{self, RecordLoad};
use slicedep_lib::source::BuildOptions;

use super::common::{TestEnv, default_options};

#[tokio::test]
async fn failed_source_keeps_its_record_and_the_batch_continues() {
  let env = TestEnv::new();
  let sources = vec![env.source("A.ice"), env.source("B.ice"), env.source("C.ice")];
  assert!(evaluate_all(&env.ctx, &sources, &BatchOptions::default()).await.is_success());

  let b_record = env.ctx.record_path(&sources[1]);
  let before = record::load(&b_record);
  assert!(matches!(before, RecordLoad::Found(_)));

  std::fs::remove_file(env.root().join("out/B.cpp")).unwrap();
  env.fail_on("B.ice", "B.ice:3: error: syntax error\n");

  let batch = evaluate_all(&env.ctx, &sources, &BatchOptions::default()).await;

  assert!(!batch.is_success());
  assert_eq!(batch.failures.len(), 1);
  assert_eq!(batch.failures[0].identity, "B.ice");
  match &batch.failures[0].error {
    GenerateError::GenerationFailed { code, diagnostics, .. } => {
      assert_eq!(*code, Some(1));
      assert!(diagnostics.contains("B.ice:3: error: syntax error"), "{diagnostics}");
    }
    other => panic!("unexpected error: {other}"),
  }

  let identities: Vec<&str> = batch.results.iter().map(|r| r.identity.as_str()).collect();
  assert_eq!(identities, vec!["A.ice", "B.ice", "C.ice"]);
  let required: Vec<bool> = batch.results.iter().map(|r| r.build_required).collect();
  assert_eq!(required, vec![false, true, false]);
  assert!(batch.update_depends);

  assert_eq!(record::load(&b_record), before);

  env.clear_failure("B.ice");
  let retry = evaluate_all(&env.ctx, &sources, &BatchOptions::default()).await;
  assert!(retry.is_success());
  assert!(retry.results[1].build_required);
  assert!(!evaluate(&env.ctx, &sources[1]).build_required);
}

#[tokio::test]
async fn failure_of_a_new_source_writes_no_record() {
  let env = TestEnv::new();
  let source = env.source("Broken.ice");
  env.fail_on("Broken.ice", "Broken.ice:1: error: unexpected token\n");

  let batch = evaluate_all(&env.ctx, std::slice::from_ref(&source), &BatchOptions::default()).await;

  assert_eq!(batch.failures.len(), 1);
  assert!(!env.ctx.record_path(&source).exists());
  assert!(evaluate(&env.ctx, &source).build_required);
}

#[tokio::test]
async fn usage_error_is_reported_once() {
  let env = TestEnv::new();
  let source = env.source("Foo.ice");
  env.fail_on(
    "Foo.ice",
    "slice2cpp: unknown option `--bogus'\nUsage: slice2cpp [options] slice-files...\nFoo.ice:1: error: hidden\n",
  );

  let batch = evaluate_all(&env.ctx, std::slice::from_ref(&source), &BatchOptions::default()).await;

  match &batch.failures[0].error {
    GenerateError::GenerationFailed { diagnostics, .. } => {
      assert_eq!(diagnostics, "slice2cpp: unknown option `--bogus'");
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn missing_generator_fails_every_stale_source() {
  let env = TestEnv::new();
  std::fs::remove_file(env.generator()).unwrap();
  let sources = vec![env.source("A.ice"), env.source("B.ice")];

  let batch = evaluate_all(&env.ctx, &sources, &BatchOptions::default()).await;

  assert_eq!(batch.failures.len(), 2);
  assert!(
    batch
      .failures
      .iter()
      .all(|f| matches!(f.error, GenerateError::GeneratorNotFound { .. }))
  );
  assert!(
    batch.failures[0]
      .error
      .to_string()
      .starts_with("Slice compiler `")
  );
}

#[tokio::test]
async fn headers_are_moved_into_the_header_output_dir() {
  let env = TestEnv::new();
  let source = env.source_with(
    "Foo.ice",
    BuildOptions {
      header_output_dir: Some("include".to_string()),
      ..default_options()
    },
  );

  let batch = evaluate_all(&env.ctx, std::slice::from_ref(&source), &BatchOptions::default()).await;

  assert!(batch.is_success());
  assert_eq!(
    batch.results[0].outputs,
    vec![env.root().join("out/Foo.cpp"), env.root().join("include/Foo.h")]
  );
  assert!(env.root().join("include/Foo.h").exists());
  assert!(!env.root().join("out/Foo.h").exists());
  assert!(!evaluate(&env.ctx, &source).build_required);
}

#[tokio::test]
async fn output_directory_is_created_on_demand() {
  let env = TestEnv::new();
  let source = env.source_with(
    "Foo.ice",
    BuildOptions {
      output_dir: "deeply/nested/out".to_string(),
      ..BuildOptions::default()
    },
  );

  let batch = evaluate_all(&env.ctx, std::slice::from_ref(&source), &BatchOptions::default()).await;

  assert!(batch.is_success());
  assert!(env.root().join("deeply/nested/out/Foo.cpp").exists());
  assert!(env.root().join("deeply/nested/out/slice2cpp.Foo.d").exists());
}
