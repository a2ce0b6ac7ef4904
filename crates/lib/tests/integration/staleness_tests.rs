//! Rebuild decisions across successive passes.

use slicedep_lib::evaluate::{StaleReason, evaluate};
use slicedep_lib::orchestrate::{BatchOptions, evaluate_all};
use slicedep_lib::record::{self, RecordLoad};

use super::common::{TestEnv, touch_future};

#[tokio::test]
async fn second_pass_without_changes_skips_every_source() {
  let env = TestEnv::new();
  let sources = vec![env.source("Foo.ice"), env.source("slice/Bar.ice")];

  let first = evaluate_all(&env.ctx, &sources, &BatchOptions::default()).await;
  assert!(first.is_success());
  assert!(first.update_depends);

  let second = evaluate_all(&env.ctx, &sources, &BatchOptions::default()).await;
  assert!(second.is_success());
  assert!(!second.update_depends);
  assert!(second.results.iter().all(|r| !r.build_required));
}

#[tokio::test]
async fn changing_an_include_directory_forces_a_rebuild() {
  let env = TestEnv::new();
  let mut source = env.source("Foo.ice");
  evaluate_all(&env.ctx, std::slice::from_ref(&source), &BatchOptions::default()).await;
  assert!(!evaluate(&env.ctx, &source).build_required);

  source.options.include_directories.push("slice".to_string());

  let result = evaluate(&env.ctx, &source);
  assert!(result.build_required);
  assert_eq!(result.reason, Some(StaleReason::OptionsChanged));
}

#[tokio::test]
async fn changing_additional_options_forces_a_rebuild() {
  let env = TestEnv::new();
  let mut source = env.source("Foo.ice");
  evaluate_all(&env.ctx, std::slice::from_ref(&source), &BatchOptions::default()).await;

  source.options.additional_options = Some("--checksum".to_string());

  assert_eq!(evaluate(&env.ctx, &source).reason, Some(StaleReason::OptionsChanged));
}

#[tokio::test]
async fn touching_a_dependency_forces_a_rebuild_of_its_owner() {
  let env = TestEnv::new();
  let included = env.write_file("slice/Included.ice", "module Inc {}\n");
  env.report_dependencies(&[&included]);
  let owner = env.source("Foo.ice");

  let first = evaluate_all(&env.ctx, std::slice::from_ref(&owner), &BatchOptions::default()).await;
  assert!(first.results[0].inputs.contains(&included));
  assert!(!evaluate(&env.ctx, &owner).build_required);

  touch_future(&included);

  let result = evaluate(&env.ctx, &owner);
  assert!(result.build_required);
  assert!(matches!(result.reason, Some(StaleReason::DependencyNewer { ref dependency, .. }) if *dependency == included));
}

#[tokio::test]
async fn deleting_a_dependency_forces_a_rebuild() {
  let env = TestEnv::new();
  let included = env.write_file("slice/Included.ice", "module Inc {}\n");
  env.report_dependencies(&[&included]);
  let owner = env.source("Foo.ice");
  evaluate_all(&env.ctx, std::slice::from_ref(&owner), &BatchOptions::default()).await;

  std::fs::remove_file(&included).unwrap();

  assert!(matches!(
    evaluate(&env.ctx, &owner).reason,
    Some(StaleReason::DependencyMissing { .. })
  ));
}

#[tokio::test]
async fn newer_generator_forces_a_rebuild_of_every_source() {
  let env = TestEnv::new();
  let sources = vec![env.source("A.ice"), env.source("B.ice"), env.source("C.ice")];
  evaluate_all(&env.ctx, &sources, &BatchOptions::default()).await;

  touch_future(&env.generator());

  let batch = evaluate_all(&env.ctx, &sources, &BatchOptions { dry_run: true }).await;
  assert!(batch.update_depends);
  for result in &batch.results {
    assert!(matches!(result.reason, Some(StaleReason::GeneratorNewer { .. })), "{result:?}");
  }
}

#[tokio::test]
async fn corrupt_record_is_removed_and_rebuilt() {
  let env = TestEnv::new();
  let source = env.source("Foo.ice");
  evaluate_all(&env.ctx, std::slice::from_ref(&source), &BatchOptions::default()).await;

  let record_path = env.ctx.record_path(&source);
  let content = std::fs::read_to_string(&record_path).unwrap();
  std::fs::write(&record_path, &content[..content.len() / 3]).unwrap();

  let result = evaluate(&env.ctx, &source);
  assert!(result.build_required);
  assert_eq!(result.reason, Some(StaleReason::RecordCorrupt));
  assert!(!record_path.exists());

  let batch = evaluate_all(&env.ctx, std::slice::from_ref(&source), &BatchOptions::default()).await;
  assert!(batch.is_success());
  assert!(matches!(record::load(&record_path), RecordLoad::Found(_)));
  assert!(!evaluate(&env.ctx, &source).build_required);
}

#[tokio::test]
async fn same_stem_in_one_output_dir_shares_a_record() {
  let env = TestEnv::new();
  let a = env.source("a/Foo.ice");
  let b = env.source("b/Foo.ice");
  assert_eq!(env.ctx.record_path(&a), env.ctx.record_path(&b));

  evaluate_all(&env.ctx, std::slice::from_ref(&a), &BatchOptions::default()).await;

  let result = evaluate(&env.ctx, &b);
  assert_eq!(
    result.reason,
    Some(StaleReason::RecordForeign {
      owner: "a/Foo.ice".to_string()
    })
  );
}
