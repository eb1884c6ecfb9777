//! Integration tests for `lwsbuild clean`.

use predicates::prelude::*;

use crate::common::{TestEnv, tree};

#[test]
fn clean_then_build_reproduces_pristine_tree() {
  let env = TestEnv::with_fake_tools();

  env.lwsbuild_cmd().arg("build").assert().success();
  let pristine = tree(&env.out());

  env
    .lwsbuild_cmd()
    .arg("clean")
    .assert()
    .success()
    .stdout(predicate::str::contains("Removed"));
  assert_eq!(tree(&env.out()), vec![std::path::PathBuf::from(".keep")]);

  env.lwsbuild_cmd().arg("build").assert().success();
  assert_eq!(tree(&env.out()), pristine);
  assert_eq!(env.count("lipo -create"), 2);
  // Source trees live outside `out/` and survive a clean.
  assert_eq!(env.count("git clone"), 2);
}
