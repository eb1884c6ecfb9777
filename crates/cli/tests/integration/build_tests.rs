//! Integration tests for `lwsbuild build`.

use std::fs;

use predicates::prelude::*;

use crate::common::{TestEnv, tree};

#[test]
fn build_produces_universal_library_and_headers() {
  let env = TestEnv::with_fake_tools();

  env
    .lwsbuild_cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("Build complete!"))
    .stdout(predicate::str::contains("Targets built: 4"));

  let out = env.out();
  assert!(out.join(".keep").is_file());
  assert!(out.join("lib/libwebsockets.a").is_file());
  assert!(out.join("include/libwebsockets.h").is_file());
  assert!(out.join("include/plat/lws-plat.h").is_file());
  assert!(!out.join("include/private-libwebsockets.h").exists());
  assert!(!out.join("include/lextable.h").exists());
  assert!(!out.join("include/plat/getifaddrs.h").exists());
  assert!(!out.join("include/server.c").exists());

  for dir in ["iphone-armv7", "iphone-arm64", "iphone-simulator-i386", "iphone-simulator-x86_64"] {
    assert!(out.join("xcode-build").join(dir).is_dir(), "missing build dir {dir}");
  }
  assert!(out.join("xcode-build/iphone-arm64/Release-iphoneos/libwebsockets.a").is_file());
  assert!(
    out
      .join("xcode-build/iphone-simulator-x86_64/Release-iphonesimulator/libwebsockets.a")
      .is_file()
  );
}

#[test]
fn build_merges_exactly_four_thin_libraries() {
  let env = TestEnv::with_fake_tools();
  env.lwsbuild_cmd().arg("build").assert().success();

  let merges: Vec<String> = env.calls().into_iter().filter(|c| c.starts_with("lipo -create")).collect();
  assert_eq!(merges.len(), 1);
  assert_eq!(merges[0].matches("libwebsockets.a").count(), 5, "4 inputs plus the output: {}", merges[0]);
  assert!(merges[0].contains("-output"));
}

#[test]
fn second_build_skips_cached_artifacts() {
  let env = TestEnv::with_fake_tools();

  env.lwsbuild_cmd().arg("build").assert().success();
  let include_before = tree(&env.out().join("include"));

  env.lwsbuild_cmd().arg("build").assert().success();

  assert_eq!(env.count("git clone"), 2);
  assert_eq!(env.count("build-libssl.sh"), 1);
  assert_eq!(env.count("lipo -create"), 1);
  // Target builds are never skipped.
  assert_eq!(env.count("xcodebuild"), 8);
  assert_eq!(tree(&env.out().join("include")), include_before);
}

#[test]
fn build_is_the_default_subcommand() {
  let env = TestEnv::with_fake_tools();

  env
    .lwsbuild_cmd()
    .assert()
    .success()
    .stdout(predicate::str::contains("Build complete!"));

  assert!(env.out().join("lib/libwebsockets.a").is_file());
}

#[test]
fn build_passes_sdk_path_and_symroot_to_xcodebuild() {
  let env = TestEnv::with_fake_tools();
  env.lwsbuild_cmd().arg("build").assert().success();

  let arm64 = env
    .calls()
    .into_iter()
    .find(|c| c.starts_with("xcodebuild") && c.contains("-arch arm64"))
    .expect("arm64 build");
  assert!(arm64.contains("-sdk /fake/sdks/iphoneos.sdk"), "{arm64}");
  assert!(arm64.contains("-configuration Release"), "{arm64}");
  assert!(arm64.contains("-target websockets"), "{arm64}");
  assert!(arm64.contains("websockets.xcodeproj"), "{arm64}");
  assert!(arm64.contains("xcode-build/iphone-arm64"), "{arm64}");
}

#[test]
fn failed_target_aborts_and_leaves_partial_state() {
  let env = TestEnv::with_fake_tools();

  env
    .lwsbuild_cmd()
    .arg("build")
    .env("FAKE_XCODEBUILD_FAIL_ARCH", "i386")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Build failed"))
    .stderr(predicate::str::contains("xcodebuild"));

  // Sources stay fetched, nothing downstream of the failed target exists.
  assert!(env.root().join("libwebsockets").is_dir());
  assert!(env.root().join("OpenSSL-for-iPhone/lib/libssl.a").is_file());
  assert!(!env.out().join("lib/libwebsockets.a").exists());
  assert!(!env.out().join("include").exists());
  assert_eq!(env.count("lipo"), 0);

  env.lwsbuild_cmd().arg("build").assert().success();
  assert_eq!(env.count("git clone"), 2);
  assert!(env.out().join("lib/libwebsockets.a").is_file());
}

#[test]
fn unknown_platform_fails_before_any_process_runs() {
  let env = TestEnv::with_config("[[targets]]\nplatform = \"watchos\"\narch = \"arm64\"\n");

  env
    .lwsbuild_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown platform 'watchos'"));

  assert!(env.calls().is_empty());
  assert!(!env.out().exists());
}

#[test]
fn configured_targets_replace_defaults() {
  let env = TestEnv::with_config(
    "configuration = \"Debug\"\n\n[[targets]]\nplatform = \"device\"\narch = \"arm64\"\n\n[[targets]]\nplatform = \"simulator\"\narch = \"x86_64\"\n",
  );

  env.lwsbuild_cmd().arg("build").assert().success();

  assert_eq!(env.count("xcodebuild"), 2);
  assert!(env.out().join("xcode-build/iphone-arm64/Debug-iphoneos/libwebsockets.a").is_file());
  assert!(!env.out().join("xcode-build/iphone-armv7").exists());
}

#[test]
fn build_json_output_reports_steps() {
  let env = TestEnv::with_fake_tools();

  let output = env.lwsbuild_cmd().args(["build", "-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(report["targets_built"], 4);
  assert_eq!(report["headers_copied"], 2);
  assert!(report["fat_lib"].as_str().unwrap().ends_with("libwebsockets.a"));
  assert!(report["steps"].as_array().unwrap().iter().all(|s| s["outcome"] == "built"));
}

#[test]
fn parallel_jobs_build_all_targets() {
  let env = TestEnv::with_fake_tools();

  env.lwsbuild_cmd().args(["build", "--jobs", "4"]).assert().success();

  assert_eq!(env.count("xcodebuild"), 4);
  assert!(env.out().join("lib/libwebsockets.a").is_file());
}

#[test]
fn zero_jobs_is_rejected() {
  let env = TestEnv::with_fake_tools();

  env
    .lwsbuild_cmd()
    .args(["build", "--jobs", "0"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid --jobs value"));

  assert!(env.calls().is_empty());
}

#[test]
fn verbose_build_lists_steps() {
  let env = TestEnv::with_fake_tools();

  env.lwsbuild_cmd().arg("build").assert().success();
  fs::remove_dir_all(env.out().join("include")).unwrap();

  env
    .lwsbuild_cmd()
    .args(["build", "-v"])
    .assert()
    .success()
    .stdout(predicate::str::contains("libwebsockets.a"))
    .stdout(predicate::str::contains("Headers copied: 2"));
}
