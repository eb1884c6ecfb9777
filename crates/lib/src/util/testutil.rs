//! Test utilities for lwsbuild-lib.
//!
//! Provides shell helpers for tests that spawn real processes and a
//! [`FakeRunner`] that records invocations and imitates the side effects of
//! git, xcrun, xcodebuild, lipo and the OpenSSL build script on disk.

use std::path::Path;
use std::sync::Mutex;

use crate::consts::LIB_NAME;
use crate::exec::{CommandRunner, ExecError, Invocation};

/// Returns the shell command and args to execute a shell script.
#[cfg(unix)]
pub fn shell_cmd(script: &str) -> (&'static str, Vec<String>) {
  ("/bin/sh", vec!["-c".to_string(), script.to_string()])
}

/// Returns the command and args to create a marker file in the current directory.
#[cfg(unix)]
pub fn touch_file(filename: &str) -> (&'static str, Vec<String>) {
  ("/usr/bin/touch", vec![filename.to_string()])
}

type FailWhen = Box<dyn Fn(&Invocation) -> bool + Send + Sync>;

/// Records every invocation and fakes the tool's filesystem effects.
#[derive(Default)]
pub struct FakeRunner {
  calls: Mutex<Vec<Invocation>>,
  fail_when: Option<FailWhen>,
}

impl FakeRunner {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fail (exit code 1) every invocation matching the predicate.
  pub fn failing_when(pred: impl Fn(&Invocation) -> bool + Send + Sync + 'static) -> Self {
    Self {
      calls: Mutex::new(Vec::new()),
      fail_when: Some(Box::new(pred)),
    }
  }

  pub fn calls(&self) -> Vec<Invocation> {
    self.calls.lock().unwrap().clone()
  }

  pub fn calls_to(&self, program: &str) -> Vec<Invocation> {
    self
      .calls()
      .into_iter()
      .filter(|c| c.program == program)
      .collect()
  }

  pub fn clear(&self) {
    self.calls.lock().unwrap().clear();
  }

  fn simulate(&self, inv: &Invocation) -> Result<String, ExecError> {
    self.calls.lock().unwrap().push(inv.clone());

    if self.fail_when.as_ref().is_some_and(|f| f(inv)) {
      return Err(ExecError::Failed {
        command: inv.command_line(),
        code: Some(1),
      });
    }

    let args = inv.arg_strings();
    match inv.program_name().as_str() {
      "git" => fake_clone(Path::new(&args[2])),
      "./build-libssl.sh" => write_file(&inv.cwd.join("lib").join("libssl.a"), "ssl"),
      "xcrun" => {
        let sdk = inv.flag_value("-sdk").unwrap().to_string_lossy();
        return Ok(format!("  /sdk/{}.sdk\n", sdk));
      }
      "xcodebuild" => fake_xcodebuild(inv, &args),
      "lipo" if args.first().map(String::as_str) == Some("-create") => {
        let output = inv.flag_value("-output").unwrap();
        let inputs = &args[1..args.len() - 2];
        write_file(Path::new(output), &inputs.join("\n"));
      }
      "lipo" => return Ok("Architectures in the fat file: libwebsockets.a are: armv7 arm64 i386 x86_64".to_string()),
      other => panic!("FakeRunner does not know how to run '{other}'"),
    }

    Ok(String::new())
  }
}

impl CommandRunner for FakeRunner {
  async fn run(&self, invocation: &Invocation) -> Result<(), ExecError> {
    self.simulate(invocation).map(|_| ())
  }

  async fn capture(&self, invocation: &Invocation) -> Result<String, ExecError> {
    self.simulate(invocation).map(|out| out.trim().to_string())
  }
}

fn write_file(path: &Path, content: &str) {
  std::fs::create_dir_all(path.parent().unwrap()).unwrap();
  std::fs::write(path, content).unwrap();
}

/// Populate a cloned tree. The libwebsockets tree gets a small header set
/// including internal headers at several depths.
fn fake_clone(dest: &Path) {
  std::fs::create_dir_all(dest).unwrap();
  if dest.file_name().is_some_and(|n| n == "libwebsockets") {
    let lib = dest.join("lib");
    write_file(&lib.join("libwebsockets.h"), "public");
    write_file(&lib.join("private-libwebsockets.h"), "internal");
    write_file(&lib.join("lextable.h"), "internal");
    write_file(&lib.join("server.c"), "source");
    write_file(&lib.join("plat").join("lws-plat.h"), "public");
    write_file(&lib.join("plat").join("getifaddrs.h"), "internal");
    write_file(&lib.join("misc").join("deep").join("huftable.h"), "internal");
  }
}

fn fake_xcodebuild(inv: &Invocation, args: &[String]) {
  let symroot = args
    .iter()
    .find_map(|a| a.strip_prefix("SYMROOT="))
    .expect("xcodebuild invoked without SYMROOT");
  let configuration = inv.flag_value("-configuration").unwrap().to_string_lossy();
  let sdk_path = inv.flag_value("-sdk").unwrap();
  let sdk = Path::new(sdk_path).file_stem().unwrap().to_string_lossy();
  let arch = inv.flag_value("-arch").unwrap().to_string_lossy();

  let product = Path::new(symroot)
    .join(format!("{}-{}", configuration, sdk))
    .join(LIB_NAME);
  write_file(&product, &arch);
}
