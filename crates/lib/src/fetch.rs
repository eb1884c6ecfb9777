//! Dependency fetching.
//!
//! Ensures both source trees are cloned and the OpenSSL static library is
//! built. Existing trees and artifacts are trusted as-is: nothing is updated,
//! re-fetched or rebuilt once present.

use thiserror::Error;
use tracing::info;

use crate::cache::{Artifact, Outcome};
use crate::config::BuildConfig;
use crate::consts::{LIBWEBSOCKETS_DIR_NAME, OPENSSL_BUILD_SCRIPT, OPENSSL_DIR_NAME};
use crate::exec::{CommandRunner, ExecError, Invocation};
use crate::layout::OutputLayout;

/// Errors that can occur while fetching dependencies.
#[derive(Debug, Error)]
pub enum FetchError {
  /// `git clone` failed.
  #[error("failed to clone {name} from '{url}': {source}")]
  Clone {
    name: String,
    url: String,
    #[source]
    source: ExecError,
  },

  /// The OpenSSL build script failed.
  #[error("failed to build {name}: {source}")]
  Build {
    name: String,
    #[source]
    source: ExecError,
  },
}

/// A git source tree and where it comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
  pub artifact: Artifact,
  pub url: String,
}

/// The source trees a build needs, in fetch order.
pub fn source_trees(layout: &OutputLayout, config: &BuildConfig) -> Vec<SourceTree> {
  vec![
    SourceTree {
      artifact: Artifact::new(LIBWEBSOCKETS_DIR_NAME, layout.libwebsockets_dir()),
      url: config.sources.libwebsockets.clone(),
    },
    SourceTree {
      artifact: Artifact::new(OPENSSL_DIR_NAME, layout.openssl_dir()),
      url: config.sources.openssl.clone(),
    },
  ]
}

pub fn openssl_artifact(layout: &OutputLayout) -> Artifact {
  Artifact::new("libssl.a", layout.openssl_lib())
}

/// Clone every missing source tree.
pub async fn ensure_sources<R: CommandRunner>(
  runner: &R,
  layout: &OutputLayout,
  config: &BuildConfig,
) -> Result<Vec<(Artifact, Outcome)>, FetchError> {
  let mut outcomes = Vec::new();

  for tree in source_trees(layout, config) {
    let outcome = tree
      .artifact
      .ensure(|| async {
        info!(name = %tree.artifact.name, url = %tree.url, "fetch {}", tree.artifact.name);
        let clone = Invocation::new(&config.tools.git, layout.root())
          .arg("clone")
          .arg(&tree.url)
          .arg(tree.artifact.path());

        runner.run(&clone).await.map_err(|source| FetchError::Clone {
          name: tree.artifact.name.clone(),
          url: tree.url.clone(),
          source,
        })
      })
      .await?;

    outcomes.push((tree.artifact, outcome));
  }

  Ok(outcomes)
}

/// Build `libssl.a` with the script shipped in the OpenSSL tree, if missing.
pub async fn ensure_openssl<R: CommandRunner>(
  runner: &R,
  layout: &OutputLayout,
) -> Result<(Artifact, Outcome), FetchError> {
  let artifact = openssl_artifact(layout);

  let outcome = artifact
    .ensure(|| async {
      info!("build openssl");
      let build = Invocation::new(OPENSSL_BUILD_SCRIPT, layout.openssl_dir());

      runner.run(&build).await.map_err(|source| FetchError::Build {
        name: OPENSSL_DIR_NAME.to_string(),
        source,
      })
    })
    .await?;

  Ok((artifact, outcome))
}
