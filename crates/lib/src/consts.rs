/// Config file looked up in the root directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "lwsbuild.toml";

/// Environment variable overriding the root directory.
pub const ROOT_ENV_VAR: &str = "LWSBUILD_ROOT";

/// File name of every thin and universal libwebsockets archive.
pub const LIB_NAME: &str = "libwebsockets.a";

/// Sentinel marking an initialized output root.
pub const KEEP_FILE_NAME: &str = ".keep";

pub const LIBWEBSOCKETS_DIR_NAME: &str = "libwebsockets";
pub const OPENSSL_DIR_NAME: &str = "OpenSSL-for-iPhone";

pub const DEFAULT_LIBWEBSOCKETS_URL: &str = "https://github.com/warmcat/libwebsockets.git";
pub const DEFAULT_OPENSSL_URL: &str = "https://github.com/omochi/OpenSSL-for-iPhone.git";

/// Script shipped in the OpenSSL tree that produces `lib/libssl.a`.
pub const OPENSSL_BUILD_SCRIPT: &str = "./build-libssl.sh";

pub const DEFAULT_XCODE_PROJECT: &str = "websockets.xcodeproj";
pub const DEFAULT_XCODE_TARGET: &str = "websockets";

/// Internal libwebsockets headers that must never reach the public include tree.
pub const EXCLUDED_HEADERS: &[&str] = &[
  "private-libwebsockets.h",
  "lextable.h",
  "lextable-strings.h",
  "huftable.h",
  "getifaddrs.h",
];
