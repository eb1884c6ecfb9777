/// Quote a single argument so the joined command line can be pasted into a
/// POSIX shell. Arguments made only of safe characters are left as-is.
pub fn quote(arg: &str) -> String {
  let is_safe = |c: char| c.is_ascii_alphanumeric() || "-_./=:@+,%".contains(c);

  if !arg.is_empty() && arg.chars().all(is_safe) {
    return arg.to_string();
  }

  format!("'{}'", arg.replace('\'', r"'\''"))
}
