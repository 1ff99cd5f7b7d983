/// Renders `<name> <args...>` with single-space separators.
///
/// The separator after the name is always written, so a call with no
/// arguments yields `"<name> "`.
pub fn build_command(name: &str, args: &[String]) -> String {
    format!("{} {}", name, args.join(" "))
}
