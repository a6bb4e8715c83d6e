const BYPASS_PREFIXES: [&str; 3] = ["_next/static", "_next/image", "favicon.ico"];
const IMAGE_EXTENSIONS: [&str; 6] = [".svg", ".png", ".jpg", ".jpeg", ".gif", ".webp"];

/// Returns `true` for paths the session gate never evaluates.
///
/// A path is a static asset when, after its leading `/`:
/// - it starts with `_next/static`, `_next/image` or `favicon.ico`, or
/// - it ends with a common image extension (`svg`, `png`, `jpg`, `jpeg`, `gif`, `webp`)
#[must_use]
pub fn is_static_asset(path: &str) -> bool {
    let rest = path.strip_prefix('/').unwrap_or(path);
    BYPASS_PREFIXES.iter().any(|p| rest.starts_with(p))
        || IMAGE_EXTENSIONS.iter().any(|ext| rest.ends_with(ext))
}
