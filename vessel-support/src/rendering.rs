//! Text rendering utilities for human-friendly diagnostics.
//!
//! Provides helpers to format resolution chains, registry listings,
//! and suggestions for keys that were not found.

/// Renders a resolution chain as a readable string.
///
/// # Examples
/// ```
/// use vessel_support::rendering::render_chain;
///
/// let chain = vec!["App", "Mailer", "App"];
/// assert_eq!(render_chain(&chain), "App → Mailer → App");
/// ```
pub fn render_chain<S: AsRef<str>>(chain: &[S]) -> String {
    chain
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" → ")
}

/// One row of a registry listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Registry the key lives in (e.g. "parameter", "service")
    pub kind: String,
    /// The registered key
    pub key: String,
    /// Optional trailing annotation (lifetime, tag, dependencies, ...)
    pub detail: Option<String>,
}

/// Renders registry entries as an aligned table.
///
/// ```text
/// [parameter] db.host
/// [service]   Logger   (shared, tag: core)
/// [service]   App      (shared, deps: Logger, db.host)
/// ```
pub fn render_listing(entries: &[ListingEntry]) -> String {
    let kind_width = entries.iter().map(|e| e.kind.len()).max().unwrap_or(0);
    let key_width = entries.iter().map(|e| e.key.len()).max().unwrap_or(0);

    let mut result = String::new();
    for entry in entries {
        let kind = format!("[{}]", entry.kind);
        match entry.detail {
            Some(ref detail) => result.push_str(&format!(
                "{kind:<kw$} {key:<keyw$}  ({detail})",
                key = entry.key,
                kw = kind_width + 2,
                keyw = key_width,
            )),
            None => result.push_str(&format!(
                "{kind:<kw$} {key}",
                key = entry.key,
                kw = kind_width + 2,
            )),
        }
        result.push('\n');
    }
    result
}

/// Shortens a namespaced key to its last segment.
///
/// Both dotted keys and Rust paths are understood.
///
/// ```
/// use vessel_support::rendering::shorten_key;
///
/// assert_eq!(shorten_key("db.primary.host"), "host");
/// assert_eq!(shorten_key("my_app::services::Mailer"), "Mailer");
/// assert_eq!(shorten_key("Logger"), "Logger");
/// ```
pub fn shorten_key(key: &str) -> &str {
    let after_path = key.rsplit("::").next().unwrap_or(key);
    after_path.rsplit('.').next().unwrap_or(after_path)
}

/// Suggests registered keys that look like the requested one.
///
/// Ranks full substring matches first, then matches on the last key
/// segment, then keys sharing a common prefix of three or more characters.
/// An empty key, or an empty last segment, never matches by substring.
pub fn suggest_similar(requested: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let requested_lower = requested.to_lowercase();
    let requested_short = shorten_key(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter(|&&name| name != requested)
        .filter_map(|&name| {
            let name_lower = name.to_lowercase();
            let name_short = shorten_key(name).to_lowercase();

            let full_match = !requested_lower.is_empty()
                && !name_lower.is_empty()
                && (name_lower.contains(&requested_lower) || requested_lower.contains(&name_lower));
            if full_match {
                return Some((name, 100));
            }

            let short_match = !requested_short.is_empty()
                && !name_short.is_empty()
                && (name_short.contains(&requested_short) || requested_short.contains(&name_short));
            if short_match {
                return Some((name, 80));
            }

            let common = name_lower
                .chars()
                .zip(requested_lower.chars())
                .take_while(|(a, b)| a == b)
                .count();

            (common >= 3).then_some((name, common * 10))
        })
        .collect();

    // stable: equal scores keep the caller's order
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}
