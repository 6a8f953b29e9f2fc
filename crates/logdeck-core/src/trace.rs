//! Call-site capture for traced levels.
//!
//! Frames are walked with the `backtrace` crate, innermost first. Everything
//! up to and including the logger's own entry frames is dropped, so the first
//! returned entry is the code that called the level method.

use std::path::Path;

/// Symbol prefixes of frames that belong to the logging call itself.
const INTERNAL_PREFIXES: &[&str] = &[
    "logdeck_core::logger::Logger",
    "logdeck_core::dispatch::compile",
    "logdeck_core::trace::",
    "backtrace::",
    "core::ops::function::",
    "alloc::boxed::",
];

/// Prefix of the frames where a caller enters the logger.
const ENTRY_PREFIX: &str = "logdeck_core::logger::Logger";

/// One resolved symbol of a stack frame.
struct Site {
    name: String,
    location: Option<String>,
}

impl Site {
    fn render(&self) -> String {
        match &self.location {
            Some(location) => format!("{} ({})", self.name, location),
            None => self.name.clone(),
        }
    }
}

/// Capture at most `depth` call-site frames above the logging call.
///
/// Returns an empty vector for a depth of 0.
pub(crate) fn capture(depth: usize) -> Vec<String> {
    if depth == 0 {
        return Vec::new();
    }

    let sites = resolve_sites();
    let start = caller_index(&sites);

    sites[start..]
        .iter()
        .take(depth)
        .map(Site::render)
        .collect()
}

fn resolve_sites() -> Vec<Site> {
    let mut sites = Vec::new();

    backtrace::trace(|frame| {
        // Inlined functions resolve to several symbols, innermost first.
        backtrace::resolve_frame(frame, |symbol| {
            let name = symbol
                .name()
                .map(|name| format!("{:#}", name))
                .unwrap_or_else(|| "<unknown>".to_string());
            let location = symbol
                .filename()
                .map(|file| render_location(file, symbol.lineno(), symbol.colno()));
            sites.push(Site { name, location });
        });
        true
    });

    sites
}

fn render_location(file: &Path, line: Option<u32>, col: Option<u32>) -> String {
    match (line, col) {
        (Some(line), Some(col)) => format!("{}:{}:{}", file.display(), line, col),
        (Some(line), None) => format!("{}:{}", file.display(), line),
        _ => file.display().to_string(),
    }
}

/// Index of the first frame outside the logging machinery.
fn caller_index(sites: &[Site]) -> usize {
    let entry = sites.iter().position(|site| is_entry(&site.name));

    // Without a logger frame (stripped symbols, or a direct call from inside
    // the crate) only the leading internal frames are skipped.
    let from = entry.unwrap_or(0);
    sites[from..]
        .iter()
        .position(|site| !is_internal(&site.name))
        .map_or(sites.len(), |offset| from + offset)
}

fn normalized(name: &str) -> &str {
    name.trim_start_matches('<')
}

fn is_entry(name: &str) -> bool {
    normalized(name).starts_with(ENTRY_PREFIX)
}

fn is_internal(name: &str) -> bool {
    let name = normalized(name);
    INTERNAL_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site(name: &str) -> Site {
        Site {
            name: name.to_string(),
            location: None,
        }
    }

    #[test]
    fn test_zero_depth_captures_nothing() {
        assert!(capture(0).is_empty());
    }

    #[test]
    fn test_caller_index_skips_logger_frames() {
        let sites = vec![
            site("backtrace::backtrace::trace"),
            site("logdeck_core::trace::capture"),
            site("logdeck_core::dispatch::compile::{{closure}}"),
            site("logdeck_core::logger::Logger<T>::emit"),
            site("logdeck_core::logger::Logger<T>::info"),
            site("app::helper"),
            site("app::main"),
        ];
        assert_eq!(caller_index(&sites), 5);
    }

    #[test]
    fn test_caller_index_handles_v0_names() {
        let sites = vec![
            site("logdeck_core::trace::capture"),
            site("<logdeck_core::logger::Logger<str>>::emit"),
            site("<logdeck_core::logger::Logger<str>>::log"),
            site("app::run"),
        ];
        assert_eq!(caller_index(&sites), 3);
    }

    #[test]
    fn test_caller_index_without_entry_frame() {
        let sites = vec![
            site("backtrace::backtrace::trace"),
            site("logdeck_core::trace::capture"),
            site("app::direct"),
        ];
        assert_eq!(caller_index(&sites), 2);
    }

    #[test]
    fn test_site_render() {
        let with_location = Site {
            name: "app::main".to_string(),
            location: Some(render_location(Path::new("src/main.rs"), Some(10), Some(5))),
        };
        assert_eq!(with_location.render(), "app::main (src/main.rs:10:5)");
        assert_eq!(site("app::main").render(), "app::main");
    }

    #[test]
    fn test_capture_respects_depth() {
        let frames = capture(2);
        assert!(frames.len() <= 2);
    }
}
