use crate::config::DebugConfig;
use crate::types::Fragment;
use regex::Regex;

enum Matcher {
    Pattern(Regex),
    Substring(String),
}

impl Matcher {
    fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Pattern(regex) => regex.is_match(text),
            Matcher::Substring(needle) => text.contains(needle.as_str()),
        }
    }
}

/// Logs selected fragments as they pass each pipeline stage.
///
/// Patterns are tried as regexes first and fall back to plain substring
/// matching when they do not compile.
pub struct FragmentTracer {
    matchers: Vec<Matcher>,
}

impl FragmentTracer {
    pub fn new(config: &DebugConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        let matchers = config
            .filter_patterns
            .iter()
            .map(|pattern| match Regex::new(pattern) {
                Ok(regex) => Matcher::Pattern(regex),
                Err(_) => Matcher::Substring(pattern.clone()),
            })
            .collect();
        Self { matchers }
    }

    pub fn disabled() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.matchers.is_empty()
    }

    pub fn matches(&self, fragment: &Fragment) -> bool {
        self.matchers.iter().any(|m| m.is_match(&fragment.text))
    }

    pub fn trace<'f, I>(&self, stage: &str, fragments: I)
    where
        I: IntoIterator<Item = &'f Fragment>,
    {
        if !self.is_active() {
            return;
        }

        let matching: Vec<&Fragment> = fragments.into_iter().filter(|f| self.matches(f)).collect();
        if matching.is_empty() {
            return;
        }

        log::debug!("🔍 [{}] {} matching fragments:", stage, matching.len());
        for fragment in matching {
            let preview = if fragment.text.chars().count() > 50 {
                let cut: String = fragment.text.chars().take(47).collect();
                format!("{cut}...")
            } else {
                fragment.text.clone()
            };
            log::debug!(
                "  \"{}\" page {} x=[{:.1}, {:.1}] y=[{:.1}, {:.1}] center_y={:.1}",
                preview,
                fragment.page,
                fragment.x0,
                fragment.x1,
                fragment.y0,
                fragment.y1,
                fragment.center_y()
            );
        }
    }
}
