use crate::types::{CutoffRegion, Fragment};

/// Drops fragments whose vertical center lies strictly inside a header or
/// footer band. No regions means nothing is filtered.
pub struct CutoffFilter<'a> {
    regions: &'a [CutoffRegion],
}

impl<'a> CutoffFilter<'a> {
    pub fn new(regions: &'a [CutoffRegion]) -> Self {
        Self { regions }
    }

    /// The region that excludes `fragment`, if any
    pub fn excluding_region(&self, fragment: &Fragment) -> Option<&'a CutoffRegion> {
        let center = fragment.center_y();
        self.regions.iter().find(|r| r.contains_y(center))
    }

    pub fn excludes(&self, fragment: &Fragment) -> bool {
        self.excluding_region(fragment).is_some()
    }

    /// Split fragments into survivors (input order kept) and the excluded count
    pub fn apply<'f>(&self, fragments: Vec<&'f Fragment>) -> (Vec<&'f Fragment>, usize) {
        if self.regions.is_empty() {
            return (fragments, 0);
        }
        let before = fragments.len();
        let kept: Vec<&Fragment> = fragments.into_iter().filter(|f| !self.excludes(f)).collect();
        let excluded = before - kept.len();
        (kept, excluded)
    }
}
