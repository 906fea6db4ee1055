use crate::config::RowClusteringConfig;
use crate::types::Fragment;
use std::cmp::Ordering;

/// Fragments judged to sit on the same table row
#[derive(Debug, Clone)]
pub struct RowCluster<'f> {
    pub members: Vec<&'f Fragment>,
    center_sum: f64,
}

impl<'f> RowCluster<'f> {
    fn open(fragment: &'f Fragment) -> Self {
        Self {
            center_sum: fragment.center_y(),
            members: vec![fragment],
        }
    }

    fn push(&mut self, fragment: &'f Fragment) {
        self.center_sum += fragment.center_y();
        self.members.push(fragment);
    }

    /// Running average of member centers
    pub fn center(&self) -> f64 {
        self.center_sum / self.members.len() as f64
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Groups fragments into row bands by vertical proximity.
///
/// The tolerance adapts to the page: it is the configured multiple of the
/// median fragment height, floored at `min_tolerance`.
pub struct RowClusterer<'a> {
    config: &'a RowClusteringConfig,
}

impl<'a> RowClusterer<'a> {
    pub fn new(config: &'a RowClusteringConfig) -> Self {
        Self { config }
    }

    pub fn tolerance_for(&self, fragments: &[&Fragment]) -> f64 {
        let median = median_height(fragments).unwrap_or(0.0);
        (median * self.config.tolerance_multiplier).max(self.config.min_tolerance)
    }

    /// Cluster `fragments` into rows ordered top to bottom.
    ///
    /// Input order does not matter: fragments are walked in a total order
    /// (center, x0, x1, y0, text) so identical input always yields
    /// identical rows.
    pub fn cluster<'f>(&self, fragments: Vec<&'f Fragment>) -> Vec<RowCluster<'f>> {
        if fragments.is_empty() {
            return Vec::new();
        }

        let tolerance = self.tolerance_for(&fragments);
        let mut sorted = fragments;
        sorted.sort_by(|a, b| walk_order(a, b));

        let mut bands: Vec<RowCluster<'f>> = Vec::new();
        for fragment in sorted {
            match select_band(&bands, fragment.center_y(), tolerance) {
                Some(index) => bands[index].push(fragment),
                None => bands.push(RowCluster::open(fragment)),
            }
        }

        // Stable: equal centers keep creation order
        bands.sort_by(|a, b| a.center().total_cmp(&b.center()));

        log::debug!(
            "   📏 Row tolerance {:.2}pt → {} bands",
            tolerance,
            bands.len()
        );
        bands
    }
}

/// Median fragment height; the mean of the two middle values for even counts
pub fn median_height(fragments: &[&Fragment]) -> Option<f64> {
    if fragments.is_empty() {
        return None;
    }
    let mut heights: Vec<f64> = fragments.iter().map(|f| f.height()).collect();
    heights.sort_by(|a, b| a.total_cmp(b));

    let mid = heights.len() / 2;
    if heights.len() % 2 == 0 {
        Some((heights[mid - 1] + heights[mid]) / 2.0)
    } else {
        Some(heights[mid])
    }
}

/// Pick the band a fragment centered at `center` joins.
///
/// Candidates are bands whose running center lies within `tolerance`.
/// Among several candidates the band with more members wins; on equal
/// membership the earlier (upper) band wins. `None` means open a new band.
pub fn select_band(bands: &[RowCluster<'_>], center: f64, tolerance: f64) -> Option<usize> {
    let mut chosen: Option<usize> = None;
    for (index, band) in bands.iter().enumerate() {
        if (center - band.center()).abs() > tolerance {
            continue;
        }
        match chosen {
            Some(best) if bands[best].len() >= band.len() => {}
            _ => chosen = Some(index),
        }
    }
    chosen
}

fn walk_order(a: &Fragment, b: &Fragment) -> Ordering {
    a.center_y()
        .total_cmp(&b.center_y())
        .then_with(|| a.x0.total_cmp(&b.x0))
        .then_with(|| a.x1.total_cmp(&b.x1))
        .then_with(|| a.y0.total_cmp(&b.y0))
        .then_with(|| a.text.cmp(&b.text))
}
