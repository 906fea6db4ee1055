use crate::error::LayoutError;
use crate::types::{CutoffKind, CutoffRegion};
use serde::{Deserialize, Serialize};

/// Vertical extent written in layout files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub ymin: f64,
    pub ymax: f64,
}

/// Header/footer exclusion bands. At most one of each kind is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CutoffRegions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    header: Option<Band>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    footer: Option<Band>,
}

impl CutoffRegions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert single-line cutoffs into bands: everything above `header_y`
    /// and everything below `footer_y` is excluded. Without a page height
    /// the footer band runs to the end of the coordinate space.
    pub fn from_lines(
        header_y: Option<f64>,
        footer_y: Option<f64>,
        page_height: Option<f64>,
    ) -> Result<Self, LayoutError> {
        let mut regions = Self::new();
        if let Some(y) = header_y {
            regions.set(CutoffKind::Header, f64::MIN, y)?;
        }
        if let Some(y) = footer_y {
            let bottom = page_height.filter(|h| *h > y).unwrap_or(f64::MAX);
            regions.set(CutoffKind::Footer, y, bottom)?;
        }
        Ok(regions)
    }

    /// Replace the band of `kind`
    pub fn set(&mut self, kind: CutoffKind, ymin: f64, ymax: f64) -> Result<(), LayoutError> {
        // NaN fails the comparison too
        if !(ymin < ymax) {
            return Err(LayoutError::InvalidCutoff { kind, ymin, ymax });
        }
        let band = Some(Band { ymin, ymax });
        match kind {
            CutoffKind::Header => self.header = band,
            CutoffKind::Footer => self.footer = band,
        }
        Ok(())
    }

    pub fn clear(&mut self, kind: CutoffKind) {
        match kind {
            CutoffKind::Header => self.header = None,
            CutoffKind::Footer => self.footer = None,
        }
    }

    pub fn get(&self, kind: CutoffKind) -> Option<CutoffRegion> {
        let band = match kind {
            CutoffKind::Header => self.header,
            CutoffKind::Footer => self.footer,
        };
        band.map(|b| CutoffRegion {
            kind,
            ymin: b.ymin,
            ymax: b.ymax,
        })
    }

    /// Active regions, header first
    pub fn iter(&self) -> impl Iterator<Item = CutoffRegion> + '_ {
        [CutoffKind::Header, CutoffKind::Footer]
            .into_iter()
            .filter_map(|kind| self.get(kind))
    }

    pub fn regions(&self) -> Vec<CutoffRegion> {
        self.iter().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.footer.is_none()
    }

    /// Re-check bands that may have arrived through deserialization
    pub fn validate(&self) -> Result<(), LayoutError> {
        for region in self.regions() {
            if !(region.ymin < region.ymax) {
                return Err(LayoutError::InvalidCutoff {
                    kind: region.kind,
                    ymin: region.ymin,
                    ymax: region.ymax,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_replace() {
        let mut cutoffs = CutoffRegions::new();
        assert!(cutoffs.is_empty());

        cutoffs.set(CutoffKind::Header, 0.0, 100.0).unwrap();
        cutoffs.set(CutoffKind::Header, 0.0, 160.0).unwrap();
        let regions = cutoffs.regions();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].ymax, 160.0);
    }

    #[test]
    fn test_rejects_inverted_band() {
        let mut cutoffs = CutoffRegions::new();
        let err = cutoffs.set(CutoffKind::Footer, 20.0, 8.0).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidCutoff {
                kind: CutoffKind::Footer,
                ymin: 20.0,
                ymax: 8.0
            }
        );
        assert!(cutoffs.set(CutoffKind::Footer, 8.0, 8.0).is_err());
        assert!(cutoffs.is_empty());
    }

    #[test]
    fn test_regions_header_first() {
        let mut cutoffs = CutoffRegions::new();
        cutoffs.set(CutoffKind::Footer, 570.0, 842.0).unwrap();
        cutoffs.set(CutoffKind::Header, 0.0, 160.0).unwrap();
        let kinds: Vec<CutoffKind> = cutoffs.regions().iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![CutoffKind::Header, CutoffKind::Footer]);
    }

    #[test]
    fn test_clear() {
        let mut cutoffs = CutoffRegions::from_lines(Some(160.0), Some(570.0), None).unwrap();
        cutoffs.clear(CutoffKind::Header);
        assert!(cutoffs.get(CutoffKind::Header).is_none());
        assert!(cutoffs.get(CutoffKind::Footer).is_some());
    }

    #[test]
    fn test_from_lines() {
        let cutoffs = CutoffRegions::from_lines(Some(160.0), Some(570.0), Some(842.0)).unwrap();
        let header = cutoffs.get(CutoffKind::Header).unwrap();
        let footer = cutoffs.get(CutoffKind::Footer).unwrap();

        assert!(header.contains_y(20.0));
        assert!(!header.contains_y(160.0));
        assert!(!header.contains_y(300.0));
        assert_eq!((footer.ymin, footer.ymax), (570.0, 842.0));

        // Page height above the footer line is ignored
        let open = CutoffRegions::from_lines(None, Some(570.0), Some(500.0)).unwrap();
        assert_eq!(open.get(CutoffKind::Footer).unwrap().ymax, f64::MAX);
    }
}
