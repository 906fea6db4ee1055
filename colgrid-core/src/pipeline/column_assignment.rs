use super::row_clustering::RowCluster;
use crate::config::{AssignmentConfig, GapPolicy};
use crate::error::LayoutError;
use crate::types::{ColumnDefinition, Fragment};

/// A row band with its fragments bucketed per column
#[derive(Debug, Clone)]
pub struct AssignedRow<'f> {
    pub y_center: f64,
    /// One bucket per snapshot column, in column order
    pub cells: Vec<Vec<&'f Fragment>>,
}

impl AssignedRow<'_> {
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

/// Maps fragments to columns by horizontal position.
///
/// Rules, in order:
/// 1. the column with the largest intersection with [x0, x1];
/// 2. with no intersection anywhere, the column with the smallest gap
///    (unless the gap policy drops such fragments);
/// 3. ties go to the lower order index.
///
/// Column indices returned are positions in the snapshot's ordered column
/// list, which coincide with order indices.
pub struct ColumnAssigner<'a> {
    columns: &'a [ColumnDefinition],
    config: &'a AssignmentConfig,
}

impl<'a> ColumnAssigner<'a> {
    pub fn new(
        columns: &'a [ColumnDefinition],
        config: &'a AssignmentConfig,
    ) -> Result<Self, LayoutError> {
        if columns.is_empty() {
            return Err(LayoutError::NoColumns);
        }
        Ok(Self { columns, config })
    }

    pub fn assign(&self, fragment: &Fragment) -> Option<usize> {
        if let Some(index) = self.best_overlap(fragment) {
            return Some(index);
        }

        match self.config.gap_policy {
            // zero-width fragments sitting inside a column have no overlap
            GapPolicy::Drop => self
                .nearest(fragment)
                .filter(|(_, distance)| *distance == 0.0)
                .map(|(index, _)| index),
            GapPolicy::Nearest => {
                let (index, distance) = self.nearest(fragment)?;
                match self.config.max_gap_distance {
                    Some(limit) if distance > limit => None,
                    _ => Some(index),
                }
            }
        }
    }

    /// Bucket every band member by column. Returns the rows and the number
    /// of fragments no column accepted.
    pub fn assign_rows<'f>(&self, bands: &[RowCluster<'f>]) -> (Vec<AssignedRow<'f>>, usize) {
        let mut dropped = 0;
        let mut rows = Vec::with_capacity(bands.len());

        for band in bands {
            let mut cells: Vec<Vec<&'f Fragment>> = vec![Vec::new(); self.columns.len()];
            for fragment in &band.members {
                match self.assign(fragment) {
                    Some(index) => cells[index].push(*fragment),
                    None => dropped += 1,
                }
            }
            rows.push(AssignedRow {
                y_center: band.center(),
                cells,
            });
        }

        (rows, dropped)
    }

    fn best_overlap(&self, fragment: &Fragment) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (index, column) in self.columns.iter().enumerate() {
            let amount = overlap(fragment.x0, fragment.x1, column.xmin, column.xmax);
            if amount <= 0.0 {
                continue;
            }
            match best {
                Some((_, current)) if current >= amount => {}
                _ => best = Some((index, amount)),
            }
        }
        best.map(|(index, _)| index)
    }

    fn nearest(&self, fragment: &Fragment) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (index, column) in self.columns.iter().enumerate() {
            let distance = gap_distance(fragment.x0, fragment.x1, column.xmin, column.xmax);
            match best {
                Some((_, current)) if current <= distance => {}
                _ => best = Some((index, distance)),
            }
        }
        best
    }
}

/// Length of the intersection of [a0, a1] and [b0, b1]; zero when disjoint
pub fn overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    (a1.min(b1) - a0.max(b0)).max(0.0)
}

/// Horizontal distance between two disjoint intervals; zero when they touch or overlap
pub fn gap_distance(a0: f64, a1: f64, b0: f64, b1: f64) -> f64 {
    if a1 <= b0 {
        b0 - a1
    } else if a0 >= b1 {
        a0 - b1
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition {
                name: "Left".to_string(),
                xmin: 0.0,
                xmax: 15.0,
                order: 0,
            },
            ColumnDefinition {
                name: "Right".to_string(),
                xmin: 15.0,
                xmax: 35.0,
                order: 1,
            },
        ]
    }

    fn frag(x0: f64, x1: f64) -> Fragment {
        Fragment::new("x", x0, x1, 0.0, 5.0, 1)
    }

    #[test]
    fn test_overlap_and_gap() {
        assert_eq!(overlap(12.0, 18.0, 0.0, 15.0), 3.0);
        assert_eq!(overlap(12.0, 18.0, 20.0, 30.0), 0.0);
        assert_eq!(gap_distance(40.0, 45.0, 15.0, 35.0), 5.0);
        assert_eq!(gap_distance(0.0, 5.0, 10.0, 20.0), 5.0);
        assert_eq!(gap_distance(0.0, 10.0, 10.0, 20.0), 0.0);
    }

    #[test]
    fn test_fully_inside_column() {
        let cols = columns();
        let config = AssignmentConfig::default();
        let assigner = ColumnAssigner::new(&cols, &config).unwrap();
        assert_eq!(assigner.assign(&frag(0.0, 10.0)), Some(0));
        assert_eq!(assigner.assign(&frag(20.0, 30.0)), Some(1));
    }

    #[test]
    fn test_maximal_overlap_wins() {
        let cols = columns();
        let config = AssignmentConfig::default();
        let assigner = ColumnAssigner::new(&cols, &config).unwrap();
        // 1 unit in Left, 5 in Right
        assert_eq!(assigner.assign(&frag(14.0, 20.0)), Some(1));
    }

    #[test]
    fn test_equal_overlap_goes_to_lower_order() {
        let cols = columns();
        let config = AssignmentConfig::default();
        let assigner = ColumnAssigner::new(&cols, &config).unwrap();
        assert_eq!(assigner.assign(&frag(12.0, 18.0)), Some(0));
    }

    #[test]
    fn test_overlapping_column_ranges_resolve_by_overlap() {
        let cols = vec![
            ColumnDefinition {
                name: "Wide".to_string(),
                xmin: 0.0,
                xmax: 100.0,
                order: 0,
            },
            ColumnDefinition {
                name: "Narrow".to_string(),
                xmin: 40.0,
                xmax: 60.0,
                order: 1,
            },
        ];
        let config = AssignmentConfig::default();
        let assigner = ColumnAssigner::new(&cols, &config).unwrap();
        // Both contain it fully: equal overlap → lower order
        assert_eq!(assigner.assign(&frag(45.0, 50.0)), Some(0));
        // Wider fragment overlaps Wide more
        assert_eq!(assigner.assign(&frag(30.0, 55.0)), Some(0));
    }

    #[test]
    fn test_gap_goes_to_nearest() {
        let cols = vec![
            ColumnDefinition {
                name: "A".to_string(),
                xmin: 0.0,
                xmax: 10.0,
                order: 0,
            },
            ColumnDefinition {
                name: "B".to_string(),
                xmin: 30.0,
                xmax: 40.0,
                order: 1,
            },
        ];
        let config = AssignmentConfig::default();
        let assigner = ColumnAssigner::new(&cols, &config).unwrap();
        assert_eq!(assigner.assign(&frag(12.0, 14.0)), Some(0));
        assert_eq!(assigner.assign(&frag(25.0, 28.0)), Some(1));
        // 5 from A, 5 from B
        assert_eq!(assigner.assign(&frag(15.0, 25.0)), Some(0));
        assert_eq!(assigner.assign(&frag(100.0, 110.0)), Some(1));
    }

    #[test]
    fn test_gap_policy_drop_and_max_distance() {
        let cols = columns();
        let drop = AssignmentConfig {
            gap_policy: GapPolicy::Drop,
            max_gap_distance: None,
        };
        let assigner = ColumnAssigner::new(&cols, &drop).unwrap();
        assert_eq!(assigner.assign(&frag(40.0, 45.0)), None);
        assert_eq!(assigner.assign(&frag(20.0, 25.0)), Some(1));

        let bounded = AssignmentConfig {
            gap_policy: GapPolicy::Nearest,
            max_gap_distance: Some(3.0),
        };
        let assigner = ColumnAssigner::new(&cols, &bounded).unwrap();
        assert_eq!(assigner.assign(&frag(37.0, 40.0)), Some(1));
        assert_eq!(assigner.assign(&frag(40.0, 45.0)), None);
    }

    #[test]
    fn test_zero_columns_is_configuration_error() {
        let config = AssignmentConfig::default();
        assert!(matches!(
            ColumnAssigner::new(&[], &config),
            Err(LayoutError::NoColumns)
        ));
    }
}
