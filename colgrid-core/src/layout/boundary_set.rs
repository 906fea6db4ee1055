use crate::error::LayoutError;
use crate::types::ColumnDefinition;
use serde::{Deserialize, Serialize};

const DEFAULT_COLUMN_PREFIX: &str = "NewColumn";

/// Column entry as written in layout files. The order index is implied by
/// list position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub xmin: f64,
    pub xmax: f64,
}

/// Ordered collection of named column definitions.
///
/// Columns are kept in presentation order; `order` on every definition is
/// renumbered after each edit so it always equals the column's position.
/// Ranges may overlap; overlap is resolved at assignment time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    columns: Vec<ColumnDefinition>,
}

impl BoundarySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from layout-file specs, applying the same validation as `add`
    pub fn from_specs(specs: &[ColumnSpec]) -> Result<Self, LayoutError> {
        let mut set = Self::new();
        for spec in specs {
            set.add(&spec.name, spec.xmin, spec.xmax)?;
        }
        Ok(set)
    }

    pub fn to_specs(&self) -> Vec<ColumnSpec> {
        self.columns
            .iter()
            .map(|c| ColumnSpec {
                name: c.name.clone(),
                xmin: c.xmin,
                xmax: c.xmax,
            })
            .collect()
    }

    /// Append a column at the right end of the presentation order
    pub fn add(&mut self, name: &str, xmin: f64, xmax: f64) -> Result<(), LayoutError> {
        let name = name.trim();
        validate_name(name)?;
        validate_range(name, xmin, xmax)?;
        if self.position(name).is_some() {
            return Err(LayoutError::invalid_boundary(name, "name already exists"));
        }

        self.columns.push(ColumnDefinition {
            name: name.to_string(),
            xmin,
            xmax,
            order: self.columns.len(),
        });
        Ok(())
    }

    /// Add a column under the first free `NewColumn{n}` name and return that name
    pub fn add_default(&mut self, xmin: f64, xmax: f64) -> Result<String, LayoutError> {
        let name = self.next_default_name();
        self.add(&name, xmin, xmax)?;
        Ok(name)
    }

    pub fn next_default_name(&self) -> String {
        let mut counter = 1;
        loop {
            let candidate = format!("{DEFAULT_COLUMN_PREFIX}{counter}");
            if self.position(&candidate).is_none() {
                return candidate;
            }
            counter += 1;
        }
    }

    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), LayoutError> {
        let index = self
            .position(old_name)
            .ok_or_else(|| LayoutError::NotFound(old_name.to_string()))?;

        let new_name = new_name.trim();
        validate_name(new_name)?;
        if new_name == self.columns[index].name {
            return Ok(());
        }
        if self.position(new_name).is_some() {
            return Err(LayoutError::DuplicateName(new_name.to_string()));
        }

        self.columns[index].name = new_name.to_string();
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<ColumnDefinition, LayoutError> {
        let index = self
            .position(name)
            .ok_or_else(|| LayoutError::NotFound(name.to_string()))?;
        let removed = self.columns.remove(index);
        self.renumber();
        Ok(removed)
    }

    /// Move `name` to `new_index`; the columns in between shift by one
    pub fn reorder(&mut self, name: &str, new_index: usize) -> Result<(), LayoutError> {
        let index = self
            .position(name)
            .ok_or_else(|| LayoutError::NotFound(name.to_string()))?;
        if new_index >= self.columns.len() {
            return Err(LayoutError::IndexOutOfRange {
                index: new_index,
                len: self.columns.len(),
            });
        }

        let column = self.columns.remove(index);
        self.columns.insert(new_index, column);
        self.renumber();
        Ok(())
    }

    pub fn resize(&mut self, name: &str, xmin: f64, xmax: f64) -> Result<(), LayoutError> {
        let index = self
            .position(name)
            .ok_or_else(|| LayoutError::NotFound(name.to_string()))?;
        validate_range(name, xmin, xmax)?;

        let column = &mut self.columns[index];
        column.xmin = xmin;
        column.xmax = xmax;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDefinition> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Immutable copy of the columns in order-index order, for one extraction run
    pub fn snapshot(&self) -> Vec<ColumnDefinition> {
        self.columns.clone()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    fn renumber(&mut self) {
        for (order, column) in self.columns.iter_mut().enumerate() {
            column.order = order;
        }
    }
}

fn validate_name(name: &str) -> Result<(), LayoutError> {
    if name.is_empty() {
        return Err(LayoutError::invalid_boundary(name, "name must not be empty"));
    }
    Ok(())
}

fn validate_range(name: &str, xmin: f64, xmax: f64) -> Result<(), LayoutError> {
    if !xmin.is_finite() || !xmax.is_finite() {
        return Err(LayoutError::invalid_boundary(
            name,
            format!("bounds must be finite (xmin={xmin}, xmax={xmax})"),
        ));
    }
    if xmin >= xmax {
        return Err(LayoutError::invalid_boundary(
            name,
            format!("xmin ({xmin}) must be less than xmax ({xmax})"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_columns() -> BoundarySet {
        let mut set = BoundarySet::new();
        set.add("Depth", 0.0, 40.0).unwrap();
        set.add("Sample", 40.0, 80.0).unwrap();
        set.add("Blows", 80.0, 120.0).unwrap();
        set
    }

    #[test]
    fn test_add_assigns_order_by_position() {
        let set = three_columns();
        let orders: Vec<usize> = set.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(set.names(), vec!["Depth", "Sample", "Blows"]);
    }

    #[test]
    fn test_add_rejects_inverted_and_empty_ranges() {
        let mut set = BoundarySet::new();
        assert!(matches!(
            set.add("A", 10.0, 10.0),
            Err(LayoutError::InvalidBoundary { .. })
        ));
        assert!(matches!(
            set.add("A", 20.0, 10.0),
            Err(LayoutError::InvalidBoundary { .. })
        ));
        assert!(matches!(
            set.add("A", f64::NAN, 10.0),
            Err(LayoutError::InvalidBoundary { .. })
        ));
        assert!(set.is_empty());
    }

    #[test]
    fn test_add_rejects_existing_name() {
        let mut set = three_columns();
        let err = set.add("Sample", 200.0, 220.0).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidBoundary { ref name, .. } if name == "Sample"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_add_trims_name_and_rejects_blank() {
        let mut set = BoundarySet::new();
        set.add("  Moisture  ", 0.0, 5.0).unwrap();
        assert!(set.get("Moisture").is_some());
        assert!(set.add("   ", 5.0, 10.0).is_err());
    }

    #[test]
    fn test_overlapping_ranges_are_allowed() {
        let mut set = BoundarySet::new();
        set.add("Wide", 0.0, 100.0).unwrap();
        set.add("Narrow", 40.0, 60.0).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_add_default_picks_lowest_free_name() {
        let mut set = BoundarySet::new();
        assert_eq!(set.add_default(10.0, 50.0).unwrap(), "NewColumn1");
        assert_eq!(set.add_default(60.0, 90.0).unwrap(), "NewColumn2");
        set.remove("NewColumn1").unwrap();
        assert_eq!(set.add_default(100.0, 120.0).unwrap(), "NewColumn1");
        // Presentation order follows insertion, not the numeric suffix
        assert_eq!(set.names(), vec!["NewColumn2", "NewColumn1"]);
    }

    #[test]
    fn test_rename() {
        let mut set = three_columns();
        set.rename("Sample", "SampleID").unwrap();
        assert_eq!(set.names(), vec!["Depth", "SampleID", "Blows"]);

        assert_eq!(
            set.rename("Missing", "X"),
            Err(LayoutError::NotFound("Missing".to_string()))
        );
        assert_eq!(
            set.rename("Depth", "Blows"),
            Err(LayoutError::DuplicateName("Blows".to_string()))
        );
        // Renaming onto itself is a no-op
        set.rename("Depth", "Depth").unwrap();
    }

    #[test]
    fn test_remove_renumbers() {
        let mut set = three_columns();
        let removed = set.remove("Depth").unwrap();
        assert_eq!(removed.name, "Depth");
        assert_eq!(set.get("Sample").unwrap().order, 0);
        assert_eq!(set.get("Blows").unwrap().order, 1);
        assert_eq!(
            set.remove("Depth"),
            Err(LayoutError::NotFound("Depth".to_string()))
        );
    }

    #[test]
    fn test_reorder_shifts_intervening_columns() {
        let mut set = three_columns();
        set.reorder("Blows", 0).unwrap();
        assert_eq!(set.names(), vec!["Blows", "Depth", "Sample"]);
        assert_eq!(set.get("Depth").unwrap().order, 1);

        set.reorder("Blows", 2).unwrap();
        assert_eq!(set.names(), vec!["Depth", "Sample", "Blows"]);

        assert_eq!(
            set.reorder("Depth", 3),
            Err(LayoutError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_resize_validates() {
        let mut set = three_columns();
        set.resize("Depth", 5.0, 35.0).unwrap();
        let depth = set.get("Depth").unwrap();
        assert_eq!((depth.xmin, depth.xmax), (5.0, 35.0));
        assert!(set.resize("Depth", 35.0, 5.0).is_err());
        assert!(matches!(set.resize("Nope", 0.0, 1.0), Err(LayoutError::NotFound(_))));
    }

    #[test]
    fn test_snapshot_is_detached_from_later_edits() {
        let mut set = three_columns();
        let snapshot = set.snapshot();
        set.remove("Sample").unwrap();
        set.rename("Depth", "Top").unwrap();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].name, "Depth");
    }

    #[test]
    fn test_specs_roundtrip_preserves_order() {
        let set = three_columns();
        let rebuilt = BoundarySet::from_specs(&set.to_specs()).unwrap();
        assert_eq!(rebuilt, set);
    }
}
