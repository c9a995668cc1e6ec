//! Vector payload: an ordered sequence of geometries with attributes.

use super::error::VectorError;
use std::collections::BTreeMap;

/// Kind tag of a single geometry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Line,
    Polygon,
}

/// One geometry record: a kind tag, its coordinate sequence, and an
/// attribute mapping.
///
/// Geometries need not be distinct; insertion order is preserved and is
/// meaningful for rendering priority.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub kind: GeometryKind,
    pub coordinates: Vec<(f64, f64)>,
    pub attributes: BTreeMap<String, String>,
}

impl Geometry {
    /// A geometry without attributes.
    pub fn new(kind: GeometryKind, coordinates: Vec<(f64, f64)>) -> Self {
        Geometry {
            kind,
            coordinates,
            attributes: BTreeMap::new(),
        }
    }

    /// Adds one attribute, builder style.
    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }
}

/// Ordered collection of geometries backing a vector layer.
#[derive(Debug, Clone, Default)]
pub struct VectorData {
    geometries: Vec<Geometry>,
}

impl VectorData {
    pub fn new() -> Self {
        VectorData {
            geometries: Vec::new(),
        }
    }

    /// Appends a geometry.
    ///
    /// # Errors
    ///
    /// Fails with [`VectorError::EmptyCoordinates`] when the coordinate
    /// sequence is empty; the collection is unchanged in that case.
    pub fn add(&mut self, geometry: Geometry) -> Result<(), VectorError> {
        if geometry.coordinates.is_empty() {
            return Err(VectorError::EmptyCoordinates);
        }
        self.geometries.push(geometry);
        Ok(())
    }

    /// Number of stored geometries.
    pub fn len(&self) -> usize {
        self.geometries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.geometries.is_empty()
    }

    /// Retrieves a geometry by insertion index, bounds-checked.
    pub fn get(&self, index: usize) -> Result<&Geometry, VectorError> {
        self.geometries.get(index).ok_or(VectorError::OutOfRange {
            index,
            len: self.geometries.len(),
        })
    }

    /// Iterates geometries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Geometry> {
        self.geometries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_get_preserves_order() {
        let mut data = VectorData::new();
        data.add(Geometry::new(GeometryKind::Point, vec![(0.0, 0.0)]))
            .unwrap();
        data.add(Geometry::new(
            GeometryKind::Line,
            vec![(0.0, 0.0), (1.0, 1.0)],
        ))
        .unwrap();

        assert_eq!(data.len(), 2);
        assert_eq!(data.get(0).unwrap().kind, GeometryKind::Point);
        assert_eq!(data.get(1).unwrap().kind, GeometryKind::Line);
    }

    #[test]
    fn test_add_rejects_empty_coordinates() {
        let mut data = VectorData::new();
        let result = data.add(Geometry::new(GeometryKind::Polygon, vec![]));
        assert_eq!(result, Err(VectorError::EmptyCoordinates));
        assert!(data.is_empty(), "rejected geometry must not be stored");
    }

    #[test]
    fn test_get_out_of_range() {
        let data = VectorData::new();
        assert_eq!(
            data.get(0),
            Err(VectorError::OutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn test_duplicate_geometries_allowed() {
        let mut data = VectorData::new();
        let g = Geometry::new(GeometryKind::Point, vec![(3.0, 4.0)]);
        data.add(g.clone()).unwrap();
        data.add(g).unwrap();
        assert_eq!(data.len(), 2);
    }

    #[test]
    fn test_attributes_round_trip() {
        let g = Geometry::new(GeometryKind::Point, vec![(1.0, 2.0)])
            .with_attribute("class", "landing-site")
            .with_attribute("score", "0.93");
        assert_eq!(g.attributes.get("class").unwrap(), "landing-site");
        assert_eq!(g.attributes.len(), 2);
    }
}
