// Copyright 2025 the Mapstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;
use mapstory_geom::Envelope;

/// Identity of a raster payload.
///
/// Two rasters with the same id are assumed to carry the same pixels; the
/// tile cache keys decoded bitmaps on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RasterId(pub u64);

/// Encoded raster image (PNG) covering a world extent.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    /// Identity used for caching the decoded bitmap.
    pub id: RasterId,
    /// Encoded image bytes.
    pub data: Arc<[u8]>,
    /// World extent covered by the image.
    pub extent: Envelope,
}

impl Raster {
    /// Creates a raster from its id, encoded bytes and world extent.
    pub fn new(id: RasterId, data: impl Into<Arc<[u8]>>, extent: Envelope) -> Self {
        Self {
            id,
            data: data.into(),
            extent,
        }
    }
}

/// Polygon with an exterior ring and optional holes.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Polygon {
    /// Exterior ring. The closing vertex may be omitted.
    pub exterior: Vec<Point>,
    /// Interior rings (holes).
    pub interiors: Vec<Vec<Point>>,
}

impl Polygon {
    /// Polygon without holes.
    pub fn new(exterior: Vec<Point>) -> Self {
        Self {
            exterior,
            interiors: Vec::new(),
        }
    }
}

/// Geometry carried by a feature.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A single position.
    Point(Point),
    /// An open polyline.
    LineString(Vec<Point>),
    /// A polygon.
    Polygon(Polygon),
    /// Several polygons.
    MultiPolygon(Vec<Polygon>),
    /// An axis-aligned rectangle.
    Rect(Envelope),
    /// A georeferenced raster image.
    Raster(Raster),
}

/// Discriminant of [`Geometry`], used in diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GeometryKind {
    /// [`Geometry::Point`].
    Point,
    /// [`Geometry::LineString`].
    LineString,
    /// [`Geometry::Polygon`].
    Polygon,
    /// [`Geometry::MultiPolygon`].
    MultiPolygon,
    /// [`Geometry::Rect`].
    Rect,
    /// [`Geometry::Raster`].
    Raster,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Point => "point",
            Self::LineString => "line string",
            Self::Polygon => "polygon",
            Self::MultiPolygon => "multi-polygon",
            Self::Rect => "rectangle",
            Self::Raster => "raster",
        })
    }
}

impl Geometry {
    /// Returns the discriminant.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Point(_) => GeometryKind::Point,
            Self::LineString(_) => GeometryKind::LineString,
            Self::Polygon(_) => GeometryKind::Polygon,
            Self::MultiPolygon(_) => GeometryKind::MultiPolygon,
            Self::Rect(_) => GeometryKind::Rect,
            Self::Raster(_) => GeometryKind::Raster,
        }
    }

    /// Bounding envelope; `None` for geometries without vertices.
    pub fn envelope(&self) -> Option<Envelope> {
        match self {
            Self::Point(p) => Some(Envelope::from_point(*p)),
            Self::LineString(points) => Envelope::from_points(points.iter().copied()),
            Self::Polygon(polygon) => Envelope::from_points(polygon.exterior.iter().copied()),
            Self::MultiPolygon(polygons) => polygons
                .iter()
                .filter_map(|p| Envelope::from_points(p.exterior.iter().copied()))
                .reduce(|a, b| a.join(&b)),
            Self::Rect(env) => Some(*env),
            Self::Raster(raster) => Some(raster.extent),
        }
    }

    /// Center of the bounding envelope.
    pub fn centroid(&self) -> Option<Point> {
        self.envelope().map(|e| e.centroid())
    }
}

impl From<Point> for Geometry {
    fn from(p: Point) -> Self {
        Self::Point(p)
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}

impl From<Raster> for Geometry {
    fn from(r: Raster) -> Self {
        Self::Raster(r)
    }
}
