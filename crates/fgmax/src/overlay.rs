//! Map overlays for checking fgmax geometry in a map viewer.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::geometry::ResolvedGeometry;

/// Default outline colour (RGB hex).
pub const DEFAULT_COLOR: &str = "8888FF";

/// Outline of an fgmax region.
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// Axis-aligned box as `[x1, x2, y1, y2]`.
    Box([f64; 4]),
    /// Quadrilateral as `[x1, y1, x2, y2, x3, y3, x4, y4]`.
    Quad([f64; 8]),
}

impl Overlay {
    /// Outline for a resolved geometry. Transects have none.
    pub fn for_geometry(geometry: &ResolvedGeometry) -> Option<Self> {
        match geometry {
            ResolvedGeometry::Rectangular { bbox, .. } => {
                Some(Self::Box([bbox.x1, bbox.x2, bbox.y1, bbox.y2]))
            }
            ResolvedGeometry::Quadrilateral { corners, .. } => {
                let [(x1, y1), (x2, y2), (x3, y3), (x4, y4)] = *corners;
                Some(Self::Quad([x1, y1, x2, y2, x3, y3, x4, y4]))
            }
            ResolvedGeometry::Transect { .. } => None,
        }
    }

    /// Closed ring of (x, y) vertices.
    pub fn ring(&self) -> Vec<(f64, f64)> {
        match *self {
            Self::Box([x1, x2, y1, y2]) => vec![(x1, y1), (x2, y1), (x2, y2), (x1, y2), (x1, y1)],
            Self::Quad([x1, y1, x2, y2, x3, y3, x4, y4]) => {
                vec![(x1, y1), (x2, y2), (x3, y3), (x4, y4), (x1, y1)]
            }
        }
    }
}

/// Writes an overlay to a map file.
pub trait OverlayExporter {
    /// Write `overlay` to `path` labelled `label` and outlined in `color`.
    fn export(&self, overlay: &Overlay, path: &Path, label: &str, color: &str) -> Result<()>;
}

/// Writes overlays as KML placemarks.
#[derive(Debug, Clone, Copy, Default)]
pub struct KmlExporter;

impl KmlExporter {
    /// Render the KML document for an overlay.
    pub fn render(overlay: &Overlay, label: &str, color: &str) -> String {
        let coordinates = overlay
            .ring()
            .iter()
            .map(|(x, y)| format!("{:.9},{:.9},0", x, y))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
<Document>
<name>{name}</name>
<Style id="Path">
<LineStyle><color>FF{color}</color><width>3</width></LineStyle>
<PolyStyle><color>00000000</color></PolyStyle>
</Style>
<Placemark>
<name>{name}</name>
<styleUrl>#Path</styleUrl>
<Polygon>
<tessellate>1</tessellate>
<altitudeMode>clampToGround</altitudeMode>
<outerBoundaryIs><LinearRing><coordinates>
{coordinates}
</coordinates></LinearRing></outerBoundaryIs>
</Polygon>
</Placemark>
</Document>
</kml>
"#,
            name = xml_escape(label),
            color = color,
            coordinates = coordinates,
        )
    }
}

impl OverlayExporter for KmlExporter {
    fn export(&self, overlay: &Overlay, path: &Path, label: &str, color: &str) -> Result<()> {
        fs::write(path, Self::render(overlay, label, color))?;
        tracing::info!(path = %path.display(), "created overlay");
        Ok(())
    }
}

/// Overlay path and label for an input file: `<stem>.kml` and `<stem>`.
pub fn overlay_target(input_file: &Path) -> (PathBuf, String) {
    let root = input_file.with_extension("");
    let kml = root.with_extension("kml");
    (kml, root.to_string_lossy().into_owned())
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;

    #[test]
    fn test_box_ring_is_closed() {
        let overlay = Overlay::Box([0.0, 2.0, 1.0, 3.0]);
        let ring = overlay.ring();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring[2], (2.0, 3.0));
    }

    #[test]
    fn test_overlay_for_geometry() {
        let rect = ResolvedGeometry::Rectangular {
            nx: 2,
            ny: 2,
            dx: 1.0,
            dy: 1.0,
            bbox: BoundingBox::new(0.0, 1.0, 2.0, 3.0),
        };
        assert_eq!(
            Overlay::for_geometry(&rect),
            Some(Overlay::Box([0.0, 2.0, 1.0, 3.0]))
        );

        let transect = ResolvedGeometry::Transect {
            npts: 2,
            dx: 1.0,
            start: (0.0, 0.0),
            end: (1.0, 0.0),
        };
        assert_eq!(Overlay::for_geometry(&transect), None);
    }

    #[test]
    fn test_render_kml() {
        let kml = KmlExporter::render(&Overlay::Box([0.0, 1.0, 0.0, 1.0]), "fg<1>", DEFAULT_COLOR);
        assert!(kml.starts_with("<?xml"));
        assert!(kml.contains("<name>fg&lt;1&gt;</name>"));
        assert!(kml.contains("<color>FF8888FF</color>"));
        assert!(kml.contains("1.000000000,1.000000000,0"));
    }

    #[test]
    fn test_overlay_target() {
        let (kml, label) = overlay_target(Path::new("runs/fgmax_grid.txt"));
        assert_eq!(kml, PathBuf::from("runs/fgmax_grid.kml"));
        assert_eq!(label, "runs/fgmax_grid");
    }
}
