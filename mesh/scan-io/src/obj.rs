//! Wavefront OBJ support (geometry only).
//!
//! Reads `v`, `vn` and `f` records. Face corners may be written as `v`,
//! `v/vt`, `v//vn` or `v/vt/vn`; indices are 1-based and may be negative
//! (relative to the end of the list). Polygons are fan-triangulated.
//! Materials, groups and texture coordinates are ignored.

use std::io::Write;

use scan_types::{Point3, ScanMesh, Vector3, Vertex};

use crate::error::{IoError, IoResult};

/// Parse OBJ bytes.
///
/// # Errors
///
/// Returns [`IoError::CorruptMesh`] on malformed numbers or indices.
pub fn parse_obj(bytes: &[u8]) -> IoResult<ScanMesh> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| IoError::corrupt(format!("OBJ is not valid UTF-8: {e}")))?;

    let mut mesh = ScanMesh::new();
    let mut normals: Vec<Vector3<f64>> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or_default();
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };
        let rest: Vec<&str> = parts.collect();

        match keyword {
            "v" => {
                let [x, y, z] = parse_triplet(&rest, line_no)?;
                mesh.vertices.push(Vertex::new(Point3::new(x, y, z)));
            }
            "vn" => {
                let [x, y, z] = parse_triplet(&rest, line_no)?;
                normals.push(Vector3::new(x, y, z));
            }
            "f" => {
                if rest.len() < 3 {
                    return Err(IoError::corrupt(format!(
                        "line {}: face needs at least three corners",
                        line_no + 1
                    )));
                }
                let mut corners = Vec::with_capacity(rest.len());
                for token in &rest {
                    let (vi, ni) = parse_corner(token, mesh.vertices.len(), normals.len(), line_no)?;
                    if let Some(n) = ni.and_then(|ni| normals.get(ni as usize)) {
                        if let Some(v) = mesh.vertices.get_mut(vi as usize) {
                            v.normal = Some(*n);
                        }
                    }
                    corners.push(vi);
                }
                for i in 1..corners.len() - 1 {
                    mesh.faces.push([corners[0], corners[i], corners[i + 1]]);
                }
            }
            _ => {}
        }
    }

    Ok(mesh)
}

fn parse_triplet(parts: &[&str], line_no: usize) -> IoResult<[f64; 3]> {
    if parts.len() < 3 {
        return Err(IoError::corrupt(format!(
            "line {}: expected three numbers",
            line_no + 1
        )));
    }
    let mut out = [0.0; 3];
    for (slot, token) in out.iter_mut().zip(parts) {
        *slot = token.parse().map_err(|_| {
            IoError::corrupt(format!("line {}: bad number {token:?}", line_no + 1))
        })?;
    }
    Ok(out)
}

/// Resolve a face corner into a 0-based vertex index and optional normal index.
fn parse_corner(
    token: &str,
    vertex_count: usize,
    normal_count: usize,
    line_no: usize,
) -> IoResult<(u32, Option<u32>)> {
    let mut fields = token.split('/');
    let vertex = fields.next().unwrap_or_default();
    let _texture = fields.next();
    let normal = fields.next().filter(|s| !s.is_empty());

    let vi = resolve_index(vertex, vertex_count, line_no)?;
    let ni = normal
        .map(|n| resolve_index(n, normal_count, line_no))
        .transpose()?;
    Ok((vi, ni))
}

fn resolve_index(token: &str, count: usize, line_no: usize) -> IoResult<u32> {
    let raw: i64 = token
        .parse()
        .map_err(|_| IoError::corrupt(format!("line {}: bad index {token:?}", line_no + 1)))?;
    let count = i64::try_from(count).unwrap_or(i64::MAX);
    let zero_based = match raw {
        0 => {
            return Err(IoError::corrupt(format!(
                "line {}: OBJ indices start at 1",
                line_no + 1
            )))
        }
        r if r > 0 => r - 1,
        r => count + r,
    };
    // Out-of-range indices are caught by the caller's face validation
    Ok(u32::try_from(zero_based).unwrap_or(u32::MAX))
}

/// Write a mesh as OBJ, including `vn` records when every vertex has a normal.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_obj<W: Write>(mesh: &ScanMesh, mut writer: W) -> IoResult<()> {
    let with_normals = !mesh.vertices.is_empty() && mesh.vertices.iter().all(|v| v.normal.is_some());

    writeln!(writer, "# written by scan-io")?;
    for v in &mesh.vertices {
        let p = v.position;
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    if with_normals {
        for n in mesh.vertices.iter().filter_map(|v| v.normal) {
            writeln!(writer, "vn {} {} {}", n.x, n.y, n.z)?;
        }
    }
    for &[a, b, c] in &mesh.faces {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        if with_normals {
            writeln!(writer, "f {a}//{a} {b}//{b} {c}//{c}")?;
        } else {
            writeln!(writer, "f {a} {b} {c}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use scan_types::MeshTopology;

    const SQUARE: &str = "# square
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1 4//1
";

    #[test]
    fn polygon_is_fan_triangulated() {
        let mesh = parse_obj(SQUARE.as_bytes()).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);
        assert_eq!(mesh.vertices[3].normal, Some(Vector3::z()));
    }

    #[test]
    fn negative_indices_are_relative() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n";
        let mesh = parse_obj(text.as_bytes()).unwrap();
        assert_eq!(mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn texture_corners_are_accepted() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nf 1/1 2/1 3/1\n";
        let mesh = parse_obj(text.as_bytes()).unwrap();
        assert_eq!(mesh.face_count(), 1);
    }

    #[test]
    fn zero_index_is_corrupt() {
        let text = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n";
        assert!(matches!(
            parse_obj(text.as_bytes()),
            Err(IoError::CorruptMesh { .. })
        ));
    }

    #[test]
    fn roundtrip_with_normals() {
        let mesh = parse_obj(SQUARE.as_bytes()).unwrap();
        let mut buf = Vec::new();
        write_obj(&mesh, &mut buf).unwrap();
        let loaded = parse_obj(&buf).unwrap();
        assert_eq!(loaded.faces, mesh.faces);
        assert_eq!(loaded.vertices[1].normal, Some(Vector3::z()));
    }
}
