//! Mesh text reader and writer.

use super::format::format_g;
use crate::error::{RelaxError, Result};
use crate::primitives::Point2;
use crate::triangulation::{Triangulation, VertexId};
use num_traits::Float;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace};

/// A loaded mesh.
#[derive(Debug, Clone)]
pub struct MeshData<F> {
    /// The constrained triangulation with its domain marked.
    pub triangulation: Triangulation<F>,
    /// One handle per input point, in file order. Duplicate points share a
    /// handle.
    pub vertices: Vec<VertexId>,
    /// Hole seed coordinates.
    pub seeds: Vec<Point2<F>>,
}

/// Reads a mesh from `reader` and builds its triangulation.
///
/// # Errors
///
/// - [`RelaxError::Parse`] for a malformed or truncated token stream.
/// - [`RelaxError::UnknownVertex`] for a boundary or seed index with no point.
/// - Any error from building the triangulation, such as
///   [`RelaxError::ConstraintIntersection`] or [`RelaxError::AmbiguousSeed`].
///
/// # Example
///
/// ```
/// use relaxum::io::read_mesh;
///
/// let text = "5\n0 0\n1 0\n1 1\n0 1\n0.3 0.6\n4\n0 1\n1 2\n2 3\n3 0\n0\n";
/// let mesh = read_mesh::<f64, _>(text.as_bytes())?;
///
/// assert_eq!(mesh.vertices.len(), 5);
/// assert_eq!(mesh.triangulation.num_triangles(), 4);
/// assert!(mesh.seeds.is_empty());
/// # Ok::<(), relaxum::RelaxError>(())
/// ```
pub fn read_mesh<F, R>(mut reader: R) -> Result<MeshData<F>>
where
    F: Float + FromStr,
    R: Read,
{
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let mut tokens = Tokens::new(&text);

    let num_points = tokens.count("point count")?;
    let mut points = Vec::with_capacity(num_points);
    for _ in 0..num_points {
        let x = tokens.number("x coordinate")?;
        let y = tokens.number("y coordinate")?;
        trace!(x = %format_g(x), y = %format_g(y), "inserting point");
        points.push(Point2::new(x, y));
    }

    let (mut triangulation, vertices) = Triangulation::from_points(&points)?;

    let num_boundaries = tokens.count("boundary count")?;
    for _ in 0..num_boundaries {
        let a = tokens.index("boundary start", points.len())?;
        let b = tokens.index("boundary end", points.len())?;
        trace!(a, b, "inserting boundary");
        triangulation.insert_constraint(vertices[a], vertices[b])?;
    }

    let num_seeds = tokens.count("seed count")?;
    let mut seeds = Vec::with_capacity(num_seeds);
    for _ in 0..num_seeds {
        let s = tokens.index("seed", points.len())?;
        let seed = points[s];
        trace!(x = %format_g(seed.x), y = %format_g(seed.y), "seed point");
        seeds.push(seed);
    }

    triangulation.mark_domain(&seeds)?;

    debug!(
        points = num_points,
        boundaries = num_boundaries,
        seeds = num_seeds,
        triangles = triangulation.num_triangles(),
        "loaded mesh"
    );

    Ok(MeshData {
        triangulation,
        vertices,
        seeds,
    })
}

/// Opens `path` and reads it with [`read_mesh`].
pub fn load_mesh<F, P>(path: P) -> Result<MeshData<F>>
where
    F: Float + FromStr,
    P: AsRef<Path>,
{
    let file = File::open(path)?;
    read_mesh(BufReader::new(file))
}

/// Writes every vertex and triangle of `tri`.
///
/// Triangles inside holes are written too; only the enclosing triangle is
/// left out.
///
/// # Example
///
/// ```
/// use relaxum::io::write_mesh;
/// use relaxum::{Point2, Triangulation};
///
/// let points = [Point2::new(0.0_f64, 0.0), Point2::new(1.0, 0.0), Point2::new(0.0, 0.5)];
/// let (tri, _) = Triangulation::from_points(&points)?;
///
/// let mut out = Vec::new();
/// write_mesh(&tri, &mut out)?;
/// let text = String::from_utf8(out).unwrap();
/// assert!(text.starts_with("3 1 2\n0 0\n1 0\n0 0.5\n\n"));
/// assert_eq!(text.lines().count(), 6);
/// # Ok::<(), relaxum::RelaxError>(())
/// ```
pub fn write_mesh<F: Float, W: Write>(tri: &Triangulation<F>, mut writer: W) -> Result<()> {
    let index = write_vertices(tri, &mut writer, tri.num_triangles())?;

    for t in tri.triangles() {
        let [a, b, c] = tri.triangle_vertices(t);
        writeln!(writer, "{} {} {}", index[&a], index[&b], index[&c])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes every vertex and every triangle edge of `tri`, one `i j` pair per
/// edge with `i < j`.
pub fn write_mesh_edges<F: Float, W: Write>(tri: &Triangulation<F>, mut writer: W) -> Result<()> {
    let mut edges = BTreeSet::new();
    for t in tri.triangles() {
        let [a, b, c] = tri.triangle_vertices(t);
        for (u, w) in [(a, b), (b, c), (c, a)] {
            edges.insert((u.min(w), u.max(w)));
        }
    }

    let index = write_vertices(tri, &mut writer, edges.len())?;
    for (u, w) in edges {
        writeln!(writer, "{} {}", index[&u], index[&w])?;
    }
    writer.flush()?;
    Ok(())
}

/// Creates `path` and writes `tri` to it with [`write_mesh`].
pub fn save_mesh<F: Float, P: AsRef<Path>>(path: P, tri: &Triangulation<F>) -> Result<()> {
    let file = File::create(path)?;
    write_mesh(tri, BufWriter::new(file))
}

/// Writes the header and vertex block, returning each vertex's output index.
fn write_vertices<F: Float, W: Write>(
    tri: &Triangulation<F>,
    writer: &mut W,
    count: usize,
) -> Result<HashMap<VertexId, usize>> {
    writeln!(writer, "{} {} 2", tri.num_vertices(), count)?;

    let mut index = HashMap::with_capacity(tri.num_vertices());
    for v in tri.vertices() {
        let p = tri.point(v);
        writeln!(writer, "{} {}", format_g(p.x), format_g(p.y))?;
        index.insert(v, index.len());
    }
    writeln!(writer)?;
    Ok(index)
}

/// Whitespace tokenizer that remembers the position of each token.
struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
    position: usize,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            iter: text.split_whitespace(),
            position: 0,
        }
    }

    fn next(&mut self, what: &str) -> Result<&'a str> {
        let token = self.iter.next().ok_or_else(|| RelaxError::Parse {
            token: self.position,
            message: format!("unexpected end of input, expected {what}"),
        })?;
        self.position += 1;
        Ok(token)
    }

    fn error(&self, token: &str, what: &str) -> RelaxError {
        RelaxError::Parse {
            token: self.position - 1,
            message: format!("expected {what}, found '{token}'"),
        }
    }

    /// A section count. Missing at end of input means zero.
    fn count(&mut self, what: &str) -> Result<usize> {
        match self.iter.clone().next() {
            None => Ok(0),
            Some(_) => {
                let token = self.next(what)?;
                token.parse().map_err(|_| self.error(token, what))
            }
        }
    }

    fn number<F: Float + FromStr>(&mut self, what: &str) -> Result<F> {
        let token = self.next(what)?;
        token.parse().map_err(|_| self.error(token, what))
    }

    /// A point index, checked against the number of points.
    fn index(&mut self, what: &str, len: usize) -> Result<usize> {
        let token = self.next(what)?;
        let index: usize = token.parse().map_err(|_| self.error(token, what))?;
        if index >= len {
            return Err(RelaxError::UnknownVertex { vertex: index });
        }
        Ok(index)
    }
}
