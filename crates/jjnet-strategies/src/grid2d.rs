//! Planar grid populator.
//!
//! Lays out `rows × columns` jittered nodes. Every horizontal edge gets a
//! contact tagged `x`, every vertical edge a contact tagged `y`, and every
//! cell a circuit tagged `cell`. Contacts and circuits carry `row` and `col`
//! properties with the grid coordinates of the node that created them.
//!
//! Cell squares start as the area of the jittered quadrilateral and are
//! then normalized to `mean_area / area`, so an unjittered grid has every
//! square equal to 1. A zero-area cell fails the call and leaves the
//! network unchanged.

use jjnet_core::{Circuit, Contact, ContactRef, HookError, Network, Populator, RandomSource, Tagged};
use tracing::debug;

use crate::rng::ConstRng;

/// Parameters for [`Grid2d`].
#[derive(Clone, Debug)]
pub struct Grid2dParams {
    /// Nodes per row. Must be at least 1.
    pub columns: usize,
    /// Nodes per column. Must be at least 1.
    pub rows: usize,
    /// Horizontal jitter added to each node's column coordinate.
    pub x_rng: Box<dyn RandomSource>,
    /// Vertical jitter added to each node's row coordinate.
    pub y_rng: Box<dyn RandomSource>,
    /// Source of contact `beta`.
    pub beta_rng: Box<dyn RandomSource>,
    /// Source of contact `tau`.
    pub tau_rng: Box<dyn RandomSource>,
    /// Source of contact `v`.
    pub v_rng: Box<dyn RandomSource>,
}

impl Grid2dParams {
    /// A regular grid with default contact parameters and no jitter.
    pub fn new(columns: usize, rows: usize) -> Self {
        let defaults = Contact::default();
        Self {
            columns,
            rows,
            x_rng: Box::new(ConstRng::new(0.0)),
            y_rng: Box::new(ConstRng::new(0.0)),
            beta_rng: Box::new(ConstRng::new(defaults.beta)),
            tau_rng: Box::new(ConstRng::new(defaults.tau)),
            v_rng: Box::new(ConstRng::new(defaults.v)),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Point {
    x: f64,
    y: f64,
}

/// Populates a network with a 2-D grid of contacts and cells.
#[derive(Clone, Debug)]
pub struct Grid2d {
    params: Grid2dParams,
}

impl Grid2d {
    /// A populator with the given parameters.
    pub fn new(params: Grid2dParams) -> Self {
        Self { params }
    }

    /// The populator's parameters.
    pub fn params(&self) -> &Grid2dParams {
        &self.params
    }

    fn contact(&mut self, tag: &str, row: usize, col: usize) -> Contact {
        let p = &mut self.params;
        let mut c = Contact::new(p.beta_rng.generate(), p.tau_rng.generate(), p.v_rng.generate());
        c.add_tag(tag);
        c.set_prop("row", row);
        c.set_prop("col", col);
        c
    }
}

impl Populator for Grid2d {
    fn name(&self) -> &str {
        "grid2d"
    }

    fn populate(&mut self, network: &mut Network) -> Result<(), HookError> {
        let (rows, columns) = (self.params.rows, self.params.columns);
        if rows == 0 || columns == 0 {
            return Err(HookError::Failed {
                reason: format!("grid needs at least one row and column, got {columns}x{rows}"),
            });
        }

        // Nothing reaches the network until every cell is known to be valid.
        let base = network.contact_count();
        let mut contacts: Vec<Contact> = Vec::new();
        let mut cells: Vec<Circuit> = Vec::new();
        let mut points: Vec<Vec<Point>> = Vec::with_capacity(rows);
        // x[row][col - 1] and y[row][col]; row 0 has no vertical contacts.
        let mut x_index: Vec<Vec<usize>> = Vec::with_capacity(rows);
        let mut y_index: Vec<Vec<usize>> = Vec::with_capacity(rows);
        let mut area_sum = 0.0;

        for row in 0..rows {
            points.push(Vec::with_capacity(columns));
            x_index.push(Vec::with_capacity(columns));
            y_index.push(Vec::with_capacity(columns));

            for col in 0..columns {
                let p = Point {
                    x: col as f64 + self.params.x_rng.generate(),
                    y: row as f64 + self.params.y_rng.generate(),
                };
                points[row].push(p);

                let mut x = None;
                let mut y = None;
                if col > 0 {
                    let i = base + contacts.len();
                    contacts.push(self.contact("x", row, col));
                    x_index[row].push(i);
                    x = Some(i);
                }
                if row > 0 {
                    let i = base + contacts.len();
                    contacts.push(self.contact("y", row, col));
                    y_index[row].push(i);
                    y = Some(i);
                }

                if let (Some(upper), Some(right)) = (x, y) {
                    let area = quad_area(
                        points[row - 1][col - 1],
                        points[row][col - 1],
                        points[row][col],
                        points[row - 1][col],
                    );
                    if area <= 0.0 {
                        return Err(HookError::Failed {
                            reason: format!("cell at row {row}, col {col} is degenerate"),
                        });
                    }
                    area_sum += area;

                    let mut cell = Circuit::new(area);
                    cell.add_tag("cell");
                    cell.set_prop("row", row);
                    cell.set_prop("col", col);
                    cell.add_contact_ref(ContactRef::new(x_index[row - 1][col - 1], 1.0, -1.0));
                    cell.add_contact_ref(ContactRef::new(y_index[row][col - 1], -1.0, 1.0));
                    cell.add_contact_ref(ContactRef::new(upper, -1.0, 1.0));
                    cell.add_contact_ref(ContactRef::new(right, 1.0, -1.0));
                    cells.push(cell);
                }
            }
        }

        if !cells.is_empty() {
            let mean_area = area_sum / cells.len() as f64;
            for cell in &mut cells {
                cell.square = mean_area / cell.square;
            }
        }

        for contact in contacts {
            network.add_contact(contact);
        }
        let cell_count = cells.len();
        for cell in cells {
            network.add_circuit(cell)?;
        }

        debug!(rows, columns, cells = cell_count, "grid populated");
        Ok(())
    }
}

/// Area of quadrilateral `abcd` as the sum of triangles `abc` and `acd`.
fn quad_area(a: Point, b: Point, c: Point, d: Point) -> f64 {
    tri_area(a, b, c) + tri_area(a, c, d)
}

fn tri_area(a: Point, b: Point, c: Point) -> f64 {
    0.5 * ((b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y)).abs()
}
