use crate::error::GraphError;
use crate::graph::Graph;

/// Builds the matrix-vector-multiply dataflow CDAG for a named `m x n`
/// matrix and a length-`n` vector.
///
/// Layer `v^2_*` holds the elementwise products, column-major: `v^2_{i+m*j+1}`
/// multiplies `mat[i][j]` with `vec[j]`. Layers `v^3_*` through `v^{n+1}_*`
/// accumulate the products row by row, so `v^{n+1}_i` is the i-th output.
pub fn mvm_from_mat_vec(mat: &[Vec<String>], vec: &[String]) -> Result<Graph, GraphError> {
    let m = mat.len();
    let n = vec.len();
    if m == 0 || n == 0 {
        return Err(GraphError::InvalidParameters(
            "matrix and vector must be non-empty".into(),
        ));
    }
    if mat.iter().any(|row| row.len() != n) {
        return Err(GraphError::InvalidParameters(
            "matrix rows must match the vector length".into(),
        ));
    }

    let mut graph = Graph::new();
    graph.reserve_nodes(m * n + n + m * n + m * (n - 1));

    for row in mat {
        for id in row {
            graph.add_node(id.clone())?;
        }
    }
    for id in vec {
        graph.add_node(id.clone())?;
    }
    for i in 1..=(m * n) {
        graph.add_node(format!("v^2_{i}"))?;
    }
    for set in 3..=(n + 1) {
        for i in 1..=m {
            graph.add_node(format!("v^{set}_{i}"))?;
        }
    }

    // Each vector element fans out across its column's product nodes.
    let mut column = 0;
    let mut j = 1;
    while j < m * n + n {
        let from = &vec[column];
        column += 1;
        let k = (j - 1) / (m + 1);
        for i in 0..m {
            graph.add_edge(from, &format!("v^2_{}", j - k + i), 0)?;
        }
        j += m + 1;
    }

    // Each matrix element feeds its own product node.
    for j in 0..n {
        for i in 0..m {
            graph.add_edge(&mat[i][j], &format!("v^2_{}", i + m * j + 1), 0)?;
        }
    }

    // Accumulation chain along each row.
    for set in 2..=n {
        for i in 1..=m {
            graph.add_edge(&format!("v^{set}_{i}"), &format!("v^{}_{i}", set + 1), 0)?;
        }
    }

    // Later-column products join the chain at their column's stage.
    for j in (m + 1)..=(m * n) {
        let stage = 2 + (j - 1) / m;
        let row = if j % m == 0 { m } else { j % m };
        graph.add_edge(&format!("v^2_{j}"), &format!("v^{stage}_{row}"), 0)?;
    }

    Ok(graph)
}

/// Builds an MVM CDAG with synthesized `v^1_*` input names for the given
/// matrix dimensions.
pub fn mvm_from_dimensions(m: usize, n: usize) -> Result<Graph, GraphError> {
    if m == 0 || n == 0 {
        return Err(GraphError::InvalidParameters(
            "dimensions must be positive".into(),
        ));
    }
    let mut mat = vec![vec![String::new(); n]; m];
    let mut vector = vec![String::new(); n];
    for i in 0..n {
        let z = (m + 1) * i + 1;
        vector[i] = format!("v^1_{z}");
        for j in 0..m {
            mat[j][i] = format!("v^1_{}", z + j + 1);
        }
    }
    mvm_from_mat_vec(&mat, &vector)
}
