use crate::error::GraphError;
use crate::graph::Graph;

/// Builds a `d`-level Haar wavelet decomposition pyramid over `n` input
/// samples split into `k` independent blocks.
///
/// Inputs are `a0_*`. Level `l` produces `n / 2^l` running averages `a{l}_*`
/// and as many detail coefficients `c{l}_*`; each is fed by the two level
/// `l-1` averages it combines. Requires `n / k` to be a power of two no
/// smaller than `2^d`.
pub fn haar_wavelet_from_dimensions(n: usize, d: usize, k: usize) -> Result<Graph, GraphError> {
    if n == 0 || d == 0 || k == 0 {
        return Err(GraphError::InvalidParameters(
            "dimensions must be positive".into(),
        ));
    }
    if n % k != 0 {
        return Err(GraphError::InvalidParameters(
            "n must be divisible by the block count".into(),
        ));
    }
    let block = n / k;
    if block & (block - 1) != 0 {
        return Err(GraphError::InvalidParameters(
            "block size must be a power of two".into(),
        ));
    }
    if (block.ilog2() as usize) < d {
        return Err(GraphError::InvalidParameters(
            "decomposition depth exceeds the block size".into(),
        ));
    }

    let mut graph = Graph::new();
    graph.reserve_nodes(n + 2 * (n - n / (1 << d)));

    for i in 0..n {
        graph.add_node(format!("a0_{i}"))?;
    }

    for level in 1..=d {
        let per_block = block >> level;
        let prev_per_block = block >> (level - 1);
        for b in 0..k {
            for j in 0..per_block {
                let avg = format!("a{level}_{}", b * per_block + j);
                let coef = format!("c{level}_{}", b * per_block + j);
                graph.add_node(avg.clone())?;
                graph.add_node(coef.clone())?;

                let left = format!("a{}_{}", level - 1, b * prev_per_block + 2 * j);
                let right = format!("a{}_{}", level - 1, b * prev_per_block + 2 * j + 1);
                graph.add_edge(&left, &avg, 0)?;
                graph.add_edge(&right, &avg, 0)?;
                graph.add_edge(&left, &coef, 0)?;
                graph.add_edge(&right, &coef, 0)?;
            }
        }
    }

    Ok(graph)
}
