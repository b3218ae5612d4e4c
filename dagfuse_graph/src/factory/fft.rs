use crate::error::GraphError;
use crate::graph::Graph;

/// Builds the Cooley-Tukey decimation-in-time butterfly network for a
/// power-of-two transform size `n`.
///
/// Inputs are `x_*`, stage outputs are `s{stage}_*`, and the final outputs
/// are `X_*`. Every butterfly connects both of its inputs to both of its
/// outputs, so the graph records dataflow shape rather than twiddle values.
pub fn fft_from_dimensions(n: usize) -> Result<Graph, GraphError> {
    if n == 0 || n & (n - 1) != 0 {
        return Err(GraphError::InvalidParameters(
            "fft size must be a power of two".into(),
        ));
    }
    let stages = n.ilog2() as usize;

    let mut graph = Graph::new();
    graph.reserve_nodes(n * (stages + 2));

    for i in 0..n {
        graph.add_node(format!("x_{i}"))?;
    }

    for stage in 1..=stages {
        let num_butterflies = 1usize << (stage - 1);
        let butterfly_size = n / num_butterflies;
        let half_size = butterfly_size / 2;

        for i in 0..num_butterflies {
            for j in 0..half_size {
                let top = i * butterfly_size + j;
                let bottom = top + half_size;

                let top_in = stage_input(stage, top);
                let bottom_in = stage_input(stage, bottom);
                let top_out = format!("s{stage}_{top}");
                let bottom_out = format!("s{stage}_{bottom}");

                graph.add_node(top_out.clone())?;
                graph.add_node(bottom_out.clone())?;

                graph.add_edge(&top_in, &top_out, 0)?;
                graph.add_edge(&bottom_in, &top_out, 0)?;
                graph.add_edge(&top_in, &bottom_out, 0)?;
                graph.add_edge(&bottom_in, &bottom_out, 0)?;
            }
        }
    }

    for i in 0..n {
        let output = format!("X_{i}");
        let last = if stages == 0 {
            format!("x_{i}")
        } else {
            format!("s{stages}_{i}")
        };
        graph.add_node(output.clone())?;
        graph.add_edge(&last, &output, 0)?;
    }

    Ok(graph)
}

fn stage_input(stage: usize, index: usize) -> String {
    if stage == 1 {
        format!("x_{index}")
    } else {
        format!("s{}_{index}", stage - 1)
    }
}
