//! Engine selection and tag-filtered dispatch.

use dagfuse_graph::Graph;
use tracing::debug;

use crate::bron_kerbosch::BronKerbosch;
use crate::config::MatchConfig;
use crate::error::AlgorithmError;
use crate::finder::{Algorithm, McisFinder};
use crate::kpt::Kpt;

/// Owns the installed engines and routes [`Algorithm`] selections to them.
///
/// When a tag is given, every input is first projected through
/// [`Graph::get_subgraph_with_tag`]; the engine borrows the owned projections
/// for the duration of the call.
pub struct McisRunner {
    engines: Vec<(Algorithm, Box<dyn McisFinder>)>,
}

impl McisRunner {
    /// Installs both engines with default limits.
    pub fn new() -> Self {
        Self::with_config(MatchConfig::default())
    }

    /// Installs both engines sharing `config`.
    pub fn with_config(config: MatchConfig) -> Self {
        Self::with_algorithms(&[Algorithm::BronKerboschSerial, Algorithm::Kpt], config)
    }

    /// Installs only the listed algorithms; selecting anything else from this
    /// runner yields [`AlgorithmError::InvalidAlgorithm`].
    pub fn with_algorithms(algorithms: &[Algorithm], config: MatchConfig) -> Self {
        let engines = algorithms
            .iter()
            .map(|&algorithm| {
                let engine: Box<dyn McisFinder> = match algorithm {
                    Algorithm::BronKerboschSerial => {
                        Box::new(BronKerbosch::new(config.clone()))
                    }
                    Algorithm::Kpt => Box::new(Kpt::new(config.clone())),
                };
                (algorithm, engine)
            })
            .collect();
        Self { engines }
    }

    /// Runs one installed algorithm, optionally restricting every input to
    /// `tag` first.
    pub fn run(
        &self,
        graphs: &[&Graph],
        algorithm: Algorithm,
        tag: Option<&str>,
    ) -> Result<Vec<Graph>, AlgorithmError> {
        let engine = self
            .engines
            .iter()
            .find(|(installed, _)| *installed == algorithm)
            .map(|(_, engine)| engine.as_ref())
            .ok_or(AlgorithmError::InvalidAlgorithm)?;
        debug!(
            "dispatching {} over {} graphs (tag: {:?})",
            algorithm,
            graphs.len(),
            tag
        );
        Self::dispatch(graphs, engine, tag)
    }

    /// Runs a caller-supplied engine through the same tag projection.
    pub fn run_with(
        &self,
        graphs: &[&Graph],
        engine: &dyn McisFinder,
        tag: Option<&str>,
    ) -> Result<Vec<Graph>, AlgorithmError> {
        Self::dispatch(graphs, engine, tag)
    }

    /// Runs several algorithms in order, stopping at the first error.
    pub fn run_many(
        &self,
        graphs: &[&Graph],
        algorithms: &[Algorithm],
        tag: Option<&str>,
    ) -> Result<Vec<Vec<Graph>>, AlgorithmError> {
        algorithms
            .iter()
            .map(|&algorithm| self.run(graphs, algorithm, tag))
            .collect()
    }

    fn dispatch(
        graphs: &[&Graph],
        engine: &dyn McisFinder,
        tag: Option<&str>,
    ) -> Result<Vec<Graph>, AlgorithmError> {
        match tag {
            Some(tag) => {
                let projected: Vec<Graph> = graphs
                    .iter()
                    .map(|g| g.get_subgraph_with_tag(tag))
                    .collect();
                let borrowed: Vec<&Graph> = projected.iter().collect();
                engine.find(&borrowed)
            }
            None => engine.find(graphs),
        }
    }
}

impl Default for McisRunner {
    fn default() -> Self {
        Self::new()
    }
}
