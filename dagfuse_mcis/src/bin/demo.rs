//! End-to-end walkthrough: build a few kernel CDAGs and compare them with
//! both MCIS engines.
//!
//! Run with `RUST_LOG=debug` for engine progress output.

use dagfuse_graph::factory::{fft_from_dimensions, mvm_from_dimensions};
use dagfuse_mcis::{Algorithm, MatchConfig, McisRunner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let mvm_small = mvm_from_dimensions(2, 2)?;
    let mvm_wide = mvm_from_dimensions(2, 3)?;
    let fft = fft_from_dimensions(4)?;

    println!("MVM(2,2): {} nodes", mvm_small.get_num_nodes());
    println!("MVM(2,3): {} nodes", mvm_wide.get_num_nodes());
    println!("FFT(4):   {} nodes", fft.get_num_nodes());

    let config = MatchConfig::default();
    println!("engine config: {}", serde_json::to_string(&config)?);
    let runner = McisRunner::with_config(config);

    for algorithm in [Algorithm::BronKerboschSerial, Algorithm::Kpt] {
        let results = runner.run(&[&mvm_small, &mvm_wide], algorithm, None)?;
        let largest = results.iter().map(|g| g.get_num_nodes()).max().unwrap_or(0);
        println!(
            "{algorithm} on MVM(2,2) x MVM(2,3): {} result graph(s), largest has {largest} nodes",
            results.len()
        );
        if let Some(best) = results.first() {
            println!("{}", best.to_dot("mcis"));
        }
    }

    let fft_results = runner.run(
        &[&mvm_small, &fft],
        Algorithm::BronKerboschSerial,
        None,
    )?;
    println!(
        "bron-kerbosch-serial on MVM(2,2) x FFT(4): {} result graph(s)",
        fft_results.len()
    );

    Ok(())
}
