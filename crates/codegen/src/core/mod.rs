pub(crate) mod emit;
pub(crate) mod graph;

use std::time::Instant;

use evmaot_analyzer::AdvancedCodeAnalysis;
use tracing::{debug, info};

use crate::{
    core::{emit::Emitter, graph::ControlFlowGraph},
    error::Error,
    interfaces::ScaffoldArgs,
    scaffold::Scaffold,
};

/// Generates the translation unit defining `execute_<name>` for an analyzed contract.
pub fn generate(name: &str, analysis: &AdvancedCodeAnalysis) -> Result<String, Error> {
    let start_time = Instant::now();

    let cfg = ControlFlowGraph::build(analysis);
    let unreachable = cfg.unreachable_blocks();
    if !unreachable.is_empty() {
        debug!("{}: {} blocks are unreachable from the entry block", name, unreachable.len());
    }

    let source = Emitter::emit(name, &cfg)?;
    debug!(
        "generated {} bytes of C++ for {} ({} blocks, dynamic jumps: {}) in {:?}",
        source.len(),
        name,
        cfg.block_count(),
        cfg.has_dynamic_jumps(),
        start_time.elapsed()
    );
    Ok(source)
}

/// Generates the scaffold requested by `args`.
pub async fn scaffold(args: ScaffoldArgs) -> Result<Scaffold, Error> {
    let revision = args.revision.unwrap_or_default();
    let scaffold = Scaffold::generate(revision)?;
    info!("generated scaffold for {}", revision);
    Ok(scaffold)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::ScaffoldArgsBuilder;
    use evmaot_analyzer::analyze;
    use evmaot_vm::core::revision::Revision;

    #[test]
    fn test_generate() {
        let analysis = analyze(Revision::latest(), &[0x60, 0x04, 0x56, 0x00, 0x5b, 0x00]);
        let source = generate("demo", &analysis).expect("failed to generate");
        assert!(source.contains("execute_demo("));
        assert!(generate("not a name", &analysis).is_err());
    }

    #[tokio::test]
    async fn test_scaffold() {
        let args = ScaffoldArgsBuilder::new()
            .revision(Some(Revision::Istanbul))
            .build()
            .expect("failed to build args");
        let scaffold = scaffold(args).await.expect("failed to generate scaffold");
        assert_eq!(scaffold.revision, Revision::Istanbul);
        assert!(!scaffold.header.contains("maotBASEFEE"));
        assert!(scaffold.header.contains("maotCHAINID"));
    }
}
