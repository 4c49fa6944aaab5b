pub mod argparse;
mod helpers;

mod rechunk {
    use anyhow::Context;
    use app::document::{DocumentSink, DocumentSource};

    use super::argparse;
    use crate::cli::helpers;

    pub(crate) fn rechunk(args: &argparse::RechunkOpts) -> anyhow::Result<()> {
        let config = helpers::chunk_config(&args.chunking)?;
        let source = DocumentSource::from_arg(args.input.as_deref());
        let sink = DocumentSink::from_arg(args.output.as_deref());
        log::debug!("using config: {:?}", config);

        let stats = app::rechunk_file(&source, &sink, &config)
            .with_context(|| format!("failed to rechunk {}", source))?;

        if args.stats {
            eprintln!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Ok(())
    }
}

mod debug_utils {
    use super::argparse;
    use crate::cli::helpers;

    pub(crate) fn show_config(args: &argparse::ShowConfig) -> anyhow::Result<()> {
        let config = helpers::chunk_config(&args.chunking)?;
        println!("{}", serde_json::to_string_pretty(&config)?);
        Ok(())
    }
}

pub fn run_cli(args: &argparse::CliOpts) -> anyhow::Result<()> {
    match &args.subcmd {
        argparse::SubCommand::Rechunk(opts) => rechunk::rechunk(opts),
        argparse::SubCommand::Debug(sub) => match sub {
            argparse::DebugCommand::ShowConfig(opts) => debug_utils::show_config(opts),
        },
    }
}
