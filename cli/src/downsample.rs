use clap::Args;
use eyre::Result;
use skimline::{write_series, Format, Traced};

use crate::io::Output;
use crate::source::SourceOpts;

#[derive(Args, Debug)]
pub struct Opts {
    #[command(flatten)]
    pub source: SourceOpts,

    /// Output encoding (json, csv)
    #[clap(long, default_value = "json")]
    pub to: String,

    /// Output file [default: stdout]
    #[clap(long, default_value = "stdout")]
    pub output: String,
}

pub async fn downsample(opts: &Opts) -> Result<()> {
    let to: Format = opts.to.parse()?;
    let gate = Traced::new(opts.source.gate().await?);
    let series = opts.source.read().await?;

    let (reduced, _) = gate.measure(&series);

    let mut output = Output::from_filename(&opts.output).await?;
    write_series(&mut output, to, &reduced).await?;
    Ok(())
}
