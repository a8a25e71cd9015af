//! markup-fuse - render JSON document descriptions to markup

use std::fs::File;
use std::io::{self, BufWriter, Read, Write as _};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use markup_fuse::json::from_json;
use markup_fuse::render::{render_pretty, render_to};
use markup_fuse::{BuilderConfig, Format, RenderConfig};

#[derive(Parser)]
#[command(name = "markup-fuse")]
#[command(version, about = "Render a JSON document description to markup", long_about = None)]
#[command(after_help = "EXAMPLES:
    markup-fuse doc.json                 Render doc.json to stdout as XHTML
    markup-fuse doc.json -o out.html --html
    echo '[\"a < b\"]' | markup-fuse --pretty")]
struct Cli {
    /// Input JSON file (stdin when omitted)
    #[arg(value_name = "INPUT")]
    input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long, value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Close leaf elements HTML-style (`<br>`) instead of `<br/>`
    #[arg(long)]
    html: bool,

    /// One node per line, indented
    #[arg(short, long)]
    pretty: bool,

    /// Spaces per level with --pretty
    #[arg(long, default_value_t = 2)]
    indent: usize,

    /// Output chunk size in bytes
    #[arg(long, default_value_t = markup_fuse::builder::DEFAULT_CHUNK_SIZE)]
    chunk_size: usize,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> markup_fuse::Result<()> {
    let input = match &cli.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let doc = from_json(&input)?;

    let format = if cli.html { Format::Html } else { Format::Xhtml };
    let config = RenderConfig::new()
        .with_format(format)
        .with_indent(cli.indent)
        .with_builder(BuilderConfig::default().with_chunk_size(cli.chunk_size));
    config.validate()?;

    let sink: Box<dyn io::Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    };

    if cli.pretty {
        let mut sink = sink;
        sink.write_all(render_pretty(&doc, &config)?.as_bytes())?;
        sink.flush()?;
    } else {
        render_to(&doc, sink, &config)?;
    }

    log::info!("rendered document from {:?}", cli.input);
    Ok(())
}
