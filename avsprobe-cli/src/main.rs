//! Command-line front end for the AVS media analyzer.

use std::path::PathBuf;
use std::process::ExitCode;

use analyzer::{AnalysisReport, AnalyzerError, Container, Options, StreamReport};
use anyhow::Context;
use avs_types::{AvsInfo, CodecKind};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "avsprobe",
    version,
    about = "Identify AVS1/AVS+/AVS2/AVS3/Audio Vivid streams in media files"
)]
struct Cli {
    /// Input file (MPEG-TS, M2TS, MP4/ISOBMFF, or a raw elementary stream)
    file: PathBuf,

    /// Container framing; `auto` probes the file head
    #[arg(long, value_enum, default_value_t = ContainerArg::Auto)]
    container: ContainerArg,

    /// Codec of a raw elementary stream (implies `--container es`)
    #[arg(long, value_enum)]
    codec: Option<CodecArg>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Transport-stream packet budget for the fast scan
    #[arg(long)]
    packet_budget: Option<usize>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ContainerArg {
    Auto,
    Ts,
    Bmff,
    Es,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CodecArg {
    Avs1,
    Avs2,
    Avs3,
    Av3a,
}

impl From<CodecArg> for CodecKind {
    fn from(codec: CodecArg) -> Self {
        match codec {
            CodecArg::Avs1 => CodecKind::Avs1,
            CodecArg::Avs2 => CodecKind::Avs2,
            CodecArg::Avs3 => CodecKind::Avs3Video,
            CodecArg::Av3a => CodecKind::Av3aAudio,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("avsprobe: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let data = std::fs::read(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;

    let container = match (cli.container, cli.codec) {
        (_, Some(codec)) => Some(Container::RawEs(codec.into())),
        (ContainerArg::Ts, _) => Some(Container::Ts),
        (ContainerArg::Bmff, _) => Some(Container::Bmff),
        (ContainerArg::Es, None) => {
            anyhow::bail!("--container es requires --codec");
        }
        (ContainerArg::Auto, None) => None,
    };

    let options = Options {
        packet_budget: cli.packet_budget,
    };

    let report = match analyzer::analyze_with_options(&data, container, options) {
        Ok(report) => report,
        Err(err @ AnalyzerError::NoAvsContent { .. }) => {
            anyhow::bail!("{err}");
        }
        Err(err) => return Err(err.into()),
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    print!("container: {}", report.container);
    match report.packet_size {
        Some(size) => println!(" ({size}-byte packets)"),
        None => println!(),
    }

    for stream in &report.streams {
        println!();
        print_stream(stream);
    }
}

fn print_stream(stream: &StreamReport) {
    match stream.program_number {
        Some(program) => println!(
            "stream {} (program {program}, type {}): {}",
            stream.pid_or_track_id, stream.stream_type_or_fourcc, stream.type_name
        ),
        None => println!(
            "track {} ({}): {}",
            stream.pid_or_track_id, stream.stream_type_or_fourcc, stream.type_name
        ),
    }

    if let Some(language) = &stream.language {
        println!("  language: {language}");
    }
    if let Some(fourcc) = &stream.registration_fourcc {
        println!("  registration: {fourcc}");
    }
    if let Some(bps) = stream.maximum_bitrate_bps {
        println!("  maximum bitrate: {} kb/s", bps / 1000);
    }
    if let Some(desc) = &stream.video_descriptor {
        println!(
            "  descriptor: profile 0x{:02X}, level 0x{:02X}, chroma {}",
            desc.profile_id,
            desc.level_id,
            desc.chroma_format.as_str()
        );
    }
    if let Some(desc) = &stream.audio_descriptor {
        println!(
            "  descriptor: codec id {}, {} Hz, {} kb/s",
            desc.audio_codec_id, desc.sampling_frequency, desc.total_bitrate_kbps
        );
    }

    match &stream.info {
        Some(AvsInfo::Video(info)) => {
            println!(
                "  {} {} @ {}",
                info.generation_name, info.profile_name, info.level_name
            );
            println!(
                "  {}x{}{} {:.3} fps, {}, {} kb/s",
                info.horizontal_size,
                info.vertical_size,
                if info.progressive { "p" } else { "i" },
                info.frame_rate,
                info.chroma_format.as_str(),
                info.bit_rate / 1000
            );
            if let Some(depth) = info.luma_bit_depth {
                println!("  {depth}-bit");
            }
            if let Some(dar) = &info.dar {
                println!("  display aspect ratio: {dar}");
            }
            if let Some(sar) = &info.sar {
                println!("  sample aspect ratio: {sar}");
            }
            if let (Some(w), Some(h)) = (info.display_horizontal_size, info.display_vertical_size)
            {
                println!("  display size: {w}x{h}");
            }
            if let Some(primaries) = info.color_primaries {
                println!(
                    "  colour: {:?} / {:?} / {:?}",
                    primaries, info.transfer_characteristics, info.matrix_coefficients
                );
            }
            if let Some(hdr) = info.hdr_dynamic_metadata {
                println!("  HDR dynamic metadata: {hdr:?}");
            }
        }
        Some(AvsInfo::Audio(info)) => {
            println!("  Audio Vivid {} ({})", info.codec_name, info.coding_profile);
            print!("  {} Hz", info.sampling_frequency);
            if let Some(bits) = info.resolution_bits {
                print!(", {bits}-bit");
            }
            if let Some(config) = &info.channel_configuration {
                print!(", {config}");
            }
            if let Some(objects) = info.object_channel_number {
                print!(", {objects} objects");
            }
            if let Some(rate) = info.bit_rate {
                print!(", {} kb/s", rate / 1000);
            }
            println!();
        }
        None => println!("  no in-band sequence header found"),
    }
}
