use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use hofilter::config::{FilterKind, HofConfig};
use hofilter::constants::{DEFAULT_BLOCK_SIZE, DEFAULT_SAMPLE_RATE};
use hofilter::output::{
    CoefficientReport, Formatter, OutputFormat, ResponsePoint, create_formatter, log_frequencies,
};
use hofilter::{ControlMessage, Filter, FilterInstance, FrequencyResponse, TableRegistry};

/// Table name the `--taps` option is registered under.
const CLI_TABLE: &str = "taps";

#[derive(Parser, Debug)]
#[command(name = "hofilter")]
#[command(about = "Inspect and run second-order and FIR audio filters", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the coefficient set of a filter
    Coeffs {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print magnitude and phase response on a log-frequency grid
    Response {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of grid points
        #[arg(long, default_value_t = 31)]
        points: usize,

        /// Lowest frequency in Hz
        #[arg(long, default_value_t = 20.0)]
        min_hz: f32,

        /// Highest frequency in Hz (defaults to just below Nyquist)
        #[arg(long)]
        max_hz: Option<f32>,
    },
    /// Run a unit impulse through a filter in blocks
    Impulse {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of output samples
        #[arg(short = 'n', long, default_value_t = 32)]
        samples: usize,

        /// Samples per processing block
        #[arg(short = 'b', long, default_value_t = DEFAULT_BLOCK_SIZE)]
        block_size: usize,
    },
    /// Build the filters of a TOML configuration and run an impulse through each
    Run {
        /// TOML configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Number of output samples per filter
        #[arg(short = 'n', long, default_value_t = 32)]
        samples: usize,

        /// Control message applied before processing, optionally addressed
        /// to one filter by index (e.g. "freq 2000", "1:set smooth")
        #[arg(short, long)]
        message: Vec<String>,
    },
}

#[derive(clap::Args, Debug)]
struct FilterArgs {
    /// Filter type
    #[arg(value_enum)]
    kind: FilterKind,

    /// Creation arguments in order (allpass/lowpass: Q freq, highshelf: dB freq,
    /// peak: Q dB freq)
    #[arg(allow_negative_numbers = true)]
    args: Vec<f32>,

    /// Running sample rate in Hz
    #[arg(short = 'r', long, default_value_t = DEFAULT_SAMPLE_RATE)]
    sample_rate: f32,

    /// FIR coefficients, comma-separated (e.g. "0.25,0.5,0.25")
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true)]
    taps: Vec<f32>,
}

impl FilterArgs {
    fn build(&self, tables: &mut TableRegistry) -> FilterInstance {
        let table = if self.kind == FilterKind::Fir && !self.taps.is_empty() {
            tables.insert_floats(CLI_TABLE, self.taps.clone());
            Some(CLI_TABLE)
        } else {
            None
        };
        let mut instance = FilterInstance::from_args(self.kind, &self.args, table, tables);
        instance.set_sample_rate(self.sample_rate);
        instance
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let formatter = create_formatter(args.format);
    let mut tables = TableRegistry::new();

    match args.command {
        Command::Coeffs { filter } => {
            let instance = filter.build(&mut tables);
            println!(
                "{}",
                formatter.coefficients(instance.name(), &coefficient_report(&instance))
            );
        }
        Command::Response {
            filter,
            points,
            min_hz,
            max_hz,
        } => {
            let instance = filter.build(&mut tables);
            let max_hz = max_hz.unwrap_or(filter.sample_rate * 0.499);
            print_response(
                formatter.as_ref(),
                &instance,
                filter.sample_rate,
                &log_frequencies(min_hz, max_hz, points),
            );
        }
        Command::Impulse {
            filter,
            samples,
            block_size,
        } => {
            if block_size == 0 {
                anyhow::bail!("block size must be positive");
            }
            let mut instance = filter.build(&mut tables);
            let output = impulse_response(&mut instance, samples, block_size);
            print_samples(formatter.as_ref(), instance.name(), &output, true);
        }
        Command::Run {
            config,
            samples,
            message,
        } => run_config(formatter.as_ref(), &config, samples, &message)?,
    }

    Ok(())
}

fn run_config(
    formatter: &dyn Formatter,
    path: &Path,
    samples: usize,
    messages: &[String],
) -> Result<()> {
    let config = HofConfig::load(path).context("Failed to load filter configuration")?;
    let tables = config.table_registry();
    log::info!(
        "{} filters, {} tables, {} Hz, block size {}",
        config.filters.len(),
        tables.len(),
        config.engine.sample_rate,
        config.engine.block_size
    );

    let mut instances: Vec<FilterInstance> = config
        .filters
        .iter()
        .map(|spec| FilterInstance::from_spec(spec, &tables))
        .collect();

    for instance in &mut instances {
        instance.set_sample_rate(config.engine.sample_rate);
    }

    for text in messages {
        let (target, message) = parse_addressed_message(text)?;
        for (i, instance) in instances.iter_mut().enumerate() {
            if target.is_some_and(|t| t != i) {
                continue;
            }
            // Diagnostics only; the graph keeps running.
            if let Err(e) = instance.handle(&message, &tables) {
                log::warn!("{}#{}: '{}': {}", instance.name(), i, message, e);
            }
        }
    }

    let mut header = true;
    for (i, instance) in instances.iter_mut().enumerate() {
        let label = format!("{}#{}", instance.name(), i);
        println!(
            "{}",
            formatter.coefficients(&label, &coefficient_report(instance))
        );
        let output = impulse_response(instance, samples, config.engine.block_size);
        print_samples(formatter, &label, &output, header);
        header = false;
    }

    Ok(())
}

/// Split "2:freq 440" into a filter index and a message.
fn parse_addressed_message(text: &str) -> Result<(Option<usize>, ControlMessage)> {
    let (target, body) = match text.split_once(':') {
        Some((index, body)) => {
            let index = index
                .trim()
                .parse()
                .with_context(|| format!("Invalid filter index in '{}'", text))?;
            (Some(index), body)
        }
        None => (None, text),
    };
    let message = body
        .parse()
        .with_context(|| format!("Invalid control message '{}'", text))?;
    Ok((target, message))
}

fn coefficient_report(instance: &FilterInstance) -> CoefficientReport {
    match instance {
        FilterInstance::Biquad(filter) => CoefficientReport::Biquad(*filter.coefficients()),
        FilterInstance::Fir(filter) => filter
            .coefficients()
            .map_or(CoefficientReport::None, |taps| CoefficientReport::Fir { taps }),
    }
}

fn impulse_response(instance: &mut FilterInstance, samples: usize, block_size: usize) -> Vec<f32> {
    let mut input = vec![0.0f32; samples];
    if let Some(first) = input.first_mut() {
        *first = 1.0;
    }
    let mut output = vec![0.0f32; samples];
    for (block_in, block_out) in input.chunks(block_size).zip(output.chunks_mut(block_size)) {
        instance.process(block_in, block_out);
    }
    output
}

fn print_response(
    formatter: &dyn Formatter,
    instance: &FilterInstance,
    sample_rate: f32,
    freqs: &[f32],
) {
    if let Some(header) = formatter.response_header() {
        println!("{}", header);
    }
    for &freq_hz in freqs {
        let point = ResponsePoint {
            freq_hz,
            magnitude_db: instance.magnitude_db(freq_hz, sample_rate),
            phase_rad: instance.phase(freq_hz, sample_rate),
        };
        println!("{}", formatter.response(instance.name(), &point));
    }
}

fn print_samples(formatter: &dyn Formatter, label: &str, samples: &[f32], header: bool) {
    if header {
        if let Some(header) = formatter.sample_header() {
            println!("{}", header);
        }
    }
    for (n, &y) in samples.iter().enumerate() {
        println!("{}", formatter.sample(label, n, y));
    }
}
