use clap::{Parser, Subcommand};
use pixit_nodes::config::{self, CONFIG_FILENAME};
use pixit_nodes::imaging::{image_to_tensor, stack_batch};
use pixit_nodes::nodes::registry::registry;
use pixit_nodes::nodes::{
    CheckTensorAllZeros, ImageSave, SPLIT_STRING_HELP, SaveOptions, SplitString, StringToCombo,
    SwitchBooleanString,
};
use pixit_nodes::output;
use pixit_nodes::value::{ImageBatch, Mask};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Flags mirroring the Image Save node inputs. Unset flags fall back to the
/// `[save]` section of the config file.
#[derive(clap::Args, Clone)]
struct SaveArgs {
    /// Output directory (created if missing)
    #[arg(long, short)]
    output: Option<String>,
    /// Filename prefix
    #[arg(long)]
    prefix: Option<String>,
    /// Text between prefix and counter
    #[arg(long)]
    delimiter: Option<String>,
    /// Minimum counter digits (1-9)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=9))]
    padding: Option<u8>,
    /// Put the counter before the prefix
    #[arg(long)]
    number_first: bool,
    /// png, jpg, jpeg, gif, tiff or bmp (anything else saves as png)
    #[arg(long)]
    extension: Option<String>,
    /// JPEG density (1-2400)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=2400))]
    dpi: Option<u32>,
    /// JPEG/TIFF quality (1-100)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: Option<u32>,
    /// Disable best-effort compression
    #[arg(long)]
    no_optimize: bool,
    /// Prompt stored as PNG metadata
    #[arg(long)]
    prompt: Option<String>,
}

impl SaveArgs {
    fn apply(self, mut opts: SaveOptions) -> SaveOptions {
        if let Some(v) = self.output {
            opts.output_path = v;
        }
        if let Some(v) = self.prefix {
            opts.filename_prefix = v;
        }
        if let Some(v) = self.delimiter {
            opts.filename_delimiter = v;
        }
        if let Some(v) = self.padding {
            opts.filename_number_padding = usize::from(v);
        }
        if self.number_first {
            opts.filename_number_start = true;
        }
        if let Some(v) = self.extension {
            opts.extension = v;
        }
        if let Some(v) = self.dpi {
            opts.dpi = v;
        }
        if let Some(v) = self.quality {
            opts.quality = v;
        }
        if self.no_optimize {
            opts.optimize_image = false;
        }
        if let Some(v) = self.prompt {
            opts.prompt = v;
        }
        opts
    }
}

#[derive(Parser)]
#[command(name = "pixit")]
#[command(about = "Pixit custom nodes from the command line")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Log at debug level regardless of RUST_LOG
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List registered nodes and their slots
    Nodes {
        /// Print host-style schema JSON instead
        #[arg(long)]
        json: bool,
    },
    /// Save images as one batch with auto-numbered filenames
    Save {
        /// Input image files (must share dimensions)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[command(flatten)]
        args: SaveArgs,
    },
    /// Split text into up to four parts
    Split {
        text: String,
        #[arg(long, default_value = ",")]
        delimiter: String,
    },
    /// First entry of a comma-separated list
    Combo { input: String },
    /// Pick one of two strings
    Switch {
        #[arg(action = clap::ArgAction::Set)]
        condition: bool,
        if_true: String,
        if_false: String,
    },
    /// Check whether an image's first channel is all zeros
    Zeros { mask: PathBuf },
    /// Print a stock pixit.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let site_config = config::load_config(&cli.config)?;
    init_tracing(cli.verbose, &site_config.logging.level);

    match cli.command {
        Command::Nodes { json } => {
            if json {
                let schemas: serde_json::Map<String, serde_json::Value> = registry()
                    .entries()
                    .iter()
                    .map(|e| (e.id.to_string(), (e.create)().schema().to_json()))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&schemas)?);
            } else {
                output::print_node_list(registry());
            }
        }
        Command::Save { inputs, args } => {
            let opts = args.apply(site_config.save);
            let batch = load_batch(&inputs)?;
            match ImageSave::new().save_images(&batch, &opts) {
                Some(paths) => output::print_save_output(&paths, Path::new(&opts.output_path)),
                None => return Err("no images saved: check the output path".into()),
            }
        }
        Command::Split { text, delimiter } => {
            let parts = SplitString.split(&text, &delimiter)?;
            let [s1, s2, s3, s4] = parts;
            output::print_named_values(&[
                ("string_1", s1),
                ("string_2", s2),
                ("string_3", s3),
                ("string_4", s4),
                ("show_help", SPLIT_STRING_HELP.to_string()),
            ]);
        }
        Command::Combo { input } => {
            println!("{}", StringToCombo.string_to_combo(&input));
        }
        Command::Switch {
            condition,
            if_true,
            if_false,
        } => {
            println!(
                "{}",
                SwitchBooleanString.select_string(condition, &if_true, &if_false)
            );
        }
        Command::Zeros { mask } => {
            let img = image::ImageReader::open(&mask)?.decode()?;
            let tensor = image_to_tensor(&img);
            let mask: Mask = tensor.index_axis(ndarray::Axis(2), 0).to_owned().into_dyn();
            println!("{}", CheckTensorAllZeros.check_zeros(&mask));
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `--verbose` wins, then `RUST_LOG`, then the config file's level.
fn init_tracing(verbose: bool, config_level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Decode every input and stack them into one batch.
fn load_batch(inputs: &[PathBuf]) -> Result<ImageBatch, Box<dyn std::error::Error>> {
    let mut tensors = Vec::with_capacity(inputs.len());
    for path in inputs {
        let img = image::ImageReader::open(path)?.decode()?;
        tensors.push(image_to_tensor(&img));
    }
    Ok(stack_batch(&tensors)?)
}
