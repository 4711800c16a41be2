use std::path::PathBuf;
use std::sync::Arc;

use slategen_core::{OutputFormat, RatingCategory, RatingRecord, RatioRequest, RenderOptions, ResolutionTier};
use slategen_esrb::Resolver;
use slategen_render::text::FontFileTextMeasurer;
use slategen_render::{RenderConfig, render_slate};

#[derive(Debug)]
enum CliError {
    Usage(String),
    Io(std::io::Error),
    Resolve(slategen_esrb::Error),
    Render(slategen_render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Resolve(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<slategen_esrb::Error> for CliError {
    fn from(value: slategen_esrb::Error) -> Self {
        Self::Resolve(value)
    }
}

impl From<slategen_render::Error> for CliError {
    fn from(value: slategen_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug)]
struct Args {
    game: Option<String>,
    url: Option<String>,
    id: Option<u64>,
    rating: Option<RatingCategory>,
    descriptors: Option<Vec<String>>,
    interactive: Option<Vec<String>>,
    platform: Option<String>,
    out: PathBuf,
    ratio: RatioRequest,
    margin: u32,
    four_k: bool,
    assets: PathBuf,
    font: Option<PathBuf>,
    download_assets: bool,
    dump_record: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            game: None,
            url: None,
            id: None,
            rating: None,
            descriptors: None,
            interactive: None,
            platform: None,
            out: PathBuf::from("output.png"),
            ratio: RatioRequest::Auto,
            margin: 0,
            four_k: false,
            assets: PathBuf::from("assets"),
            font: None,
            download_assets: false,
            dump_record: false,
        }
    }
}

fn usage() -> String {
    "slategen - generates ESRB rating slates\n\
\n\
USAGE:\n\
  slategen [--game <title> | --url <url> | --id <n> | --rating <category>] [options]\n\
\n\
INPUT:\n\
  --game <title>          Search esrb.org for a game title\n\
  --url <url>             ESRB rating detail URL\n\
  --id <n>                ESRB rating id\n\
  --rating <category>     Manual rating category (E, E10plus, T, M, AO, RP)\n\
  --descriptors <a,b,..>  Comma-separated content descriptors (overrides)\n\
  --interactive <a,b,..>  Comma-separated interactive elements (overrides)\n\
  --platform <platform>   Platform filter for search\n\
\n\
OUTPUT:\n\
  --out <path>            Output file path (default: output.png; .png/.jpg/.jpeg)\n\
  --aspect-ratio <W:H>    Content aspect ratio between 16:9 and 21:9, or \"auto\" (default)\n\
  --margin <px>           Margin from screen edges; 0 sizes the canvas to the content (default: 0)\n\
  --4k                    Render at 3840x2160 instead of 1920x1080\n\
\n\
ASSETS:\n\
  --assets <dir>          Icon asset root (default: assets)\n\
  --font <path>           Font file for slate text (optional)\n\
  --download-assets       Fetch missing rating icons from the ESRB CDN\n\
\n\
DEBUG:\n\
  --dump-record           Print the resolved rating record as JSON and exit\n"
        .to_string()
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--game" | "-g" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.game = Some(v.clone());
            }
            "--url" | "-u" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.url = Some(v.clone());
            }
            "--id" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.id = Some(v.parse::<u64>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--rating" | "-r" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.rating = Some(
                    v.parse::<RatingCategory>()
                        .map_err(|err| CliError::Usage(format!("{err}\n\n{}", usage())))?,
                );
            }
            "--descriptors" | "-d" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.descriptors = Some(split_csv(v));
            }
            "--interactive" | "-i" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.interactive = Some(split_csv(v));
            }
            "--platform" | "-p" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.platform = Some(v.clone());
            }
            "--out" | "-o" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = PathBuf::from(v);
            }
            "--aspect-ratio" | "-a" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.ratio = v
                    .parse::<RatioRequest>()
                    .map_err(|err| CliError::Usage(format!("{err}\n\n{}", usage())))?;
            }
            "--margin" | "-m" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.margin = v.parse::<u32>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--4k" => args.four_k = true,
            "--assets" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.assets = PathBuf::from(v);
            }
            "--font" => {
                let Some(v) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.font = Some(PathBuf::from(v));
            }
            "--download-assets" => args.download_assets = true,
            "--dump-record" => args.dump_record = true,
            other => {
                return Err(CliError::Usage(format!(
                    "Unknown argument: {other}\n\n{}",
                    usage()
                )));
            }
        }
    }

    Ok(args)
}

fn resolve_record(args: &Args) -> Result<RatingRecord, CliError> {
    let mut record = if let Some(url) = &args.url {
        tracing::info!(url, "resolving rating record from URL");
        Resolver::new()?.resolve_by_url(url)?
    } else if let Some(id) = args.id {
        tracing::info!(id, "resolving rating record by id");
        Resolver::new()?.resolve_by_id(id)?
    } else if let Some(game) = &args.game {
        tracing::info!(game, "resolving rating record by search");
        Resolver::new()?.resolve_by_title(game, args.platform.as_deref())?
    } else {
        // Manual mode; the input-mode check already guarantees --rating.
        tracing::info!("manual generation, no scraping");
        let Some(category) = args.rating else {
            return Err(CliError::Usage(
                "Rating category is missing. If not scraping, provide one via --rating.".to_string(),
            ));
        };
        RatingRecord {
            title: String::new(),
            category,
            descriptors: Vec::new(),
            interactive_elements: Vec::new(),
            platforms: args.platform.clone(),
            esrb_id: None,
            esrb_url: None,
        }
    };

    if let Some(rating) = args.rating {
        record.category = rating;
    }
    if let Some(descriptors) = &args.descriptors {
        record.descriptors = descriptors.clone();
    }
    if let Some(interactive) = &args.interactive {
        record.interactive_elements = interactive.clone();
    }
    Ok(record)
}

/// Appends `.png` when the requested path has no supported raster extension.
fn normalize_out_path(out: &PathBuf) -> PathBuf {
    let supported = out
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| OutputFormat::from_extension(e).is_some());
    if supported {
        return out.clone();
    }
    let mut fixed = out.clone().into_os_string();
    fixed.push(".png");
    let fixed = PathBuf::from(fixed);
    tracing::info!(
        path = %fixed.display(),
        "output extension unsupported or missing, appending .png"
    );
    fixed
}

fn run(args: Args) -> Result<(), CliError> {
    let has_input_mode =
        args.game.is_some() || args.url.is_some() || args.id.is_some() || args.rating.is_some();

    if args.download_assets {
        Resolver::new()?.download_icons(&args.assets)?;
        if !has_input_mode {
            return Ok(());
        }
    } else if !has_input_mode {
        return Err(CliError::Usage(
            "Provide a game title (--game), an ESRB URL (--url), a rating id (--id), or a manual rating (--rating).\n\n"
                .to_string()
                + &usage(),
        ));
    }

    let record = resolve_record(&args)?;

    if args.dump_record {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    let out_path = normalize_out_path(&args.out);
    let options = RenderOptions {
        margin: args.margin,
        resolution: if args.four_k {
            ResolutionTier::High
        } else {
            ResolutionTier::Standard
        },
        ratio: args.ratio,
        format: OutputFormat::from_path(&out_path),
    };

    let mut config = RenderConfig::new(&args.assets);
    config.font_file = args.font.clone();
    if let Some(font) = &args.font {
        match FontFileTextMeasurer::from_file(font) {
            Ok(measurer) => config.text_measurer = Arc::new(measurer),
            Err(err) => {
                tracing::warn!(path = %font.display(), error = %err, "font unusable for measurement, using estimates");
            }
        }
    }

    let rendered = render_slate(&record, &options, &config)?;

    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&out_path, &rendered.bytes)?;

    tracing::info!(
        path = %out_path.display(),
        width = rendered.canvas_width,
        height = rendered.canvas_height,
        ratio = %rendered.ratio,
        "slate saved"
    );
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(args) => args,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match run(args) {
        Ok(()) => {}
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}
