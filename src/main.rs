use anyhow::{bail, ensure, Context, Result};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use regex::Regex;
use std::{
    env,
    fs::{self, File},
    path::{Path, PathBuf},
};

use ken_all_json::{
    ken_all::{
        assembler::KenAllRecord,
        parser::{process_town_group, read_town_groups, KenAllConfig},
    },
    utility::zip::KenAllArchive,
};

struct Args {
    ken_all_path: String,
    output_path: Option<String>,
    utf8: bool,
    pretty: bool,
    blankets: Vec<String>,
}

fn usage(opts: &getopts::Options) -> String {
    opts.usage("Usage: ken-all-json [options] <KEN_ALL.CSV|ken_all.zip> [output.json]")
}

fn get_args() -> Result<Option<Args>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut opts = getopts::Options::new();
    opts.optflag("u", "utf8", "input is UTF-8 (default: Shift_JIS)");
    opts.optflag("p", "pretty", "pretty-print the output JSON");
    opts.optmulti(
        "b",
        "blanket",
        "extra kanji phrase meaning the whole town (regex)",
        "PHRASE",
    );
    opts.optflag("h", "help", "print this help");

    let matches = match opts.parse(&args) {
        Ok(m) => m,
        Err(f) => bail!(f),
    };

    if matches.opt_present("h") {
        println!("{}", usage(&opts));
        return Ok(None);
    }

    let ken_all_path = matches
        .free
        .first()
        .with_context(|| format!("path to KEN_ALL is required\n{}", usage(&opts)))?
        .clone();
    let output_path = matches.free.get(1).cloned();

    Ok(Some(Args {
        ken_all_path,
        output_path,
        utf8: matches.opt_present("u"),
        pretty: matches.opt_present("p"),
        blankets: matches.opt_strs("b"),
    }))
}

fn read_ken_all(path: &Path, utf8: bool) -> Result<String> {
    let is_zip = path
        .extension()
        .map_or(false, |e| e.to_string_lossy().eq_ignore_ascii_case("zip"));

    let bytes = if is_zip {
        let file = File::open(path).context("Failed to open zip")?;
        KenAllArchive::new(file)?.read_csv_bytes()?
    } else {
        fs::read(path).context("Failed to read csv")?
    };

    if utf8 {
        return String::from_utf8(bytes).context("Input is not UTF-8");
    }

    let (txt, _, had_errors) = encoding_rs::SHIFT_JIS.decode(&bytes);
    if had_errors {
        log::warn!("Malformed Shift_JIS sequences were replaced");
    }
    Ok(txt.into_owned())
}

fn build_config(blankets: &[String]) -> Result<KenAllConfig> {
    let mut config = KenAllConfig::default();
    for blanket in blankets {
        let blanket =
            Regex::new(blanket).with_context(|| format!("Invalid blanket phrase: {}", blanket))?;
        config.kanji.qualifiers = config.kanji.qualifiers.with_blanket(blanket);
    }
    Ok(config)
}

fn save_records(output_path: &str, records: &[KenAllRecord], pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };

    fs::write(output_path, json).with_context(|| format!("Failed to write {}", output_path))
}

fn main() -> Result<()> {
    env_logger::init();

    let Some(args) = get_args()? else {
        return Ok(());
    };

    let ken_all_path = PathBuf::from(&args.ken_all_path);
    ensure!(
        ken_all_path.exists(),
        "File not found: {}",
        ken_all_path.display()
    );

    let config = build_config(&args.blankets)?;

    println!("Reading KEN_ALL...");

    let ken_all_csv = read_ken_all(&ken_all_path, args.utf8)
        .with_context(|| format!("Failed to read {}", ken_all_path.display()))?;

    let (groups, errors) = read_town_groups(&ken_all_csv)?;
    for error in &errors {
        log::warn!("Skipped row {}: {:#}", error.index, error.error);
    }

    println!("Finished.");

    println!("Processing towns...");

    let pb = create_progress_bar(groups.len())?;
    let mut records = Vec::new();
    for group in groups.iter().progress_with(pb) {
        records.extend(process_town_group(group, &config));
    }

    println!(
        "Finished. {} records ({} rows skipped)",
        records.len(),
        errors.len()
    );

    if let Some(output_path) = &args.output_path {
        save_records(output_path, &records, args.pretty)?;
    }

    Ok(())
}

// 町域ごとに進める
fn create_progress_bar(towns: usize) -> Result<ProgressBar> {
    let style = ProgressStyle::with_template(
        "{prefix:.bold} {bar:40.green/white} {pos}/{len} towns ({per_sec}, {eta} left)",
    )
    .context("Invalid progress bar template")?
    .progress_chars("=> ");

    let pb = ProgressBar::new(towns as u64).with_style(style);
    pb.set_prefix("KEN_ALL");
    Ok(pb)
}
