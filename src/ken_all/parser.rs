use anyhow::{Context, Result};

use crate::ken_all::{
    assembler::{assemble_records, KenAllRecord},
    expander::{expand_town, pair_town_entries, Alignment, ScriptRules, TownEntry},
    merger::{group_rows, merge_town_group, TownGroup},
    row::RawRow,
};

#[derive(Debug, Clone)]
pub struct KenAllConfig {
    pub kanji: ScriptRules,
    pub kana: ScriptRules,
}

impl Default for KenAllConfig {
    fn default() -> Self {
        KenAllConfig {
            kanji: ScriptRules::kanji(),
            kana: ScriptRules::kana(),
        }
    }
}

/// 読み込めなかった行
#[derive(Debug)]
pub struct RowError {
    pub index: usize,
    pub error: anyhow::Error,
}

#[derive(Debug)]
pub struct ParsedKenAll {
    pub records: Vec<KenAllRecord>,
    pub errors: Vec<RowError>,
}

/// 各行を読む
///
/// 読めない行があっても他の行は読み進め，その行で町域の続きは途切れるものとする
pub fn read_raw_rows(ken_all_csv: &str) -> Result<(Vec<Vec<RawRow>>, Vec<RowError>)> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(ken_all_csv.as_bytes());

    let mut chunks = vec![Vec::new()];
    let mut errors = Vec::new();

    for (i, record) in reader.records().enumerate() {
        let record: csv::StringRecord =
            record.with_context(|| format!("Failed to parse record at {}", i))?;

        match RawRow::from_record(&record)
            .with_context(|| format!("Failed to read record at {}: {:?}", i, &record))
        {
            Ok(row) => {
                if let Some(chunk) = chunks.last_mut() {
                    chunk.push(row);
                }
            }
            Err(error) => {
                errors.push(RowError { index: i, error });
                chunks.push(Vec::new());
            }
        }
    }

    chunks.retain(|chunk| !chunk.is_empty());

    Ok((chunks, errors))
}

pub fn read_town_groups(ken_all_csv: &str) -> Result<(Vec<TownGroup>, Vec<RowError>)> {
    let (chunks, errors) = read_raw_rows(ken_all_csv)?;
    let groups = chunks.into_iter().flat_map(group_rows).collect();
    Ok((groups, errors))
}

/// 1 つの町域を漢字とカナで展開して組にする
pub fn expand_town_group(group: &TownGroup, config: &KenAllConfig) -> (Vec<TownEntry>, Alignment) {
    let merged = merge_town_group(group);

    let kanji = expand_town(&merged.kanji, &config.kanji);
    let kana = expand_town(&merged.kana, &config.kana);

    let (entries, alignment) = pair_town_entries(kanji, kana, merged.repeated_kana);

    let head = group.head();
    match alignment {
        Alignment::Aligned => {}
        Alignment::KanaBroadcast => log::debug!(
            "{}: a single kana reading is used for all towns of {:?}",
            head.postal_code,
            merged.kanji
        ),
        Alignment::Mismatch { kanji, kana } => log::warn!(
            "{}: kanji expanded to {} towns but kana to {}: {:?} / {:?}",
            head.postal_code,
            kanji,
            kana,
            merged.kanji,
            merged.kana
        ),
    }

    (entries, alignment)
}

/// 1 つの町域を展開してレコードにする
pub fn process_town_group(group: &TownGroup, config: &KenAllConfig) -> Vec<KenAllRecord> {
    let (entries, _) = expand_town_group(group, config);
    assemble_records(group.head(), entries)
}

pub fn parse_ken_all_csv(ken_all_csv: &str) -> Result<ParsedKenAll> {
    parse_ken_all_csv_with(ken_all_csv, &KenAllConfig::default())
}

pub fn parse_ken_all_csv_with(ken_all_csv: &str, config: &KenAllConfig) -> Result<ParsedKenAll> {
    let (groups, errors) = read_town_groups(ken_all_csv)?;

    let records = groups
        .iter()
        .flat_map(|group| process_town_group(group, config))
        .collect();

    Ok(ParsedKenAll { records, errors })
}
