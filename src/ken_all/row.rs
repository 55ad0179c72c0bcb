use anyhow::{bail, ensure, Context, Result};

use crate::ken_all::normalizer::normalize_text;

pub const KEN_ALL_COLUMN_COUNT: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFlags {
    pub multi_postal_code_town: bool, // 一町域が二以上の郵便番号で表される場合の表示
    pub koaza_banchi: bool,           // 小字毎に番地が起番されている町域の表示
    pub has_chome: bool,              // 丁目を有する町域の場合の表示
    pub multi_town_postal_code: bool, // 一つの郵便番号で二以上の町域を表す場合の表示
    pub update: u8,                   // 更新の表示 (0: 変更なし, 1: 変更あり, 2: 廃止)
    pub change_reason: u8,            // 変更理由 (0..=6)
}

/// KEN_ALL.CSV の 1 行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub jis_code: String,        // 全国地方公共団体コード
    pub old_postal_code: String, // (旧)郵便番号 (5 桁)
    pub postal_code: String,     // 郵便番号 (7 桁)

    pub prefecture_kana: String,
    pub city_kana: String,
    pub town_kana: String,

    pub prefecture: String,
    pub city: String,
    pub town: String,

    pub flags: RowFlags,
}

impl RawRow {
    pub fn from_record(record: &csv::StringRecord) -> Result<RawRow> {
        ensure!(
            record.len() == KEN_ALL_COLUMN_COUNT,
            "Expected {} columns, found {}",
            KEN_ALL_COLUMN_COUNT,
            record.len()
        );

        let jis_code = record[0].trim().to_owned();
        ensure!(
            jis_code.len() == 5 && jis_code.bytes().all(|b| b.is_ascii_digit()),
            "Invalid JIS code: {:?}",
            jis_code
        );

        let old_postal_code = record[1].trim().to_owned();

        let postal_code = record[2].trim().to_owned();
        ensure!(
            postal_code.len() == 7 && postal_code.bytes().all(|b| b.is_ascii_digit()),
            "Invalid postal code: {:?}",
            postal_code
        );

        let flags = RowFlags {
            multi_postal_code_town: parse_flag(&record[9]).context("Invalid flag at column 10")?,
            koaza_banchi: parse_flag(&record[10]).context("Invalid flag at column 11")?,
            has_chome: parse_flag(&record[11]).context("Invalid flag at column 12")?,
            multi_town_postal_code: parse_flag(&record[12])
                .context("Invalid flag at column 13")?,
            update: parse_code(&record[13], 2).context("Invalid update code")?,
            change_reason: parse_code(&record[14], 6).context("Invalid change reason")?,
        };

        Ok(RawRow {
            jis_code,
            old_postal_code,
            postal_code,
            prefecture_kana: normalize_column(&record[3]),
            city_kana: normalize_column(&record[4]),
            town_kana: normalize_column(&record[5]),
            prefecture: normalize_column(&record[6]),
            city: normalize_column(&record[7]),
            town: normalize_column(&record[8]),
            flags,
        })
    }

    // 同じ町域の続きの行であり得るかどうか
    pub fn shares_group_key(&self, other: &RawRow) -> bool {
        self.postal_code == other.postal_code
            && self.prefecture_kana == other.prefecture_kana
            && self.city_kana == other.city_kana
    }
}

fn normalize_column(column: &str) -> String {
    normalize_text(column.trim())
}

fn parse_flag(column: &str) -> Result<bool> {
    match column.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        column => bail!("Flag must be 0 or 1: {:?}", column),
    }
}

fn parse_code(column: &str, max: u8) -> Result<u8> {
    let code: u8 = column
        .trim()
        .parse()
        .with_context(|| format!("Not a number: {:?}", column))?;
    ensure!(code <= max, "Out of range: {}", code);
    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: &str) -> csv::StringRecord {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes());
        reader.records().next().unwrap().unwrap()
    }

    #[test]
    fn test_from_record() {
        let row = RawRow::from_record(&record(
            r#"01649,"08958","0895865","ﾎｯｶｲﾄﾞｳ","ﾄｶﾁｸﾞﾝｳﾗﾎﾛﾁｮｳ","ｱﾂﾅｲ(ｾﾞﾝｲｷ)","北海道","十勝郡浦幌町","厚内（全域）",0,0,0,0,0,0"#,
        ))
        .unwrap();

        assert_eq!(row.postal_code, "0895865");
        assert_eq!(row.old_postal_code, "08958");
        assert_eq!(row.prefecture_kana, "ホッカイドウ");
        assert_eq!(row.town_kana, "アツナイ(ゼンイキ)");
        assert_eq!(row.town, "厚内（全域）");
        assert!(!row.flags.has_chome);
    }

    #[test]
    fn test_old_postal_code_is_trimmed() {
        let row = RawRow::from_record(&record(
            r#"23105,"450  ","4506246","ｱｲﾁｹﾝ","ﾅｺﾞﾔｼﾅｶﾑﾗｸ","ﾒｲｴｷ","愛知県","名古屋市中村区","名駅",0,1,0,1,0,0"#,
        ))
        .unwrap();

        assert_eq!(row.old_postal_code, "450");
        assert!(row.flags.koaza_banchi);
        assert!(row.flags.multi_town_postal_code);
    }

    #[test]
    fn test_invalid_rows() {
        assert!(RawRow::from_record(&record(r#"01649,"08958","0895865""#)).is_err());
        assert!(RawRow::from_record(&record(
            r#"01649,"08958","089586","ﾎｯｶｲﾄﾞｳ","ﾄｶﾁｸﾞﾝｳﾗﾎﾛﾁｮｳ","ｱﾂﾅｲ","北海道","十勝郡浦幌町","厚内",0,0,0,0,0,0"#,
        ))
        .is_err());
        assert!(RawRow::from_record(&record(
            r#"01649,"08958","0895865","ﾎｯｶｲﾄﾞｳ","ﾄｶﾁｸﾞﾝｳﾗﾎﾛﾁｮｳ","ｱﾂﾅｲ","北海道","十勝郡浦幌町","厚内",2,0,0,0,0,0"#,
        ))
        .is_err());
    }
}
