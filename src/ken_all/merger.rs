use crate::ken_all::{bracket_parser::BracketGrammar, row::RawRow};

/// 同じ町域を表す連続した行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TownGroup {
    rows: Vec<RawRow>,
}

impl TownGroup {
    pub fn new(head: RawRow) -> TownGroup {
        TownGroup { rows: vec![head] }
    }

    pub fn head(&self) -> &RawRow {
        &self.rows[0]
    }

    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    fn push(&mut self, row: RawRow) {
        self.rows.push(row);
    }

    // 漢字の括弧が閉じていなければ次の行に続く
    fn continues_into(&self, next: &RawRow) -> bool {
        self.head().shares_group_key(next)
            && BracketGrammar::KANJI.is_unterminated(&self.kanji_text())
    }

    fn kanji_text(&self) -> String {
        self.rows.iter().map(|row| row.town.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedText {
    pub kanji: String,
    pub kana: String,
    // 各行に繰り返されていたカナを 1 つにまとめた
    pub repeated_kana: bool,
}

/// 行を町域ごとにまとめる
///
/// 町域名が 38 文字を超える場合は複数行に分割されているが，その行であることを示す列はないので
/// 括弧が閉じているかどうかで判断する
pub fn group_rows<I>(rows: I) -> Vec<TownGroup>
where
    I: IntoIterator<Item = RawRow>,
{
    let mut groups: Vec<TownGroup> = Vec::new();

    for row in rows {
        match groups.last_mut() {
            Some(group) if group.continues_into(&row) => group.push(row),
            _ => groups.push(TownGroup::new(row)),
        }
    }

    groups
}

/// 分割された町域名を連結する
///
/// カナは分割されず各行に同じ読みが繰り返されていることがあり，その場合は 1 つだけ使う
pub fn merge_town_group(group: &TownGroup) -> MergedText {
    let rows = group.rows();

    let kanji = rows.iter().map(|row| row.town.as_str()).collect();

    let head_kana = &group.head().town_kana;
    let repeated_kana = 1 < rows.len() && rows.iter().all(|row| &row.town_kana == head_kana);
    let kana = if repeated_kana {
        head_kana.clone()
    } else {
        rows.iter().map(|row| row.town_kana.as_str()).collect()
    };

    MergedText {
        kanji,
        kana,
        repeated_kana,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ken_all::row::RowFlags;

    fn row(postal_code: &str, town: &str, town_kana: &str) -> RawRow {
        RawRow {
            jis_code: "02405".to_owned(),
            old_postal_code: "033".to_owned(),
            postal_code: postal_code.to_owned(),
            prefecture_kana: "アオモリケン".to_owned(),
            city_kana: "カミキタグンロクノヘマチ".to_owned(),
            town_kana: town_kana.to_owned(),
            prefecture: "青森県".to_owned(),
            city: "上北郡六戸町".to_owned(),
            town: town.to_owned(),
            flags: RowFlags {
                multi_postal_code_town: true,
                koaza_banchi: true,
                has_chome: false,
                multi_town_postal_code: false,
                update: 0,
                change_reason: 0,
            },
        }
    }

    #[test]
    fn test_group_rows() {
        let groups = group_rows(vec![
            row("0330072", "折茂（今熊「213-234、240、247、262、266、27", "オリモ(イマクマ<213-234、240、247、262、266、27"),
            row("0330072", "5、277を除く」、", "5、277ヲノゾク>、"),
            row("0330072", "大原、沖山）", "オオハラ、オキヤマ)"),
            row("0330072", "犬落瀬", "イヌオトセ"),
            row("0330073", "犬落瀬（", "イヌオトセ("),
            row("0330074", "内金矢）", "ウチカナヤ)"),
        ]);

        let sizes: Vec<_> = groups.iter().map(|g| g.rows().len()).collect();
        assert_eq!(sizes, vec![3, 1, 1, 1]);

        let merged = merge_town_group(&groups[0]);
        assert_eq!(
            merged.kanji,
            "折茂（今熊「213-234、240、247、262、266、275、277を除く」、大原、沖山）"
        );
        assert_eq!(
            merged.kana,
            "オリモ(イマクマ<213-234、240、247、262、266、275、277ヲノゾク>、オオハラ、オキヤマ)"
        );
        assert!(!merged.repeated_kana);
    }

    #[test]
    fn test_single_row_group() {
        let group = TownGroup::new(row("0330071", "犬落瀬", "イヌオトセ"));
        assert_eq!(
            merge_town_group(&group),
            MergedText {
                kanji: "犬落瀬".to_owned(),
                kana: "イヌオトセ".to_owned(),
                repeated_kana: false,
            }
        );
    }

    #[test]
    fn test_repeated_kana() {
        let groups = group_rows(vec![
            row("6028064", "一町目（上長者町通堀川東入、東堀川通中", "イッチョウメ"),
            row("6028064", "立売通下る）", "イッチョウメ"),
        ]);

        assert_eq!(groups.len(), 1);
        let merged = merge_town_group(&groups[0]);
        assert_eq!(merged.kanji, "一町目（上長者町通堀川東入、東堀川通中立売通下る）");
        assert_eq!(merged.kana, "イッチョウメ");
        assert!(merged.repeated_kana);
    }
}
