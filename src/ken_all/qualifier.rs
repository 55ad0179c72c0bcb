use once_cell::sync::Lazy;
use regex::Regex;

use crate::ken_all::bracket_parser::{BracketGrammar, BracketPayload};

/// 括弧の中身の分類
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedPayload {
    // （全域） や 町域名と同じもの
    Suppressed,
    // （高層棟）（４６階） のように町域名にそのまま付けるもの
    Literal(String),
    // 番地・丁目の範囲のみ
    NumericOnly,
    // （内金矢、内山、…） のように町域を列挙したもの
    Enumeration(Vec<String>),
}

/// 注記を判定する語句の一覧
#[derive(Debug, Clone)]
pub struct QualifierRules {
    // 町域全体を指す注記
    pub blanket: Vec<Regex>,
    // 町域名そのものが注記になっているもの (以下に掲載がない場合 など)
    pub base_blanket: Vec<Regex>,
    // ビルの階
    pub floor: Regex,
    // 階層不明
    pub floor_unknown: Regex,
    // 町域名の後ろに付く地割 (以降を取り除く)
    pub numbered_subdivision: Regex,
    // 番地・丁目の範囲を表す語
    pub numeric_noise: Regex,
    // 番地で終わるもの (下川原１９０−１ など)
    pub banchi_tail: Regex,
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

fn regexes(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().map(|p| regex(p)).collect()
}

static KANJI_RULES: Lazy<QualifierRules> = Lazy::new(|| QualifierRules {
    blanket: regexes(&[
        r"^全域$",
        r"^その他$",
        r"^番地$",
        r"^無番地$",
        r"^丁目$",
        r"^次のビルを除く$",
        r"^地階・階層不明$",
        r"^.+を除く$",
        r"^.+以外$",
        r"^.+空港内$",
        r"^.+一円$",
    ]),
    base_blanket: regexes(&[r"^以下に掲載がない場合$", r"^.+の次に番地がくる場合$"]),
    floor: regex(r"^\d+階$"),
    floor_unknown: regex(r"^地階・階層不明$"),
    numbered_subdivision: regex(r"第?\d+地割.*$"),
    numeric_noise: regex(r"\d+|[-、・の]|第|丁目|番地|番|号|地割|以外|以上|以下|を除く|その他|及び"),
    banchi_tail: regex(r"\d+(?:-\d+)*(?:番地|番|号)?$"),
});

static KANA_RULES: Lazy<QualifierRules> = Lazy::new(|| QualifierRules {
    blanket: regexes(&[
        r"^ゼンイキ$",
        r"^ソノタ$",
        r"^バンチ$",
        r"^ムバンチ$",
        r"^チョウメ$",
        r"^ツギノビルヲノゾク$",
        r"^チカイ・カイソウフメイ$",
        r"^.+ヲノゾク$",
        r"^.+イガイ$",
        r"^.+クウコウナイ$",
        r"^.+イチエン$",
    ]),
    base_blanket: regexes(&[
        r"^イカニケイサイガナイバアイ$",
        r"^.+ノツギニバンチガクルバアイ$",
    ]),
    floor: regex(r"^\d+カイ$"),
    floor_unknown: regex(r"^チカイ・カイソウフメイ$"),
    numbered_subdivision: regex(r"(?:ダイ)?\d+チワリ.*$"),
    numeric_noise: regex(
        r"\d+|[-、・ノ]|ダイ|チョウメ|バンチ|バン|ゴウ|チワリ|イガイ|イジョウ|イカ|ヲノゾク|ソノタ",
    ),
    banchi_tail: regex(r"\d+(?:-\d+)*(?:バンチ|バン|ゴウ)?$"),
});

impl QualifierRules {
    pub fn kanji() -> QualifierRules {
        KANJI_RULES.clone()
    }

    pub fn kana() -> QualifierRules {
        KANA_RULES.clone()
    }

    pub fn with_blanket(mut self, blanket: Regex) -> QualifierRules {
        self.blanket.push(blanket);
        self
    }

    pub fn is_blanket(&self, name: &str) -> bool {
        self.blanket.iter().any(|r| r.is_match(name))
    }

    pub fn is_floor_marker(&self, name: &str) -> bool {
        self.floor.is_match(name) || self.floor_unknown.is_match(name)
    }

    /// 番地・丁目の範囲のみで町域名を含まないかどうか
    pub fn is_numeric_noise(&self, name: &str) -> bool {
        if self.banchi_tail.is_match(name) {
            return true;
        }

        name.chars().any(|c| c.is_ascii_digit()) && self.numeric_noise.replace_all(name, "").is_empty()
    }

    /// 括弧の外側の文字列を整える
    ///
    /// 地割が含まれていればそれ以降を取り除き，`true` を返す
    pub fn clean_base(&self, base: &str, grammar: &BracketGrammar) -> (String, bool) {
        let base = grammar.strip_brackets(base).trim().to_owned();

        if self.base_blanket.iter().any(|r| r.is_match(&base)) {
            return (String::new(), false);
        }

        match self.numbered_subdivision.find(&base) {
            Some(m) => (base[..m.start()].trim().to_owned(), true),
            None => (base, false),
        }
    }
}

/// 分類に必要な括弧の外側の情報
#[derive(Debug, Clone)]
pub struct PayloadContext<'a> {
    pub base: &'a str,
    // 他の括弧に階の指定がある
    pub has_floor: bool,
    // 町域名に地割が含まれていた
    pub numbered_base: bool,
}

pub fn classify_payload(
    payload: &BracketPayload,
    context: &PayloadContext,
    rules: &QualifierRules,
    grammar: &BracketGrammar,
) -> ClassifiedPayload {
    if context.numbered_base {
        return ClassifiedPayload::NumericOnly;
    }

    if let [sole] = payload.items.as_slice() {
        let name = sole.name(grammar);

        if name == context.base || rules.is_blanket(&name) {
            return ClassifiedPayload::Suppressed;
        }

        // （高層棟）（４６階）
        if !name.is_empty() && (rules.floor.is_match(&name) || context.has_floor) {
            return ClassifiedPayload::Literal(name);
        }
    }

    let areas: Vec<String> = payload
        .items
        .iter()
        .map(|item| item.name(grammar))
        .filter(|name| !name.is_empty() && !rules.is_numeric_noise(name))
        .collect();

    if areas.is_empty() {
        ClassifiedPayload::NumericOnly
    } else {
        ClassifiedPayload::Enumeration(areas)
    }
}
