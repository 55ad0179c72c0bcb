use crate::ken_all::{
    bracket_parser::{parse_brackets, BracketGrammar, ParseNode},
    qualifier::{classify_payload, ClassifiedPayload, PayloadContext, QualifierRules},
};

/// 漢字・カナそれぞれの解析規則
#[derive(Debug, Clone)]
pub struct ScriptRules {
    pub grammar: BracketGrammar,
    pub qualifiers: QualifierRules,
}

impl ScriptRules {
    pub fn kanji() -> ScriptRules {
        ScriptRules {
            grammar: BracketGrammar::KANJI,
            qualifiers: QualifierRules::kanji(),
        }
    }

    pub fn kana() -> ScriptRules {
        ScriptRules {
            grammar: BracketGrammar::KANA,
            qualifiers: QualifierRules::kana(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TownEntry {
    pub name: String,
    pub kana: String,
}

/// 漢字とカナの展開結果の対応
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Aligned,
    // 繰り返されていたカナを，すべての町域に付けた
    KanaBroadcast,
    Mismatch { kanji: usize, kana: usize },
}

/// 括弧の外側と分類済みの括弧の中身から町域名を並べる
///
/// 最初の要素は常に括弧の外側で，`Literal` はそこに付け足す
pub fn expand_town_names(base: &str, payloads: &[ClassifiedPayload]) -> Vec<String> {
    let mut head = base.to_owned();
    let mut areas = Vec::new();

    for payload in payloads {
        match payload {
            ClassifiedPayload::Literal(literal) => head.push_str(literal),
            ClassifiedPayload::Enumeration(names) => {
                areas.extend(names.iter().map(|name| format!("{}{}", base, name)))
            }
            ClassifiedPayload::Suppressed | ClassifiedPayload::NumericOnly => {}
        }
    }

    let mut names = vec![head];
    names.extend(areas);
    names
}

pub fn classify_parse_node(node: &ParseNode, rules: &ScriptRules) -> (String, Vec<ClassifiedPayload>) {
    let (base, numbered_base) = rules.qualifiers.clean_base(&node.base, &rules.grammar);

    let has_floor = node.payloads.iter().any(|payload| match payload.items.as_slice() {
        [sole] => rules.qualifiers.is_floor_marker(&sole.name(&rules.grammar)),
        _ => false,
    });

    let context = PayloadContext {
        base: &base,
        has_floor,
        numbered_base,
    };

    let payloads = node
        .payloads
        .iter()
        .map(|payload| classify_payload(payload, &context, &rules.qualifiers, &rules.grammar))
        .collect();

    (base, payloads)
}

/// 1 つの町域名を展開する
pub fn expand_town(text: &str, rules: &ScriptRules) -> Vec<String> {
    let node = parse_brackets(text, &rules.grammar);
    let (base, payloads) = classify_parse_node(&node, rules);
    expand_town_names(&base, &payloads)
}

/// 漢字とカナの展開結果を先頭から順に組にする
///
/// 数が合わない場合，各行に繰り返されていたカナが 1 件に展開されたならすべてにその読みを付け，
/// そうでなければ先頭同士だけを組にして残りのカナは空にする
pub fn pair_town_entries(
    kanji: Vec<String>,
    kana: Vec<String>,
    repeated_kana: bool,
) -> (Vec<TownEntry>, Alignment) {
    if kanji.len() == kana.len() {
        let entries = kanji
            .into_iter()
            .zip(kana)
            .map(|(name, kana)| TownEntry { name, kana })
            .collect();
        return (entries, Alignment::Aligned);
    }

    let alignment = if repeated_kana && kana.len() == 1 {
        Alignment::KanaBroadcast
    } else {
        Alignment::Mismatch {
            kanji: kanji.len(),
            kana: kana.len(),
        }
    };

    let base_kana = kana.into_iter().next().unwrap_or_default();

    let entries = kanji
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let kana = if i == 0 || alignment == Alignment::KanaBroadcast {
                base_kana.clone()
            } else {
                String::new()
            };
            TownEntry { name, kana }
        })
        .collect();

    (entries, alignment)
}
