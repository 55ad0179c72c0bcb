// 半角カナ U+FF61..=U+FF9D に対応する全角文字
const HALF_WIDTH_KANA_TABLE: &str =
    "。「」、・ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン";

const HALF_WIDTH_KANA_FIRST: u32 = 0xff61;
const HALF_WIDTH_KANA_LAST: u32 = 0xff9d;

const HALF_WIDTH_DAKUTEN: char = 'ﾞ';
const HALF_WIDTH_HANDAKUTEN: char = 'ﾟ';

/// 町域名などの 1 カラムを正規化する
///
/// - 全角の数字・英字は半角に
/// - ハイフン・波ダッシュの類は `-` に，全角・半角の読点の類は `、` に
/// - 半角カナは全角カタカナに（濁点・半濁点は合成する）
///
/// 漢字やその他の文字はそのまま
pub fn normalize_text(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            HALF_WIDTH_DAKUTEN => push_voiced_mark(&mut normalized, Voicing::Dakuten),
            HALF_WIDTH_HANDAKUTEN => push_voiced_mark(&mut normalized, Voicing::Handakuten),
            c => normalized.push(normalize_char(c)),
        }
    }

    normalized
}

fn normalize_char(c: char) -> char {
    let u = c as u32;

    match c {
        '０'..='９' | 'Ａ'..='Ｚ' | 'ａ'..='ｚ' => char::from_u32(u - 0xfee0).unwrap_or(c),

        // − (U+2212) は Shift_JIS の 0x817C を decode したもの
        '－' | '−' | '‐' | '‑' | '〜' | '～' => '-',

        '，' => '、',

        _ if (HALF_WIDTH_KANA_FIRST..=HALF_WIDTH_KANA_LAST).contains(&u) => HALF_WIDTH_KANA_TABLE
            .chars()
            .nth((u - HALF_WIDTH_KANA_FIRST) as usize)
            .unwrap_or(c),

        _ => c,
    }
}

enum Voicing {
    Dakuten,
    Handakuten,
}

fn push_voiced_mark(normalized: &mut String, voicing: Voicing) {
    let composed = normalized.chars().last().and_then(|last| match voicing {
        Voicing::Dakuten => match last {
            'ウ' => Some('ヴ'),
            'カ'..='ト' | 'ハ'..='ホ' if "カキクケコサシスセソタチツテトハヒフヘホ".contains(last) => {
                char::from_u32(last as u32 + 1)
            }
            _ => None,
        },
        Voicing::Handakuten => match last {
            'ハ' | 'ヒ' | 'フ' | 'ヘ' | 'ホ' => char::from_u32(last as u32 + 2),
            _ => None,
        },
    });

    match composed {
        Some(composed) => {
            normalized.pop();
            normalized.push(composed);
        }
        None => normalized.push(match voicing {
            Voicing::Dakuten => '゛',
            Voicing::Handakuten => '゜',
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_width_kana() {
        assert_eq!(normalize_text("ｱﾂﾅｲ(ｾﾞﾝｲｷ)"), "アツナイ(ゼンイキ)");
        assert_eq!(normalize_text("ﾂﾞﾒｷ"), "ヅメキ");
        assert_eq!(normalize_text("ﾊﾟﾋﾟﾌﾟﾍﾟﾎﾟ"), "パピプペポ");
        assert_eq!(normalize_text("ｳﾞｧｲｵﾘﾝ"), "ヴァイオリン");
        assert_eq!(normalize_text("ﾒｲｴｷﾐｯﾄﾞﾗﾝﾄﾞｽｸｴｱ"), "メイエキミッドランドスクエア");
        assert_eq!(normalize_text("ｼﾓｸﾎﾞ<174ｦﾉｿﾞｸ>､ｼﾓｻﾋﾞｼﾛ"), "シモクボ<174ヲノゾク>、シモサビシロ");
    }

    #[test]
    fn test_full_width_ascii() {
        assert_eq!(normalize_text("３−４、２０"), "3-4、20");
        assert_eq!(normalize_text("１〜５００"), "1-500");
        assert_eq!(normalize_text("ＪＲセントラルタワーズ"), "JRセントラルタワーズ");
        assert_eq!(normalize_text("１，２"), "1、2");
    }

    #[test]
    fn test_kanji_untouched() {
        assert_eq!(normalize_text("犬落瀬（内金矢、内山）"), "犬落瀬（内金矢、内山）");
        assert_eq!(normalize_text("ミッドランドスクエア"), "ミッドランドスクエア");
    }

    #[test]
    fn test_orphan_voiced_mark() {
        assert_eq!(normalize_text("ｱﾞ"), "ア゛");
        assert_eq!(normalize_text("ﾟ"), "゜");
    }
}
