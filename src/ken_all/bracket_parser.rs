/// 括弧の記法
///
/// 外側の括弧 `open`/`close` の中で `exclusion_open`/`exclusion_close` に囲まれた部分は
/// 番地の範囲や除外の指定であり，町域名にはならない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketGrammar {
    pub open: char,
    pub close: char,
    pub exclusion_open: char,
    pub exclusion_close: char,
    pub separator: char,
}

impl BracketGrammar {
    // 犬落瀬（内金矢、下久保「１７４を除く」、下淋代）
    pub const KANJI: BracketGrammar = BracketGrammar {
        open: '（',
        close: '）',
        exclusion_open: '「',
        exclusion_close: '」',
        separator: '、',
    };

    // ｲﾇｵﾄｾ(ｳﾁｶﾅﾔ､ｼﾓｸﾎﾞ<174ｦﾉｿﾞｸ>､ｼﾓｻﾋﾞｼﾛ)
    pub const KANA: BracketGrammar = BracketGrammar {
        open: '(',
        close: ')',
        exclusion_open: '<',
        exclusion_close: '>',
        separator: '、',
    };

    pub fn is_bracket(&self, c: char) -> bool {
        c == self.open || c == self.close || c == self.exclusion_open || c == self.exclusion_close
    }

    pub fn strip_brackets(&self, text: &str) -> String {
        text.chars().filter(|&c| !self.is_bracket(c)).collect()
    }

    // 外側の括弧が閉じられていない (次の行に続く) かどうか
    pub fn is_unterminated(&self, text: &str) -> bool {
        let mut level = 0usize;
        for c in text.chars() {
            if c == self.open {
                level += 1;
            } else if c == self.close {
                level = level.saturating_sub(1);
            }
        }
        0 < level
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Exclusion(Vec<String>),
}

/// 区切り文字で分けられた括弧内の 1 要素
///
/// `下久保「１７４を除く」` は `[Text("下久保"), Exclusion(["174を除く"])]` になる
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub segments: Vec<Segment>,
}

impl Item {
    /// 除外指定を取り除いた文字列
    pub fn text(&self) -> String {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text(text) => Some(text.as_str()),
                Segment::Exclusion(_) => None,
            })
            .collect()
    }

    /// 除外指定と残った括弧を取り除いた文字列
    pub fn name(&self, grammar: &BracketGrammar) -> String {
        grammar.strip_brackets(&self.text()).trim().to_owned()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketPayload {
    pub raw_text: String,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNode {
    pub base: String,
    pub payloads: Vec<BracketPayload>,
}

// 括弧の中を 1 文字ずつ読む
#[derive(Debug, Default)]
struct PayloadScanner {
    raw_text: String,
    items: Vec<Item>,
    segments: Vec<Segment>,
    text: String,
    exclusion: String,
    level: usize,
    exclusion_level: usize,
    // 「」 の中の （）
    exclusion_paren_level: usize,
}

#[derive(PartialEq)]
enum Scan {
    Continue,
    Closed,
}

impl PayloadScanner {
    fn push(&mut self, c: char, grammar: &BracketGrammar) -> Scan {
        if 0 < self.exclusion_level {
            if c == grammar.exclusion_close {
                self.exclusion_level -= 1;
                if self.exclusion_level == 0 {
                    self.raw_text.push(c);
                    self.close_exclusion(grammar);
                    return Scan::Continue;
                }
            } else if c == grammar.exclusion_open {
                self.exclusion_level += 1;
            } else if c == grammar.open {
                self.exclusion_paren_level += 1;
            } else if c == grammar.close {
                if 0 < self.exclusion_paren_level {
                    self.exclusion_paren_level -= 1;
                } else if self.level == 0 {
                    // 「 が閉じられないまま外側の括弧が閉じた
                    self.exclusion_level = 0;
                    self.close_exclusion(grammar);
                    self.close_item();
                    return Scan::Closed;
                }
            }

            self.exclusion.push(c);
            self.raw_text.push(c);
            return Scan::Continue;
        }

        if c == grammar.close {
            if self.level == 0 {
                self.close_item();
                return Scan::Closed;
            }
            self.level -= 1;
            self.text.push(c);
        } else if c == grammar.open {
            // カナで <> の代わりに () が入れ子になっていることがある
            self.level += 1;
            self.text.push(c);
        } else if c == grammar.exclusion_open {
            self.flush_text();
            self.exclusion_level = 1;
        } else if c == grammar.separator && self.level == 0 {
            self.close_item();
        } else {
            self.text.push(c);
        }

        self.raw_text.push(c);
        Scan::Continue
    }

    fn flush_text(&mut self) {
        if !self.text.is_empty() {
            self.segments
                .push(Segment::Text(std::mem::take(&mut self.text)));
        }
    }

    fn close_exclusion(&mut self, grammar: &BracketGrammar) {
        self.exclusion_paren_level = 0;
        let exclusion = std::mem::take(&mut self.exclusion);
        let inner = exclusion
            .split(grammar.separator)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_owned())
            .collect();
        self.segments.push(Segment::Exclusion(inner));
    }

    fn close_item(&mut self) {
        self.flush_text();
        if !self.segments.is_empty() {
            self.items.push(Item {
                segments: std::mem::take(&mut self.segments),
            });
        }
    }

    fn finish(mut self, grammar: &BracketGrammar) -> BracketPayload {
        if 0 < self.exclusion_level {
            self.close_exclusion(grammar);
        }
        self.close_item();

        BracketPayload {
            raw_text: self.raw_text,
            items: self.items,
        }
    }
}

/// 町域名を括弧の外側 (base) と括弧の中身 (payloads) に分ける
///
/// 閉じられていない括弧は文字列の最後まで続くものとし，対応しない閉じ括弧は捨てる
pub fn parse_brackets(text: &str, grammar: &BracketGrammar) -> ParseNode {
    let mut base = String::new();
    let mut payloads = Vec::new();

    let mut scanner: Option<PayloadScanner> = None;

    for c in text.chars() {
        let scan = match scanner.as_mut() {
            Some(current) => current.push(c, grammar),
            None => {
                if c == grammar.open {
                    scanner = Some(PayloadScanner::default());
                } else if !grammar.is_bracket(c) {
                    base.push(c);
                }
                Scan::Continue
            }
        };

        if scan == Scan::Closed {
            if let Some(closed) = scanner.take() {
                payloads.push(closed.finish(grammar));
            }
        }
    }

    if let Some(unterminated) = scanner {
        log::debug!("Unterminated bracket in {:?}", text);
        payloads.push(unterminated.finish(grammar));
    }

    ParseNode {
        base: base.trim().to_owned(),
        payloads,
    }
}
