// 日本郵便 郵便番号データ (KEN_ALL.CSV) の町域名の正規化
//
// 町域名には注記が自由記述で混ざっているので，それを解析して町域ごとの行に展開する：
// - 1 つの町域が 38 文字を超えると複数行に分割される（分割位置は括弧の途中でもよい）
// - 漢字は （） と 「」，カナは () と <> で括弧を表す
//   - ただしカナの入れ子に () が使われているデータもある（群馬県吾妻郡東吾妻町 泉沢）
// - （全域）（○○空港内） のように町域全体を指すもの，番地・丁目の範囲を表すもの，
//   （○○階） のようにビルの階を表すものは展開しない
// - 複数行に分割された町域で，カナが分割されず各行に同じ読みが入っていることがある

pub mod assembler;
pub mod bracket_parser;
pub mod expander;
pub mod merger;
pub mod normalizer;
pub mod parser;
pub mod qualifier;
pub mod row;
