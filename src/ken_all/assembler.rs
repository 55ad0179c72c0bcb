use serde::Serialize;

use crate::ken_all::{expander::TownEntry, row::RawRow};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KenAllRecord {
    pub postal_code: String,
    pub prefecture: String,
    pub city: String,
    pub town: String,
    pub prefecture_kana: String,
    pub city_kana: String,
    pub town_kana: String,
}

pub fn assemble_records(head: &RawRow, entries: Vec<TownEntry>) -> Vec<KenAllRecord> {
    entries
        .into_iter()
        .map(|entry| KenAllRecord {
            postal_code: head.postal_code.clone(),
            prefecture: head.prefecture.clone(),
            city: head.city.clone(),
            town: entry.name,
            prefecture_kana: head.prefecture_kana.clone(),
            city_kana: head.city_kana.clone(),
            town_kana: entry.kana,
        })
        .collect()
}
