use crate::domain::model::GeneList;
use crate::utils::error::{CheckError, Result};

/// 每行一個基因符號：去除前後空白並轉大寫，保留原始順序。
///
/// 空行（含只有空白的行）會被略過，而不是保留成空字串；
/// 否則檔尾換行或中間的空行都會讓 round-trip 比對失敗。
pub fn normalize_symbols(text: &str) -> GeneList {
    let symbols = text
        .lines()
        .map(|line| line.trim().to_uppercase())
        .filter(|symbol| !symbol.is_empty())
        .collect();
    GeneList::new(symbols)
}

pub fn parse_gene_file(data: &[u8]) -> Result<GeneList> {
    let text = std::str::from_utf8(data).map_err(|e| {
        CheckError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    Ok(normalize_symbols(text))
}

/// `list` 表單欄位：以換行串接
pub fn list_payload(genes: &GeneList) -> String {
    genes.symbols().join("\n")
}
