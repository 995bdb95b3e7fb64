//! Custom deck import
//!
//! Delimited text (comma, tab or semicolon) with an optional header row.
//! Recognized headers map columns by name; otherwise columns are positional:
//! target, pronunciation, english, category.

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_CATEGORY;
use crate::persistence::{Storage, StorageError, load_json, save_json};
use crate::vocab::Word;

/// Storage key holding the active deck
pub const DECK_STORAGE_KEY: &str = "lane_lingo_custom_deck";

/// A skipped row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// 1-based line number in the source text
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DeckImportError {
    #[error("no valid words found ({} row error(s))", .errors.len())]
    NoValidWords { errors: Vec<RowError> },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result of a successful import
#[derive(Debug, Clone, PartialEq)]
pub struct DeckImport {
    pub words: Vec<Word>,
    pub errors: Vec<RowError>,
    pub had_header: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Target,
    Pronunciation,
    English,
    Category,
}

impl Column {
    fn from_header(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "target" | "chinese" | "hanzi" | "character" | "arabic" | "front" | "word" => {
                Some(Column::Target)
            }
            "pinyin" | "pronunciation" | "reading" => Some(Column::Pronunciation),
            "english" | "meaning" | "definition" | "translation" | "back" => Some(Column::English),
            "category" | "tag" | "type" | "deck" => Some(Column::Category),
            _ => None,
        }
    }
}

const POSITIONAL: [Option<Column>; 4] = [
    Some(Column::Target),
    Some(Column::Pronunciation),
    Some(Column::English),
    Some(Column::Category),
];

/// Parse deck text. Fails only when no row is usable.
pub fn parse_deck(text: &str) -> Result<DeckImport, DeckImportError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty())
        .peekable();

    let Some(&(_, first)) = lines.peek() else {
        return Err(DeckImportError::NoValidWords { errors: Vec::new() });
    };
    let delimiter = detect_delimiter(first);

    let header: Vec<Option<Column>> = split_row(first, delimiter)
        .iter()
        .map(|cell| Column::from_header(cell))
        .collect();
    let had_header = header.iter().any(Option::is_some);
    let columns: Vec<Option<Column>> = if had_header {
        lines.next();
        header
    } else {
        POSITIONAL.to_vec()
    };

    let mut words = Vec::new();
    let mut errors = Vec::new();
    for (line, raw) in lines {
        let cells = split_row(raw, delimiter);
        let field = |wanted: Column| -> String {
            columns
                .iter()
                .position(|c| *c == Some(wanted))
                .and_then(|i| cells.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        let target = field(Column::Target);
        let english = field(Column::English);
        match (target.is_empty(), english.is_empty()) {
            (true, true) => continue,
            (true, false) => {
                errors.push(RowError {
                    line,
                    message: "missing target text".to_string(),
                });
                continue;
            }
            (false, true) => {
                errors.push(RowError {
                    line,
                    message: "missing English translation".to_string(),
                });
                continue;
            }
            (false, false) => {}
        }

        let category = field(Column::Category);
        words.push(Word {
            text: target,
            pronunciation: field(Column::Pronunciation),
            english,
            category: if category.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category
            },
        });
    }

    if words.is_empty() {
        return Err(DeckImportError::NoValidWords { errors });
    }

    Ok(DeckImport {
        words,
        errors,
        had_header,
    })
}

fn detect_delimiter(line: &str) -> char {
    if line.contains('\t') {
        return '\t';
    }
    let semicolons = line.matches(';').count();
    let commas = line.matches(',').count();
    if semicolons > commas { ';' } else { ',' }
}

/// Split one row, honoring double quotes and `""` escapes
fn split_row(line: &str, delimiter: char) -> Vec<String> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => cells.push(std::mem::take(&mut cell)),
            c => cell.push(c),
        }
    }
    cells.push(cell);
    cells
}

/// The stored deck, if any
pub fn load_deck(storage: &dyn Storage) -> Option<Vec<Word>> {
    load_json::<Vec<Word>>(storage, DECK_STORAGE_KEY).filter(|deck| !deck.is_empty())
}

/// Whether a usable deck is stored
pub fn has_deck(storage: &dyn Storage) -> bool {
    load_deck(storage).is_some()
}

pub fn save_deck(storage: &mut dyn Storage, words: &[Word]) -> Result<(), StorageError> {
    save_json(storage, DECK_STORAGE_KEY, &words)
}

pub fn clear_deck(storage: &mut dyn Storage) -> Result<(), StorageError> {
    log::info!("Custom deck cleared");
    storage.remove_item(DECK_STORAGE_KEY)
}

/// Parse and store a deck. On failure the stored deck is left untouched.
pub fn import_deck(storage: &mut dyn Storage, text: &str) -> Result<DeckImport, DeckImportError> {
    let import = parse_deck(text)?;
    save_deck(storage, &import.words)?;
    log::info!(
        "Imported {} words ({} rows skipped)",
        import.words.len(),
        import.errors.len()
    );
    for error in &import.errors {
        log::warn!("Deck import: {}", error);
    }
    Ok(import)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_header_with_aliases() {
        let text = "Hanzi,Pinyin,Meaning,Tag\n你好,nǐ hǎo,hello,greeting\n猫,māo,cat,\n";
        let import = parse_deck(text).unwrap();
        assert!(import.had_header);
        assert_eq!(import.words.len(), 2);
        assert_eq!(import.words[0], Word::new("你好", "nǐ hǎo", "hello", "greeting"));
        assert_eq!(import.words[1].category, "custom");
    }

    #[test]
    fn test_header_columns_in_any_order() {
        let text = "english;arabic\nhello;مرحبا\n";
        let import = parse_deck(text).unwrap();
        assert_eq!(import.words[0].text, "مرحبا");
        assert_eq!(import.words[0].english, "hello");
        assert_eq!(import.words[0].pronunciation, "");
    }

    #[test]
    fn test_anki_front_back_tabs() {
        let text = "front\tback\nperro\tdog\ngato\tcat\n";
        let import = parse_deck(text).unwrap();
        assert_eq!(import.words.len(), 2);
        assert_eq!(import.words[1].text, "gato");
        assert_eq!(import.words[1].english, "cat");
    }

    #[test]
    fn test_positional_without_header() {
        let text = "水,shuǐ,water,food\n茶,chá,tea\n";
        let import = parse_deck(text).unwrap();
        assert!(!import.had_header);
        assert_eq!(import.words.len(), 2);
        assert_eq!(import.words[0].category, "food");
        assert_eq!(import.words[1].category, "custom");
    }

    #[test]
    fn test_row_errors_have_line_numbers() {
        let text = "target,pronunciation,english\n\n狗,gǒu,\n,,cat\n,,\n鱼,yú,fish\n";
        let import = parse_deck(text).unwrap();
        assert_eq!(import.words.len(), 1);
        assert_eq!(
            import.errors,
            vec![
                RowError {
                    line: 3,
                    message: "missing English translation".to_string(),
                },
                RowError {
                    line: 4,
                    message: "missing target text".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_quoted_fields() {
        let text = "target,english\n\"hola, amigo\",\"hello, \"\"friend\"\"\"\n";
        let import = parse_deck(text).unwrap();
        assert_eq!(import.words[0].text, "hola, amigo");
        assert_eq!(import.words[0].english, "hello, \"friend\"");
    }

    #[test]
    fn test_no_valid_rows_keeps_stored_deck() {
        let mut storage = MemoryStorage::new();
        import_deck(&mut storage, "a,,b\nc,,d\ne,,f\n").unwrap();
        assert_eq!(load_deck(&storage).unwrap().len(), 3);

        let err = import_deck(&mut storage, "target,english\n,x\n").unwrap_err();
        match err {
            DeckImportError::NoValidWords { errors } => assert_eq!(errors.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(load_deck(&storage).unwrap().len(), 3);
        assert!(matches!(parse_deck("  \n"), Err(DeckImportError::NoValidWords { .. })));
    }

    #[test]
    fn test_clear_deck() {
        let mut storage = MemoryStorage::new();
        import_deck(&mut storage, "a,,b\n").unwrap();
        assert!(has_deck(&storage));
        clear_deck(&mut storage).unwrap();
        assert!(!has_deck(&storage));
        assert!(load_deck(&storage).is_none());
    }

    #[test]
    fn test_empty_or_corrupt_deck_is_not_active() {
        let mut storage = MemoryStorage::new();
        storage.set_item(DECK_STORAGE_KEY, "[]").unwrap();
        assert!(!has_deck(&storage));
        assert!(load_deck(&storage).is_none());

        storage.set_item(DECK_STORAGE_KEY, "{ not json").unwrap();
        assert!(!has_deck(&storage));
        assert!(load_deck(&storage).is_none());
    }
}
