//! Vocabulary store
//!
//! Static (language, level) -> word tables, plus an optional custom deck that
//! replaces level-based lookup for a whole session.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_LEVEL;

/// A vocabulary entry. Identity is the `text` value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Word {
    /// Target-language text (hanzi, Arabic script, ...)
    pub text: String,
    /// Romanization / reading aid
    #[serde(default)]
    pub pronunciation: String,
    pub english: String,
    pub category: String,
}

impl Word {
    pub fn new(text: &str, pronunciation: &str, english: &str, category: &str) -> Self {
        Self {
            text: text.to_string(),
            pronunciation: pronunciation.to_string(),
            english: english.to_string(),
            category: category.to_string(),
        }
    }
}

/// Target language of a word pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    Mandarin,
    Arabic,
    /// User-imported deck; the target language is whatever the deck holds
    Custom,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Mandarin => "Mandarin",
            Language::Arabic => "Arabic",
            Language::Custom => "Custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown language '{0}'")]
pub struct UnknownLanguage(pub String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mandarin" | "chinese" | "zh" => Ok(Language::Mandarin),
            "arabic" | "ar" => Ok(Language::Arabic),
            "custom" => Ok(Language::Custom),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

/// Source of words for the selector.
pub trait VocabularyProvider {
    /// Language questions are tagged with
    fn language(&self) -> Language;

    /// Words introduced at `level` (empty if the level has no table)
    fn words_for_level(&self, level: u32) -> &[Word];

    /// The imported deck, if one is active and non-empty
    fn active_deck(&self) -> Option<&[Word]>;
}

/// Built-in tables with an optional deck override
#[derive(Debug, Clone)]
pub struct Vocabulary {
    language: Language,
    levels: Vec<Vec<Word>>,
    custom_deck: Option<Vec<Word>>,
}

impl Vocabulary {
    /// Built-in vocabulary for a language. `Custom` has no built-in table.
    pub fn builtin(language: Language) -> Self {
        let table: &[&[WordRow]] = match language {
            Language::Mandarin => &MANDARIN,
            Language::Arabic => &ARABIC,
            Language::Custom => &[],
        };
        let levels = table
            .iter()
            .map(|rows| {
                rows.iter()
                    .map(|&(text, pron, english, category)| {
                        Word::new(text, pron, english, category)
                    })
                    .collect()
            })
            .collect();

        Self {
            language,
            levels,
            custom_deck: None,
        }
    }

    /// Replace level-based lookup with a flat deck. An empty deck is ignored.
    pub fn with_deck(mut self, deck: Vec<Word>) -> Self {
        if deck.is_empty() {
            log::warn!("Ignoring empty custom deck");
        } else {
            log::info!("Custom deck active ({} words)", deck.len());
            self.custom_deck = Some(deck);
        }
        self
    }

    /// Number of levels with a table
    pub fn level_count(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn has_custom_deck(&self) -> bool {
        self.custom_deck.is_some()
    }
}

impl VocabularyProvider for Vocabulary {
    fn language(&self) -> Language {
        if self.custom_deck.is_some() {
            Language::Custom
        } else {
            self.language
        }
    }

    fn words_for_level(&self, level: u32) -> &[Word] {
        if level == 0 || level > MAX_LEVEL {
            return &[];
        }
        self.levels
            .get(level as usize - 1)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn active_deck(&self) -> Option<&[Word]> {
        self.custom_deck
            .as_deref()
            .filter(|deck| !deck.is_empty())
    }
}

/// (text, pronunciation, english, category)
type WordRow = (&'static str, &'static str, &'static str, &'static str);

const MANDARIN: [&[WordRow]; 6] = [
    &[
        ("你好", "nǐ hǎo", "hello", "greeting"),
        ("谢谢", "xièxie", "thank you", "greeting"),
        ("再见", "zàijiàn", "goodbye", "greeting"),
        ("一", "yī", "one", "number"),
        ("二", "èr", "two", "number"),
        ("三", "sān", "three", "number"),
        ("妈妈", "māma", "mother", "family"),
        ("爸爸", "bàba", "father", "family"),
        ("水", "shuǐ", "water", "food"),
        ("米饭", "mǐfàn", "rice", "food"),
        ("茶", "chá", "tea", "food"),
    ],
    &[
        ("红色", "hóngsè", "red", "color"),
        ("蓝色", "lánsè", "blue", "color"),
        ("绿色", "lǜsè", "green", "color"),
        ("猫", "māo", "cat", "animal"),
        ("狗", "gǒu", "dog", "animal"),
        ("鱼", "yú", "fish", "animal"),
        ("鸟", "niǎo", "bird", "animal"),
        ("哥哥", "gēge", "older brother", "family"),
        ("姐姐", "jiějie", "older sister", "family"),
        ("十", "shí", "ten", "number"),
    ],
    &[
        ("手", "shǒu", "hand", "body"),
        ("眼睛", "yǎnjing", "eye", "body"),
        ("头", "tóu", "head", "body"),
        ("今天", "jīntiān", "today", "time"),
        ("明天", "míngtiān", "tomorrow", "time"),
        ("昨天", "zuótiān", "yesterday", "time"),
        ("学校", "xuéxiào", "school", "place"),
        ("医院", "yīyuàn", "hospital", "place"),
        ("商店", "shāngdiàn", "shop", "place"),
        ("吃", "chī", "to eat", "verb"),
    ],
    &[
        ("喝", "hē", "to drink", "verb"),
        ("看", "kàn", "to look", "verb"),
        ("听", "tīng", "to listen", "verb"),
        ("写", "xiě", "to write", "verb"),
        ("大", "dà", "big", "adjective"),
        ("小", "xiǎo", "small", "adjective"),
        ("快", "kuài", "fast", "adjective"),
        ("慢", "màn", "slow", "adjective"),
        ("火车", "huǒchē", "train", "transport"),
        ("飞机", "fēijī", "airplane", "transport"),
        ("自行车", "zìxíngchē", "bicycle", "transport"),
    ],
    &[
        ("天气", "tiānqì", "weather", "weather"),
        ("下雨", "xià yǔ", "to rain", "weather"),
        ("太阳", "tàiyáng", "sun", "weather"),
        ("开心", "kāixīn", "happy", "emotion"),
        ("难过", "nánguò", "sad", "emotion"),
        ("生气", "shēngqì", "angry", "emotion"),
        ("害怕", "hàipà", "afraid", "emotion"),
        ("工作", "gōngzuò", "work", "work"),
        ("老师", "lǎoshī", "teacher", "work"),
        ("医生", "yīshēng", "doctor", "work"),
    ],
    &[
        ("经济", "jīngjì", "economy", "abstract"),
        ("文化", "wénhuà", "culture", "abstract"),
        ("历史", "lìshǐ", "history", "abstract"),
        ("环境", "huánjìng", "environment", "abstract"),
        ("讨论", "tǎolùn", "to discuss", "verb"),
        ("解决", "jiějué", "to solve", "verb"),
        ("发展", "fāzhǎn", "to develop", "verb"),
        ("复杂", "fùzá", "complicated", "adjective"),
        ("重要", "zhòngyào", "important", "adjective"),
        ("安静", "ānjìng", "quiet", "adjective"),
    ],
];

const ARABIC: [&[WordRow]; 6] = [
    &[
        ("مرحبا", "marhaban", "hello", "greeting"),
        ("شكرا", "shukran", "thank you", "greeting"),
        ("مع السلامة", "maʿa as-salāma", "goodbye", "greeting"),
        ("واحد", "wāḥid", "one", "number"),
        ("اثنان", "ithnān", "two", "number"),
        ("ثلاثة", "thalātha", "three", "number"),
        ("أم", "umm", "mother", "family"),
        ("أب", "ab", "father", "family"),
        ("ماء", "māʾ", "water", "food"),
        ("خبز", "khubz", "bread", "food"),
    ],
    &[
        ("أحمر", "aḥmar", "red", "color"),
        ("أزرق", "azraq", "blue", "color"),
        ("أخضر", "akhḍar", "green", "color"),
        ("قطة", "qiṭṭa", "cat", "animal"),
        ("كلب", "kalb", "dog", "animal"),
        ("سمكة", "samaka", "fish", "animal"),
        ("طائر", "ṭāʾir", "bird", "animal"),
        ("أخ", "akh", "brother", "family"),
        ("أخت", "ukht", "sister", "family"),
    ],
    &[
        ("يد", "yad", "hand", "body"),
        ("عين", "ʿayn", "eye", "body"),
        ("رأس", "raʾs", "head", "body"),
        ("اليوم", "al-yawm", "today", "time"),
        ("غدا", "ghadan", "tomorrow", "time"),
        ("أمس", "ams", "yesterday", "time"),
        ("مدرسة", "madrasa", "school", "place"),
        ("مستشفى", "mustashfā", "hospital", "place"),
        ("سوق", "sūq", "market", "place"),
    ],
    &[
        ("أكل", "akala", "to eat", "verb"),
        ("شرب", "shariba", "to drink", "verb"),
        ("كتب", "kataba", "to write", "verb"),
        ("كبير", "kabīr", "big", "adjective"),
        ("صغير", "ṣaghīr", "small", "adjective"),
        ("سريع", "sarīʿ", "fast", "adjective"),
        ("قطار", "qiṭār", "train", "transport"),
        ("طائرة", "ṭāʾira", "airplane", "transport"),
        ("سيارة", "sayyāra", "car", "transport"),
    ],
    &[
        ("طقس", "ṭaqs", "weather", "weather"),
        ("مطر", "maṭar", "rain", "weather"),
        ("شمس", "shams", "sun", "weather"),
        ("سعيد", "saʿīd", "happy", "emotion"),
        ("حزين", "ḥazīn", "sad", "emotion"),
        ("غاضب", "ghāḍib", "angry", "emotion"),
        ("عمل", "ʿamal", "work", "work"),
        ("معلم", "muʿallim", "teacher", "work"),
        ("طبيب", "ṭabīb", "doctor", "work"),
    ],
    &[
        ("اقتصاد", "iqtiṣād", "economy", "abstract"),
        ("ثقافة", "thaqāfa", "culture", "abstract"),
        ("تاريخ", "tārīkh", "history", "abstract"),
        ("بيئة", "bīʾa", "environment", "abstract"),
        ("ناقش", "nāqasha", "to discuss", "verb"),
        ("حل", "ḥalla", "to solve", "verb"),
        ("معقد", "muʿaqqad", "complicated", "adjective"),
        ("مهم", "muhimm", "important", "adjective"),
        ("هادئ", "hādiʾ", "quiet", "adjective"),
    ],
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_tables_cover_all_levels() {
        for language in [Language::Mandarin, Language::Arabic] {
            let vocab = Vocabulary::builtin(language);
            assert_eq!(vocab.level_count(), MAX_LEVEL);
            for level in 1..=MAX_LEVEL {
                let words = vocab.words_for_level(level);
                let distinct: HashSet<_> = words.iter().map(|w| &w.text).collect();
                assert!(distinct.len() >= 3, "{:?} level {} too small", language, level);
            }
        }
    }

    #[test]
    fn test_out_of_range_levels_are_empty() {
        let vocab = Vocabulary::builtin(Language::Mandarin);
        assert!(vocab.words_for_level(0).is_empty());
        assert!(vocab.words_for_level(MAX_LEVEL + 1).is_empty());
    }

    #[test]
    fn test_deck_overrides_language() {
        let deck = vec![
            Word::new("hola", "", "hello", "greeting"),
            Word::new("adiós", "", "goodbye", "greeting"),
            Word::new("gato", "", "cat", "animal"),
        ];
        let vocab = Vocabulary::builtin(Language::Arabic).with_deck(deck);
        assert_eq!(vocab.language(), Language::Custom);
        assert_eq!(vocab.active_deck().map(|d| d.len()), Some(3));

        let empty = Vocabulary::builtin(Language::Arabic).with_deck(Vec::new());
        assert!(empty.active_deck().is_none());
        assert_eq!(empty.language(), Language::Arabic);
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("Chinese".parse::<Language>(), Ok(Language::Mandarin));
        assert_eq!(" arabic ".parse::<Language>(), Ok(Language::Arabic));
        assert_eq!(
            "klingon".parse::<Language>(),
            Err(UnknownLanguage("klingon".to_string()))
        );
    }
}
