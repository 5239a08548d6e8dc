//! 语音过滤与排序
//!
//! 纯函数：从完整目录派生过滤视图，不修改任何条目

use std::cmp::Ordering;

use super::value_objects::{VoiceDescriptor, VoiceFilter};

/// 按区域/性别过滤语音，并按本地化名称升序排列
pub fn filter_voices(all: &[VoiceDescriptor], filter: &VoiceFilter) -> Vec<VoiceDescriptor> {
    let mut voices: Vec<VoiceDescriptor> = all
        .iter()
        .filter(|voice| filter.matches(voice))
        .cloned()
        .collect();
    voices.sort_by(compare_by_localized_name);
    voices
}

/// 本地化名称比较
///
/// 先比较折叠大小写与变音符后的排序键（`Álvaro` 排在 `Alice` 与 `Bruno` 之间），
/// 再依次以原始名称、short_name 打破平局，保证排序稳定可复现。
pub fn compare_by_localized_name(a: &VoiceDescriptor, b: &VoiceDescriptor) -> Ordering {
    collation_key(&a.localized_name)
        .cmp(&collation_key(&b.localized_name))
        .then_with(|| a.localized_name.cmp(&b.localized_name))
        .then_with(|| a.short_name.cmp(&b.short_name))
}

fn collation_key(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(fold_diacritic)
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' => 'd',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' => 'i',
        'ł' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ş' | 'ß' => 's',
        'ť' | 'ţ' => 't',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<VoiceDescriptor> {
        vec![
            VoiceDescriptor::new("pt-BR-FranciscaNeural", "Francisca", "pt-BR", "Female"),
            VoiceDescriptor::new("en-US-GuyNeural", "Guy", "en-US", "Male"),
            VoiceDescriptor::new("pt-BR-AntonioNeural", "Antônio", "pt-BR", "Male"),
            VoiceDescriptor::new("en-US-AriaNeural", "Aria", "en-US", "Female"),
            VoiceDescriptor::new("pt-BR-BrendaNeural", "Brenda", "pt-BR", "Female"),
            VoiceDescriptor::new("en-US-JennyNeural", "jenny", "en-US", "Female"),
        ]
    }

    fn names(voices: &[VoiceDescriptor]) -> Vec<&str> {
        voices.iter().map(|v| v.localized_name.as_str()).collect()
    }

    #[test]
    fn test_filter_by_locale_sorted() {
        let all = catalog();
        let filtered = filter_voices(&all, &VoiceFilter::new("pt-BR", ""));
        assert!(filtered.iter().all(|v| v.locale == "pt-BR"));
        assert_eq!(names(&filtered), vec!["Antônio", "Brenda", "Francisca"]);
    }

    #[test]
    fn test_empty_filter_returns_everything_sorted() {
        let all = catalog();
        let filtered = filter_voices(&all, &VoiceFilter::any());
        assert_eq!(filtered.len(), all.len());
        assert_eq!(
            names(&filtered),
            vec!["Antônio", "Aria", "Brenda", "Francisca", "Guy", "jenny"]
        );
    }

    #[test]
    fn test_filter_by_locale_and_gender() {
        let all = catalog();
        let filtered = filter_voices(&all, &VoiceFilter::new("en-US", "Female"));
        assert_eq!(names(&filtered), vec!["Aria", "jenny"]);
    }

    #[test]
    fn test_unknown_locale_yields_empty() {
        let filtered = filter_voices(&catalog(), &VoiceFilter::new("xx-XX", ""));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_source_catalog_untouched() {
        let all = catalog();
        let before = all.clone();
        let _ = filter_voices(&all, &VoiceFilter::new("pt-BR", "Male"));
        assert_eq!(all, before);
    }

    #[test]
    fn test_diacritics_sort_with_base_letter() {
        let a = VoiceDescriptor::new("x-1", "Álvaro", "es-ES", "Male");
        let b = VoiceDescriptor::new("x-2", "Bruno", "es-ES", "Male");
        let c = VoiceDescriptor::new("x-3", "Alice", "es-ES", "Female");
        let sorted = filter_voices(&[b, a, c], &VoiceFilter::any());
        assert_eq!(names(&sorted), vec!["Alice", "Álvaro", "Bruno"]);
    }
}
