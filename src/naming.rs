//! Destination folder naming
//!
//! Builds the date-based relative path for a file: year/month[/day] with
//! numeric or localized month segments, plus the no-date bucket. The month
//! and no-date tables are fixed data; localized strings stay out of log
//! messages, which remain in English.

use crate::date::ResolvedDate;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Folder naming scheme for month segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FolderNaming {
    /// Numeric month folders: 2024/05/
    Numeric,
    /// Month folders carrying a localized name: 2024/05_may/
    #[default]
    LocalizedNames,
}

/// Supported locales for month names and the no-date bucket label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Uk,
    Ru,
    Zh,
    Es,
    Pt,
    Fr,
    De,
    Ar,
    Ja,
    Ko,
    Hi,
    It,
    Nl,
    Sv,
    Pl,
}

impl Locale {
    /// Resolve a locale code, falling back to English for anything unknown.
    ///
    /// Accepts full codes like "uk-UA" or "zh_CN"; only the language part
    /// matters.
    pub fn from_code(code: &str) -> Self {
        let lang = code
            .split(['-', '_', '.'])
            .next()
            .unwrap_or("")
            .to_lowercase();
        match lang.as_str() {
            "en" => Locale::En,
            "uk" => Locale::Uk,
            "ru" => Locale::Ru,
            "zh" => Locale::Zh,
            "es" => Locale::Es,
            "pt" => Locale::Pt,
            "fr" => Locale::Fr,
            "de" => Locale::De,
            "ar" => Locale::Ar,
            "ja" => Locale::Ja,
            "ko" => Locale::Ko,
            "hi" => Locale::Hi,
            "it" => Locale::It,
            "nl" => Locale::Nl,
            "sv" => Locale::Sv,
            "pl" => Locale::Pl,
            _ => Locale::En,
        }
    }

    /// Detect the locale from the system, falling back to English.
    pub fn detect() -> Self {
        sys_locale::get_locale()
            .map(|code| Locale::from_code(&code))
            .unwrap_or(Locale::En)
    }

    /// Localized month name for `month` in 1..=12.
    pub fn month_name(self, month: u32) -> &'static str {
        let idx = (month - 1) as usize;
        self.month_names()[idx]
    }

    fn month_names(self) -> [&'static str; 12] {
        match self {
            Locale::En => [
                "january", "february", "march", "april", "may", "june", "july", "august",
                "september", "october", "november", "december",
            ],
            Locale::Uk => [
                "січень", "лютий", "березень", "квітень", "травень", "червень", "липень",
                "серпень", "вересень", "жовтень", "листопад", "грудень",
            ],
            Locale::Ru => [
                "январь", "февраль", "март", "апрель", "май", "июнь", "июль", "август",
                "сентябрь", "октябрь", "ноябрь", "декабрь",
            ],
            // Chinese and Japanese share the numeral month forms
            Locale::Zh | Locale::Ja => [
                "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月",
                "十一月", "十二月",
            ],
            Locale::Es => [
                "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
                "septiembre", "octubre", "noviembre", "diciembre",
            ],
            Locale::Pt => [
                "janeiro", "fevereiro", "março", "abril", "maio", "junho", "julho", "agosto",
                "setembro", "outubro", "novembro", "dezembro",
            ],
            Locale::Fr => [
                "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
                "septembre", "octobre", "novembre", "décembre",
            ],
            Locale::De => [
                "januar", "februar", "märz", "april", "mai", "juni", "juli", "august",
                "september", "oktober", "november", "dezember",
            ],
            Locale::Ar => [
                "يناير", "فبراير", "مارس", "أبريل", "مايو", "يونيو", "يوليو", "أغسطس",
                "سبتمبر", "أكتوبر", "نوفمبر", "ديسمبر",
            ],
            Locale::Ko => [
                "일월", "이월", "삼월", "사월", "오월", "유월", "칠월", "팔월", "구월", "시월",
                "십일월", "십이월",
            ],
            Locale::Hi => [
                "जनवरी", "फरवरी", "मार्च", "अप्रैल", "मई", "जून", "जुलाई", "अगस्त",
                "सितंबर", "अक्टूबर", "नवंबर", "दिसंबर",
            ],
            Locale::It => [
                "gennaio", "febbraio", "marzo", "aprile", "maggio", "giugno", "luglio",
                "agosto", "settembre", "ottobre", "novembre", "dicembre",
            ],
            Locale::Nl => [
                "januari", "februari", "maart", "april", "mei", "juni", "juli", "augustus",
                "september", "oktober", "november", "december",
            ],
            Locale::Sv => [
                "januari", "februari", "mars", "april", "maj", "juni", "juli", "augusti",
                "september", "oktober", "november", "december",
            ],
            Locale::Pl => [
                "styczeń", "luty", "marzec", "kwiecień", "maj", "czerwiec", "lipiec",
                "sierpień", "wrzesień", "październik", "listopad", "grudzień",
            ],
        }
    }

    /// Label of the no-date bucket for the localized naming scheme.
    pub fn no_date_label(self) -> &'static str {
        match self {
            Locale::En => "No Date",
            Locale::Uk => "Без дати",
            Locale::Ru => "Без даты",
            Locale::Zh => "无日期",
            Locale::Es => "Sin Fecha",
            Locale::Pt => "Sem Data",
            Locale::Fr => "Sans Date",
            Locale::De => "Kein Datum",
            Locale::Ar => "بدون تاريخ",
            Locale::Ja => "日付なし",
            Locale::Ko => "날짜 없음",
            Locale::Hi => "कोई तारीख नहीं",
            Locale::It => "Nessuna Data",
            Locale::Nl => "Geen Datum",
            Locale::Sv => "Inget Datum",
            Locale::Pl => "Bez Daty",
        }
    }
}

/// No-date bucket name for the numeric scheme, independent of locale.
const NUMERIC_NO_DATE: &str = "00_no_date";

/// Build the destination path for a file, relative to the folder that
/// contains the output root.
///
/// Pure function: same inputs always yield the identical string.
pub fn build_relative_path(
    date: Option<&ResolvedDate>,
    naming: FolderNaming,
    day_subfolders: bool,
    locale: Locale,
    output_root: &str,
) -> String {
    let Some(date) = date else {
        let bucket = match naming {
            FolderNaming::Numeric => NUMERIC_NO_DATE,
            FolderNaming::LocalizedNames => locale.no_date_label(),
        };
        return format!("{}/{}", output_root, bucket);
    };

    let day = date.value.date();
    let month_segment = match naming {
        FolderNaming::Numeric => format!("{:02}", day.month()),
        FolderNaming::LocalizedNames => {
            format!("{:02}_{}", day.month(), locale.month_name(day.month()))
        }
    };

    if day_subfolders {
        format!(
            "{}/{}/{}/{:02}",
            output_root,
            day.year(),
            month_segment,
            day.day()
        )
    } else {
        format!("{}/{}/{}", output_root, day.year(), month_segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::date::DateSource;
    use chrono::NaiveDate;

    const ALL_LOCALES: [Locale; 16] = [
        Locale::En,
        Locale::Uk,
        Locale::Ru,
        Locale::Zh,
        Locale::Es,
        Locale::Pt,
        Locale::Fr,
        Locale::De,
        Locale::Ar,
        Locale::Ja,
        Locale::Ko,
        Locale::Hi,
        Locale::It,
        Locale::Nl,
        Locale::Sv,
        Locale::Pl,
    ];

    fn resolved(y: i32, m: u32, d: u32) -> ResolvedDate {
        ResolvedDate {
            value: NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            source: DateSource::Capture,
        }
    }

    #[test]
    fn test_numeric_path_with_day_subfolders() {
        let date = resolved(2024, 5, 31);
        let path = build_relative_path(
            Some(&date),
            FolderNaming::Numeric,
            true,
            Locale::En,
            "Photos",
        );
        assert_eq!(path, "Photos/2024/05/31");
    }

    #[test]
    fn test_localized_path_without_day_subfolders() {
        let date = resolved(2024, 5, 31);
        let path = build_relative_path(
            Some(&date),
            FolderNaming::LocalizedNames,
            false,
            Locale::En,
            "Photos",
        );
        assert_eq!(path, "Photos/2024/05_may");
    }

    #[test]
    fn test_month_and_day_are_zero_padded() {
        let date = resolved(2023, 1, 5);
        let path = build_relative_path(
            Some(&date),
            FolderNaming::Numeric,
            true,
            Locale::En,
            "Out",
        );
        assert_eq!(path, "Out/2023/01/05");
    }

    #[test]
    fn test_no_date_bucket_localized() {
        let path = build_relative_path(
            None,
            FolderNaming::LocalizedNames,
            true,
            Locale::Uk,
            "Photos",
        );
        assert_eq!(path, "Photos/Без дати");
    }

    #[test]
    fn test_no_date_bucket_numeric_ignores_locale() {
        for locale in ALL_LOCALES {
            let path =
                build_relative_path(None, FolderNaming::Numeric, false, locale, "Photos");
            assert_eq!(path, "Photos/00_no_date");
        }
    }

    #[test]
    fn test_localized_month_segment_for_ukrainian() {
        let date = resolved(2022, 9, 1);
        let path = build_relative_path(
            Some(&date),
            FolderNaming::LocalizedNames,
            false,
            Locale::Uk,
            "Фото",
        );
        assert_eq!(path, "Фото/2022/09_вересень");
    }

    #[test]
    fn test_unknown_locale_codes_fall_back_to_english() {
        assert_eq!(Locale::from_code("xx"), Locale::En);
        assert_eq!(Locale::from_code(""), Locale::En);
        assert_eq!(Locale::from_code("uk-UA"), Locale::Uk);
        assert_eq!(Locale::from_code("zh_CN"), Locale::Zh);
        assert_eq!(Locale::from_code("PT"), Locale::Pt);
    }

    #[test]
    fn test_tables_contain_no_filesystem_illegal_characters() {
        let illegal = ['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];
        for locale in ALL_LOCALES {
            for month in 1..=12 {
                let name = locale.month_name(month);
                assert!(!name.is_empty());
                assert!(
                    !illegal.iter().any(|c| name.contains(*c)),
                    "month name {:?} for {:?} has an illegal character",
                    name,
                    locale
                );
            }
            let label = locale.no_date_label();
            assert!(!label.is_empty());
            assert!(
                !illegal.iter().any(|c| label.contains(*c)),
                "no-date label {:?} for {:?} has an illegal character",
                label,
                locale
            );
        }
    }
}
