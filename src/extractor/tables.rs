//! Static lookup tables for the gr-oborona.ru source
//!
//! The site spells several album names inconsistently and never names the
//! performing artist, so both are resolved against fixed tables. Lookups never
//! fail: an unknown value is returned unchanged.

/// Canonical album name -> alternate spellings found on the site
const ALBUM_VARIANTS: &[(&str, &[&str])] = &[
    ("Поганая молодёжь", &["Поганая молодежь"]),
    ("Хорошо!!", &["Хорошо!", "Хорошо"]),
    ("Всё идёт по плану", &["Все идет по плану", "Всё идет по плану"]),
    ("Армагеддон-попс", &["Армагеддон попс", "Армагедон-попс"]),
    ("Здорово и вечно", &["Здорово и Вечно"]),
    ("Невыносимая лёгкость бытия", &["Невыносимая легкость бытия"]),
    ("Прыг-скок", &["Прыг скок"]),
    ("Зачем снятся сны?", &["Зачем снятся сны"]),
];

/// Artist -> canonical album names
const ARTIST_ALBUMS: &[(&str, &[&str])] = &[
    (
        "Гражданская Оборона",
        &[
            "Поганая молодёжь",
            "Оптимизм",
            "Мышеловка",
            "Хорошо!!",
            "Тоталитаризм",
            "Некрофилия",
            "Красный альбом",
            "Всё идёт по плану",
            "Так закалялась сталь",
            "Боевой стимул",
            "Песни радости и счастья",
            "Здорово и вечно",
            "Армагеддон-попс",
            "Война",
            "Русское поле экспериментов",
            "Инструкция по выживанию",
            "Солнцеворот",
            "Невыносимая лёгкость бытия",
            "Звездопад",
            "Долгая счастливая жизнь",
            "Реанимация",
            "Зачем снятся сны?",
        ],
    ),
    (
        "Егор и Опизденевшие",
        &["Прыг-скок", "Сто лет одиночества"],
    ),
];

/// Finds the key whose value list contains `value`
fn find_key<'t>(table: &'t [(&'t str, &'t [&'t str])], value: &str) -> Option<&'t str> {
    table
        .iter()
        .find(|(_, values)| values.iter().any(|candidate| *candidate == value))
        .map(|(key, _)| *key)
}

/// Maps an alternate album spelling to its canonical name.
pub fn canonical_album(album: &str) -> &str {
    find_key(ALBUM_VARIANTS, album).unwrap_or(album)
}

/// Infers the artist from a canonical album name.
pub fn artist_for_album(album: &str) -> Option<&'static str> {
    find_key(ARTIST_ALBUMS, album)
}
