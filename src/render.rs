//! Terminal rendering of messages.
//!
//! Output goes to stdout in Spanish, like the data it shows; logs go to
//! stderr so listings stay pipeable.

use chrono::{DateTime, Datelike};
use guardados_core::models::Message;

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sept", "oct", "nov", "dic",
];

/// Shown under content cut by [`truncate_text`].
pub const TRUNCATED_HINT: &str = "(texto completo con --json o export)";

/// Content cut to a display length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    pub text: String,
    pub truncated: bool,
}

/// Cut `text` to `max_chars` characters, appending `...` when cut.
pub fn truncate_text(text: &str, max_chars: usize) -> Truncated {
    match text.char_indices().nth(max_chars) {
        None => Truncated {
            text: text.to_string(),
            truncated: false,
        },
        Some((byte_idx, _)) => Truncated {
            text: format!("{}...", &text[..byte_idx]),
            truncated: true,
        },
    }
}

/// Spanish short date, e.g. `1 jun 2025`.
pub fn format_date_es(timestamp_ms: Option<i64>) -> String {
    timestamp_ms
        .and_then(|ms| DateTime::from_timestamp(ms.div_euclid(1000), 0))
        .map(|dt| format!("{} {} {}", dt.day(), MONTHS_ES[dt.month0() as usize], dt.year()))
        .unwrap_or_else(|| "sin fecha".to_string())
}

/// Up to two upper-case initials of a display name.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect()
}

/// Print one message block.
pub fn print_message(message: &Message, max_content_length: usize) {
    print!("{}", format_message(message, max_content_length));
}

/// Render one message block: header, content, topics, savers, and link.
pub fn format_message(message: &Message, max_content_length: usize) -> String {
    let mut out = String::new();

    let saves = if message.save_count == 1 {
        "1 guardado".to_string()
    } else {
        format!("{} guardados", message.save_count)
    };
    out.push_str(&format!(
        "[{}] {} · {} · {}\n",
        initials(&message.author_name),
        message.author_name,
        format_date_es(message.created_timestamp),
        saves
    ));

    let content = truncate_text(&message.content, max_content_length);
    for line in content.text.lines() {
        out.push_str(&format!("  {}\n", line));
    }
    if content.truncated {
        out.push_str(&format!("  {}\n", TRUNCATED_HINT));
    }
    if message.has_image {
        out.push_str("  [imagen]\n");
    }

    if !message.unified_topics.is_empty() {
        let topics: Vec<String> = message
            .unified_topics
            .iter()
            .map(|t| {
                if t.count > 1 {
                    format!("#{} ({})", t.canonical_topic, t.count)
                } else {
                    format!("#{}", t.canonical_topic)
                }
            })
            .collect();
        out.push_str(&format!("  temas:        {}\n", topics.join(" ")));
    }

    let savers: Vec<String> = message
        .saved_by
        .iter()
        .map(|s| {
            let user = s.user.as_deref().unwrap_or("anónimo");
            if s.topics.trim().is_empty() {
                user.to_string()
            } else {
                format!("{} [{}]", user, s.topics.split_whitespace().collect::<Vec<_>>().join(" "))
            }
        })
        .collect();
    out.push_str(&format!("  guardado por: {}\n", savers.join(", ")));

    if let Some(ref link) = message.permalink {
        out.push_str(&format!("  enlace:       {}\n", link));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        let t = truncate_text("Hola", 400);
        assert_eq!(t.text, "Hola");
        assert!(!t.truncated);
    }

    #[test]
    fn test_truncate_counts_chars() {
        let t = truncate_text("Año nuevo en Valladolid", 3);
        assert_eq!(t.text, "Año...");
        assert!(t.truncated);
    }

    #[test]
    fn test_truncate_exact_length() {
        let t = truncate_text("abc", 3);
        assert_eq!(t.text, "abc");
        assert!(!t.truncated);
    }

    #[test]
    fn test_format_date_es() {
        // 2025-06-01T10:00:00Z
        assert_eq!(format_date_es(Some(1_748_772_000_000)), "1 jun 2025");
        assert_eq!(format_date_es(None), "sin fecha");
    }

    fn message(content: &str) -> Message {
        let records: Vec<guardados_core::models::RawSaveRecord> = serde_json::from_str(&format!(
            r#"[
                {{"Message ID": 1, "Author name": "Ana García", "Content": "{content}", "Created": "2025-06-01T10:00:00Z", "Telegram link": "https://t.me/c/1/1", "User": "luis", "Topic": "Salud"}},
                {{"Message ID": 1, "Author name": "Ana García", "Content": "{content}", "Created": "2025-06-01T10:00:00Z", "Topic": "salud"}}
            ]"#
        ))
        .unwrap();
        guardados_core::aggregate::aggregate(
            &records,
            guardados_core::normalize::TagPolicy::All,
            &mut guardados_core::normalize::PureNormalizer,
        )
        .remove(0)
    }

    #[test]
    fn test_format_message_block() {
        let block = format_message(&message("Hola a todos"), 400);
        assert_eq!(
            block,
            "[AG] Ana García · 1 jun 2025 · 2 guardados\n\
             \x20 Hola a todos\n\
             \x20 temas:        #Salud (2)\n\
             \x20 guardado por: luis [Salud], anónimo [salud]\n\
             \x20 enlace:       https://t.me/c/1/1\n"
        );
    }

    #[test]
    fn test_format_message_marks_truncated_content() {
        let block = format_message(&message("Nueva ruta en bici por el Pisuerga"), 10);
        assert!(block.contains("  Nueva ruta...\n"));
        assert!(block.contains(TRUNCATED_HINT));

        let block = format_message(&message("Corto"), 10);
        assert!(!block.contains(TRUNCATED_HINT));
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("ana garcía lópez"), "AG");
        assert_eq!(initials("Óscar"), "Ó");
        assert_eq!(initials(""), "");
    }
}
