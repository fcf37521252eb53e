/// Render a two-column `field | value` table, one row per entry.
#[must_use]
pub fn render_key_value_table(rows: &[(String, String)]) -> String {
    let key_width = rows
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0)
        .max("field".len());
    let value_width = rows
        .iter()
        .map(|(_, value)| value.chars().count())
        .max()
        .unwrap_or(0)
        .max("value".len());

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format!("{:<key_width$}  {}", "field", "value"));
    lines.push("-".repeat(key_width + 2 + value_width));
    for (key, value) in rows {
        let cell = if looks_numeric(value) {
            format!("{value:>value_width$}")
        } else {
            value.clone()
        };
        lines.push(format!("{key:<key_width$}  {cell}"));
    }
    lines.join("\n")
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align() {
        let table = render_key_value_table(&[
            ("hash".to_string(), "0xabc".to_string()),
            ("blockNumber".to_string(), "12345".to_string()),
        ]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("field"));
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2].find("0xabc"), lines[0].find("value"));
        assert!(lines[3].ends_with("12345"));
    }

    #[test]
    fn empty_table_has_only_header() {
        assert_eq!(render_key_value_table(&[]).lines().count(), 2);
    }
}
