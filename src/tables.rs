use comfy_table::{Attribute, Cell, Color, Table, modifiers, presets};

use crate::fetcher::{Fetched, Source};

pub fn build_fetched_table(fetched: &Fetched) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table.set_header(vec!["Operation", "Key", "Source", "File"]);
    table.add_row(vec![
        Cell::new(&fetched.operation).add_attribute(Attribute::Bold),
        Cell::new(&fetched.key),
        Cell::new(fetched.source).fg(match fetched.source {
            Source::Cache => Color::Green,
            Source::Network => Color::DarkYellow,
        }),
        Cell::new(fetched.path.display()).add_attribute(Attribute::Dim),
    ]);
    table
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use serde_json::json;

    use super::*;
    use crate::cache::CacheKey;

    #[test]
    fn test_build_fetched_table_ok() {
        let fetched = Fetched {
            operation: "plant_list".to_owned(),
            key: CacheKey::new("plant_list"),
            path: PathBuf::from("data/plant_list.json"),
            source: Source::Cache,
            response: json!({}),
        };
        let rendered = build_fetched_table(&fetched).to_string();
        assert!(rendered.contains("plant_list"));
        assert!(rendered.contains("data/plant_list.json"));
        assert!(rendered.contains("cache"));
    }
}
