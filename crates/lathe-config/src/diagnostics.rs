use serde::de::DeserializeOwned;

/// Non-fatal findings produced while loading a `lathe.toml`.
///
/// Loading is best effort: callers always get a config when deserialization
/// succeeds, plus these diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDiagnostics {
    /// Keys present in the input that the schema does not know, as dotted
    /// paths (`refactorings.disabeld`).
    pub unknown_keys: Vec<String>,
    pub warnings: Vec<ConfigWarning>,
}

impl ConfigDiagnostics {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unknown_keys.is_empty() && self.warnings.is_empty()
    }
}

#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// `logging.level` is neither a level nor a valid filter directive; `info` is used.
    LoggingLevelInvalid { value: String },
    /// A refactoring id is listed more than once in `refactorings.disabled`.
    DuplicateDisabledId { id: String },
}

pub(crate) fn deserialize_toml_with_unknown_keys<T: DeserializeOwned>(
    text: &str,
) -> Result<(T, Vec<String>), toml::de::Error> {
    let mut unknown = Vec::<String>::new();
    let deserializer = toml::de::Deserializer::new(text);
    let value = serde_ignored::deserialize(deserializer, |path| {
        unknown.push(normalize_path(path));
    })?;
    unknown.sort();
    unknown.dedup();
    Ok((value, unknown))
}

fn normalize_path(path: serde_ignored::Path) -> String {
    // Root paths render with a leading `.`; sequence indices as `.0` segments.
    let raw = path.to_string();
    raw.trim_start_matches('.')
        .split('.')
        .enumerate()
        .fold(String::new(), |mut out, (idx, segment)| {
            if idx > 0 && !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                out.push('[');
                out.push_str(segment);
                out.push(']');
                return out;
            }
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(segment);
            out
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn nested_unknown_keys_use_full_paths() {
        #[derive(Debug, Deserialize)]
        struct Root {
            #[allow(dead_code)]
            section: Section,
        }

        #[derive(Debug, Deserialize)]
        struct Section {
            #[allow(dead_code)]
            known: bool,
        }

        let text = "[section]\nknown = true\ntypo = 1\n";
        let (_value, unknown) = deserialize_toml_with_unknown_keys::<Root>(text).unwrap();
        assert_eq!(unknown, vec!["section.typo"]);
    }
}
