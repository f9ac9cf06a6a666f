//! オプションフォームの入力値

use crate::tool::ToolDefinition;
use std::collections::BTreeMap;

/// フォーム入力値（項目名 → 入力文字列）
///
/// 送信時にだけ読み出す一時的な値。空欄は送信時に既定値へ置き換わる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionValues {
    values: BTreeMap<String, String>,
}

impl OptionValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// フォーム初期表示用に既定値を詰めたもの
    pub fn with_defaults(definition: &ToolDefinition) -> Self {
        let values = definition
            .options
            .iter()
            .map(|field| (field.key.to_string(), field.default.to_string()))
            .collect();
        Self { values }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// `key=value` 形式の指定を取り込む
    pub fn set_assignment(&mut self, assignment: &str) -> Result<(), String> {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| format!("Invalid option '{}': expected key=value", assignment))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("Invalid option '{}': empty key", assignment));
        }
        self.set(key, value);
        Ok(())
    }

    /// 送信するフォーム項目を定義順に組み立てる
    pub fn form_fields(&self, definition: &ToolDefinition) -> Vec<(String, String)> {
        definition
            .options
            .iter()
            .filter(|field| field.submitted)
            .map(|field| (field.key.to_string(), field.wire_value(self.get(field.key))))
            .collect()
    }

    /// 定義に存在しない項目名（CLIの打ち間違い検出用）
    pub fn unknown_keys<'a>(&'a self, definition: &ToolDefinition) -> Vec<&'a str> {
        self.values
            .keys()
            .map(String::as_str)
            .filter(|key| definition.option(key).is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolKind;

    #[test]
    fn test_watermark_defaults_when_empty() {
        let def = ToolKind::AddWatermark.definition();
        let fields = OptionValues::new().form_fields(def);
        assert_eq!(
            fields,
            vec![
                ("watermarkText".to_string(), "WATERMARK".to_string()),
                ("opacity".to_string(), "0.5".to_string()),
            ]
        );
    }

    #[test]
    fn test_crop_defaults_each_side() {
        let def = ToolKind::CropPdf.definition();
        let mut values = OptionValues::new();
        values.set("left", "12");
        let fields = values.form_fields(def);
        assert_eq!(fields.len(), 4);
        assert!(fields.contains(&("top".to_string(), "0".to_string())));
        assert!(fields.contains(&("left".to_string(), "12".to_string())));
    }

    #[test]
    fn test_protect_sends_password_only() {
        let def = ToolKind::ProtectPdf.definition();
        let mut values = OptionValues::new();
        values.set("password", "s3cret");
        values.set("confirmPassword", "s3cret");
        assert_eq!(
            values.form_fields(def),
            vec![("password".to_string(), "s3cret".to_string())]
        );
    }

    #[test]
    fn test_with_defaults_matches_schema() {
        let def = ToolKind::PdfToJpg.definition();
        let values = OptionValues::with_defaults(def);
        assert_eq!(values.get("imageQuality"), Some("medium"));
        assert_eq!(values.get("pagesToConvert"), Some("all"));
    }

    #[test]
    fn test_set_assignment() {
        let mut values = OptionValues::new();
        values.set_assignment("watermarkText=CONFIDENTIAL").unwrap();
        values.set_assignment("pagesToRemove=1,3,5-7").unwrap();
        assert_eq!(values.get("watermarkText"), Some("CONFIDENTIAL"));
        assert_eq!(values.get("pagesToRemove"), Some("1,3,5-7"));
        assert!(values.set_assignment("novalue").is_err());
        assert!(values.set_assignment("=x").is_err());
    }

    #[test]
    fn test_unknown_keys() {
        let def = ToolKind::Merge.definition();
        let mut values = OptionValues::new();
        values.set("mergeOrder", "date");
        values.set("mergeOrdr", "date");
        assert_eq!(values.unknown_keys(def), vec!["mergeOrdr"]);
    }
}
