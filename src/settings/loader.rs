//! Settings-file parser (§4.1). Turns the line-oriented `[SECTION]` format
//! into a compiled [`Setting`].
//!
//! Grounded on `Setting::fill()` / `Setting::readrules()` in
//! `examples/original_source/src/setting.cxx`: section dispatch by current
//! header, `%include`/`%define`/`SPLITTER=` directives, and meta-rule class
//! substitution followed by `sort_rules` ordering.

use super::{QuotePair, Rule, Setting};
use crate::error::ConfigError;
use crate::unicode_util::CharFilter;
use log::warn;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Section {
    None,
    Rules,
    MetaRules,
    RuleOrder,
    Abbreviations,
    AttachedPrefixes,
    AttachedSuffixes,
    Prefixes,
    Suffixes,
    Tokens,
    Units,
    Ordinals,
    Currency,
    EosMarkers,
    Quotes,
    Filter,
}

impl Section {
    fn from_header(header: &str) -> Option<Section> {
        Some(match header {
            "RULES" => Section::Rules,
            "META-RULES" => Section::MetaRules,
            "RULE-ORDER" => Section::RuleOrder,
            "ABBREVIATIONS" => Section::Abbreviations,
            "ATTACHEDPREFIXES" => Section::AttachedPrefixes,
            "ATTACHEDSUFFIXES" => Section::AttachedSuffixes,
            "PREFIXES" => Section::Prefixes,
            "SUFFIXES" => Section::Suffixes,
            "TOKENS" => Section::Tokens,
            "UNITS" => Section::Units,
            "ORDINALS" => Section::Ordinals,
            "CURRENCY" => Section::Currency,
            "EOSMARKERS" => Section::EosMarkers,
            "QUOTES" => Section::Quotes,
            "FILTER" => Section::Filter,
            _ => return None,
        })
    }

    /// The class-name used inside `[META-RULES]` parts referring to this
    /// section's accumulated alternation.
    fn class_name(self) -> Option<&'static str> {
        Some(match self {
            Section::Abbreviations => "ABBREVIATIONS",
            Section::AttachedPrefixes => "ATTACHEDPREFIXES",
            Section::AttachedSuffixes => "ATTACHEDSUFFIXES",
            Section::Prefixes => "PREFIXES",
            Section::Suffixes => "SUFFIXES",
            Section::Tokens => "TOKENS",
            Section::Units => "UNITS",
            Section::Ordinals => "ORDINALS",
            Section::Currency => "CURRENCY",
            _ => return None,
        })
    }
}

const RESERVED_REGEX_CHARS: &[char] =
    &['?', '^', '$', '[', ']', '(', ')', '{', '}', '*', '.', '+', '|', '-'];

fn escape_literal(entry: &str) -> String {
    let mut out = String::with_capacity(entry.len());
    for c in entry.chars() {
        if RESERVED_REGEX_CHARS.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn parse_char_escape(raw: &str) -> Option<char> {
    let raw = raw.trim();
    if let Some(hex) = raw.strip_prefix("\\u").or_else(|| raw.strip_prefix("\\U")) {
        return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
    }
    raw.chars().next()
}

/// Accumulates per-section state while scanning a settings file, then
/// assembles an immutable [`Setting`] — the same build-then-freeze shape the
/// teacher uses for `Punctuations`' `FieldTree` (`src/lexeme/builder.rs`).
pub struct SettingsBuilder {
    language: String,
    source_path: String,
    splitter: char,
    macros: HashMap<String, String>,
    version: String,
    rule_lines: Vec<(String, String)>,
    meta_rule_lines: Vec<(String, String)>,
    rule_order: Vec<String>,
    classes: HashMap<&'static str, Vec<String>>,
    eos_markers: std::collections::HashSet<char>,
    quote_lines: Vec<(String, String)>,
    filter_lines: Vec<(char, String)>,
}

impl SettingsBuilder {
    pub fn new(language: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            source_path: source_path.into(),
            splitter: '%',
            macros: HashMap::new(),
            version: String::new(),
            rule_lines: Vec::new(),
            meta_rule_lines: Vec::new(),
            rule_order: Vec::new(),
            classes: HashMap::new(),
            eos_markers: std::collections::HashSet::new(),
            quote_lines: Vec::new(),
            filter_lines: Vec::new(),
        }
    }

    pub fn parse(mut self, text: &str) -> Result<Setting, ConfigError> {
        let mut section = Section::None;

        for (lineno, raw_line) in text.lines().enumerate() {
            let lineno = lineno + 1;
            let line = raw_line.trim_end();
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }

            let trimmed = line.trim();
            if let Some(header) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                section = Section::from_header(header).ok_or_else(|| ConfigError::Malformed {
                    path: self.source_path.clone(),
                    line: lineno,
                    message: format!("unknown section [{}]", header),
                })?;
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix("%include") {
                self.handle_include(section, rest.trim(), lineno)?;
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix("%define") {
                let mut parts = rest.trim().splitn(2, char::is_whitespace);
                let name = parts.next().unwrap_or_default().to_string();
                let value = parts.next().unwrap_or_default().trim().to_string();
                self.macros.insert(name, value);
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix("SPLITTER=") {
                self.splitter = parse_char_escape(rest).unwrap_or('%');
                continue;
            }
            if let Some(rest) = trimmed.strip_prefix("version=") {
                self.version = rest.trim().to_string();
                continue;
            }

            self.handle_section_line(section, trimmed, lineno)?;
        }

        self.finish()
    }

    fn handle_include(
        &mut self,
        section: Section,
        target: &str,
        lineno: usize,
    ) -> Result<(), ConfigError> {
        let base = std::path::Path::new(&self.source_path)
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_default();
        let candidate = base.join(target);
        let text = std::fs::read_to_string(&candidate).map_err(|_| ConfigError::MissingInclude {
            path: self.source_path.clone(),
            target: target.to_string(),
        })?;
        for (included_lineno, included_line) in text.lines().enumerate() {
            let included_line = included_line.trim();
            if included_line.is_empty() || included_line.starts_with('#') {
                continue;
            }
            self.handle_section_line(section, included_line, lineno + included_lineno + 1)?;
        }
        Ok(())
    }

    fn handle_section_line(
        &mut self,
        section: Section,
        line: &str,
        lineno: usize,
    ) -> Result<(), ConfigError> {
        match section {
            Section::None => Err(ConfigError::Malformed {
                path: self.source_path.clone(),
                line: lineno,
                message: "entry outside any [SECTION]".to_string(),
            }),
            Section::Rules => {
                let (name, pattern) = split_kv(line, lineno, &self.source_path)?;
                self.rule_lines.push((name, pattern));
                Ok(())
            }
            Section::MetaRules => {
                let (name, pattern) = split_kv(line, lineno, &self.source_path)?;
                self.meta_rule_lines.push((name, pattern));
                Ok(())
            }
            Section::RuleOrder => {
                for name in line.split_whitespace() {
                    if self.rule_order.contains(&name.to_string()) {
                        return Err(ConfigError::DuplicateRuleOrder {
                            path: self.source_path.clone(),
                            name: name.to_string(),
                        });
                    }
                    self.rule_order.push(name.to_string());
                }
                Ok(())
            }
            Section::EosMarkers => {
                if let Some(c) = parse_char_escape(line) {
                    self.eos_markers.insert(c);
                }
                Ok(())
            }
            Section::Quotes => {
                let mut parts = line.splitn(2, char::is_whitespace);
                let open = parts.next().unwrap_or_default().to_string();
                let close = parts.next().unwrap_or_default().trim().to_string();
                self.quote_lines.push((open, close));
                Ok(())
            }
            Section::Filter => {
                let mut parts = line.splitn(2, char::is_whitespace);
                let src = parts.next().unwrap_or_default();
                let Some(src_char) = src.chars().next() else {
                    return Ok(());
                };
                let repl = parts.next().unwrap_or_default().trim().to_string();
                self.filter_lines.push((src_char, repl));
                Ok(())
            }
            _ => {
                if let Some(class_name) = section.class_name() {
                    self.classes
                        .entry(class_name)
                        .or_default()
                        .push(line.to_string());
                }
                Ok(())
            }
        }
    }

    fn expand_macros(&self, text: &str) -> String {
        let mut out = String::new();
        let chars: Vec<char> = text.chars().collect();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] == self.splitter {
                if let Some(end) = chars[i + 1..].iter().position(|c| *c == self.splitter) {
                    let name: String = chars[i + 1..i + 1 + end].iter().collect();
                    if let Some(value) = self.macros.get(&name) {
                        out.push_str(value);
                        i += end + 2;
                        continue;
                    }
                }
            }
            out.push(chars[i]);
            i += 1;
        }
        out
    }

    fn finish(self) -> Result<Setting, ConfigError> {
        let mut compiled: Vec<(String, Rc<Rule>)> = Vec::new();

        for (name, pattern) in &self.rule_lines {
            let expanded = self.expand_macros(pattern);
            let rule = Rule::new(name, expanded).map_err(|e| ConfigError::Malformed {
                path: self.source_path.clone(),
                line: 0,
                message: format!("rule '{}': {}", name, e),
            })?;
            compiled.push((name.clone(), Rc::new(rule)));
        }

        for (name, meta) in &self.meta_rule_lines {
            let parts: Vec<&str> = meta.split(self.splitter).collect();
            let mut assembled = String::new();
            let mut skip = false;
            for part in parts {
                if part.is_empty() {
                    continue;
                }
                if let Some(entries) = self.classes.get(part) {
                    if entries.is_empty() {
                        warn!(
                            "{}: meta-rule '{}' references empty class '{}', skipping",
                            self.source_path, name, part
                        );
                        skip = true;
                        break;
                    }
                    let escaped: Vec<String> =
                        entries.iter().map(|e| escape_literal(e)).collect();
                    assembled.push_str(&format!("(?:{})", escaped.join("|")));
                } else {
                    assembled.push_str(part);
                }
            }
            if skip {
                continue;
            }
            let expanded = self.expand_macros(&assembled);
            let rule = Rule::new(name, expanded).map_err(|e| ConfigError::Malformed {
                path: self.source_path.clone(),
                line: 0,
                message: format!("meta-rule '{}': {}", name, e),
            })?;
            compiled.push((name.clone(), Rc::new(rule)));
        }

        let rules = self.order_rules(compiled);

        let mut eos_markers = self.eos_markers;
        if eos_markers.is_empty() {
            eos_markers = ".!?".chars().collect();
        }

        let mut quotes = super::Quoting::default();
        for (open, close) in &self.quote_lines {
            quotes.add(QuotePair::new(open.clone(), close.clone()));
        }
        if quotes.is_empty_pairs() {
            quotes.add(QuotePair::new("\"", "\""));
            quotes.add(QuotePair::new("\u{2018}", "\u{2019}"));
            quotes.add(QuotePair::new("\u{201C}\u{201E}\u{201F}", "\u{201D}"));
        }

        let mut filter_table = HashMap::new();
        for (src, repl) in self.filter_lines {
            filter_table.insert(src, repl);
        }

        Ok(Setting {
            language: self.language,
            rules,
            eos_markers,
            quotes,
            filter: CharFilter::new(filter_table),
            version: self.version,
            source_path: self.source_path.clone(),
        })
    }

    fn order_rules(&self, compiled: Vec<(String, Rc<Rule>)>) -> Vec<Rc<Rule>> {
        if self.rule_order.is_empty() {
            return compiled.into_iter().map(|(_, rule)| rule).collect();
        }

        let mut by_name: HashMap<String, Rc<Rule>> = compiled.into_iter().collect();
        let mut ordered = Vec::new();
        for name in &self.rule_order {
            match by_name.remove(name) {
                Some(rule) => ordered.push(rule),
                None => warn!(
                    "{}: [RULE-ORDER] names undefined rule '{}'",
                    self.source_path, name
                ),
            }
        }
        let mut remaining: Vec<(String, Rc<Rule>)> = by_name.into_iter().collect();
        remaining.sort_by(|a, b| a.0.cmp(&b.0));
        for (name, rule) in remaining {
            warn!(
                "{}: rule '{}' is not listed in [RULE-ORDER], appending",
                self.source_path, name
            );
            ordered.push(rule);
        }
        ordered
    }
}

fn split_kv(line: &str, lineno: usize, path: &str) -> Result<(String, String), ConfigError> {
    let mut parts = line.splitn(2, '=');
    let name = parts.next().unwrap_or_default().trim().to_string();
    let value = parts
        .next()
        .ok_or_else(|| ConfigError::Malformed {
            path: path.to_string(),
            line: lineno,
            message: format!("expected 'NAME=VALUE', got '{}'", line),
        })?
        .trim()
        .to_string();
    Ok((name, value))
}

/// Parse a settings file from an in-memory string (used by tests and by
/// callers that keep configuration embedded rather than on disk).
pub fn load_str(language: &str, text: &str) -> Result<Setting, ConfigError> {
    SettingsBuilder::new(language, format!("<inline:{}>", language)).parse(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_order_controls_emission_order() {
        let text = "\
[RULES]
B=^b+$
A=^a+$

[RULE-ORDER]
A B
";
        let setting = load_str("default", text).unwrap();
        assert_eq!(setting.rules.len(), 2);
        assert_eq!(setting.rules[0].id, "A");
        assert_eq!(setting.rules[1].id, "B");
    }

    #[test]
    fn rule_order_appends_unlisted_rules_with_a_warning() {
        let text = "\
[RULES]
A=^a+$
B=^b+$

[RULE-ORDER]
A
";
        let setting = load_str("default", text).unwrap();
        assert_eq!(setting.rules[0].id, "A");
        assert_eq!(setting.rules[1].id, "B");
    }

    #[test]
    fn duplicate_rule_order_entry_is_a_config_error() {
        let text = "\
[RULES]
A=^a+$

[RULE-ORDER]
A A
";
        let err = load_str("default", text).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateRuleOrder { .. }));
    }

    #[test]
    fn meta_rule_expands_referenced_class_as_alternation() {
        let text = "\
[ABBREVIATIONS]
Mr.
U.S.A.

[META-RULES]
ABBREV=ABBREVIATIONS

[RULE-ORDER]
ABBREV
";
        let setting = load_str("eng", text).unwrap();
        let rule = setting.rule_by_name("ABBREV").unwrap();
        assert!(rule.pattern.contains("Mr\\."));
        assert!(rule.pattern.contains("U\\.S\\.A\\."));
    }

    #[test]
    fn meta_rule_referencing_empty_class_is_skipped() {
        let text = "\
[META-RULES]
ABBREV=ABBREVIATIONS

[RULE-ORDER]
ABBREV
";
        let setting = load_str("eng", text).unwrap();
        assert!(setting.rule_by_name("ABBREV").is_none());
    }

    #[test]
    fn eos_markers_default_when_section_empty() {
        let setting = load_str("default", "[RULES]\nA=^a$\n").unwrap();
        assert_eq!(setting.eos_markers, ".!?".chars().collect());
    }

    #[test]
    fn eos_markers_section_replaces_the_default_set() {
        let text = "[EOSMARKERS]\n.\n\\u061F\n";
        let setting = load_str("ar", text).unwrap();
        assert!(setting.eos_markers.contains(&'.'));
        assert!(setting.eos_markers.contains(&'\u{061F}'));
        assert!(!setting.eos_markers.contains(&'!'));
    }

    #[test]
    fn quotes_section_registers_custom_pairs() {
        let text = "[QUOTES]\n<< >>\n";
        let setting = load_str("fr", text).unwrap();
        assert!(!setting.quotes.is_empty_pairs());
        assert!(setting.quotes.lookup_open('<'));
        assert!(setting.quotes.lookup_close('>'));
    }

    #[test]
    fn filter_section_maps_source_char_to_replacement() {
        let text = "[FILTER]\n\u{2019} '\n";
        let setting = load_str("default", text).unwrap();
        assert_eq!(setting.filter.apply("don\u{2019}t"), "don't");
    }

    #[test]
    fn missing_section_header_is_malformed() {
        let err = load_str("default", "A=^a$\n").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn unknown_section_header_is_malformed() {
        let err = load_str("default", "[NOTASECTION]\nfoo\n").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn define_macro_is_expanded_in_rule_patterns() {
        let text = "\
%define DIGIT [0-9]
[RULES]
NUM=^%DIGIT%+$
";
        let setting = load_str("default", text).unwrap();
        let rule = setting.rule_by_name("NUM").unwrap();
        assert_eq!(rule.pattern, "^[0-9]+$");
    }

    #[test]
    fn custom_splitter_changes_the_macro_delimiter() {
        let text = "\
SPLITTER=#
%define DIGIT [0-9]
[RULES]
NUM=^#DIGIT#+$
";
        let setting = load_str("default", text).unwrap();
        let rule = setting.rule_by_name("NUM").unwrap();
        assert_eq!(rule.pattern, "^[0-9]+$");
    }

    #[test]
    fn blank_lines_and_comments_are_ignored() {
        let text = "\
# a comment

[RULES]
# another comment
A=^a+$

";
        let setting = load_str("default", text).unwrap();
        assert_eq!(setting.rules.len(), 1);
    }
}
