//! Ties the configuration, rule cascade, boundary detector, quote machine
//! and language dispatcher together into the public [`Tokenizer`] surface
//! (§4.5, §4.8).
//!
//! Grounded on `TokenizerClass` in
//! `examples/original_source/include/ucto/tokenize.h` /
//! `examples/original_source/src/tokenize.cxx` for the method surface
//! (`tokenizeOneSentence`, `getSentences`, `outputTokens`), expressed with
//! the teacher's preference for small owned structs over a God-object (see
//! how `CombinedTokenizer` in `src/tokenization.rs` keeps state explicit).

use crate::boundary;
use crate::error::TokenizerError;
use crate::language::{resolve_language, LanguageDetector};
use crate::passthrough::tokenize_chunk_passthrough;
use crate::rule_cascade::{tokenize_chunk, TokenizeMode};
use crate::settings::Setting;
use crate::token::{Token, TokenRole, LANG_DEFAULT, LANG_UNDETERMINED, TYPE_UNANALYZED};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;
use std::io::BufRead;

/// The full tokenizer: configuration, live token buffer, and the mode
/// flags that correspond to the CLI surface (§6.2).
pub struct Tokenizer {
    settings: HashMap<String, Setting>,
    buffer: Vec<Token>,
    mode: TokenizeMode,
    pass_through: bool,
    quote_detection: bool,
    paragraph_detection: bool,
    sentence_per_line_input: bool,
    sentence_per_line_output: bool,
    verbose: bool,
    separators: HashSet<char>,
    all_whitespace_separates: bool,
    paragraph_signal_next: bool,
    started: bool,
    apply_filter: bool,
    allow_und: bool,
    detect_lang_per_line: bool,
    detector: Option<Box<dyn LanguageDetector>>,
}

impl Tokenizer {
    /// Build a tokenizer with a single `default` language [`Setting`].
    pub fn new(default_setting: Setting) -> Self {
        let mut settings = HashMap::new();
        settings.insert(LANG_DEFAULT.to_string(), default_setting);
        Self {
            settings,
            buffer: Vec::new(),
            mode: TokenizeMode::new(),
            pass_through: false,
            quote_detection: false,
            paragraph_detection: true,
            sentence_per_line_input: false,
            sentence_per_line_output: false,
            verbose: false,
            separators: HashSet::new(),
            all_whitespace_separates: true,
            paragraph_signal_next: false,
            started: false,
            apply_filter: true,
            allow_und: false,
            detect_lang_per_line: false,
            detector: None,
        }
    }

    pub fn add_language(&mut self, code: impl Into<String>, setting: Setting) {
        self.settings.insert(code.into(), setting);
    }

    /// Install a language detector. `allow_und` permits spans the detector
    /// cannot match to any configured language to fall back to the `und`
    /// sentinel instead of `default`. The detection flag only exists on
    /// `self` once an adapter is actually supplied — there is no way to
    /// enable detection without one.
    pub fn with_detector(mut self, detector: Box<dyn LanguageDetector>, allow_und: bool) -> Self {
        self.detector = Some(detector);
        self.allow_und = allow_und;
        self
    }

    pub fn set_detect_lang_per_line(&mut self, value: bool) {
        self.detect_lang_per_line = value && self.detector.is_some();
    }

    pub fn set_pass_through(&mut self, value: bool) {
        self.pass_through = value;
    }

    pub fn set_quote_detection(&mut self, value: bool) {
        self.quote_detection = value;
    }

    pub fn set_paragraph_detection(&mut self, value: bool) {
        self.paragraph_detection = value;
    }

    pub fn set_sentence_per_line_input(&mut self, value: bool) {
        self.sentence_per_line_input = value;
    }

    pub fn set_sentence_per_line_output(&mut self, value: bool) {
        self.sentence_per_line_output = value;
    }

    pub fn set_verbose(&mut self, value: bool) {
        self.verbose = value;
    }

    pub fn set_case_folding(&mut self, lowercase: bool, uppercase: bool) {
        self.mode.lowercase = lowercase;
        self.mode.uppercase = uppercase;
    }

    pub fn set_punct_filter(&mut self, value: bool) {
        self.mode.punct_filter = value;
    }

    /// Toggle the per-language `[FILTER]` character substitution step
    /// (`--filter=yes|no`, on by default).
    pub fn set_apply_filter(&mut self, value: bool) {
        self.apply_filter = value;
    }

    pub fn set_normalize_set(&mut self, types: impl IntoIterator<Item = String>) {
        self.mode.norm_set = types.into_iter().collect();
    }

    pub fn set_utt_mark(&mut self, mark: impl Into<String>) {
        self.mode.utt_mark = mark.into();
    }

    /// Configure the explicit separators set. `all_whitespace` mirrors the
    /// `--separators=+XYZ` / `--separators=-+` CLI spellings (§6.2): when
    /// true, any Unicode whitespace also separates in addition to the given
    /// characters.
    pub fn set_separators(&mut self, chars: impl IntoIterator<Item = char>, all_whitespace: bool) {
        self.separators = chars.into_iter().collect();
        self.all_whitespace_separates = all_whitespace;
    }

    /// Tokenize one line of input, appending to the internal buffer.
    pub fn tokenize_line(&mut self, line: &str, language_hint: Option<&str>) -> Result<(), TokenizerError> {
        if line.trim().is_empty() {
            if self.paragraph_detection {
                self.paragraph_signal_next = true;
            }
            return Ok(());
        }

        // `sentenceperlineinput` forces `is_eos` off in `detect_sentence_bounds`
        // below (the caller has already promised one line == one sentence), so
        // the line boundary's own signal has to arrive another way: append the
        // utterance marker and let the ordinary utt_mark split close out
        // whatever came before it, same as an inline `<utt>` would.
        let owned_line;
        let line = if self.sentence_per_line_input && !self.mode.utt_mark.is_empty() {
            owned_line = format!("{} {}", line, self.mode.utt_mark);
            owned_line.as_str()
        } else {
            line
        };

        if self.pass_through {
            let start = self.buffer.len();
            let filtered = if self.apply_filter {
                self.settings
                    .get(LANG_DEFAULT)
                    .map(|s| s.filter.apply(line))
                    .unwrap_or_else(|| line.to_string())
            } else {
                line.to_string()
            };
            for chunk in split_separators(&filtered, &self.separators, self.all_whitespace_separates) {
                if chunk.is_empty() {
                    continue;
                }
                let chunk_start = self.buffer.len();
                tokenize_chunk_passthrough(&chunk, &self.mode, &mut self.buffer);
                self.apply_paragraph_signal(chunk_start);
            }
            if let Some(setting) = self.settings.get_mut(LANG_DEFAULT) {
                boundary::detect_sentence_bounds(
                    setting,
                    &mut self.buffer,
                    start,
                    self.quote_detection,
                    self.sentence_per_line_input,
                );
            }
            return Ok(());
        }

        if self.allow_und && self.detect_lang_per_line {
            return self.tokenize_line_multilang(line);
        }

        let language = self.resolve_line_language(line, language_hint);
        if language == LANG_UNDETERMINED {
            self.emit_unanalyzed(line.trim());
            return Ok(());
        }
        self.tokenize_segments(line, &language)
    }

    fn resolve_line_language(&self, line: &str, hint: Option<&str>) -> String {
        let candidate = hint
            .map(|s| s.to_string())
            .or_else(|| self.detector.as_ref().and_then(|d| d.detect(line)));
        resolve_language(&self.settings, candidate.as_deref(), self.allow_und)
    }

    fn tokenize_segments(&mut self, line: &str, language: &str) -> Result<(), TokenizerError> {
        if !self.settings.contains_key(language) {
            return Err(TokenizerError::Logic(format!(
                "no Setting loaded for language '{}'",
                language
            )));
        }
        let start = self.buffer.len();
        let filtered = if self.apply_filter {
            self.settings
                .get(language)
                .expect("checked above")
                .filter
                .apply(line)
        } else {
            line.to_string()
        };
        for chunk in split_separators(&filtered, &self.separators, self.all_whitespace_separates) {
            if chunk.is_empty() {
                continue;
            }
            let chunk_start = self.buffer.len();
            let setting = self.settings.get(language).expect("checked above");
            tokenize_chunk(setting, &chunk, language, &self.mode, &mut self.buffer);
            self.apply_paragraph_signal(chunk_start);
        }
        if let Some(setting) = self.settings.get_mut(language) {
            boundary::detect_sentence_bounds(
                setting,
                &mut self.buffer,
                start,
                self.quote_detection,
                self.sentence_per_line_input,
            );
        }
        Ok(())
    }

    fn tokenize_line_multilang(&mut self, line: &str) -> Result<(), TokenizerError> {
        let eos_markers = self
            .settings
            .get(LANG_DEFAULT)
            .map(|s| s.eos_markers.clone())
            .unwrap_or_else(|| ".!?".chars().collect());
        let runs = split_into_sentence_runs(line, &eos_markers);

        let mut coalesced: Vec<(String, String)> = Vec::new();
        for run in runs {
            let guess = self.detector.as_ref().and_then(|d| d.detect(&run));
            let lang = resolve_language(&self.settings, guess.as_deref(), true);
            if let Some(last) = coalesced.last_mut() {
                if last.0 == lang {
                    last.1.push(' ');
                    last.1.push_str(run.trim());
                    continue;
                }
            }
            coalesced.push((lang, run));
        }

        for (lang, text) in coalesced {
            if lang == LANG_UNDETERMINED {
                self.emit_unanalyzed(&text);
            } else {
                self.tokenize_segments(&text, &lang)?;
            }
        }
        Ok(())
    }

    /// Emit `text` as one or more `UNANALYZED` tokens, still honoring the
    /// utterance marker (Open Question decision in `DESIGN.md`: an explicit
    /// `utt_mark` inside an `und` span still forces a split).
    fn emit_unanalyzed(&mut self, text: &str) {
        let utt_mark = self.mode.utt_mark.clone();
        let start = self.buffer.len();
        if !utt_mark.is_empty() {
            if let Some(pos) = text.find(utt_mark.as_str()) {
                let (before, after) = text.split_at(pos);
                let after = &after[utt_mark.len()..];
                if !before.trim().is_empty() {
                    self.emit_unanalyzed(before.trim());
                }
                if let Some(last) = self.buffer.last_mut() {
                    last.role.insert(TokenRole::END_SENT);
                }
                let next_start = self.buffer.len();
                if !after.trim().is_empty() {
                    self.emit_unanalyzed(after.trim());
                }
                if let Some(next) = self.buffer.get_mut(next_start) {
                    next.role.insert(TokenRole::BEGIN_SENT);
                }
                return;
            }
        }
        self.buffer.push(
            Token::new(TYPE_UNANALYZED, text.trim())
                .with_language(LANG_UNDETERMINED)
                .with_role(TokenRole::BEGIN_SENT | TokenRole::END_SENT),
        );
        self.apply_paragraph_signal(start);
    }

    fn apply_paragraph_signal(&mut self, start: usize) {
        if !self.started {
            if let Some(tok) = self.buffer.get_mut(start) {
                tok.role.insert(TokenRole::BEGIN_SENT);
            }
            self.started = true;
            self.paragraph_signal_next = false;
            return;
        }
        if self.paragraph_detection && self.paragraph_signal_next {
            if let Some(tok) = self.buffer.get_mut(start) {
                tok.role.insert(TokenRole::NEW_PARAGRAPH);
                tok.role.insert(TokenRole::BEGIN_SENT);
                self.paragraph_signal_next = false;
            }
        }
    }

    fn flush_quote_stacks(&mut self, drained: usize) {
        for setting in self.settings.values_mut() {
            setting.quotes.flush_stack(drained);
        }
    }

    fn try_pop_sentence(&mut self) -> Option<Vec<Token>> {
        let popped = boundary::pop_sentence(&mut self.buffer)?;
        self.flush_quote_stacks(popped.len());
        Some(popped)
    }

    /// Read lines from `reader` until one complete sentence is available,
    /// or the stream ends (in which case completion is forced and any
    /// remainder is returned).
    pub fn tokenize_one_sentence<R: BufRead>(
        &mut self,
        reader: &mut R,
    ) -> Result<Option<Vec<Token>>, TokenizerError> {
        loop {
            if let Some(sentence) = self.try_pop_sentence() {
                return Ok(Some(sentence));
            }
            let mut line = String::new();
            let n = reader
                .read_line(&mut line)
                .map_err(|e| TokenizerError::Decode(e.to_string()))?;
            if n == 0 {
                boundary::count_sentences(&mut self.buffer, true);
                return Ok(self.try_pop_sentence());
            }
            let trimmed = line.trim_end_matches(['\n', '\r']);
            self.tokenize_line(trimmed, None)?;
        }
    }

    /// Force completion of the buffer and pop every remaining sentence.
    pub fn get_sentences(&mut self) -> Vec<Vec<Token>> {
        boundary::count_sentences(&mut self.buffer, true);
        let mut out = Vec::new();
        while let Some(sentence) = self.try_pop_sentence() {
            out.push(sentence);
        }
        out
    }

    /// Contract-parity alias: the crate works in `String`/`&str` throughout,
    /// so this returns the same UTF-8 sentences as [`get_sentences`].
    pub fn get_utf8_sentences(&mut self) -> Vec<Vec<Token>> {
        self.get_sentences()
    }

    /// Render a popped sentence as text (§4.8's `outputTokens`).
    pub fn output_tokens(&self, tokens: &[Token], continued: bool) -> String {
        if self.verbose {
            let mut out = String::new();
            for t in tokens {
                let _ = writeln!(out, "{}\t{}\t{}", t.text, t.kind, t.role);
            }
            return out;
        }

        let mut out = String::new();
        let mut depth: i32 = 0;
        for (i, t) in tokens.iter().enumerate() {
            if continued && t.role.contains(TokenRole::NEW_PARAGRAPH) {
                out.push_str("\n\n");
            } else if i > 0 && !tokens[i - 1].is_nospace() {
                out.push(' ');
            }
            out.push_str(&t.text);

            if t.role.contains(TokenRole::BEGIN_QUOTE) {
                depth += 1;
            }
            if t.role.contains(TokenRole::END_QUOTE) {
                depth = (depth - 1).max(0);
            }
            if t.role.contains(TokenRole::END_SENT) && depth == 0 {
                if self.sentence_per_line_output {
                    out.push('\n');
                } else if !self.mode.utt_mark.is_empty() {
                    out.push(' ');
                    out.push_str(&self.mode.utt_mark);
                }
            }
        }
        out
    }
}

/// Split `line` on separator characters, eliding a zero-width joiner
/// (U+200D) and suppressing the separator boundary it would otherwise have
/// introduced (§4.2 step 1).
fn split_separators(line: &str, separators: &HashSet<char>, all_whitespace: bool) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut suppress_next_sep = false;

    for c in line.chars() {
        if c == '\u{200D}' {
            suppress_next_sep = true;
            continue;
        }
        let is_sep = (all_whitespace && c.is_whitespace()) || separators.contains(&c);
        if is_sep && !suppress_next_sep {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
            suppress_next_sep = false;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Split `line` into runs ending at an end-of-sentence marker that is
/// followed by whitespace (or end of line) — the boundary the multi-language
/// dispatcher (§4.5) detects languages across.
fn split_into_sentence_runs(line: &str, eos_markers: &HashSet<char>) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();
    let chars: Vec<char> = line.chars().collect();

    for i in 0..chars.len() {
        current.push(chars[i]);
        let is_marker = chars[i] == '.' || eos_markers.contains(&chars[i]);
        let followed_by_space = chars.get(i + 1).map_or(true, |c| c.is_whitespace());
        if is_marker && followed_by_space {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.trim().is_empty() {
        runs.push(current);
    }
    runs
}
