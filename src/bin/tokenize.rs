//! Thin command-line front-end (§6.2) wiring stdin/file input to
//! [`lexcascade::Tokenizer`]. Flags are parsed by hand: the option surface
//! mixes short flags, `--long=value` and comma lists closely enough that a
//! small loop over `std::env::args()` stays more direct than pulling in a
//! general-purpose argument parser for a handful of switches.

use lexcascade::doc_trait::TextRedundancy;
use lexcascade::settings;
use lexcascade::unicode_util::{normalize, strip_bom, NormalizationForm};
use lexcascade::Tokenizer;
use std::fs;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::process::ExitCode;

struct Options {
    input_path: Option<String>,
    output_path: Option<String>,
    config_path: Option<String>,
    language: Option<String>,
    sentence_per_line_output: bool,
    sentence_per_line_input: bool,
    disable_paragraph: bool,
    quote_detection: bool,
    lowercase: bool,
    uppercase: bool,
    utt_mark: String,
    verbose: bool,
    pass_through: bool,
    filter_punct: bool,
    apply_filter: bool,
    normalize_form: Option<NormalizationForm>,
    normalize_set: Vec<String>,
    separators: Vec<char>,
    separators_all_whitespace: bool,
    /// Parsed but unused outside a `TextBearingDocument` collaborator; no
    /// structured-output backend ships with this crate (see §4.9).
    #[allow(dead_code)]
    text_redundancy: TextRedundancy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            input_path: None,
            output_path: None,
            config_path: None,
            language: None,
            sentence_per_line_output: false,
            sentence_per_line_input: false,
            disable_paragraph: false,
            quote_detection: false,
            lowercase: false,
            uppercase: false,
            utt_mark: "<utt>".to_string(),
            verbose: false,
            pass_through: false,
            filter_punct: false,
            apply_filter: true,
            normalize_form: None,
            normalize_set: Vec::new(),
            separators: Vec::new(),
            separators_all_whitespace: true,
            text_redundancy: TextRedundancy::Full,
        }
    }
}

/// Parse the `--separators=<spec>` mini-language (§6.2): `+` means all
/// Unicode whitespace separates (the default), `-+` means only the literal
/// `+` character separates, and `+XYZ` means whitespace plus the given
/// characters.
fn parse_separators(spec: &str) -> (Vec<char>, bool) {
    if let Some(rest) = spec.strip_prefix("-+") {
        return (rest.chars().collect(), false);
    }
    if let Some(rest) = spec.strip_prefix('+') {
        return (rest.chars().collect(), true);
    }
    (spec.chars().collect(), false)
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut opts = Options::default();
    let mut positionals = Vec::new();
    let mut iter = args.iter().peekable();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-L" => opts.language = Some(expect_value(&mut iter, "-L")?),
            "-c" => opts.config_path = Some(expect_value(&mut iter, "-c")?),
            "-e" => {
                let enc = expect_value(&mut iter, "-e")?;
                if !enc.eq_ignore_ascii_case("utf-8") && !enc.eq_ignore_ascii_case("utf8") {
                    return Err(format!("unsupported -e encoding '{}': only UTF-8 input is supported", enc));
                }
            }
            "-n" => opts.sentence_per_line_output = true,
            "-m" => opts.sentence_per_line_input = true,
            "-P" => opts.disable_paragraph = true,
            "-Q" => opts.quote_detection = true,
            "-l" => opts.lowercase = true,
            "-u" => opts.uppercase = true,
            "-v" => opts.verbose = true,
            "-s" => opts.utt_mark = expect_value(&mut iter, "-s")?,
            "-N" => {
                let form = expect_value(&mut iter, "-N")?;
                opts.normalize_form = Some(
                    NormalizationForm::parse(&form).ok_or_else(|| format!("unknown -N form '{}'", form))?,
                );
            }
            "--passthru" => opts.pass_through = true,
            "--filterpunct" => opts.filter_punct = true,
            other => {
                if let Some(rest) = other.strip_prefix("--detectlanguages=") {
                    return Err(format!("--detectlanguages={} requires a LanguageDetector adapter; not available from the CLI front-end", rest));
                } else if let Some(rest) = other.strip_prefix("--uselanguages=") {
                    return Err(format!("--uselanguages={} requires a LanguageDetector adapter; not available from the CLI front-end", rest));
                } else if let Some(rest) = other.strip_prefix("--filter=") {
                    opts.apply_filter = match rest {
                        "yes" => true,
                        "no" => false,
                        _ => return Err(format!("--filter expects 'yes' or 'no', got '{}'", rest)),
                    };
                } else if let Some(rest) = other.strip_prefix("--normalize=") {
                    opts.normalize_set = rest.split(',').map(|s| s.to_string()).collect();
                } else if let Some(rest) = other.strip_prefix("--separators=") {
                    let (chars, all_whitespace) = parse_separators(rest);
                    opts.separators = chars;
                    opts.separators_all_whitespace = all_whitespace;
                } else if let Some(rest) = other.strip_prefix("--textredundancy=") {
                    opts.text_redundancy = TextRedundancy::parse(rest)
                        .ok_or_else(|| format!("unknown --textredundancy value '{}'", rest))?;
                } else {
                    positionals.push(other.to_string());
                }
            }
        }
    }

    opts.input_path = positionals.first().cloned();
    opts.output_path = positionals.get(1).cloned();
    Ok(opts)
}

fn expect_value(iter: &mut std::iter::Peekable<std::slice::Iter<String>>, flag: &str) -> Result<String, String> {
    iter.next()
        .cloned()
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn run(opts: Options) -> Result<(), String> {
    let language = opts.language.clone().unwrap_or_else(|| "default".to_string());

    let setting = match &opts.config_path {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path, e))?;
            settings::SettingsBuilder::new(language.as_str(), path.as_str())
                .parse(&text)
                .map_err(|e| e.to_string())?
        }
        None => lexcascade::Setting::empty(language.clone()),
    };

    let mut tokenizer = Tokenizer::new(setting);
    tokenizer.set_pass_through(opts.pass_through);
    tokenizer.set_quote_detection(opts.quote_detection);
    tokenizer.set_paragraph_detection(!opts.disable_paragraph);
    tokenizer.set_sentence_per_line_input(opts.sentence_per_line_input);
    tokenizer.set_sentence_per_line_output(opts.sentence_per_line_output);
    tokenizer.set_verbose(opts.verbose);
    tokenizer.set_case_folding(opts.lowercase, opts.uppercase);
    tokenizer.set_punct_filter(opts.filter_punct);
    tokenizer.set_apply_filter(opts.apply_filter);
    tokenizer.set_normalize_set(opts.normalize_set.iter().cloned());
    tokenizer.set_utt_mark(opts.utt_mark);
    if !opts.separators.is_empty() || !opts.separators_all_whitespace {
        tokenizer.set_separators(opts.separators.iter().copied(), opts.separators_all_whitespace);
    }

    let raw = match &opts.input_path {
        Some(path) => fs::read(path).map_err(|e| format!("{}: {}", path, e))?,
        None => {
            let mut buf = Vec::new();
            io::stdin().read_to_end(&mut buf).map_err(|e| e.to_string())?;
            buf
        }
    };
    let mut text = strip_bom(&raw).map_err(|e| e.to_string())?;
    if let Some(form) = opts.normalize_form {
        text = normalize(&text, form);
    }

    let mut stdout;
    let mut file_out;
    let writer: &mut dyn Write = match &opts.output_path {
        Some(path) => {
            file_out = fs::File::create(path).map_err(|e| format!("{}: {}", path, e))?;
            &mut file_out
        }
        None => {
            stdout = io::stdout();
            &mut stdout
        }
    };

    let mut reader = BufReader::new(text.as_bytes());
    loop {
        match tokenizer
            .tokenize_one_sentence(&mut reader)
            .map_err(|e| e.to_string())?
        {
            Some(sentence) => {
                let rendered = tokenizer.output_tokens(&sentence, true);
                writeln!(writer, "{}", rendered).map_err(|e| e.to_string())?;
            }
            None => break,
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(opts) => opts,
        Err(message) => {
            eprintln!("lexcascade: {}", message);
            return ExitCode::from(1);
        }
    };

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("lexcascade: {}", message);
            ExitCode::from(1)
        }
    }
}
