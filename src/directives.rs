//! Formatting directives embedded in variable descriptions
//!
//! A description may carry `unit: <none|px|rem|em|%|ms|s>[:<base>]` and
//! `format: <hex|rgb|rgba|hsl|oklch>` anywhere in its free text. Matching is
//! case-insensitive, whitespace-tolerant and order-independent. Anything the
//! two fixed vocabularies do not recognise is dropped silently.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_REM_BASE: f64 = 16.0;

/// Output unit for numeric variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    None,
    #[default]
    Px,
    Rem,
    Em,
    Percent,
    Ms,
    S,
}

impl Unit {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "none" => Some(Unit::None),
            "px" => Some(Unit::Px),
            "rem" => Some(Unit::Rem),
            "em" => Some(Unit::Em),
            "%" | "percent" => Some(Unit::Percent),
            "ms" => Some(Unit::Ms),
            "s" => Some(Unit::S),
            _ => None,
        }
    }

    /// Literal appended after the number
    pub fn suffix(&self) -> &'static str {
        match self {
            Unit::None => "",
            Unit::Px => "px",
            Unit::Rem => "rem",
            Unit::Em => "em",
            Unit::Percent => "%",
            Unit::Ms => "ms",
            Unit::S => "s",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::None => "none",
            Unit::Percent => "percent",
            other => other.suffix(),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output notation for color variables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorFormat {
    #[default]
    Hex,
    Rgb,
    Rgba,
    Hsl,
    Oklch,
}

impl ColorFormat {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "hex" => Some(ColorFormat::Hex),
            "rgb" => Some(ColorFormat::Rgb),
            "rgba" => Some(ColorFormat::Rgba),
            "hsl" => Some(ColorFormat::Hsl),
            "oklch" => Some(ColorFormat::Oklch),
            _ => None,
        }
    }
}

/// Effective formatting configuration of one variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormatConfig {
    pub unit: Unit,
    pub rem_base: f64,
    pub color_format: ColorFormat,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            unit: Unit::default(),
            rem_base: DEFAULT_REM_BASE,
            color_format: ColorFormat::default(),
        }
    }
}

/// Fields set explicitly by a description; `None` defers to the base layer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PartialFormatConfig {
    pub unit: Option<Unit>,
    pub rem_base: Option<f64>,
    pub color_format: Option<ColorFormat>,
}

impl PartialFormatConfig {
    pub fn is_empty(&self) -> bool {
        self.unit.is_none() && self.rem_base.is_none() && self.color_format.is_none()
    }
}

impl FormatConfig {
    /// Lay `overrides` on top of `self` without touching either
    pub fn overlay(&self, overrides: &PartialFormatConfig) -> FormatConfig {
        FormatConfig {
            unit: overrides.unit.unwrap_or(self.unit),
            rem_base: overrides.rem_base.unwrap_or(self.rem_base),
            color_format: overrides.color_format.unwrap_or(self.color_format),
        }
    }

    /// Default configuration overlaid with the directives of `description`
    pub fn for_description(description: &str) -> FormatConfig {
        FormatConfig::default().overlay(&parse(description))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum DirectiveToken {
    Word(String),
    Integer(u32),
    Colon,
    Other,
}

/// Splits a description into lowercase words, integers and colons
struct DirectiveLexer {
    input: Vec<char>,
    position: usize,
}

impl DirectiveLexer {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_lowercase().chars().collect(),
            position: 0,
        }
    }

    fn tokenize(&mut self) -> Vec<DirectiveToken> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
                continue;
            }

            let token = if ch == ':' {
                self.advance();
                DirectiveToken::Colon
            } else if ch.is_ascii_digit() {
                let digits = self.read_while(|c| c.is_ascii_digit());
                digits
                    .parse()
                    .map(DirectiveToken::Integer)
                    .unwrap_or(DirectiveToken::Other)
            } else if ch.is_alphabetic() || ch == '%' {
                DirectiveToken::Word(self.read_while(|c| c.is_alphabetic() || c == '%'))
            } else {
                self.advance();
                DirectiveToken::Other
            };
            tokens.push(token);
        }

        tokens
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(ch) = self.peek() {
            if !accept(ch) {
                break;
            }
            text.push(ch);
            self.advance();
        }
        text
    }

    fn advance(&mut self) {
        if self.position < self.input.len() {
            self.position += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }
}

/// Extract the formatting directives of a description.
///
/// The first well-formed `unit:` and the first well-formed `format:` win.
/// A rem base of zero is rejected and leaves `rem_base` unset.
pub fn parse(description: &str) -> PartialFormatConfig {
    let mut config = PartialFormatConfig::default();
    if description.trim().is_empty() {
        return config;
    }

    let tokens = DirectiveLexer::new(description).tokenize();
    let word_at = |index: usize| match tokens.get(index) {
        Some(DirectiveToken::Word(word)) => Some(word.as_str()),
        _ => None,
    };
    let colon_at = |index: usize| matches!(tokens.get(index), Some(DirectiveToken::Colon));

    for index in 0..tokens.len() {
        match word_at(index) {
            Some("unit") if config.unit.is_none() && colon_at(index + 1) => {
                let Some(unit) = word_at(index + 2).and_then(Unit::from_keyword) else {
                    continue;
                };
                config.unit = Some(unit);
                if colon_at(index + 3) {
                    if let Some(DirectiveToken::Integer(base)) = tokens.get(index + 4) {
                        if *base > 0 {
                            config.rem_base = Some(f64::from(*base));
                        }
                    }
                }
            }
            Some("format") if config.color_format.is_none() && colon_at(index + 1) => {
                if let Some(format) = word_at(index + 2).and_then(ColorFormat::from_keyword) {
                    config.color_format = Some(format);
                }
            }
            _ => {}
        }
    }

    if !config.is_empty() {
        log::trace!("Parsed directives {:?} from description {:?}", config, description);
    }

    config
}
