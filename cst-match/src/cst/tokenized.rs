//! Tokenized source files.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::TOKEN_SEPARATOR_WIDTH;

/// A lexical token and its offsets in the file text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, start: usize, end: usize) -> Self {
        Token {
            text: text.into(),
            start,
            end,
        }
    }
}

/// The ordered tokens of one file.
///
/// Tokens are kept sorted by start offset so span lookups can binary search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedSource {
    file: String,
    #[serde(deserialize_with = "deserialize_sorted")]
    tokens: Vec<Token>,
}

/// Snapshots written by other tools may list tokens in any order.
fn deserialize_sorted<'de, D>(deserializer: D) -> Result<Vec<Token>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut tokens = Vec::<Token>::deserialize(deserializer)?;
    tokens.sort_by_key(|t| t.start);
    Ok(tokens)
}

impl TokenizedSource {
    /// Creates an empty tokenized source for `file`.
    pub fn new(file: impl Into<String>) -> Self {
        TokenizedSource {
            file: file.into(),
            tokens: Vec::new(),
        }
    }

    /// Creates a tokenized source from tokens produced by a tokenizer.
    pub fn from_tokens(file: impl Into<String>, mut tokens: Vec<Token>) -> Self {
        tokens.sort_by_key(|t| t.start);
        TokenizedSource {
            file: file.into(),
            tokens,
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Offset just past the last token, or 0 for an empty file.
    pub fn end_offset(&self) -> usize {
        self.tokens.last().map_or(0, |t| t.end)
    }

    /// Appends tokens at consecutive offsets and returns the covered span.
    ///
    /// Each token occupies its byte length and is followed by a one-byte gap,
    /// as if the file were the tokens joined by spaces. An empty input
    /// returns an empty span at the current end.
    pub fn push_tokens<I, S>(&mut self, texts: I) -> (usize, usize)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut offset = if self.tokens.is_empty() {
            0
        } else {
            self.end_offset() + TOKEN_SEPARATOR_WIDTH
        };
        let begin = offset;
        let mut end = offset;

        for text in texts {
            let text = text.into();
            let token_end = offset + text.len();
            self.tokens.push(Token::new(text, offset, token_end));
            end = token_end;
            offset = token_end + TOKEN_SEPARATOR_WIDTH;
        }

        (begin, end)
    }

    /// Returns the tokens whose start offset lies in `begin..end`.
    pub fn tokens_in(&self, begin: usize, end: usize) -> &[Token] {
        if begin >= end {
            return &[];
        }
        let lo = self.tokens.partition_point(|t| t.start < begin);
        let hi = self.tokens.partition_point(|t| t.start < end);
        &self.tokens[lo..hi]
    }
}
