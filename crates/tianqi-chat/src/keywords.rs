//! Ordered phrase tables.
//!
//! Text and phrases go through the same tokenizer: every non-ASCII letter
//! (a CJK character) is a token of its own, every run of ASCII letters and
//! digits is one lowercase token, anything else only separates tokens.
//! Matching on tokens keeps `n` from firing inside `no` or `tomorrow`.

use once_cell::sync::Lazy;

/// Split text into matching tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            word.push(c.to_ascii_lowercase());
            continue;
        }
        if !word.is_empty() {
            tokens.push(std::mem::take(&mut word));
        }
        if !c.is_ascii() && c.is_alphabetic() {
            tokens.push(c.to_string());
        }
    }
    if !word.is_empty() {
        tokens.push(word);
    }

    tokens
}

/// `(phrase, outcome)` rules, consulted in the order given.
#[derive(Debug, Clone)]
pub struct PhraseTable<T> {
    rules: Vec<(Vec<String>, T)>,
}

impl<T: Copy> PhraseTable<T> {
    pub fn new(rules: &[(&str, T)]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|(phrase, outcome)| (tokenize(phrase), *outcome))
                .filter(|(tokens, _)| !tokens.is_empty())
                .collect(),
        }
    }

    /// Outcome of the first rule whose phrase occurs anywhere in `text`.
    pub fn first(&self, text: &str) -> Option<T> {
        let tokens = tokenize(text);
        self.rules
            .iter()
            .find(|(phrase, _)| tokens.windows(phrase.len()).any(|w| w == phrase.as_slice()))
            .map(|(_, outcome)| *outcome)
    }

    /// Left-to-right scan. At each position the first rule that matches
    /// there is recorded and its tokens consumed, so a longer phrase
    /// listed earlier shadows the shorter phrases inside it.
    pub fn scan(&self, text: &str) -> Vec<T> {
        let tokens = tokenize(text);
        let mut found = Vec::new();
        let mut pos = 0;

        while pos < tokens.len() {
            let rest = &tokens[pos..];
            match self.rules.iter().find(|(phrase, _)| rest.starts_with(phrase)) {
                Some((phrase, outcome)) => {
                    found.push(*outcome);
                    pos += phrase.len();
                }
                None => pos += 1,
            }
        }

        found
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    Affirm,
    Negate,
}

/// How a reply to "is this the date you meant?" reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Affirm,
    Negate,
    /// Both a yes and a no
    Ambiguous,
    /// Neither
    Unclear,
}

// Negations first: at a shared position "不是" must win over "是".
static CONFIRMATION_TABLE: Lazy<PhraseTable<Polarity>> = Lazy::new(|| {
    PhraseTable::new(&[
        ("不是", Polarity::Negate),
        ("不對", Polarity::Negate),
        ("不要", Polarity::Negate),
        ("不好", Polarity::Negate),
        ("不用", Polarity::Negate),
        ("錯", Polarity::Negate),
        ("不", Polarity::Negate),
        ("not right", Polarity::Negate),
        ("not correct", Polarity::Negate),
        ("not yes", Polarity::Negate),
        ("not ok", Polarity::Negate),
        ("not okay", Polarity::Negate),
        ("not sure", Polarity::Negate),
        ("not confirm", Polarity::Negate),
        ("not confirmed", Polarity::Negate),
        ("incorrect", Polarity::Negate),
        ("wrong", Polarity::Negate),
        ("nope", Polarity::Negate),
        ("no", Polarity::Negate),
        ("n", Polarity::Negate),
        ("沒錯", Polarity::Affirm),
        ("正確", Polarity::Affirm),
        ("確認", Polarity::Affirm),
        ("是", Polarity::Affirm),
        ("對", Polarity::Affirm),
        ("好", Polarity::Affirm),
        ("yes", Polarity::Affirm),
        ("yeah", Polarity::Affirm),
        ("yep", Polarity::Affirm),
        ("y", Polarity::Affirm),
        ("okay", Polarity::Affirm),
        ("ok", Polarity::Affirm),
        ("sure", Polarity::Affirm),
        ("right", Polarity::Affirm),
        ("correct", Polarity::Affirm),
        ("confirm", Polarity::Affirm),
    ])
});

/// Classify a reply given while a date is pending.
pub fn classify_confirmation(text: &str) -> Confirmation {
    let found = CONFIRMATION_TABLE.scan(text);
    let affirm = found.contains(&Polarity::Affirm);
    let negate = found.contains(&Polarity::Negate);

    match (affirm, negate) {
        (true, true) => Confirmation::Ambiguous,
        (false, true) => Confirmation::Negate,
        (true, false) => Confirmation::Affirm,
        (false, false) => Confirmation::Unclear,
    }
}
