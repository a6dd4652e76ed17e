//! Client command representation and tokenizer.
//!
//! One line of client text becomes one [`Command`]: the first token is the
//! command name, the rest are its arguments. Double quotes group a
//! multi-word token and are stripped from the output.

/// An immutable command value: name plus ordered argument list.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Command {
    name: String,
    arguments: Vec<String>,
}

impl Command {
    pub fn new(name: String, arguments: Vec<String>) -> Self {
        Self { name, arguments }
    }

    /// Tokenize one line of raw client input.
    ///
    /// A `"` toggles the quoted state and never reaches a token. A space
    /// outside quotes flushes the current token if non-empty, so runs of
    /// spaces collapse and no empty tokens are emitted. An unterminated
    /// quote simply ends at end of input. Empty input yields a command
    /// with an empty name and no arguments.
    pub fn from_input(input: &str) -> Self {
        let mut tokens: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut inside_quote = false;

        for c in input.chars() {
            if c == '"' {
                inside_quote = !inside_quote;
                continue;
            }
            if c == ' ' && !inside_quote {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            } else {
                current.push(c);
            }
        }
        if !current.is_empty() {
            tokens.push(current);
        }

        if tokens.is_empty() {
            return Self::new(String::new(), Vec::new());
        }
        let name = tokens.remove(0);
        Self::new(name, tokens)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }
}
